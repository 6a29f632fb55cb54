//! Console output for reports and history

use std::fmt;

use application::{StoredRequest, VenueVisit, VisitReport};
use domain::VISIT_DATETIME_FORMAT;

/// Human-readable report
pub fn format_report(report: &VisitReport) -> String {
    ReportDisplay(report).to_string()
}

/// Human-readable request history
pub fn format_history(history: &[StoredRequest]) -> String {
    HistoryDisplay(history).to_string()
}

struct ReportDisplay<'a>(&'a VisitReport);

fn write_visit(f: &mut fmt::Formatter<'_>, visit: &VenueVisit) -> fmt::Result {
    let h = &visit.hours;
    writeln!(
        f,
        "   • {} [{}] {} m, open {}-{}, busy {}-{}",
        visit.venue.name,
        visit.venue.category,
        visit.venue.distance_m,
        h.open,
        h.close,
        h.popular_start,
        h.popular_end
    )
}

impl fmt::Display for ReportDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let request = &report.request;

        writeln!(
            f,
            "🔎 \"{}\" within {} m of {} on {} (request #{})",
            request.query(),
            request.radius_m(),
            request.location(),
            request.visit_at().format("%A %Y-%m-%d %H:%M"),
            report.request_id
        )?;
        writeln!(
            f,
            "   {} venues found, {} with opening and popular hours",
            report.venues_found, report.venues_with_hours
        )?;

        if report.is_empty() {
            writeln!(f, "\n😕 No quiet venues around that time")?;
        }

        if !report.exact_matches.is_empty() {
            writeln!(f, "\n✅ Open and quiet at your time:")?;
            for visit in &report.exact_matches {
                write_visit(f, visit)?;
            }
        }

        if !report.suggestions.is_empty() {
            writeln!(f, "\n💡 Quiet an hour or two earlier or later:")?;
            for visit in &report.suggestions {
                write_visit(f, visit)?;
            }
        }

        match &report.case_data {
            Some(data) => writeln!(f, "\n🦠 {}", data.summary())?,
            None => writeln!(f, "\n🦠 No regional case data")?,
        }

        for path in &report.artifacts {
            writeln!(f, "📁 {}", path.display())?;
        }
        Ok(())
    }
}

struct HistoryDisplay<'a>(&'a [StoredRequest]);

impl fmt::Display for HistoryDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No requests recorded yet");
        }

        for stored in self.0 {
            let request = &stored.request;
            writeln!(
                f,
                "#{} {} \"{}\" {} m at {} for {}",
                stored.id,
                stored.created_at.format("%Y-%m-%d %H:%M"),
                request.query(),
                request.radius_m(),
                request.location(),
                request.visit_at().format(VISIT_DATETIME_FORMAT)
            )?;
            if let Some(data) = &stored.case_data {
                writeln!(f, "   {}", data.summary())?;
            }
            if !stored.results.is_empty() {
                let names: Vec<String> = stored
                    .results
                    .iter()
                    .map(|r| format!("{} ({})", r.venue_name, r.kind))
                    .collect();
                writeln!(f, "   {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}
