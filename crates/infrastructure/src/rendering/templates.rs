//! Tera engine with the embedded artifact templates

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),

    /// View model could not be serialized into a context
    #[error("Invalid context: {0}")]
    Context(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

/// Template names
pub const MAP_TEMPLATE: &str = "map.html";
pub const SCHEDULE_TEMPLATE: &str = "schedule.svg";

/// Embedded templates - compiled into the binary
mod embedded {
    pub const MAP_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body, #map { height: 100%; margin: 0; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
        var map = L.map("map").setView([{{ center_lat }}, {{ center_lng }}], {{ zoom }});
        L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
            maxZoom: 19,
            attribution: "&copy; OpenStreetMap contributors"
        }).addTo(map);
{% for m in markers %}
        L.circleMarker([{{ m.lat }}, {{ m.lng }}], {
            radius: 8, color: "{{ m.color }}", fillColor: "{{ m.color }}", fillOpacity: 0.8
        }).bindPopup("<b>{{ m.name }}</b><br>{{ m.category }}<br><i>{{ m.kind }}</i>").addTo(map);
{% endfor %}
    </script>
</body>
</html>
"#;

    pub const SCHEDULE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{ width }}" height="{{ height }}" font-family="sans-serif" font-size="12">
  <style>
    .closed { fill: #7f7f7f; }
    .open { fill: #2ca02c; }
    .popular { fill: #d62728; }
    .visit { stroke: #1f77b4; stroke-width: 2; }
  </style>
  <text x="{{ plot_left }}" y="20" font-size="14">{{ title }}</text>
{% for row in rows %}
  <text x="{{ plot_left - 8 }}" y="{{ row.label_y }}" text-anchor="end">{{ row.label }}</text>
  <rect class="closed" x="{{ plot_left }}" y="{{ row.y }}" width="{{ plot_width }}" height="{{ bar_height }}"/>
  <rect class="open" x="{{ row.open_x }}" y="{{ row.y }}" width="{{ row.open_width }}" height="{{ bar_height }}"/>
  <rect class="popular" x="{{ row.popular_x }}" y="{{ row.y }}" width="{{ row.popular_width }}" height="{{ bar_height }}"/>
{% endfor %}
{% for tick in ticks %}
  <text x="{{ tick.x }}" y="{{ axis_y + 16 }}" text-anchor="middle">{{ tick.hour }}</text>
{% endfor %}
  <text x="{{ plot_left + plot_width / 2 }}" y="{{ axis_y + 34 }}" text-anchor="middle">Time</text>
  <line class="visit" x1="{{ visit_x }}" y1="{{ plot_top - 4 }}" x2="{{ visit_x }}" y2="{{ axis_y }}"/>
  <g transform="translate({{ legend_x }}, {{ plot_top }})">
    <line class="visit" x1="0" y1="6" x2="14" y2="6"/><text x="20" y="10">planned visit</text>
    <rect class="closed" x="0" y="20" width="14" height="12"/><text x="20" y="30">closed</text>
    <rect class="open" x="0" y="40" width="14" height="12"/><text x="20" y="50">open</text>
    <rect class="popular" x="0" y="60" width="14" height="12"/><text x="20" y="70">popular</text>
  </g>
</svg>
"##;
}

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}

impl TemplateEngine {
    /// Create an engine with the embedded templates
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Compile` if an embedded template is invalid.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html", ".svg"]);

        tera.add_raw_template(MAP_TEMPLATE, embedded::MAP_HTML)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;
        tera.add_raw_template(SCHEDULE_TEMPLATE, embedded::SCHEDULE_SVG)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render a template from a serializable view model
    ///
    /// # Errors
    ///
    /// Returns an error if the view cannot be serialized or rendering fails.
    pub fn render<T: Serialize>(&self, template_name: &str, view: &T) -> Result<String, TemplateError> {
        let context =
            Context::from_serialize(view).map_err(|e| TemplateError::Context(e.to_string()))?;
        self.tera
            .render(template_name, &context)
            .map_err(TemplateError::from)
    }
}
