//! Domain entities - Objects with identity and lifecycle

mod api_credential;
mod hours;
mod region_case_data;
mod venue;
mod visit_request;

pub use api_credential::ApiCredential;
pub use hours::{DailyHours, HoursTable, WEEKDAYS, WeeklyHours};
pub use region_case_data::RegionCaseData;
pub use venue::{UNCATEGORIZED, VenueRecord};
pub use visit_request::{
    MAX_RESULT_LIMIT, VISIT_DATETIME_FORMAT, VisitRequest, parse_visit_datetime,
};
