//! Rendering of visit reports into map and schedule artifacts
//!
//! Templates are embedded in the binary and rendered with Tera. View models
//! carry precomputed coordinates so the templates stay free of arithmetic.

mod artifacts;
mod templates;
mod views;

pub use artifacts::{ArtifactRenderer, MAP_FILE, SCHEDULE_FILE};
pub use templates::{TemplateEngine, TemplateError};
pub use views::{MapMarker, MapView, ScheduleRow, ScheduleView};
