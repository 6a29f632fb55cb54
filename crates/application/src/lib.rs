//! Application layer - Use cases and orchestration
//!
//! Contains the visit planning pipeline and the port definitions it depends
//! on. Orchestrates domain objects and infrastructure adapters.

pub mod error;
pub mod ports;
pub mod report;
pub mod services;
pub mod visit_input;

pub use error::ApplicationError;
pub use ports::*;
pub use report::{MatchKind, VenueVisit, VisitReport, VisitResultEntry};
pub use services::*;
pub use visit_input::{DEFAULT_RESULT_LIMIT, VisitRequestInput};
