//! Application services - Use case implementations

pub mod visit_planner;

pub use visit_planner::{DEFAULT_HOURS_CONCURRENCY, VisitPlanner};
