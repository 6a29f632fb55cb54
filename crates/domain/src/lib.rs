//! Domain layer for quietspot
//!
//! Contains venue and hours entities, value objects, the visit filter and
//! domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use services::{FilterOutcome, VisitFilter};
pub use value_objects::*;
