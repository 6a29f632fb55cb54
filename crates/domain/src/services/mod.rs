//! Domain services - Stateless logic spanning several entities

pub mod visit_filter;

pub use visit_filter::{
    FilterOutcome, RELAXED_WINDOWS, STRICT_WINDOW, SUGGESTION_THRESHOLD, VisitFilter, is_acceptable,
    is_open, is_uncrowded,
};
