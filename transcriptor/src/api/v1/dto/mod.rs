//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept apart from the domain types in
//! `src/models/`.

pub mod languages;
pub mod ocr;

pub use languages::*;
pub use ocr::*;
