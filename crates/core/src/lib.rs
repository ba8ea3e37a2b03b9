//! Core types for studykeep
//!
//! This crate contains domain types shared across all other crates.

mod course;
mod entry;
mod error;
mod filters;
mod mode;
mod note;
mod review;

pub use course::*;
pub use entry::*;
pub use error::*;
pub use filters::*;
pub use mode::*;
pub use note::*;
pub use review::*;
