//! Entity Store trait abstraction
//!
//! One async trait per entity kind plus a maintenance trait for the
//! migration engine. Both backends implement all four; they must produce
//! identical result sets and ordering for identical data and filters.

pub mod course;
pub mod entry;
pub mod misc;
pub mod note;

pub use course::CourseStore;
pub use entry::DailyEntryStore;
pub use misc::MaintenanceStore;
pub use note::NoteStore;
