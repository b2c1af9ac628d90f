pub mod submission;
pub mod trigger;
