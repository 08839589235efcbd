//! Step definitions for task list cache scenarios.

pub mod given;
pub mod then;
pub mod when;
