//! Domain model for tasks.
//!
//! Tasks carry a validated title and description, a status governed by a
//! small state machine, and an optional weak reference to a team. The domain
//! keeps all infrastructure concerns outside of its boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, StatusChange, Task, TaskDescription, TaskTitle};
