//! Application services for task management.

mod task;

pub use task::{
    CreateTaskRequest, ListTasksRequest, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
