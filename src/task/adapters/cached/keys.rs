//! Cache key space for task listings.

use crate::task::domain::TaskStatus;

/// Prefix shared by every task list key.
pub const LIST_KEY_PREFIX: &str = "tasks:list:";

/// Returns the cache key for one page of a task listing.
///
/// ```
/// use taskmanager::task::adapters::cached::keys::list_cache_key;
/// use taskmanager::task::domain::TaskStatus;
///
/// assert_eq!(
///     list_cache_key(Some(TaskStatus::InProgress), 2, 25),
///     "tasks:list:status=in_progress:page=2:limit=25"
/// );
/// assert_eq!(list_cache_key(None, 1, 10), "tasks:list:status=all:page=1:limit=10");
/// ```
#[must_use]
pub fn list_cache_key(status: Option<TaskStatus>, page: u32, limit: u32) -> String {
    let status_part = status.map_or("all", TaskStatus::as_str);
    format!("{LIST_KEY_PREFIX}status={status_part}:page={page}:limit={limit}")
}
