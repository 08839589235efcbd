//! Given steps for task list cache BDD scenarios.

use super::world::{TaskListCacheWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use taskmanager::pagination::PageRequest;
use taskmanager::task::domain::{Task, TaskDescription, TaskStatus, TaskTitle};
use taskmanager::task::ports::TaskRepository;

#[given("a task store behind the list cache")]
fn store_behind_cache(world: &mut TaskListCacheWorld) {
    let _ = world;
}

#[given(r#"a task titled "{title}" exists"#)]
fn task_exists(world: &mut TaskListCacheWorld, title: String) -> Result<(), eyre::Report> {
    let task = Task::new(
        TaskTitle::new(title)?,
        TaskDescription::new("scenario task")?,
        &DefaultClock,
    );
    run_async(world.repository.create(&world.ctx, &task)).wrap_err("seed scenario task")?;
    Ok(())
}

#[given("the first page of all tasks has been listed")]
fn all_tasks_listed(world: &mut TaskListCacheWorld) -> Result<(), eyre::Report> {
    let listing = run_async(
        world
            .repository
            .list_paginated(&world.ctx, None, PageRequest::new(1, 10)),
    )
    .wrap_err("list all tasks")?;
    world.last_listing = Some(listing);
    Ok(())
}

#[given(r#"the first page of "{status}" tasks has been listed"#)]
fn status_tasks_listed(world: &mut TaskListCacheWorld, status: String) -> Result<(), eyre::Report> {
    let filter = TaskStatus::try_from(status.as_str())?;
    let listing = run_async(world.repository.list_paginated(
        &world.ctx,
        Some(filter),
        PageRequest::new(1, 10),
    ))
    .wrap_err("list tasks by status")?;
    world.last_listing = Some(listing);
    Ok(())
}

#[given("the cache is unavailable")]
fn cache_unavailable(world: &mut TaskListCacheWorld) {
    world.cache.take_down();
}
