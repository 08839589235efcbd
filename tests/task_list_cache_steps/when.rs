//! When steps for task list cache BDD scenarios.

use super::world::{TaskListCacheWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::when;
use taskmanager::pagination::PageRequest;
use taskmanager::task::domain::{Task, TaskDescription, TaskTitle};
use taskmanager::task::ports::TaskRepository;

#[when("the first page of all tasks is listed {times:usize} times")]
fn list_first_page(world: &mut TaskListCacheWorld, times: usize) -> Result<(), eyre::Report> {
    for _ in 0..times {
        let listing = run_async(
            world
                .repository
                .list_paginated(&world.ctx, None, PageRequest::new(1, 10)),
        )
        .wrap_err("list first page")?;
        world.last_listing = Some(listing);
    }
    Ok(())
}

#[when(r#"a task titled "{title}" is created"#)]
fn create_task(world: &mut TaskListCacheWorld, title: String) -> Result<(), eyre::Report> {
    let task = Task::new(
        TaskTitle::new(title)?,
        TaskDescription::new("scenario task")?,
        &DefaultClock,
    );
    run_async(world.repository.create(&world.ctx, &task)).wrap_err("create scenario task")?;
    Ok(())
}

#[when("an unknown task is updated")]
fn update_unknown_task(world: &mut TaskListCacheWorld) -> Result<(), eyre::Report> {
    let ghost = Task::new(
        TaskTitle::new("Ghost")?,
        TaskDescription::new("never stored")?,
        &DefaultClock,
    );
    let result = run_async(world.repository.update(&world.ctx, ghost.id(), &ghost));
    world.last_update = Some(result);
    Ok(())
}
