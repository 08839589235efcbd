//! Then steps for task list cache BDD scenarios.

use super::world::{TaskListCacheWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskmanager::pagination::PageRequest;
use taskmanager::task::ports::{TaskRepository, TaskRepositoryError};

#[then("the store was queried {count:usize} times")]
fn store_was_queried(world: &TaskListCacheWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.store.list_calls();
    if calls != count {
        return Err(eyre::eyre!("expected {count} store queries, found {calls}"));
    }
    Ok(())
}

#[then("the listing reports {total:u64} tasks in total")]
fn listing_reports_total(world: &TaskListCacheWorld, total: u64) -> Result<(), eyre::Report> {
    let listing = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    if listing.total_items != total {
        return Err(eyre::eyre!(
            "expected {total} tasks in total, found {}",
            listing.total_items
        ));
    }
    Ok(())
}

#[then("{count:usize} task listings are cached")]
fn listings_are_cached(world: &TaskListCacheWorld, count: usize) -> Result<(), eyre::Report> {
    let cached = world.cache.cached_entries()?;
    if cached != count {
        return Err(eyre::eyre!("expected {count} cached listings, found {cached}"));
    }
    Ok(())
}

#[then("listing the first page of all tasks reports {total:u64} tasks in total")]
fn fresh_listing_reports_total(
    world: &TaskListCacheWorld,
    total: u64,
) -> Result<(), eyre::Report> {
    let listing = run_async(
        world
            .repository
            .list_paginated(&world.ctx, None, PageRequest::new(1, 10)),
    )
    .wrap_err("list after mutation")?;
    if listing.total_items != total {
        return Err(eyre::eyre!(
            "expected {total} tasks in total, found {}",
            listing.total_items
        ));
    }
    Ok(())
}

#[then("the update fails with a not found error")]
fn update_fails_not_found(world: &TaskListCacheWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;
    if !matches!(result, Err(TaskRepositoryError::NotFound(_))) {
        return Err(eyre::eyre!("expected NotFound error, got {result:?}"));
    }
    Ok(())
}
