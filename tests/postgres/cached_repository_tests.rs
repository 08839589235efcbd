//! The list cache in front of the `PostgreSQL` task repository.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{BoxError, new_task, test_database};
use eyre::ensure;
use taskmanager::cache::InMemoryCacheStore;
use taskmanager::context::RequestContext;
use taskmanager::pagination::PageRequest;
use taskmanager::task::{
    adapters::{cached::CachedTaskRepository, postgres::PostgresTaskRepository},
    ports::{TaskRepository, TaskRepositoryError},
};

fn report(err: BoxError) -> eyre::Report {
    eyre::eyre!(err)
}

#[tokio::test(flavor = "multi_thread")]
async fn cached_listing_matches_store_after_writes() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let cache = Arc::new(InMemoryCacheStore::new());
    let repository = CachedTaskRepository::new(
        db.tasks.clone(),
        Arc::clone(&cache),
        Duration::from_secs(300),
    );

    let empty = repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    ensure!(empty.total_items == 0);
    ensure!(cache.len()? == 1);

    let task = new_task("Through the cache").map_err(report)?;
    repository.create(&ctx, &task).await?;
    ensure!(cache.is_empty()?);

    let cached = repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    let direct = db
        .tasks
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    ensure!(cached == direct, "cached listing diverged from the store");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn write_that_misses_its_deadline_waiting_for_a_connection_is_not_committed()
-> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let pool = db.single_connection_pool().await.map_err(report)?;
    let tasks = PostgresTaskRepository::new(pool.clone());
    let cache = Arc::new(InMemoryCacheStore::new());
    let repository =
        CachedTaskRepository::new(tasks.clone(), Arc::clone(&cache), Duration::from_secs(300));
    let ctx = RequestContext::background();

    let empty = repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    ensure!(empty.total_items == 0);

    let checkout_pool = pool.clone();
    let held = tokio::task::spawn_blocking(move || checkout_pool.get()).await??;
    let task = new_task("Too late").map_err(report)?;
    let short = RequestContext::background().with_timeout(Duration::from_millis(200));

    let result = repository.create(&short, &task).await;
    ensure!(
        matches!(result, Err(TaskRepositoryError::DeadlineExceeded)),
        "unexpected result: {result:?}"
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(held);
    tokio::time::sleep(Duration::from_millis(300)).await;

    ensure!(matches!(
        tasks.retrieve(&ctx, task.id()).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    let cached = repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    let direct = tasks
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    ensure!(cached == direct, "cached listing diverged from the store");
    ensure!(direct.total_items == 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn write_waiting_within_its_deadline_commits_and_invalidates() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let pool = db.single_connection_pool().await.map_err(report)?;
    let tasks = PostgresTaskRepository::new(pool.clone());
    let cache = Arc::new(InMemoryCacheStore::new());
    let repository =
        CachedTaskRepository::new(tasks.clone(), Arc::clone(&cache), Duration::from_secs(300));
    let ctx = RequestContext::background();
    repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;

    let checkout_pool = pool.clone();
    let held = tokio::task::spawn_blocking(move || checkout_pool.get()).await??;
    let release = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(held);
    });
    let task = new_task("Just in time").map_err(report)?;
    let generous = RequestContext::background().with_timeout(Duration::from_secs(5));

    repository.create(&generous, &task).await?;
    release.await?;

    let page = repository
        .list_paginated(&ctx, None, PageRequest::new(1, 10))
        .await?;
    ensure!(page.total_items == 1);
    Ok(())
}
