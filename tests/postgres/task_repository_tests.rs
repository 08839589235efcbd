//! Task repository behaviour against `PostgreSQL`.

use super::helpers::{BoxError, new_task, new_team, test_database};
use eyre::ensure;
use mockable::DefaultClock;
use taskmanager::context::RequestContext;
use taskmanager::pagination::PageRequest;
use taskmanager::task::{
    domain::{TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use taskmanager::team::ports::TeamRepository;

fn report(err: BoxError) -> eyre::Report {
    eyre::eyre!(err)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_retrieve_and_soft_delete() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let task = new_task("Persist me").map_err(report)?;

    db.tasks.create(&ctx, &task).await?;
    let stored = db.tasks.retrieve(&ctx, task.id()).await?;
    ensure!(stored.id() == task.id());
    ensure!(stored.record_id().is_some());
    ensure!(stored.title() == task.title());
    ensure!(stored.status() == TaskStatus::Todo);

    db.tasks.delete(&ctx, task.id()).await?;
    ensure!(matches!(
        db.tasks.retrieve(&ctx, task.id()).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    ensure!(matches!(
        db.tasks.delete(&ctx, task.id()).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifier_is_rejected() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let task = new_task("Once").map_err(report)?;
    db.tasks.create(&ctx, &task).await?;

    let result = db.tasks.create(&ctx, &task).await;

    ensure!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_newest_first_and_counts_before_paging() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let mut ids = Vec::new();
    for index in 0..3 {
        let task = new_task(&format!("Task {index}")).map_err(report)?;
        db.tasks.create(&ctx, &task).await?;
        ids.push(task.id());
    }

    let first = db
        .tasks
        .list_paginated(&ctx, None, PageRequest::new(1, 2))
        .await?;
    let beyond = db
        .tasks
        .list_paginated(&ctx, None, PageRequest::new(3, 2))
        .await?;

    ensure!(first.total_items == 3);
    ensure!(first.items.len() == 2);
    ensure!(first.items.first().map(|task| task.id()) == ids.last().copied());
    ensure!(beyond.items.is_empty());
    ensure!(beyond.total_items == 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn status_update_persists_lifecycle_timestamps() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let mut task = new_task("Lifecycle").map_err(report)?;
    db.tasks.create(&ctx, &task).await?;

    let change = task.transition_to(TaskStatus::InProgress, &DefaultClock)?;
    db.tasks.update_status(&ctx, task.id(), &change).await?;

    let stored = db.tasks.retrieve(&ctx, task.id()).await?;
    ensure!(stored.status() == TaskStatus::InProgress);
    ensure!(stored.started_at().is_some());
    ensure!(stored.finished_at().is_none());

    let filtered = db
        .tasks
        .list_paginated(&ctx, Some(TaskStatus::InProgress), PageRequest::new(1, 10))
        .await?;
    ensure!(filtered.total_items == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_writes_edits_and_team_reference() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let team = new_team("Owners").map_err(report)?;
    db.teams.create(&ctx, &team).await?;
    let mut task = new_task("Before").map_err(report)?;
    db.tasks.create(&ctx, &task).await?;

    task.set_title(TaskTitle::new("After")?, &DefaultClock);
    task.assign_team(team.id(), &DefaultClock);
    db.tasks.update(&ctx, task.id(), &task).await?;

    let stored = db.tasks.retrieve(&ctx, task.id()).await?;
    ensure!(stored.title().as_str() == "After");
    ensure!(stored.team_id() == Some(team.id()));
    let owned = db.tasks.list_by_team(&ctx, team.id()).await?;
    ensure!(owned.len() == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_team_reference_is_reported() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let orphan_team = new_team("Never stored").map_err(report)?;
    let mut task = new_task("Orphan").map_err(report)?;
    db.tasks.create(&ctx, &task).await?;
    task.assign_team(orphan_team.id(), &DefaultClock);

    let result = db.tasks.update(&ctx, task.id(), &task).await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::TeamNotFound(id)) if id == orphan_team.id()),
        "unexpected result: {result:?}"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_rows_report_not_found() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let ghost = new_task("Ghost").map_err(report)?;

    ensure!(matches!(
        db.tasks.update(&ctx, ghost.id(), &ghost).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    ensure!(matches!(
        db.tasks
            .update_status(&ctx, ghost.id(), &ghost.status_change())
            .await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_deadline_is_reported() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let expired = RequestContext::background().with_timeout(std::time::Duration::ZERO);

    let result = db
        .tasks
        .list_paginated(&expired, None, PageRequest::new(1, 10))
        .await;

    ensure!(matches!(result, Err(TaskRepositoryError::DeadlineExceeded)));
    Ok(())
}
