//! Stale listings are bounded by the cache entry lifetime.

use super::helpers::{App, CACHE_TTL, app};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use std::time::Duration;
use taskmanager::task::{
    domain::{Task, TaskDescription, TaskTitle},
    ports::TaskRepository,
    services::ListTasksRequest,
};

#[rstest]
#[tokio::test(start_paused = true)]
async fn writes_behind_the_cache_surface_after_expiry(app: App) -> eyre::Result<()> {
    let initial = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(initial.total_items == 0);

    let hidden = Task::new(
        TaskTitle::new("Written directly")?,
        TaskDescription::new("bypasses invalidation")?,
        &DefaultClock,
    );
    app.store.create(&app.ctx, &hidden).await?;

    let stale = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(stale.total_items == 0, "entry should still be cached");

    tokio::time::advance(CACHE_TTL + Duration::from_secs(1)).await;

    let fresh = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(fresh.total_items == 1, "expired entry should be refreshed");
    Ok(())
}
