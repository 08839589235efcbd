//! End-to-end flows through the task and team services.

use super::helpers::{App, app};
use eyre::ensure;
use rstest::rstest;
use taskmanager::task::{
    domain::TaskStatus,
    services::{CreateTaskRequest, ListTasksRequest, UpdateTaskRequest},
};
use taskmanager::team::services::CreateTeamRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_filtered_listing_follows_transitions(app: App) -> eyre::Result<()> {
    let first = app
        .tasks
        .create(&app.ctx, CreateTaskRequest::new("Write tests", "cover listing"))
        .await?;
    app.tasks
        .create(&app.ctx, CreateTaskRequest::new("Review", "read the diff"))
        .await?;

    let todo_before = app
        .tasks
        .list(&app.ctx, ListTasksRequest::new().with_status("to_do"))
        .await?;
    ensure!(todo_before.total_items == 2);

    app.tasks
        .update_status(&app.ctx, first.id(), "in_progress")
        .await?;

    let todo_after = app
        .tasks
        .list(&app.ctx, ListTasksRequest::new().with_status("to_do"))
        .await?;
    let in_progress = app
        .tasks
        .list(&app.ctx, ListTasksRequest::new().with_status("in_progress"))
        .await?;
    ensure!(todo_after.total_items == 1, "stale to_do listing served");
    ensure!(in_progress.total_items == 1);
    ensure!(
        in_progress.items.first().map(|task| task.status()) == Some(TaskStatus::InProgress)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edits_and_deletes_are_visible_in_listings(app: App) -> eyre::Result<()> {
    let task = app
        .tasks
        .create(&app.ctx, CreateTaskRequest::new("Draft", "first version"))
        .await?;
    app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;

    app.tasks
        .update(&app.ctx, UpdateTaskRequest::new(task.id()).with_title("Final"))
        .await?;
    let edited = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(
        edited.items.first().map(|item| item.title().as_str().to_owned())
            == Some("Final".to_owned())
    );

    app.tasks.delete(&app.ctx, task.id()).await?;
    let emptied = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(emptied.total_items == 0);
    ensure!(emptied.items.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_association_flows_through_the_shared_repository(app: App) -> eyre::Result<()> {
    let team = app
        .teams
        .create(&app.ctx, CreateTeamRequest::new("Platform", "runtime owners"))
        .await?;
    let task = app
        .tasks
        .create(&app.ctx, CreateTaskRequest::new("Upgrade", "bump dependencies"))
        .await?;
    app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(!app.cache.is_empty()?);

    app.teams
        .associate_task(&app.ctx, team.id(), task.id())
        .await?;
    ensure!(app.cache.is_empty()?, "association must invalidate listings");

    let view = app.teams.retrieve_with_tasks(&app.ctx, team.id()).await?;
    ensure!(view.tasks.len() == 1);
    let listed = app.tasks.list(&app.ctx, ListTasksRequest::new()).await?;
    ensure!(listed.items.first().and_then(|item| item.team_id()) == Some(team.id()));

    app.teams
        .disassociate_task(&app.ctx, team.id(), task.id())
        .await?;
    let emptied = app.teams.retrieve_with_tasks(&app.ctx, team.id()).await?;
    ensure!(emptied.tasks.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pages_past_the_end_are_empty_with_totals(app: App) -> eyre::Result<()> {
    for index in 0..3 {
        app.tasks
            .create(
                &app.ctx,
                CreateTaskRequest::new(format!("Task {index}"), "pagination"),
            )
            .await?;
    }

    let page = app
        .tasks
        .list(&app.ctx, ListTasksRequest::new().with_page(5).with_limit(2))
        .await?;

    ensure!(page.items.is_empty());
    ensure!(page.total_items == 3);
    ensure!(page.total_pages() == 2);
    Ok(())
}
