//! Team repository behaviour against `PostgreSQL`.

use super::helpers::{BoxError, new_team, test_database};
use eyre::ensure;
use taskmanager::context::RequestContext;
use taskmanager::pagination::PageRequest;
use taskmanager::team::{
    domain::TeamId,
    ports::{TeamRepository, TeamRepositoryError},
};

fn report(err: BoxError) -> eyre::Report {
    eyre::eyre!(err)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_retrieve_team() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let team = new_team("Platform").map_err(report)?;

    db.teams.create(&ctx, &team).await?;
    let stored = db.teams.retrieve(&ctx, team.id()).await?;

    ensure!(stored.id() == team.id());
    ensure!(stored.name() == team.name());
    ensure!(stored.record_id().is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_and_missing_teams_are_reported() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let team = new_team("Once").map_err(report)?;
    db.teams.create(&ctx, &team).await?;

    ensure!(matches!(
        db.teams.create(&ctx, &team).await,
        Err(TeamRepositoryError::DuplicateTeam(id)) if id == team.id()
    ));
    let missing = TeamId::new();
    ensure!(matches!(
        db.teams.retrieve(&ctx, missing).await,
        Err(TeamRepositoryError::NotFound(id)) if id == missing
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn teams_are_listed_newest_first() -> eyre::Result<()> {
    let Some(db) = test_database().await.map_err(report)? else {
        return Ok(());
    };
    let ctx = RequestContext::background();
    let mut last = None;
    for name in ["Alpha", "Beta", "Gamma"] {
        let team = new_team(name).map_err(report)?;
        db.teams.create(&ctx, &team).await?;
        last = Some(team.id());
    }

    let page = db.teams.list_paginated(&ctx, PageRequest::new(1, 2)).await?;

    ensure!(page.total_items == 3);
    ensure!(page.items.len() == 2);
    ensure!(page.items.first().map(|team| team.id()) == last);
    Ok(())
}
