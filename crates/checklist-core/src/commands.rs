use std::io::Write;

use anyhow::Context;
use checklist_shared::UserId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

use crate::cli::{Command, Intent, ShellCommand, ShellLine};
use crate::config::Config;
use crate::controller::{Controller, Outcome};
use crate::render::Renderer;
use crate::store::TaskStore;

/// Runs one command for the configured user.
///
/// Without a user id only the warning is printed and `connect` is never
/// called, so nothing reaches the network.
#[instrument(skip_all)]
pub async fn dispatch<S, F, W>(
    cfg: &Config,
    connect: F,
    renderer: &Renderer,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: TaskStore,
    F: FnOnce(UserId) -> anyhow::Result<S>,
    W: Write,
{
    let Some(user_id) = cfg.user_id() else {
        warn!("no user id configured");
        renderer.print_user_warning(out)?;
        return Ok(());
    };

    let store = connect(user_id)?;
    let controller = Controller::new(store, user_id);
    info!(user_id = %user_id, ?command, "dispatching");

    match command {
        Command::Intent(intent) => {
            if !matches!(intent, Intent::List { .. }) {
                controller.load().await;
            }
            apply(&controller, intent, out).await?;
            renderer.render(out, &controller.snapshot())?;
        }
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_shell(&controller, renderer, stdin, out).await?;
        }
    }
    Ok(())
}

/// Reads intents line by line, re-rendering after each one. An empty line
/// just re-renders, which also shows whether the last error has expired.
pub async fn run_shell<S, R, W>(
    controller: &Controller<S>,
    renderer: &Renderer,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: TaskStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.load().await;
    renderer.render(out, &controller.snapshot())?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("failed to read command")? else {
            break;
        };
        if line.trim().is_empty() {
            renderer.render(out, &controller.snapshot())?;
            continue;
        }

        let parsed = match ShellLine::parse_line(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(line = %line, "unrecognized shell input");
                writeln!(out, "{}", err.to_string().trim_end())?;
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Quit => break,
            ShellCommand::Dismiss => {
                controller.dismiss_error();
            }
            ShellCommand::Filter { filter } => controller.select_filter(filter),
            ShellCommand::Intent(intent) => apply(controller, intent, out).await?,
        }
        renderer.render(out, &controller.snapshot())?;
    }
    Ok(())
}

async fn apply<S, W>(controller: &Controller<S>, intent: Intent, out: &mut W) -> anyhow::Result<()>
where
    S: TaskStore,
    W: Write,
{
    let (outcome, id) = match intent {
        Intent::List { filter } => {
            controller.select_filter(filter);
            (controller.load().await, None)
        }
        Intent::Add { title } => (controller.add(&title.join(" ")).await, None),
        Intent::Toggle { id } => (controller.toggle(id).await, Some(id)),
        Intent::Rename { id, title } => (controller.rename(id, &title.join(" ")).await, Some(id)),
        Intent::Delete { id } => (controller.delete(id).await, Some(id)),
        Intent::ClearCompleted => (controller.clear_completed().await, None),
        Intent::ToggleAll => (controller.toggle_all().await, None),
    };

    if outcome == Outcome::Skipped
        && let Some(id) = id
        && controller.snapshot().get(id).is_none()
    {
        writeln!(out, "no todo with id {id}")?;
    }
    Ok(())
}
