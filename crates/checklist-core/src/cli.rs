use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use checklist_shared::{Filter, TaskId};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "checklist",
    version,
    about = "Checklist: keep a remote todo list in sync from the terminal"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Override a config key, e.g. `--rc api.user_id=5`.
    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Use an in-memory store instead of the remote API.
    #[arg(long = "offline")]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    Intent(Intent),

    /// Read one intent per line until `quit` or end of input.
    Shell,
}

impl Default for Command {
    fn default() -> Self {
        Self::Intent(Intent::List {
            filter: Filter::All,
        })
    }
}

/// A single user action against the todo list.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Load and show the todos.
    List {
        #[arg(short, long, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Add a todo.
    Add {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Flip a todo between active and completed.
    Toggle { id: TaskId },
    /// Change a todo's title; an empty title deletes it.
    Rename {
        id: TaskId,
        #[arg(num_args = 0.., trailing_var_arg = true)]
        title: Vec<String>,
    },
    Delete { id: TaskId },
    /// Delete every completed todo.
    ClearCompleted,
    /// Complete every todo, or reopen all when all are done.
    ToggleAll,
}

/// Commands understood inside `checklist shell`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    #[command(flatten)]
    Intent(Intent),
    /// Change the visible subset without reloading.
    Filter { filter: Filter },
    /// Hide the current error.
    Dismiss,
    #[command(alias = "exit")]
    Quit,
}

impl ShellLine {
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(line.split_whitespace())
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
