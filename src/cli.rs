//! Command-line surface over the same store the GUI uses.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use crate::state::{AppState, Command, NoticeKind, Transition};
use crate::store::KeyValueStore;

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Simple task list")]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Cmd>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Cmd {
    /// Add a new task
    Add { text: String },
    /// Print tasks, numbered from 1
    List {
        /// Only show tasks containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },
    /// Remove the task with the given number
    Remove {
        number: usize,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Remove every task
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Switch between light and dark theme
    Theme,
}

/// Ask a yes/no question on `output`, reading the answer from `input`.
/// Anything but `y`/`yes` declines.
pub fn prompt_yes_no<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer).context("reading confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn execute<S, W, F>(
    cmd: Cmd,
    state: &mut AppState<S>,
    out: &mut W,
    mut confirm: F,
) -> Result<()>
where
    S: KeyValueStore,
    W: Write,
    F: FnMut(&str) -> Result<bool>,
{
    let now = Instant::now();
    match cmd {
        Cmd::Add { text } => {
            state.dispatch(Command::Add(text.clone()), now);
            check_notice(state)?;
            writeln!(out, "✓ Added task: {text}")?;
        }
        Cmd::List { filter } => {
            if let Some(filter) = filter {
                state.dispatch(Command::SetFilter(filter), now);
            }
            for (n, (task, shown)) in state.rows().enumerate() {
                if shown {
                    writeln!(out, "{:>3}. {}", n + 1, task.text)?;
                }
            }
        }
        Cmd::Remove { number, yes } => {
            let Some(task) = number.checked_sub(1).and_then(|idx| state.tasks().nth(idx)) else {
                bail!("No task number {number}");
            };
            let (id, text) = (task.id, task.text.clone());
            let transition = state.dispatch(Command::RequestRemove(id), now);
            if !settle(state, transition, yes, &mut confirm)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            check_notice(state)?;
            writeln!(out, "✓ Removed task: {text}")?;
        }
        Cmd::Clear { yes } => {
            let transition = state.dispatch(Command::RequestClear, now);
            if !settle(state, transition, yes, &mut confirm)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            check_notice(state)?;
            writeln!(out, "✓ All tasks removed")?;
        }
        Cmd::Theme => {
            state.dispatch(Command::ToggleTheme, now);
            check_notice(state)?;
            writeln!(out, "Theme: {}", state.theme().mode.as_str())?;
        }
    }
    Ok(())
}

/// Resolve a pending confirmation. Returns false when the user declined.
fn settle<S, F>(
    state: &mut AppState<S>,
    transition: Transition,
    yes: bool,
    confirm: &mut F,
) -> Result<bool>
where
    S: KeyValueStore,
    F: FnMut(&str) -> Result<bool>,
{
    let Some(pending) = state.pending() else {
        return Ok(transition != Transition::Unchanged);
    };
    let accepted = yes || confirm(pending.prompt())?;
    let command = if accepted { Command::Confirm } else { Command::Decline };
    state.dispatch(command, Instant::now());
    Ok(accepted)
}

fn check_notice<S: KeyValueStore>(state: &AppState<S>) -> Result<()> {
    match state.notice() {
        Some(notice) if notice.kind == NoticeKind::Danger => bail!("{}", notice.message),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Settings;
    use crate::store::MemoryStore;
    use crate::tasks;

    fn state_with(texts: &[&str]) -> AppState<MemoryStore> {
        let mut store = MemoryStore::new();
        tasks::save_tasks(&mut store, texts).unwrap();
        AppState::hydrate(store, Settings::default()).unwrap()
    }

    fn run(cmd: Cmd, state: &mut AppState<MemoryStore>, answer: bool) -> Result<String> {
        let mut out = Vec::new();
        execute(cmd, state, &mut out, |_| Ok(answer))?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["tasklist", "add", "buy milk"]);
        assert_eq!(cli.command, Some(Cmd::Add { text: "buy milk".into() }));

        let cli = Cli::parse_from(["tasklist", "remove", "2", "--yes"]);
        assert_eq!(cli.command, Some(Cmd::Remove { number: 2, yes: true }));

        let cli = Cli::parse_from(["tasklist", "--config", "/tmp/c.toml"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_add_and_list() {
        let mut state = state_with(&[]);
        run(Cmd::Add { text: "abc".into() }, &mut state, true).unwrap();
        run(Cmd::Add { text: "xyz".into() }, &mut state, true).unwrap();

        let out = run(Cmd::List { filter: None }, &mut state, true).unwrap();
        assert_eq!(out, "  1. abc\n  2. xyz\n");

        let out = run(Cmd::List { filter: Some("Y".into()) }, &mut state, true).unwrap();
        assert_eq!(out, "  2. xyz\n");
    }

    #[test]
    fn test_add_empty_fails() {
        let mut state = state_with(&["a"]);
        let err = run(Cmd::Add { text: "  ".into() }, &mut state, true).unwrap_err();

        assert_eq!(err.to_string(), "Please add task");
        assert_eq!(tasks::load_tasks(state.store()).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_remove_confirmed_and_declined() {
        let mut state = state_with(&["a", "b"]);

        let out = run(Cmd::Remove { number: 1, yes: false }, &mut state, false).unwrap();
        assert_eq!(out, "Cancelled\n");
        assert_eq!(tasks::load_tasks(state.store()).unwrap(), vec!["a", "b"]);

        let out = run(Cmd::Remove { number: 1, yes: false }, &mut state, true).unwrap();
        assert_eq!(out, "✓ Removed task: a\n");
        assert_eq!(tasks::load_tasks(state.store()).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut state = state_with(&["a"]);
        assert!(run(Cmd::Remove { number: 0, yes: true }, &mut state, true).is_err());
        assert!(run(Cmd::Remove { number: 2, yes: true }, &mut state, true).is_err());
    }

    #[test]
    fn test_clear_with_yes_skips_prompt() {
        let mut state = state_with(&["a", "b"]);
        let mut out = Vec::new();
        execute(Cmd::Clear { yes: true }, &mut state, &mut out, |_| {
            panic!("should not prompt")
        })
        .unwrap();

        assert!(state.tasks().is_empty());
        assert!(tasks::load_tasks(state.store()).unwrap().is_empty());
    }

    #[test]
    fn test_theme_toggle() {
        let mut state = state_with(&[]);
        assert_eq!(run(Cmd::Theme, &mut state, true).unwrap(), "Theme: dark\n");
        assert_eq!(run(Cmd::Theme, &mut state, true).unwrap(), "Theme: light\n");
    }

    #[test]
    fn test_prompt_yes_no() {
        let mut out = Vec::new();
        assert!(prompt_yes_no("Sure?", &mut "y\n".as_bytes(), &mut out).unwrap());
        assert!(prompt_yes_no("Sure?", &mut "YES\n".as_bytes(), &mut out).unwrap());
        assert!(!prompt_yes_no("Sure?", &mut "\n".as_bytes(), &mut out).unwrap());
        assert!(!prompt_yes_no("Sure?", &mut "".as_bytes(), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Sure? [y/N] "));
    }
}
