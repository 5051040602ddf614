use std::io::{self, Write};

use checklist_shared::{Filter, TaskEntry, USER_WARNING, ViewState};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.ui.color,
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Draws the whole list view: header, todos, footer and the error line.
    /// The todos and the footer are left out while the list is empty.
    #[tracing::instrument(skip(self, out, state))]
    pub fn render<W: Write>(&self, out: &mut W, state: &ViewState) -> io::Result<()> {
        let toggle_all = if state.all_completed() {
            self.paint("[v]", "32")
        } else {
            "[ ]".to_string()
        };
        writeln!(out, "{toggle_all} todos")?;

        if state.has_tasks() {
            for entry in state.visible() {
                writeln!(out, "{}", self.row(entry))?;
            }
            writeln!(out, "{}", self.footer(state))?;
        }

        if let Some(message) = state.error() {
            writeln!(out, "{}", self.paint(&format!("! {message}"), "31"))?;
        }
        Ok(())
    }

    pub fn print_user_warning<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.paint(USER_WARNING, "33"))
    }

    fn row(&self, entry: &TaskEntry) -> String {
        let task = &entry.task;
        let check = if task.completed { "[x]" } else { "[ ]" };
        let id = self.paint(&format!("{:>4}", task.id), "33");
        let title = if task.completed {
            self.paint(&task.title, "2")
        } else {
            task.title.clone()
        };
        let mut line = format!("  {check} {id}  {title}");
        if entry.is_pending() {
            line.push_str(&self.paint("  (saving...)", "36"));
        }
        line
    }

    fn footer(&self, state: &ViewState) -> String {
        let filters = Filter::ALL
            .into_iter()
            .map(|filter| {
                if filter == state.filter() {
                    self.paint(&format!("[{}]", filter.label()), "1")
                } else {
                    filter.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        let clear = if state.clear_completed_disabled() {
            self.paint("clear completed (nothing to clear)", "2")
        } else {
            format!("clear completed ({})", state.completed_count())
        };

        format!(
            "  {} items left | {filters} | {clear}",
            state.active_count()
        )
    }

    fn paint(&self, s: &str, code: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }
}
