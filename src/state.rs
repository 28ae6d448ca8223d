//! Application state and the command dispatcher.
//!
//! Every user action becomes a [`Command`]. [`AppState::dispatch`] runs it to
//! completion against the in-memory list and the store, then the GUI or CLI
//! reads the resulting state. Nothing in here knows how it is drawn.
//!
//! Task changes are read-modify-write against the store: the persisted array
//! is reloaded, edited and saved, and only then is the in-memory list rebuilt
//! from what was saved. Entries another process wrote in the meantime are
//! kept. A failed read or write surfaces a danger notice and leaves the
//! persisted array untouched.

use std::time::{Duration, Instant};

use crate::config::UiConfig;
use crate::error::Result;
use crate::store::KeyValueStore;
use crate::tasks::{self, Task, TaskId, TaskList};
use crate::theme::ThemePreference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    RequestRemove(TaskId),
    RequestClear,
    Confirm,
    Decline,
    SetFilter(String),
    ToggleTheme,
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed,
    AwaitingConfirmation,
    /// Refused by validation or by the store; a danger notice explains why.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmation {
    Remove(TaskId),
    ClearAll,
}

impl PendingConfirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            PendingConfirmation::Remove(_) => "Are you sure to delete?",
            PendingConfirmation::ClearAll => "Are you sure to clear all?",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub notice_duration: Duration,
    pub confirm_destructive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notice_duration: Duration::from_millis(1500),
            confirm_destructive: true,
        }
    }
}

impl From<&UiConfig> for Settings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            notice_duration: ui.notice_duration(),
            confirm_destructive: ui.confirm_destructive,
        }
    }
}

pub struct AppState<S: KeyValueStore> {
    store: S,
    tasks: TaskList,
    theme: ThemePreference,
    filter: String,
    notice: Option<Notice>,
    pending: Option<PendingConfirmation>,
    settings: Settings,
}

impl<S: KeyValueStore> AppState<S> {
    /// Build the state from whatever the store holds: tasks in stored order
    /// and the saved theme preference.
    pub fn hydrate(store: S, settings: Settings) -> Result<Self> {
        let texts = tasks::load_tasks(&store)?;
        let theme = ThemePreference::load(&store)?;
        tracing::debug!(tasks = texts.len(), mode = theme.mode.as_str(), "hydrated");

        Ok(Self {
            store,
            tasks: TaskList::from_texts(texts),
            theme,
            filter: String::new(),
            notice: None,
            pending: None,
            settings,
        })
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) -> Transition {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::Add(text) => self.append(text, now),
            Command::RequestRemove(id) => self.request(PendingConfirmation::Remove(id), now),
            Command::RequestClear => self.request(PendingConfirmation::ClearAll, now),
            Command::Confirm => match self.pending.take() {
                Some(action) => self.execute(action, now),
                None => Transition::Unchanged,
            },
            Command::Decline => match self.pending.take() {
                Some(action) => {
                    tracing::debug!(?action, "confirmation declined");
                    Transition::Changed
                }
                None => Transition::Unchanged,
            },
            Command::SetFilter(filter) => {
                if filter == self.filter {
                    return Transition::Unchanged;
                }
                self.filter = filter;
                Transition::Changed
            }
            Command::ToggleTheme => self.toggle_theme(now),
        }
    }

    fn append(&mut self, text: String, now: Instant) -> Transition {
        if text.trim().is_empty() {
            self.notify(NoticeKind::Danger, "Please add task", now);
            return Transition::Rejected;
        }

        let mut texts = match tasks::load_tasks(&self.store) {
            Ok(texts) => texts,
            Err(e) => return self.store_failed(e, now),
        };
        texts.push(text);
        if let Err(e) = tasks::save_tasks(&mut self.store, &texts) {
            return self.store_failed(e, now);
        }

        self.tasks.sync(texts);
        tracing::info!(total = self.tasks.len(), "task added");
        self.notify(NoticeKind::Success, "Task added", now);
        Transition::Changed
    }

    fn request(&mut self, action: PendingConfirmation, now: Instant) -> Transition {
        if !self.settings.confirm_destructive {
            return self.execute(action, now);
        }
        self.pending = Some(action);
        Transition::AwaitingConfirmation
    }

    fn execute(&mut self, action: PendingConfirmation, now: Instant) -> Transition {
        match action {
            PendingConfirmation::Remove(id) => self.remove(id, now),
            PendingConfirmation::ClearAll => self.clear_all(now),
        }
    }

    fn remove(&mut self, id: TaskId, now: Instant) -> Transition {
        // Line the in-memory rows up with the stored array first, so the
        // row's position is its index in what gets saved.
        let mut texts = match tasks::load_tasks(&self.store) {
            Ok(texts) => texts,
            Err(e) => return self.store_failed(e, now),
        };
        self.tasks.sync(texts.clone());

        let Some(idx) = self.tasks.position(id) else {
            tracing::warn!(?id, "remove requested for unknown task");
            return Transition::Unchanged;
        };

        texts.remove(idx);
        if let Err(e) = tasks::save_tasks(&mut self.store, &texts) {
            return self.store_failed(e, now);
        }

        self.tasks.remove(id);
        tracing::info!(?id, total = self.tasks.len(), "task removed");
        self.notify(NoticeKind::Warning, "Task deleted", now);
        Transition::Changed
    }

    fn clear_all(&mut self, now: Instant) -> Transition {
        if let Err(e) = tasks::clear_tasks(&mut self.store) {
            return self.store_failed(e, now);
        }
        let dropped = self.tasks.len();
        self.tasks.clear();
        tracing::info!(dropped, "all tasks cleared");
        self.notify(NoticeKind::Warning, "All tasks deleted", now);
        Transition::Changed
    }

    fn toggle_theme(&mut self, now: Instant) -> Transition {
        let next = self.theme.toggled();
        if let Err(e) = next.save(&mut self.store) {
            return self.store_failed(e, now);
        }
        self.theme = next;
        tracing::debug!(mode = next.mode.as_str(), "theme toggled");
        Transition::Changed
    }

    fn store_failed(&mut self, err: crate::error::Error, now: Instant) -> Transition {
        tracing::error!(error = %err, "store access failed");
        self.notify(NoticeKind::Danger, format!("Could not save: {err}"), now);
        Transition::Rejected
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    /// Drop the notice once it has been visible long enough. Returns whether
    /// anything changed.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        match self.notice_deadline() {
            Some(deadline) if now >= deadline => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn notice_deadline(&self) -> Option<Instant> {
        self.notice
            .as_ref()
            .map(|notice| notice.shown_at + self.settings.notice_duration)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn pending(&self) -> Option<PendingConfirmation> {
        self.pending
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every task paired with whether the current filter shows it.
    pub fn rows(&self) -> impl Iterator<Item = (&Task, bool)> {
        let needle = self.filter.to_lowercase();
        self.tasks
            .iter()
            .map(move |task| (task, task.text.to_lowercase().contains(&needle)))
    }

    pub fn visible(&self) -> impl Iterator<Item = &Task> {
        self.rows().filter(|(_, shown)| *shown).map(|(task, _)| task)
    }
}
