//! The task list and its persisted form.
//!
//! On disk the list is a JSON array of strings under [`TASKS_KEY`]. In memory
//! each entry also carries a [`TaskId`], handed out when the task is created
//! or hydrated, so rows with identical text can still be told apart.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_texts<I>(texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Self::new();
        for text in texts {
            list.push(text);
        }
        list
    }

    /// Append at the tail and return the new task's id.
    pub fn push(&mut self, text: String) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task { id, text });
        id
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Task at `index`, 0-based.
    pub fn nth(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let idx = self.position(id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the contents with `texts`, keeping the id of every existing
    /// task that still appears in the same relative order. Entries written by
    /// someone else get fresh ids; tasks missing from `texts` are dropped.
    pub fn sync(&mut self, texts: Vec<String>) {
        let old = std::mem::take(&mut self.tasks);
        let mut cursor = 0;
        for text in texts {
            match old[cursor..].iter().position(|task| task.text == text) {
                Some(offset) => {
                    let id = old[cursor + offset].id;
                    cursor += offset + 1;
                    self.tasks.push(Task { id, text });
                }
                None => {
                    self.push(text);
                }
            }
        }
    }

    /// The list as it is persisted: texts only, in order.
    pub fn texts(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.text.clone()).collect()
    }
}

/// Persisted task array. An absent key means an empty list.
pub fn load_tasks<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let Some(raw) = store.get(TASKS_KEY)? else {
        return Ok(Vec::new());
    };
    serde_json::from_str::<Vec<String>>(&raw).map_err(|e| Error::Malformed {
        key: TASKS_KEY.to_string(),
        reason: e.to_string(),
    })
}

pub fn save_tasks<S, T>(store: &mut S, tasks: &[T]) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(tasks)?;
    store.set(TASKS_KEY, &raw)
}

/// Drop the task entry only. Theme keys are left alone.
pub fn clear_tasks<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    store.remove(TASKS_KEY)
}
