//! In-memory task board.
//!
//! The reference [`CommandSink`]: keeps an ordered task list, resolves
//! delete/toggle tokens, and records a short-lived notification for every
//! action so a display can echo what happened.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::config::BoardConfig;
use crate::pipeline::CommandSink;

/// One task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Feedback for the most recent action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct Board {
    tasks: Vec<Task>,
    next_id: u64,
    visible: bool,
    max_tasks: usize,
    notification_ttl: Duration,
    notification: Option<Notification>,
}

impl Board {
    pub fn new(max_tasks: usize, notification_ttl: Duration) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            visible: true,
            max_tasks,
            notification_ttl,
            notification: None,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.max_tasks, Duration::from_secs(config.notification_secs))
    }

    /// Apply reloaded settings. Existing tasks are kept even when they exceed
    /// a lowered limit; further adds are refused until the list shrinks.
    pub fn apply_config(&mut self, config: &BoardConfig) {
        self.max_tasks = config.max_tasks;
        self.notification_ttl = Duration::from_secs(config.notification_secs);
        info!(
            max_tasks = self.max_tasks,
            notification_secs = config.notification_secs,
            "board settings applied"
        );
    }

    pub fn max_tasks(&self) -> usize {
        self.max_tasks
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The current notification, if it has not expired.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification_at(Utc::now())
    }

    pub fn notification_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| n.expires_at > now)
    }

    /// Resolve a token to a task index.
    ///
    /// An integer within `1..=len` is an ordinal; anything else selects the
    /// first task whose text contains the token, ignoring case.
    pub fn resolve(&self, token: &str) -> Option<Resolved> {
        let token = token.trim();
        if let Ok(ordinal) = token.parse::<usize>()
            && (1..=self.tasks.len()).contains(&ordinal)
        {
            return Some(Resolved::Ordinal(ordinal - 1));
        }

        let needle = token.to_lowercase();
        self.tasks
            .iter()
            .position(|task| task.text.to_lowercase().contains(&needle))
            .map(Resolved::Text)
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        match kind {
            NotificationKind::Success => info!(message = %message, "board"),
            NotificationKind::Error => warn!(message = %message, "board"),
        }
        let expires_at = chrono::Duration::from_std(self.notification_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.notification = Some(Notification {
            message,
            kind,
            expires_at,
        });
    }
}

/// How a token matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Matched by 1-based ordinal; holds the 0-based index.
    Ordinal(usize),
    /// Matched by text; holds the index.
    Text(usize),
}

impl Resolved {
    pub fn index(self) -> usize {
        match self {
            Resolved::Ordinal(i) | Resolved::Text(i) => i,
        }
    }
}

impl CommandSink for Board {
    fn on_add(&mut self, text: &str, author: &str) {
        if self.tasks.len() >= self.max_tasks {
            self.notify(
                NotificationKind::Error,
                format!("Task list is full ({} tasks)", self.max_tasks),
            );
            return;
        }

        self.tasks.push(Task {
            id: self.next_id,
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        });
        self.next_id += 1;
        info!(author = %author, id = self.next_id - 1, "task added");
        self.notify(NotificationKind::Success, format!("Added: \"{}\"", text));
    }

    fn on_delete(&mut self, token: &str, _author: &str) {
        let message = match self.resolve(token) {
            Some(Resolved::Ordinal(i)) => {
                let task = self.tasks.remove(i);
                format!("Deleted #{}: \"{}\"", i + 1, task.text)
            }
            Some(Resolved::Text(i)) => {
                let task = self.tasks.remove(i);
                format!("Deleted: \"{}\"", task.text)
            }
            None => {
                self.notify(NotificationKind::Error, format!("Task \"{}\" not found", token));
                return;
            }
        };
        self.notify(NotificationKind::Success, message);
    }

    fn on_toggle(&mut self, token: &str, _author: &str) {
        let Some(resolved) = self.resolve(token) else {
            self.notify(NotificationKind::Error, format!("Task \"{}\" not found", token));
            return;
        };

        let task = &mut self.tasks[resolved.index()];
        task.completed = !task.completed;
        let status = if task.completed { "completed" } else { "reopened" };
        let message = match resolved {
            Resolved::Ordinal(i) => format!("Task #{} {}", i + 1, status),
            Resolved::Text(_) => format!("Task \"{}\" {}", task.text, status),
        };
        self.notify(NotificationKind::Success, message);
    }

    fn on_clear(&mut self, _author: &str) {
        self.tasks.clear();
        self.notify(NotificationKind::Success, "All tasks cleared".to_string());
    }

    fn on_toggle_visibility(&mut self, _author: &str) {
        self.visible = !self.visible;
        let message = if self.visible { "Widget visible" } else { "Widget hidden" };
        self.notify(NotificationKind::Success, message.to_string());
    }
}

/// A board shared between the connection manager and a display.
#[derive(Clone, Debug)]
pub struct SharedBoard(Arc<Mutex<Board>>);

impl SharedBoard {
    pub fn new(board: Board) -> Self {
        Self(Arc::new(Mutex::new(board)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Board> {
        self.0.lock()
    }
}

impl CommandSink for SharedBoard {
    fn on_add(&mut self, text: &str, author: &str) {
        self.0.lock().on_add(text, author);
    }

    fn on_delete(&mut self, token: &str, author: &str) {
        self.0.lock().on_delete(token, author);
    }

    fn on_toggle(&mut self, token: &str, author: &str) {
        self.0.lock().on_toggle(token, author);
    }

    fn on_clear(&mut self, author: &str) {
        self.0.lock().on_clear(author);
    }

    fn on_toggle_visibility(&mut self, author: &str) {
        self.0.lock().on_toggle_visibility(author);
    }
}
