//! Routing authorized commands to the consumer.

use super::command::Command;

/// The consumer of task-list commands.
///
/// Every method receives the author's display name. `token` arguments are
/// unresolved (an ordinal or a text fragment).
pub trait CommandSink {
    fn on_add(&mut self, text: &str, author: &str);
    fn on_delete(&mut self, token: &str, author: &str);
    fn on_toggle(&mut self, token: &str, author: &str);
    fn on_clear(&mut self, author: &str);
    fn on_toggle_visibility(&mut self, author: &str);
}

/// Invoke exactly one sink method for `command`, or none when unauthorized.
///
/// Returns whether a callback ran.
pub fn dispatch<S: CommandSink + ?Sized>(command: &Command, authorized: bool, sink: &mut S) -> bool {
    if !authorized {
        return false;
    }

    match command {
        Command::Add { text, author } => sink.on_add(text, author),
        Command::Delete { token, author } => sink.on_delete(token, author),
        Command::Toggle { token, author } => sink.on_toggle(token, author),
        Command::Clear { author } => sink.on_clear(author),
        Command::ToggleVisibility { author } => sink.on_toggle_visibility(author),
    }
    true
}

type TextCallback = Box<dyn FnMut(&str, &str) + Send>;
type AuthorCallback = Box<dyn FnMut(&str) + Send>;

/// A [`CommandSink`] assembled from closures. Unset callbacks do nothing.
///
/// ```
/// use slirc_todo::pipeline::Callbacks;
///
/// let sink = Callbacks::new()
///     .on_add(|text, author| println!("{author} added {text}"))
///     .on_clear(|author| println!("{author} cleared the list"));
/// # drop(sink);
/// ```
#[derive(Default)]
pub struct Callbacks {
    add: Option<TextCallback>,
    delete: Option<TextCallback>,
    toggle: Option<TextCallback>,
    clear: Option<AuthorCallback>,
    toggle_visibility: Option<AuthorCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_add(mut self, f: impl FnMut(&str, &str) + Send + 'static) -> Self {
        self.add = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl FnMut(&str, &str) + Send + 'static) -> Self {
        self.delete = Some(Box::new(f));
        self
    }

    pub fn on_toggle(mut self, f: impl FnMut(&str, &str) + Send + 'static) -> Self {
        self.toggle = Some(Box::new(f));
        self
    }

    pub fn on_clear(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.clear = Some(Box::new(f));
        self
    }

    pub fn on_toggle_visibility(mut self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.toggle_visibility = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("add", &self.add.is_some())
            .field("delete", &self.delete.is_some())
            .field("toggle", &self.toggle.is_some())
            .field("clear", &self.clear.is_some())
            .field("toggle_visibility", &self.toggle_visibility.is_some())
            .finish()
    }
}

impl CommandSink for Callbacks {
    fn on_add(&mut self, text: &str, author: &str) {
        if let Some(f) = self.add.as_mut() {
            f(text, author);
        }
    }

    fn on_delete(&mut self, token: &str, author: &str) {
        if let Some(f) = self.delete.as_mut() {
            f(token, author);
        }
    }

    fn on_toggle(&mut self, token: &str, author: &str) {
        if let Some(f) = self.toggle.as_mut() {
            f(token, author);
        }
    }

    fn on_clear(&mut self, author: &str) {
        if let Some(f) = self.clear.as_mut() {
            f(author);
        }
    }

    fn on_toggle_visibility(&mut self, author: &str) {
        if let Some(f) = self.toggle_visibility.as_mut() {
            f(author);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl CommandSink for Recorder {
        fn on_add(&mut self, text: &str, author: &str) {
            self.0.push(format!("add {} {}", text, author));
        }
        fn on_delete(&mut self, token: &str, author: &str) {
            self.0.push(format!("delete {} {}", token, author));
        }
        fn on_toggle(&mut self, token: &str, author: &str) {
            self.0.push(format!("toggle {} {}", token, author));
        }
        fn on_clear(&mut self, author: &str) {
            self.0.push(format!("clear {}", author));
        }
        fn on_toggle_visibility(&mut self, author: &str) {
            self.0.push(format!("visibility {}", author));
        }
    }

    fn all_commands() -> Vec<Command> {
        let author = || "Alice".to_string();
        vec![
            Command::Add { text: "milk".into(), author: author() },
            Command::Delete { token: "2".into(), author: author() },
            Command::Toggle { token: "milk".into(), author: author() },
            Command::Clear { author: author() },
            Command::ToggleVisibility { author: author() },
        ]
    }

    #[test]
    fn test_unauthorized_fires_nothing() {
        let mut sink = Recorder::default();
        for cmd in all_commands() {
            assert!(!dispatch(&cmd, false, &mut sink));
        }
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_authorized_fires_exactly_one() {
        let mut sink = Recorder::default();
        for cmd in all_commands() {
            assert!(dispatch(&cmd, true, &mut sink));
        }
        assert_eq!(
            sink.0,
            vec![
                "add milk Alice",
                "delete 2 Alice",
                "toggle milk Alice",
                "clear Alice",
                "visibility Alice",
            ]
        );
    }

    #[test]
    fn test_callbacks_adapter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let added = seen.clone();
        let cleared = seen.clone();
        let mut sink = Callbacks::new()
            .on_add(move |text, author| added.lock().push(format!("{}:{}", author, text)))
            .on_clear(move |author| cleared.lock().push(format!("{}:clear", author)));

        for cmd in all_commands() {
            dispatch(&cmd, true, &mut sink);
        }
        assert_eq!(*seen.lock(), vec!["Alice:milk", "Alice:clear"]);
    }
}
