//! Recording command sink.

use parking_lot::Mutex;
use slirc_todo::pipeline::Callbacks;
use std::sync::Arc;

/// Shared log of callback invocations, rendered as `name(arg, author)`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// A sink that appends every callback to the returned log.
pub fn recording_sink() -> (Callbacks, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let (a, d, t, c, v) = (log.clone(), log.clone(), log.clone(), log.clone(), log.clone());

    let sink = Callbacks::new()
        .on_add(move |text, author| a.lock().push(format!("add({text:?}, {author:?})")))
        .on_delete(move |token, author| d.lock().push(format!("delete({token:?}, {author:?})")))
        .on_toggle(move |token, author| t.lock().push(format!("toggle({token:?}, {author:?})")))
        .on_clear(move |author| c.lock().push(format!("clear({author:?})")))
        .on_toggle_visibility(move |author| v.lock().push(format!("visibility({author:?})")));

    (sink, log)
}
