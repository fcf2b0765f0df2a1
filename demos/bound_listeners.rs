//! # Example: bound_listeners
//!
//! Subject-bound listeners: restricting a listener to notifications about
//! one specific object.
//!
//! Demonstrates how to:
//! - Bind a listener to a subject with [`Subject::of`].
//! - Address a post to a subject so only matching listeners fire.
//! - Remove a bound listener by naming its exact subject.
//!
//! ## Flow
//! ```text
//! editor_a, editor_b : Rc<Editor>
//!     │
//!     ├─► add_listener(audit, None)                      fires for both
//!     ├─► add_listener(watch_a, Some(Subject::of(&a)))   fires for a only
//!     │
//!     ├─► post(&BufferFlushed, Some(a)) ─► audit, watch_a
//!     ├─► post(&BufferFlushed, Some(b)) ─► audit
//!     └─► remove_listener(watch_a, Some(a))
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example bound_listeners
//! ```

use std::rc::Rc;

use noticenter::{Dispatcher, Listener, Notification, Subject};

struct BufferFlushed {
    lines: usize,
}
impl Notification for BufferFlushed {}

struct Editor {
    name: &'static str,
}

fn main() {
    env_logger::init();

    // Explicit wiring: one dispatcher, passed around by hand.
    let dispatcher = Dispatcher::new();

    let editor_a = Rc::new(Editor { name: "a.rs" });
    let editor_b = Rc::new(Editor { name: "b.rs" });

    // Unbound: sees every flush, whoever it was about.
    dispatcher.add_listener(
        Listener::rc(|n: &BufferFlushed| println!("[audit] {} line(s) flushed", n.lines)),
        None,
    );

    // Bound to editor_a: silent for posts about editor_b.
    let watch_a = dispatcher.add_listener(
        Listener::rc({
            let name = editor_a.name;
            move |n: &BufferFlushed| println!("[watch:{name}] {} line(s)", n.lines)
        }),
        Some(&Subject::of(&editor_a)),
    );

    println!("-- flush {}", editor_a.name);
    dispatcher.post_notification(&BufferFlushed { lines: 12 }, Some(&Subject::of(&editor_a)));

    println!("-- flush {}", editor_b.name);
    dispatcher.post_notification(&BufferFlushed { lines: 3 }, Some(&Subject::of(&editor_b)));

    // A bound listener is only removable by naming its exact subject.
    dispatcher.remove_listener(&watch_a, Some(&Subject::of(&editor_b))); // no-op
    dispatcher.remove_listener(&watch_a, Some(&Subject::of(&editor_a))); // removed

    println!("-- flush {} (watcher gone)", editor_a.name);
    dispatcher.post_notification(&BufferFlushed { lines: 1 }, Some(&Subject::of(&editor_a)));
}
