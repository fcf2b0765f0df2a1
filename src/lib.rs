//! # noticenter
//!
//! **Noticenter** is a small in-process notification dispatcher for Rust.
//!
//! Producers post typed notification values; consumers register typed
//! listeners that run synchronously, in registration order, whenever a
//! matching notification is posted. A listener may optionally be *bound* to
//! a subject object, narrowing it to posts that name that exact subject.
//!
//! ## Architecture
//! ```text
//!  producer                             consumers
//!     │                                    ▲
//!     │ post_notification(&n, subject)     │ Fn(&N) handlers
//!     ▼                                    │
//! ┌───────────────────────────────────────────────────┐
//! │ Dispatcher                                        │
//! │   registry: TypeId ──► [Listener, Listener, …]    │
//! │   depth:    nesting counter for reentrant posts   │
//! │   pending:  removals deferred while dispatching   │
//! └───────────────────────────────────────────────────┘
//!            │ per-listener binding filter:
//!            │   unbound      ─► always delivered
//!            │   bound(S)     ─► delivered iff subject is S
//!            └   expired bind ─► degrades to unbound
//! ```
//!
//! ## Semantics
//! - **Routing**: the notification's concrete type is the routing key.
//!   Listeners only ever see notifications of their own type.
//! - **Ordering**: listeners fire in registration order per type. A post
//!   issued from inside a handler runs to completion before the enclosing
//!   post resumes its own iteration.
//! - **Safe removal mid-dispatch**: `remove_listener` calls made while a
//!   post is in flight are queued and applied once the outermost post
//!   unwinds, so the listener list is never mutated under iteration.
//! - **Binding is non-owning**: binding a listener to a subject never keeps
//!   that subject alive. Remove listeners before dropping their subject; an
//!   expired binding degrades to unbound.
//!
//! Everything is single-threaded by construction: [`Dispatcher`] is built
//! from `Rc`/`RefCell` and is not `Send`. There is no locking, no async,
//! and no error surface — misuse (removing an unregistered listener,
//! posting with nobody subscribed) is a silent no-op.
//!
//! ## Features
//! | Area            | Description                                          | Key types / fns                  |
//! |-----------------|------------------------------------------------------|----------------------------------|
//! | **Routing**     | Type-keyed listener registry, typed delivery.        | [`Notification`], [`Dispatcher`] |
//! | **Listeners**   | Closure-backed handlers with shared handles.         | [`Listener`], [`ListenerRef`]    |
//! | **Binding**     | Restrict a listener to one subject (weakly held).    | [`Subject`]                      |
//! | **Shared use**  | Per-thread default instance for un-wired call sites. | [`default_dispatcher`]           |
//!
//! ## Example
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use noticenter::{Dispatcher, Listener, Notification};
//!
//! struct FileSaved {
//!     path: &'static str,
//! }
//! impl Notification for FileSaved {}
//!
//! let dispatcher = Dispatcher::new();
//! let saves = Rc::new(Cell::new(0));
//!
//! let listener = Listener::rc({
//!     let saves = Rc::clone(&saves);
//!     move |n: &FileSaved| {
//!         assert_eq!(n.path, "/tmp/demo.txt");
//!         saves.set(saves.get() + 1);
//!     }
//! });
//! dispatcher.add_listener(listener, None);
//!
//! dispatcher.post_notification(&FileSaved { path: "/tmp/demo.txt" }, None);
//! assert_eq!(saves.get(), 1);
//! ```

mod dispatch;
mod notices;

// ---- Public re-exports ----

pub use dispatch::{default_dispatcher, Dispatcher};
pub use notices::{Listener, ListenerRef, Notification, Subject};
