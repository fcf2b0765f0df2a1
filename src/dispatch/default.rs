//! # Shared default dispatcher.
//!
//! Most code should construct a [`Dispatcher`] explicitly and pass it to
//! whoever needs one. For call sites without wiring — loose tools, demo
//! code, deeply nested modules — [`default_dispatcher`] exposes one shared
//! instance per thread.
//!
//! Per thread, not per process: [`Dispatcher`] is deliberately `!Send`
//! (`Rc`/`RefCell` inside), so a process-wide static is not expressible and
//! would contradict the single-threaded dispatch model anyway. Listeners
//! registered on one thread's default instance are invisible to every other
//! thread.
//!
//! The instance is created lazily on first access and lives until the
//! thread exits; there is no teardown API.

use std::rc::Rc;

use super::dispatcher::Dispatcher;

thread_local! {
    static DEFAULT: Rc<Dispatcher> = Rc::new(Dispatcher::new());
}

/// Returns this thread's shared dispatcher.
///
/// Every call on the same thread returns a handle to the same instance.
///
/// ## Example
/// ```rust
/// use noticenter::{default_dispatcher, Listener, Notification};
///
/// struct Tick;
/// impl Notification for Tick {}
///
/// let listener = default_dispatcher().add_listener(Listener::rc(|_: &Tick| {}), None);
/// default_dispatcher().post_notification(&Tick, None);
/// default_dispatcher().remove_listener(&listener, None);
/// ```
pub fn default_dispatcher() -> Rc<Dispatcher> {
    DEFAULT.with(Rc::clone)
}
