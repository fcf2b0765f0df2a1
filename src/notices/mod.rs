//! # Notification data model: notifications, subjects, listeners.
//!
//! This module provides the types a consumer touches directly:
//! - [`Notification`] - marker trait for postable event values
//! - [`Subject`] - handle used to bind listeners and to address posts
//! - [`Listener`] - closure-backed handler for one notification type
//! - [`ListenerRef`] - shared reference to a listener (`Rc<Listener<N>>`)
//!
//! The dispatcher itself lives in `crate::dispatch`; it stores listeners
//! through the crate-private erased seam defined in `listener`.

mod listener;
mod notification;
mod subject;

pub use listener::{Listener, ListenerRef};
pub use notification::Notification;
pub use subject::Subject;

pub(crate) use listener::{Binding, ErasedListener};
