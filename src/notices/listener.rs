//! # Closure-backed notification listeners.
//!
//! [`Listener`] wraps a handler closure `F: Fn(&N)` for exactly one
//! notification type `N`, plus the listener's current subject binding.
//! Listeners are registered as shared handles ([`ListenerRef`]); the same
//! handle is later passed to
//! [`remove_listener`](crate::Dispatcher::remove_listener) to identify the
//! registration.
//!
//! ## Binding semantics
//! The binding lives on the listener object, not on the registry entry, so
//! registering the same handle twice shares one binding: re-adding a
//! listener with a different `bound_to` rebinds *every* occurrence.
//!
//! Bindings are non-owning. If the bound subject is dropped while the
//! listener is still registered, the binding expires and the listener
//! degrades to unbound: it fires for every post of its type and can be
//! removed without naming a subject. Callers are expected to remove
//! listeners before dropping the subject they bound to.
//!
//! ## Example
//! ```rust
//! use noticenter::{Listener, ListenerRef, Notification};
//!
//! struct Ping;
//! impl Notification for Ping {}
//!
//! let listener: ListenerRef<Ping> = Listener::rc(|_: &Ping| {
//!     // react to the ping...
//! });
//! assert!(!listener.is_bound());
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::notices::notification::Notification;
use crate::notices::subject::Subject;

/// Shared reference to a listener (`Rc<Listener<N>>`).
///
/// The handle identifies the registration: keep it around if you intend to
/// remove the listener later.
pub type ListenerRef<N> = Rc<Listener<N>>;

/// A registered callback for one notification type.
///
/// Created unbound; the dispatcher assigns the binding at registration
/// time from the `bound_to` argument of
/// [`add_listener`](crate::Dispatcher::add_listener).
pub struct Listener<N: Notification> {
    handler: Box<dyn Fn(&N)>,
    binding: RefCell<Binding>,
}

impl<N: Notification> Listener<N> {
    /// Creates a new, unbound listener from a handler closure.
    ///
    /// Prefer [`Listener::rc`] when you immediately need a [`ListenerRef`].
    pub fn new(handler: impl Fn(&N) + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            binding: RefCell::new(Binding::Unbound),
        }
    }

    /// Creates the listener and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use noticenter::{Listener, ListenerRef, Notification};
    ///
    /// struct Ping;
    /// impl Notification for Ping {}
    ///
    /// let l: ListenerRef<Ping> = Listener::rc(|_: &Ping| {});
    /// ```
    pub fn rc(handler: impl Fn(&N) + 'static) -> ListenerRef<N> {
        Rc::new(Self::new(handler))
    }

    /// Returns `true` if the listener currently carries a live binding.
    ///
    /// An expired binding (subject already dropped) counts as unbound.
    pub fn is_bound(&self) -> bool {
        matches!(self.binding.borrow().target(), BindingTarget::Live(_))
    }
}

impl<N: Notification> fmt::Debug for Listener<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("notification", &std::any::type_name::<N>())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Current subject binding of a listener.
#[derive(Clone, Default)]
pub(crate) enum Binding {
    /// Responds to every post of its notification type.
    #[default]
    Unbound,
    /// Responds only to posts naming this subject. Non-owning.
    Bound(Weak<dyn Any>),
}

/// Resolved state of a [`Binding`] at check time.
enum BindingTarget {
    Unbound,
    /// Thin address of the live bound subject. Single-threaded model: the
    /// subject cannot be reclaimed between resolution and comparison.
    Live(*const ()),
}

impl Binding {
    /// Resolves the binding, folding an expired weak into `Unbound`.
    fn target(&self) -> BindingTarget {
        match self {
            Binding::Unbound => BindingTarget::Unbound,
            Binding::Bound(weak) => match weak.upgrade() {
                Some(subject) => BindingTarget::Live(Rc::as_ptr(&subject) as *const ()),
                None => BindingTarget::Unbound,
            },
        }
    }
}

/// Type-erased seam between [`Listener<N>`] and the dispatcher registry.
///
/// Lets one registry hold listeners for heterogeneous notification types;
/// the dispatcher routes by [`ErasedListener::key`] and downcasts inside
/// [`ErasedListener::deliver`].
pub(crate) trait ErasedListener {
    /// Routing key: the `TypeId` of the declared notification type.
    fn key(&self) -> TypeId;

    /// Replaces the listener's binding (registration time).
    fn rebind(&self, binding: Binding);

    /// Whether a post addressed to `subject` should reach this listener.
    ///
    /// Unbound and expired bindings accept every subject; a live binding
    /// accepts only the identical subject.
    fn accepts(&self, subject: Option<&Subject>) -> bool;

    /// Whether a removal naming `bound_to` is allowed to take effect.
    ///
    /// The check is asymmetric on purpose: an unbound (or expired) listener
    /// is removable regardless of the argument, while a live-bound listener
    /// is removable only by naming its exact subject.
    fn removable_with(&self, bound_to: Option<&Subject>) -> bool;

    /// Invokes the handler if `notification` is of the declared type.
    fn deliver(&self, notification: &dyn Any);
}

impl<N: Notification> ErasedListener for Listener<N> {
    fn key(&self) -> TypeId {
        TypeId::of::<N>()
    }

    fn rebind(&self, binding: Binding) {
        *self.binding.borrow_mut() = binding;
    }

    fn accepts(&self, subject: Option<&Subject>) -> bool {
        match self.binding.borrow().target() {
            BindingTarget::Unbound => true,
            BindingTarget::Live(addr) => subject.is_some_and(|s| s.addr() == addr),
        }
    }

    fn removable_with(&self, bound_to: Option<&Subject>) -> bool {
        match self.binding.borrow().target() {
            BindingTarget::Unbound => true,
            BindingTarget::Live(addr) => bound_to.is_some_and(|s| s.addr() == addr),
        }
    }

    fn deliver(&self, notification: &dyn Any) {
        // The registry is partitioned by key, so the downcast only fails if
        // a caller bypassed the dispatcher; deliver nothing in that case.
        if let Some(notification) = notification.downcast_ref::<N>() {
            (self.handler)(notification);
        }
    }
}
