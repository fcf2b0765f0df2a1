//! # Dispatcher: type-keyed listener registry and synchronous fan-out.
//!
//! [`Dispatcher`] owns a registry mapping each notification `TypeId` to the
//! ordered list of listeners registered for it, and delivers posted
//! notifications to every matching listener, synchronously and in
//! registration order.
//!
//! ## Reentrancy
//! Handlers may call back into the dispatcher. Posting iterates over a
//! snapshot of the listener list, so the registry itself is never borrowed
//! while a handler runs:
//! - `add_listener` from a handler takes effect immediately, but the
//!   in-flight post keeps its snapshot; the new listener fires from the
//!   next (or a nested) post onward.
//! - `remove_listener` from a handler is deferred onto a pending queue and
//!   applied when the outermost post unwinds, so no post ever skips or
//!   double-invokes a listener because the list shifted under it.
//! - A nested `post_notification` runs to completion against the registry
//!   as it stands, before the enclosing post resumes. Nesting depth is a
//!   counter: nested posts never drain the outer post's pending removals.
//!
//! ## Delivery filter
//! A listener receives a post iff its type matches and its binding accepts
//! the subject: unbound (or expired) bindings accept everything, a live
//! binding accepts exactly its own subject. See [`Listener`](crate::Listener)
//! for the full binding semantics.

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::notices::{Binding, ErasedListener, ListenerRef, Notification, Subject};

type RegisteredListener = Rc<dyn ErasedListener>;

/// In-process notification dispatcher.
///
/// Single-threaded by construction (`Rc`/`RefCell` inside, so neither
/// `Send` nor `Sync`). Construct one explicitly and pass it where needed,
/// or use the shared per-thread instance from
/// [`default_dispatcher`](crate::default_dispatcher).
///
/// ## Example
/// ```rust
/// use std::rc::Rc;
/// use noticenter::{Dispatcher, Listener, Notification, Subject};
///
/// struct DoorOpened;
/// impl Notification for DoorOpened {}
///
/// struct Door;
///
/// let dispatcher = Dispatcher::new();
/// let front = Rc::new(Door);
///
/// // Only fires for posts naming the front door.
/// let listener = Listener::rc(|_: &DoorOpened| println!("front door opened"));
/// dispatcher.add_listener(listener, Some(&Subject::of(&front)));
///
/// dispatcher.post_notification(&DoorOpened, Some(&Subject::of(&front)));
/// ```
pub struct Dispatcher {
    /// Listeners per notification type, in registration order. Emptied
    /// buckets are pruned rather than left mapped to an empty vector.
    registry: RefCell<HashMap<TypeId, Vec<RegisteredListener>>>,
    /// Post nesting depth. Non-zero while listener iteration is running.
    depth: Cell<usize>,
    /// Removals requested while depth > 0, applied when it returns to 0.
    pending_removals: RefCell<Vec<RegisteredListener>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            registry: RefCell::new(HashMap::new()),
            depth: Cell::new(0),
            pending_removals: RefCell::new(Vec::new()),
        }
    }

    /// Registers a listener, optionally bound to a subject.
    ///
    /// Sets the listener's binding from `bound_to` (held weakly) and
    /// appends it to the list for its notification type. Returns the same
    /// handle for chaining.
    ///
    /// Re-adding an already-registered listener is permitted and yields one
    /// invocation per occurrence on future posts — duplicates are
    /// intentionally not suppressed. Because the binding lives on the
    /// listener, re-adding also rebinds every existing occurrence.
    pub fn add_listener<N: Notification>(
        &self,
        listener: ListenerRef<N>,
        bound_to: Option<&Subject>,
    ) -> ListenerRef<N> {
        listener.rebind(match bound_to {
            Some(subject) => Binding::Bound(subject.downgrade()),
            None => Binding::Unbound,
        });

        let registered: RegisteredListener = Rc::clone(&listener) as RegisteredListener;
        self.registry
            .borrow_mut()
            .entry(registered.key())
            .or_default()
            .push(registered);

        trace!(
            "listener registered: type={} bound={}",
            std::any::type_name::<N>(),
            bound_to.is_some()
        );
        listener
    }

    /// Removes a registered listener, subject to the binding policy.
    ///
    /// The request is honored only if the listener is currently unbound
    /// (including an expired binding) or `bound_to` names its exact bound
    /// subject; otherwise this is a silent no-op. Removing a listener that
    /// is not registered is also a silent no-op.
    ///
    /// If a post is in flight the removal is deferred until the outermost
    /// post unwinds; the policy check still happens now, against the
    /// listener's current binding. Of duplicate registrations, only the
    /// first occurrence is removed per call.
    pub fn remove_listener<N: Notification>(
        &self,
        listener: &ListenerRef<N>,
        bound_to: Option<&Subject>,
    ) {
        if !listener.removable_with(bound_to) {
            return;
        }

        let registered: RegisteredListener = Rc::clone(listener) as RegisteredListener;
        if self.depth.get() > 0 {
            trace!(
                "listener removal deferred (dispatch in flight): type={}",
                std::any::type_name::<N>()
            );
            self.pending_removals.borrow_mut().push(registered);
            return;
        }
        self.erase(&registered);
    }

    /// Posts a notification, invoking every matching listener in
    /// registration order before returning.
    ///
    /// A listener matches iff it is registered for `N` and its binding
    /// accepts `subject` (unbound listeners accept every post of their
    /// type; bound listeners only the identical subject). Posting with no
    /// matching listeners is a no-op. Handlers may re-enter the dispatcher;
    /// see the module docs for the exact rules.
    pub fn post_notification<N: Notification>(&self, notification: &N, subject: Option<&Subject>) {
        self.depth.set(self.depth.get() + 1);

        // Snapshot the bucket and release the registry borrow before any
        // handler runs, so handlers can re-enter freely.
        let batch: Vec<RegisteredListener> = self
            .registry
            .borrow()
            .get(&TypeId::of::<N>())
            .cloned()
            .unwrap_or_default();

        trace!(
            "posting {} to {} listener(s), subject={}",
            std::any::type_name::<N>(),
            batch.len(),
            subject.is_some()
        );

        for listener in &batch {
            if listener.accepts(subject) {
                listener.deliver(notification);
            }
        }

        self.depth.set(self.depth.get() - 1);
        if self.depth.get() == 0 {
            self.drain_removals();
        }
    }

    /// Applies removals deferred during dispatch, most recent first.
    ///
    /// Erasure is direct: the binding policy was already checked when the
    /// removal was queued.
    fn drain_removals(&self) {
        while let Some(listener) = self.pending_removals.borrow_mut().pop() {
            self.erase(&listener);
        }
    }

    /// Erases the first occurrence of `listener` from its type's bucket,
    /// pruning the bucket if it empties. No-op if absent.
    fn erase(&self, listener: &RegisteredListener) {
        let mut registry = self.registry.borrow_mut();
        let key = listener.key();
        if let Some(bucket) = registry.get_mut(&key) {
            let target = Rc::as_ptr(listener) as *const ();
            if let Some(position) = bucket
                .iter()
                .position(|entry| Rc::as_ptr(entry) as *const () == target)
            {
                bucket.remove(position);
                trace!("listener removed: key={key:?}");
            }
            if bucket.is_empty() {
                registry.remove(&key);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("types", &self.registry.borrow().len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

#[cfg(test)]
impl Dispatcher {
    /// Bucket size for `N`, or `None` if the key has been pruned.
    fn bucket_len<N: Notification>(&self) -> Option<usize> {
        self.registry
            .borrow()
            .get(&TypeId::of::<N>())
            .map(Vec::len)
    }

    fn type_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notices::Listener;
    use std::cell::Cell;

    struct Ping;
    impl Notification for Ping {}

    struct Pong;
    impl Notification for Pong {}

    struct Door;

    fn counting_listener(hits: &Rc<Cell<usize>>) -> ListenerRef<Ping> {
        Listener::rc({
            let hits = Rc::clone(hits);
            move |_: &Ping| hits.set(hits.get() + 1)
        })
    }

    #[test]
    fn test_unbound_listener_fires_once_per_post() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        d.add_listener(counting_listener(&hits), None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 1);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_unbound_listener_ignores_subject_argument() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        d.add_listener(counting_listener(&hits), None);

        let door = Rc::new(Door);
        d.post_notification(&Ping, Some(&Subject::of(&door)));
        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_bound_listener_fires_only_for_its_subject() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let x = Rc::new(Door);
        let y = Rc::new(Door);

        d.add_listener(counting_listener(&hits), Some(&Subject::of(&x)));

        d.post_notification(&Ping, Some(&Subject::of(&y)));
        assert_eq!(hits.get(), 0);
        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 0);
        d.post_notification(&Ping, Some(&Subject::of(&x)));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_registry_is_partitioned_by_type() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        d.add_listener(counting_listener(&hits), None);

        d.post_notification(&Pong, None);
        assert_eq!(hits.get(), 0);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_post_with_no_listeners_is_noop() {
        let d = Dispatcher::new();
        d.post_notification(&Ping, None);
        assert_eq!(d.type_count(), 0);
    }

    #[test]
    fn test_remove_bound_listener_requires_exact_subject() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let x = Rc::new(Door);
        let y = Rc::new(Door);

        let l = d.add_listener(counting_listener(&hits), Some(&Subject::of(&x)));

        // Wrong subject and no subject: both silent no-ops.
        d.remove_listener(&l, Some(&Subject::of(&y)));
        d.remove_listener(&l, None);
        assert_eq!(d.bucket_len::<Ping>(), Some(1));

        d.remove_listener(&l, Some(&Subject::of(&x)));
        assert_eq!(d.bucket_len::<Ping>(), None);
    }

    #[test]
    fn test_remove_unbound_listener_with_any_subject() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let l = d.add_listener(counting_listener(&hits), None);

        let stranger = Rc::new(Door);
        d.remove_listener(&l, Some(&Subject::of(&stranger)));
        assert_eq!(d.bucket_len::<Ping>(), None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_remove_unregistered_listener_is_noop() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let never_added = counting_listener(&hits);
        d.remove_listener(&never_added, None);

        // A registered listener survives removal attempts aimed at others.
        let l = d.add_listener(counting_listener(&hits), None);
        d.remove_listener(&never_added, None);
        assert_eq!(d.bucket_len::<Ping>(), Some(1));
        d.remove_listener(&l, None);
        assert_eq!(d.bucket_len::<Ping>(), None);
    }

    #[test]
    fn test_double_registration_double_invocation() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let l = counting_listener(&hits);

        d.add_listener(Rc::clone(&l), None);
        d.add_listener(Rc::clone(&l), None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 2);

        // One removal takes out one occurrence.
        d.remove_listener(&l, None);
        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_readding_rebinds_every_occurrence() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let x = Rc::new(Door);
        let l = counting_listener(&hits);

        d.add_listener(Rc::clone(&l), Some(&Subject::of(&x)));
        // The binding lives on the listener: re-adding unbound rebinds the
        // first occurrence too.
        d.add_listener(Rc::clone(&l), None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let d = Dispatcher::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["c", "d"] {
            d.add_listener(
                Listener::rc({
                    let order = Rc::clone(&order);
                    move |_: &Ping| order.borrow_mut().push(tag)
                }),
                None,
            );
        }

        d.post_notification(&Ping, None);
        d.post_notification(&Ping, None);
        assert_eq!(*order.borrow(), ["c", "d", "c", "d"]);
    }

    #[test]
    fn test_empty_bucket_is_pruned() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let l = d.add_listener(counting_listener(&hits), None);
        assert_eq!(d.type_count(), 1);

        d.remove_listener(&l, None);
        assert_eq!(d.bucket_len::<Ping>(), None);
        assert_eq!(d.type_count(), 0);
    }

    #[test]
    fn test_expired_binding_fires_for_everything_and_is_removable() {
        let d = Dispatcher::new();
        let hits = Rc::new(Cell::new(0));
        let door = Rc::new(Door);

        let l = d.add_listener(counting_listener(&hits), Some(&Subject::of(&door)));
        drop(door);

        // Expired binding degrades to unbound: fires for any subject.
        d.post_notification(&Ping, None);
        d.post_notification(&Ping, Some(&Subject::of(&Rc::new(Door))));
        assert_eq!(hits.get(), 2);

        // And is removable without naming a subject.
        d.remove_listener(&l, None);
        assert_eq!(d.bucket_len::<Ping>(), None);
    }

    #[test]
    fn test_self_removal_inside_callback_takes_effect_next_post() {
        let d = Rc::new(Dispatcher::new());
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<ListenerRef<Ping>>>> = Rc::new(RefCell::new(None));

        let l = Listener::rc({
            let d = Rc::clone(&d);
            let hits = Rc::clone(&hits);
            let slot = Rc::clone(&slot);
            move |_: &Ping| {
                hits.set(hits.get() + 1);
                if let Some(me) = slot.borrow().as_ref() {
                    d.remove_listener(me, None);
                }
            }
        });
        *slot.borrow_mut() = Some(Rc::clone(&l));
        d.add_listener(l, None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 1);
        assert_eq!(d.bucket_len::<Ping>(), None);

        d.post_notification(&Ping, None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_mid_dispatch_removal_does_not_disturb_other_listeners() {
        let d = Rc::new(Dispatcher::new());
        let order = Rc::new(RefCell::new(Vec::new()));
        let late = Listener::rc({
            let order = Rc::clone(&order);
            move |_: &Ping| order.borrow_mut().push("late")
        });

        // The first listener removes the later-registered one; the later
        // one must still fire for this post and vanish afterwards.
        let early = Listener::rc({
            let d = Rc::clone(&d);
            let order = Rc::clone(&order);
            let late = Rc::clone(&late);
            move |_: &Ping| {
                order.borrow_mut().push("early");
                d.remove_listener(&late, None);
            }
        });

        d.add_listener(early, None);
        d.add_listener(late, None);

        d.post_notification(&Ping, None);
        assert_eq!(*order.borrow(), ["early", "late"]);

        d.post_notification(&Ping, None);
        assert_eq!(*order.borrow(), ["early", "late", "early"]);
    }

    #[test]
    fn test_listener_added_mid_dispatch_fires_from_next_post() {
        let d = Rc::new(Dispatcher::new());
        let added_hits = Rc::new(Cell::new(0));

        let adder = Listener::rc({
            let d = Rc::clone(&d);
            let added_hits = Rc::clone(&added_hits);
            move |_: &Ping| {
                d.add_listener(
                    Listener::rc({
                        let added_hits = Rc::clone(&added_hits);
                        move |_: &Ping| added_hits.set(added_hits.get() + 1)
                    }),
                    None,
                );
            }
        });
        d.add_listener(adder, None);

        // The in-flight post iterates its snapshot; the fresh listener
        // fires only from the next post onward.
        d.post_notification(&Ping, None);
        assert_eq!(added_hits.get(), 0);

        d.post_notification(&Ping, None);
        assert_eq!(added_hits.get(), 1);
    }

    #[test]
    fn test_nested_post_runs_to_completion_before_outer_resumes() {
        let d = Rc::new(Dispatcher::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        d.add_listener(
            Listener::rc({
                let order = Rc::clone(&order);
                move |_: &Pong| order.borrow_mut().push("pong")
            }),
            None,
        );
        d.add_listener(
            Listener::rc({
                let d = Rc::clone(&d);
                let order = Rc::clone(&order);
                move |_: &Ping| {
                    order.borrow_mut().push("ping-before");
                    d.post_notification(&Pong, None);
                    order.borrow_mut().push("ping-after");
                }
            }),
            None,
        );
        d.add_listener(
            Listener::rc({
                let order = Rc::clone(&order);
                move |_: &Ping| order.borrow_mut().push("ping-second")
            }),
            None,
        );

        d.post_notification(&Ping, None);
        assert_eq!(
            *order.borrow(),
            ["ping-before", "pong", "ping-after", "ping-second"]
        );
    }

    #[test]
    fn test_nested_post_does_not_drain_outer_removals() {
        let d = Rc::new(Dispatcher::new());
        let pending_during_nested = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<ListenerRef<Ping>>>> = Rc::new(RefCell::new(None));

        // Removes itself, then issues a nested post. With a depth counter
        // the removal must still be pending when the nested post finishes.
        let l = Listener::rc({
            let d = Rc::clone(&d);
            let slot = Rc::clone(&slot);
            let pending = Rc::clone(&pending_during_nested);
            move |_: &Ping| {
                if let Some(me) = slot.borrow().as_ref() {
                    d.remove_listener(me, None);
                }
                d.post_notification(&Pong, None);
                pending.set(d.bucket_len::<Ping>().unwrap_or(0));
            }
        });
        *slot.borrow_mut() = Some(Rc::clone(&l));
        d.add_listener(l, None);

        d.post_notification(&Ping, None);

        // Still registered right after the nested post returned...
        assert_eq!(pending_during_nested.get(), 1);
        // ...and gone once the outer post unwound.
        assert_eq!(d.bucket_len::<Ping>(), None);
    }
}
