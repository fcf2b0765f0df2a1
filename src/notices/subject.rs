//! # Subject handles and identity.
//!
//! A [`Subject`] wraps the `Rc` of some caller-owned object so that posts
//! can be addressed to it and listeners can be bound to it. Two subjects
//! are "the same" iff they point at the same allocation — identity, never
//! value equality. A value-equal but distinct object is a different subject
//! and will never match.
//!
//! Bindings hold subjects weakly: registering a listener bound to a subject
//! does not extend that subject's lifetime. See
//! [`Listener`](crate::Listener) for what happens when a bound subject is
//! dropped while its listener is still registered.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// Strong handle to a subject object, used at call sites.
///
/// Cheap to clone (one `Rc` clone). Construct with [`Subject::of`] or via
/// `From<Rc<T>>`:
///
/// ```rust
/// use std::rc::Rc;
/// use noticenter::Subject;
///
/// struct Document;
///
/// let doc = Rc::new(Document);
/// let a = Subject::of(&doc);
/// let b = Subject::from(Rc::clone(&doc));
/// assert!(a.same(&b));
///
/// let other = Subject::of(&Rc::new(Document));
/// assert!(!a.same(&other));
/// ```
#[derive(Clone)]
pub struct Subject(Rc<dyn Any>);

impl Subject {
    /// Wraps a shared object as a subject, cloning the `Rc`.
    pub fn of<T: Any>(subject: &Rc<T>) -> Self {
        Self(Rc::clone(subject) as Rc<dyn Any>)
    }

    /// Returns `true` if both handles refer to the same allocation.
    ///
    /// This is pointer identity: two value-equal objects behind different
    /// `Rc`s are different subjects.
    pub fn same(&self, other: &Subject) -> bool {
        self.addr() == other.addr()
    }

    /// Non-owning handle for listener bindings.
    pub(crate) fn downgrade(&self) -> Weak<dyn Any> {
        Rc::downgrade(&self.0)
    }

    /// Thin address of the referenced allocation.
    ///
    /// Comparison happens on thin pointers: `Rc::ptr_eq` on `dyn` handles
    /// also compares vtable pointers, which are not unique per type.
    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl<T: Any> From<Rc<T>> for Subject {
    fn from(subject: Rc<T>) -> Self {
        Self(subject as Rc<dyn Any>)
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({:p})", self.addr())
    }
}
