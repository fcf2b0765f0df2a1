//! # Notification marker trait.
//!
//! A notification is a plain value describing that something happened. Its
//! concrete Rust type doubles as the routing key: the dispatcher partitions
//! listeners by [`TypeId`](std::any::TypeId), so two notifications of the
//! same type always resolve to the same bucket, and a listener declared for
//! one type never observes another.
//!
//! The marker keeps call sites honest — you post `ConfigReloaded`, not a
//! bare `String` — while the dispatcher stays completely ignorant of the
//! payload. Notifications are borrowed for the duration of the post and
//! never retained.

use std::any::Any;

/// Marker trait for values that can be posted through a
/// [`Dispatcher`](crate::Dispatcher).
///
/// The `Any` supertrait pins implementors to `'static` and supplies the
/// `TypeId` used for routing. Payload contents are entirely up to the
/// producer; the dispatcher hands each matching listener a `&N` and forgets
/// the value as soon as the post returns.
///
/// ## Example
/// ```rust
/// use noticenter::Notification;
///
/// struct ConfigReloaded {
///     generation: u64,
/// }
/// impl Notification for ConfigReloaded {}
/// ```
pub trait Notification: Any {}
