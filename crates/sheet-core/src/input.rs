#![forbid(unsafe_code)]

//! Ambient input bus shared by every mounted component.
//!
//! A component that needs input from outside its own bounds (a drag that
//! leaves the handle, a release over the backdrop) subscribes to the bus when
//! it is mounted and drops the returned [`InputSubscription`] when it is
//! unmounted. Hosts feed every window-level event through
//! [`InputBus::dispatch`].
//!
//! # Invariants
//!
//! 1. Subscribers are called in registration order.
//! 2. Dropping an [`InputSubscription`] removes its callback before the next
//!    dispatch; a subscription dropped during a dispatch is not called again
//!    within that dispatch.
//! 3. Callbacks may subscribe, unsubscribe, or dispatch re-entrantly. The
//!    subscriber list is snapshotted before callbacks run and no borrow is
//!    held across a callback.
//! 4. No subscriber may assume exclusive access to the bus.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::Event;

thread_local! {
    static GLOBAL_BUS: InputBus = InputBus::new();
}

type Callback = Rc<dyn Fn(&Event)>;

struct Subscriber {
    id: u64,
    callback: Callback,
    active: Rc<Cell<bool>>,
}

#[derive(Default)]
struct BusInner {
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
}

/// Shared, single-threaded input event bus.
///
/// Cloning is cheap and yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct InputBus {
    inner: Rc<BusInner>,
}

impl fmt::Debug for InputBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl InputBus {
    /// Create an empty, private bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the thread's window-level bus.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_BUS.with(Clone::clone)
    }

    /// Register a callback for every dispatched event.
    #[must_use = "dropping the subscription immediately unsubscribes"]
    pub fn subscribe(&self, callback: impl Fn(&Event) + 'static) -> InputSubscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id.wrapping_add(1));
        let active = Rc::new(Cell::new(true));
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(callback),
            active: Rc::clone(&active),
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(subscriber = id, "input bus subscribe");

        InputSubscription {
            bus: Rc::downgrade(&self.inner),
            id,
            active,
        }
    }

    /// Deliver an event to every current subscriber.
    pub fn dispatch(&self, event: &Event) {
        let snapshot: Vec<(Callback, Rc<Cell<bool>>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| (Rc::clone(&s.callback), Rc::clone(&s.active)))
            .collect();

        for (callback, active) in snapshot {
            if active.get() {
                callback(event);
            }
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Whether two handles refer to the same bus.
    #[must_use]
    pub fn same_bus(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// RAII guard for an [`InputBus`] subscription.
///
/// The callback stays registered until this guard is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called. Outliving the bus is fine.
#[must_use = "dropping the subscription immediately unsubscribes"]
pub struct InputSubscription {
    bus: Weak<BusInner>,
    id: u64,
    active: Rc<Cell<bool>>,
}

impl InputSubscription {
    /// Remove the callback now. Idempotent.
    pub fn unsubscribe(&mut self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers.borrow_mut().retain(|s| s.id != self.id);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(subscriber = self.id, "input bus unsubscribe");
    }

    /// Whether the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get() && self.bus.strong_count() > 0
    }
}

impl fmt::Debug for InputSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSubscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
