#![forbid(unsafe_code)]

//! Lifecycle notifications with synchronous veto.
//!
//! A sheet emits three notifications, named after the native dialog events:
//!
//! | Kind | Cancelable | Payload |
//! |------|------------|---------|
//! | `open` | no | none |
//! | `close` | no | the sheet's return value |
//! | `cancel` | yes | none |
//!
//! [`Notifier::emit`] returns whether the default action should proceed. Any
//! listener can veto a cancelable notification by calling
//! [`Notification::prevent_default`]. Like the native event model, every
//! listener still runs after a veto and can observe it through
//! [`Notification::default_prevented`].
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. `prevent_default` on a non-cancelable notification has no effect.
//! 3. Dropping a [`ListenerGuard`] removes the listener before the next emit;
//!    a listener removed mid-emit is skipped for the rest of that emit.
//! 4. Listeners may register, drop guards, or drive the sheet re-entrantly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Which lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Open,
    Close,
    Cancel,
}

impl NotificationKind {
    /// Event name as the host's event system would spell it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Cancel => "cancel",
        }
    }

    /// Whether listeners may veto the default action.
    #[must_use]
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A notification being delivered to listeners.
#[derive(Debug)]
pub struct Notification {
    kind: NotificationKind,
    return_value: Option<String>,
    default_prevented: Cell<bool>,
}

impl Notification {
    #[must_use]
    pub fn open() -> Self {
        Self::new(NotificationKind::Open, None)
    }

    #[must_use]
    pub fn close(return_value: impl Into<String>) -> Self {
        Self::new(NotificationKind::Close, Some(return_value.into()))
    }

    #[must_use]
    pub fn cancel() -> Self {
        Self::new(NotificationKind::Cancel, None)
    }

    fn new(kind: NotificationKind, return_value: Option<String>) -> Self {
        Self {
            kind,
            return_value,
            default_prevented: Cell::new(false),
        }
    }

    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    #[must_use]
    pub fn is_cancelable(&self) -> bool {
        self.kind.is_cancelable()
    }

    /// The sheet's return value; only `close` carries one.
    #[must_use]
    pub fn return_value(&self) -> Option<&str> {
        self.return_value.as_deref()
    }

    /// Veto the default action. Ignored unless the notification is cancelable.
    pub fn prevent_default(&self) {
        if self.is_cancelable() {
            self.default_prevented.set(true);
        }
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

type Callback = Rc<dyn Fn(&Notification)>;

struct Listener {
    id: u64,
    kind: NotificationKind,
    callback: Callback,
    active: Rc<Cell<bool>>,
}

#[derive(Default)]
struct NotifierInner {
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

/// Listener registry for one sheet.
#[derive(Clone, Default)]
pub struct Notifier {
    inner: Rc<NotifierInner>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one notification kind.
    #[must_use = "dropping the guard removes the listener"]
    pub fn on(
        &self,
        kind: NotificationKind,
        callback: impl Fn(&Notification) + 'static,
    ) -> ListenerGuard {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id.wrapping_add(1));
        let active = Rc::new(Cell::new(true));
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            kind,
            callback: Rc::new(callback),
            active: Rc::clone(&active),
        });
        ListenerGuard {
            notifier: Rc::downgrade(&self.inner),
            id,
            active,
            detached: false,
        }
    }

    /// Deliver a notification. Returns `true` unless a listener vetoed it.
    pub fn emit(&self, notification: &Notification) -> bool {
        let snapshot: Vec<(Callback, Rc<Cell<bool>>)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == notification.kind)
            .map(|l| (Rc::clone(&l.callback), Rc::clone(&l.active)))
            .collect();

        for (callback, active) in snapshot {
            if active.get() {
                callback(notification);
            }
        }

        !notification.default_prevented()
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: NotificationKind) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }
}

/// RAII guard keeping a listener registered.
#[must_use = "dropping the guard removes the listener"]
pub struct ListenerGuard {
    notifier: Weak<NotifierInner>,
    id: u64,
    active: Rc<Cell<bool>>,
    detached: bool,
}

impl ListenerGuard {
    /// Remove the listener now. Idempotent.
    pub fn remove(&mut self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(notifier) = self.notifier.upgrade() {
            notifier.listeners.borrow_mut().retain(|l| l.id != self.id);
        }
    }

    /// Keep the listener for as long as the sheet lives.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if !self.detached {
            self.remove();
        }
    }
}
