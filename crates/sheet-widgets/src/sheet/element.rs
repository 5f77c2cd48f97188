#![forbid(unsafe_code)]

//! The mountable sheet component.
//!
//! [`Sheet`] ties the [`LifecycleController`] and the [`DragTracker`] to a
//! host [`SheetSurface`] and to the ambient [`InputBus`].
//!
//! Input arrives on two paths:
//!
//! - [`Sheet::handle_event`]: events the host hit-tested onto the sheet
//!   (handle press, backdrop press, close button, key release). The caller
//!   says which region was hit with a [`SheetTarget`].
//! - [`Sheet::handle_window_event`]: window-level move, release and cancel.
//!   A mounted sheet receives these from the bus so a drag keeps tracking
//!   after the pointer leaves the handle.
//!
//! # Invariants
//!
//! - A sheet is subscribed to at most one bus at a time; mounting twice on
//!   the same bus is a no-op.
//! - Unmounting (or dropping the last handle) unsubscribes and abandons any
//!   drag in progress.
//! - A handle press on an unmounted sheet is ignored: without a bus no
//!   release could ever end the drag.
//! - Targeted input is ignored while the sheet is closed. Window-level input
//!   is not, so a drag interrupted by a programmatic close still restores
//!   the surface on release.
//! - No interior borrow is held while notification listeners run.
//!
//! # Example
//!
//! ```ignore
//! let sheet = Sheet::new(surface);
//! sheet.mount(&InputBus::global());
//! let _on_close = sheet.on(NotificationKind::Close, |n| {
//!     println!("closed with {:?}", n.return_value());
//! });
//! sheet.show();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use sheet_core::event::{Event, KeyCode, PointerEventKind};
use sheet_core::input::{InputBus, InputSubscription};

use super::config::SheetConfig;
use super::drag::{DragOutcome, DragRelease, DragTracker};
use super::lifecycle::{FormMethod, LifecycleController};
use super::notify::{ListenerGuard, Notification, NotificationKind};
use super::surface::SheetSurface;

/// Global counter for unique sheet IDs.
static SHEET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a sheet instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(u64);

impl SheetId {
    fn new() -> Self {
        Self(SHEET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Region of the sheet an event was hit-tested onto.
///
/// Pointer targets act on the primary press, not on the release that
/// completes a click: the backdrop and close buttons dismiss as soon as the
/// pointer goes down, and the handle starts a drag. Hosts that want
/// click-on-release semantics deliver their synthesized click to
/// [`Sheet::backdrop_clicked`] or [`Sheet::close_button_clicked`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTarget<'a> {
    /// The dimmed area around the sheet.
    Backdrop,
    /// Sheet content, including the title and action regions.
    Content {
        /// Focus or pointer is in a text field or other editable control.
        editable: bool,
    },
    /// The draggable handle.
    Handle,
    /// A close button, optionally carrying a value for the return value.
    CloseButton { value: Option<&'a str> },
    /// Somewhere that does not belong to this sheet.
    Outside,
}

/// Gesture recognized by [`Sheet::handle_event`].
///
/// A recognized dismissal gesture does not imply the sheet closed: a
/// `cancel` listener may have vetoed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAction {
    DragStarted,
    BackdropClicked,
    EscapePressed,
    CloseButtonClicked,
}

struct Mount {
    bus: InputBus,
    _subscription: InputSubscription,
}

struct SheetInner {
    id: SheetId,
    lifecycle: LifecycleController,
    tracker: RefCell<DragTracker>,
    config: Cell<SheetConfig>,
    surface: Rc<dyn SheetSurface>,
    mount: RefCell<Option<Mount>>,
    last_drag: Cell<Option<DragRelease>>,
}

/// Shared handle to a sheet. Clones refer to the same sheet.
#[derive(Clone)]
pub struct Sheet {
    inner: Rc<SheetInner>,
}

/// Non-owning handle, for listeners that need to reach their own sheet.
#[derive(Clone)]
pub struct WeakSheet {
    inner: Weak<SheetInner>,
}

impl WeakSheet {
    #[must_use]
    pub fn upgrade(&self) -> Option<Sheet> {
        self.inner.upgrade().map(|inner| Sheet { inner })
    }
}

impl fmt::Debug for WeakSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSheet")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("id", &self.inner.id)
            .field("open", &self.is_open())
            .field("config", &self.config())
            .field("mounted", &self.is_mounted())
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

impl Sheet {
    /// Create a closed sheet with the default config.
    pub fn new(surface: Rc<dyn SheetSurface>) -> Self {
        Self::with_config(surface, SheetConfig::default())
    }

    /// Create a closed sheet.
    pub fn with_config(surface: Rc<dyn SheetSurface>, config: SheetConfig) -> Self {
        Self {
            inner: Rc::new(SheetInner {
                id: SheetId::new(),
                lifecycle: LifecycleController::new(Rc::clone(&surface)),
                tracker: RefCell::new(DragTracker::new()),
                config: Cell::new(config),
                surface,
                mount: RefCell::new(None),
                last_drag: Cell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> SheetId {
        self.inner.id
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakSheet {
        WeakSheet {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // --- Configuration ---

    #[must_use]
    pub fn config(&self) -> SheetConfig {
        self.inner.config.get()
    }

    pub fn set_config(&self, config: SheetConfig) {
        self.inner.config.set(config);
    }

    #[must_use]
    pub fn close_on_backdrop_click(&self) -> bool {
        self.config().close_on_backdrop_click
    }

    pub fn set_close_on_backdrop_click(&self, close: bool) {
        self.set_config(self.config().close_on_backdrop_click(close));
    }

    #[must_use]
    pub fn close_on_escape_key(&self) -> bool {
        self.config().close_on_escape_key
    }

    pub fn set_close_on_escape_key(&self, close: bool) {
        self.set_config(self.config().close_on_escape_key(close));
    }

    #[must_use]
    pub fn close_on_dragging_down(&self) -> bool {
        self.config().close_on_dragging_down
    }

    pub fn set_close_on_dragging_down(&self, close: bool) {
        self.set_config(self.config().close_on_dragging_down(close));
    }

    // --- Lifecycle ---

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lifecycle.is_open()
    }

    /// Open-state setter: `true` shows, `false` closes without `cancel`.
    pub fn set_open(&self, open: bool) {
        if open {
            self.show();
        } else {
            self.close();
        }
    }

    /// Present the sheet. No-op if already open.
    pub fn show(&self) {
        self.inner.lifecycle.show();
    }

    /// Close the sheet programmatically. No-op if already closed.
    pub fn close(&self) {
        self.inner.lifecycle.close();
    }

    /// User-initiated close: `cancel` first, then `close` unless vetoed.
    ///
    /// Returns `true` if the sheet ended up closed.
    pub fn request_cancel_and_close(&self) -> bool {
        self.inner.lifecycle.request_cancel_and_close()
    }

    #[must_use]
    pub fn return_value(&self) -> String {
        self.inner.lifecycle.return_value()
    }

    pub fn set_return_value(&self, value: impl Into<String>) {
        self.inner.lifecycle.set_return_value(value);
    }

    /// A form inside the sheet was submitted.
    ///
    /// See [`LifecycleController::submit_form`].
    pub fn submit_form(&self, method: FormMethod, submitter_value: Option<&str>) -> bool {
        self.inner.lifecycle.submit_form(method, submitter_value)
    }

    /// Register a notification listener.
    #[must_use = "dropping the guard removes the listener"]
    pub fn on(
        &self,
        kind: NotificationKind,
        listener: impl Fn(&Notification) + 'static,
    ) -> ListenerGuard {
        self.inner.lifecycle.notifier().on(kind, listener)
    }

    // --- Dismissal gestures ---

    /// The backdrop was clicked. Returns `false` when backdrop dismissal is
    /// disabled or the sheet is closed.
    pub fn backdrop_clicked(&self) -> bool {
        if !self.is_open() || !self.close_on_backdrop_click() {
            return false;
        }
        self.request_cancel_and_close();
        true
    }

    /// A close button was clicked. Its value, if any, becomes the return
    /// value before the cancelable close runs.
    pub fn close_button_clicked(&self, value: Option<&str>) -> bool {
        if !self.is_open() {
            return false;
        }
        if let Some(value) = value {
            self.set_return_value(value);
        }
        self.request_cancel_and_close();
        true
    }

    // --- Input ---

    /// Handle an event hit-tested onto this sheet.
    ///
    /// Escape acts on key release, matching the key-up listener a markup
    /// host would attach. Pointer moves and releases are ignored here; they
    /// arrive through [`handle_window_event`](Self::handle_window_event).
    pub fn handle_event(&self, event: &Event, target: SheetTarget<'_>) -> Option<SheetAction> {
        if !self.is_open() {
            return None;
        }

        match event {
            Event::Key(key) if key.code == KeyCode::Escape && key.is_release() => {
                if !self.close_on_escape_key()
                    || matches!(target, SheetTarget::Content { editable: true })
                {
                    return None;
                }
                self.request_cancel_and_close();
                Some(SheetAction::EscapePressed)
            }
            Event::Pointer(pointer) if pointer.is_primary_press() => match target {
                SheetTarget::Handle => {
                    // Moves and releases only arrive through the bus.
                    if !self.is_mounted() {
                        return None;
                    }
                    let started = self
                        .inner
                        .tracker
                        .borrow_mut()
                        .press(pointer.y, &*self.inner.surface);
                    started.then_some(SheetAction::DragStarted)
                }
                SheetTarget::Backdrop => self
                    .backdrop_clicked()
                    .then_some(SheetAction::BackdropClicked),
                SheetTarget::CloseButton { value } => self
                    .close_button_clicked(value)
                    .then_some(SheetAction::CloseButtonClicked),
                SheetTarget::Content { .. } | SheetTarget::Outside => None,
            },
            _ => None,
        }
    }

    /// Handle a window-level event: drag moves, releases and cancels.
    pub fn handle_window_event(&self, event: &Event) {
        let Event::Pointer(pointer) = event else {
            return;
        };
        let surface = &*self.inner.surface;

        match pointer.kind {
            PointerEventKind::Move => {
                self.inner.tracker.borrow_mut().drag_to(pointer.y, surface);
            }
            PointerEventKind::Up(_) if pointer.is_primary_release() => {
                let release = self.inner.tracker.borrow_mut().release(
                    pointer.y,
                    surface,
                    self.close_on_dragging_down(),
                );
                let Some(release) = release else {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(target: "sheet", sheet = self.inner.id.id(), "stray release");
                    return;
                };
                self.inner.last_drag.set(Some(release));
                if release.outcome == DragOutcome::Dismiss {
                    self.request_cancel_and_close();
                }
            }
            PointerEventKind::Cancel => {
                self.inner.tracker.borrow_mut().cancel(surface);
            }
            PointerEventKind::Up(_) | PointerEventKind::Down(_) => {}
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.inner.tracker.borrow().is_dragging()
    }

    /// Distance-open of the drag in progress.
    #[must_use]
    pub fn drag_distance(&self) -> Option<f32> {
        self.inner.tracker.borrow().session().map(|s| s.distance())
    }

    /// Summary of the most recent finished drag.
    #[must_use]
    pub fn last_drag(&self) -> Option<DragRelease> {
        self.inner.last_drag.get()
    }

    // --- Mounting ---

    /// Subscribe to window-level input on `bus`.
    ///
    /// Mounting on the bus already in use is a no-op; mounting on a
    /// different bus moves the subscription.
    pub fn mount(&self, bus: &InputBus) {
        let mut mount = self.inner.mount.borrow_mut();
        if mount.as_ref().is_some_and(|m| m.bus.same_bus(bus)) {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let subscription = bus.subscribe(move |event| {
            if let Some(inner) = weak.upgrade() {
                Sheet { inner }.handle_window_event(event);
            }
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet", sheet = self.inner.id.id(), "mount");

        *mount = Some(Mount {
            bus: bus.clone(),
            _subscription: subscription,
        });
    }

    /// Unsubscribe from window-level input and abandon any drag. No-op when
    /// not mounted.
    pub fn unmount(&self) {
        let Some(mount) = self.inner.mount.borrow_mut().take() else {
            return;
        };
        drop(mount);
        self.inner
            .tracker
            .borrow_mut()
            .cancel(&*self.inner.surface);

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet", sheet = self.inner.id.id(), "unmount");
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.mount.borrow().is_some()
    }
}
