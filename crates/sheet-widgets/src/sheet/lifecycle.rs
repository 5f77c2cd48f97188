#![forbid(unsafe_code)]

//! Open/close lifecycle, modeled on a native modal dialog.
//!
//! [`LifecycleController`] is the single authority for whether a sheet is
//! open. It hides and unhides the surface and emits the `open`, `close` and
//! `cancel` notifications.
//!
//! # Invariants
//!
//! 1. `show` while open and `close` while closed are silent no-ops.
//! 2. `close` always carries the return value current at the moment of
//!    closing.
//! 3. A vetoed `cancel` leaves the sheet open and emits no `close`.
//! 4. State is updated before notifications go out, and no borrow is held
//!    while listeners run, so listeners may call back into the controller.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::notify::{Notification, Notifier};
use super::surface::SheetSurface;

/// How a contained form is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormMethod {
    /// Ordinary submission; the sheet is not involved.
    #[default]
    Get,
    /// Ordinary submission; the sheet is not involved.
    Post,
    /// Close-on-submit: records the submitter's value and closes the sheet.
    Dialog,
}

/// Open/closed state plus notifications.
pub struct LifecycleController {
    open: Cell<bool>,
    return_value: RefCell<String>,
    notifier: Notifier,
    surface: Rc<dyn SheetSurface>,
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("open", &self.open.get())
            .field("return_value", &self.return_value.borrow())
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl LifecycleController {
    /// Create a closed controller. The surface is hidden immediately.
    pub fn new(surface: Rc<dyn SheetSurface>) -> Self {
        surface.set_hidden(true);
        Self {
            open: Cell::new(false),
            return_value: RefCell::new(String::new()),
            notifier: Notifier::new(),
            surface,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Present the sheet. Returns `false` if it was already open.
    pub fn show(&self) -> bool {
        if self.open.replace(true) {
            return false;
        }
        self.surface.set_hidden(false);

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet", "show");

        self.notifier.emit(&Notification::open());
        true
    }

    /// Dismiss the sheet. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        if !self.open.replace(false) {
            return false;
        }
        self.surface.set_hidden(true);
        let return_value = self.return_value.borrow().clone();

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet", return_value = %return_value, "close");

        self.notifier.emit(&Notification::close(return_value));
        true
    }

    /// User-initiated close: emit `cancel`, then close unless vetoed.
    ///
    /// Returns `true` if the sheet ended up closed.
    pub fn request_cancel_and_close(&self) -> bool {
        if !self.open.get() {
            return false;
        }
        let proceed = self.notifier.emit(&Notification::cancel());

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet", vetoed = !proceed, "cancel");

        if proceed {
            self.close();
        }
        // A cancel listener may have closed or reopened the sheet itself.
        !self.open.get()
    }

    /// Current return value.
    #[must_use]
    pub fn return_value(&self) -> String {
        self.return_value.borrow().clone()
    }

    /// Replace the return value. It is never cleared implicitly.
    pub fn set_return_value(&self, value: impl Into<String>) {
        *self.return_value.borrow_mut() = value.into();
    }

    /// A contained form was submitted.
    ///
    /// With [`FormMethod::Dialog`] the submitter's value (if any) becomes the
    /// return value and the sheet closes directly, without `cancel`: the
    /// submission already is the user's confirmation. Other methods are
    /// ignored. Returns `true` if the sheet closed.
    pub fn submit_form(&self, method: FormMethod, submitter_value: Option<&str>) -> bool {
        if method != FormMethod::Dialog || !self.open.get() {
            return false;
        }
        if let Some(value) = submitter_value {
            self.set_return_value(value);
        }
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::notify::{ListenerGuard, NotificationKind};
    use crate::sheet::surface::{Cursor, SheetTransform};

    #[derive(Default)]
    struct VisibilitySurface {
        hidden: Cell<bool>,
    }

    impl SheetSurface for VisibilitySurface {
        fn set_hidden(&self, hidden: bool) {
            self.hidden.set(hidden);
        }
        fn set_resizing(&self, _resizing: bool) {}
        fn set_cursor(&self, _cursor: Cursor) {}
        fn apply_drag_transform(&self, _transform: SheetTransform) {}
        fn clear_drag_transform(&self) {}
        fn height(&self) -> f32 {
            400.0
        }
    }

    fn controller() -> (LifecycleController, Rc<VisibilitySurface>) {
        let surface = Rc::new(VisibilitySurface::default());
        (LifecycleController::new(surface.clone()), surface)
    }

    fn count(notifier: &Notifier, kind: NotificationKind) -> (Rc<Cell<u32>>, ListenerGuard) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let guard = notifier.on(kind, move |_| h.set(h.get() + 1));
        (hits, guard)
    }

    #[test]
    fn starts_closed_and_hidden() {
        let (lc, surface) = controller();
        assert!(!lc.is_open());
        assert!(surface.hidden.get());
        assert_eq!(lc.return_value(), "");
    }

    #[test]
    fn show_twice_emits_once() {
        let (lc, surface) = controller();
        let (opens, _g) = count(lc.notifier(), NotificationKind::Open);

        assert!(lc.show());
        assert!(!lc.show());
        assert_eq!(opens.get(), 1);
        assert!(lc.is_open());
        assert!(!surface.hidden.get());
    }

    #[test]
    fn close_twice_emits_once() {
        let (lc, surface) = controller();
        let (closes, _g) = count(lc.notifier(), NotificationKind::Close);
        lc.show();

        assert!(lc.close());
        assert!(!lc.close());
        assert_eq!(closes.get(), 1);
        assert!(surface.hidden.get());
    }

    #[test]
    fn close_while_closed_is_silent() {
        let (lc, _surface) = controller();
        let (closes, _g) = count(lc.notifier(), NotificationKind::Close);
        assert!(!lc.close());
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn cancel_then_close_without_veto() {
        let (lc, _surface) = controller();
        let order = Rc::new(RefCell::new(Vec::new()));
        let o1 = Rc::clone(&order);
        let _c = lc
            .notifier()
            .on(NotificationKind::Cancel, move |n| o1.borrow_mut().push(n.kind()));
        let o2 = Rc::clone(&order);
        let _d = lc
            .notifier()
            .on(NotificationKind::Close, move |n| o2.borrow_mut().push(n.kind()));

        lc.show();
        assert!(lc.request_cancel_and_close());
        assert_eq!(
            *order.borrow(),
            vec![NotificationKind::Cancel, NotificationKind::Close]
        );
    }

    #[test]
    fn vetoed_cancel_keeps_open() {
        let (lc, _surface) = controller();
        let _veto = lc
            .notifier()
            .on(NotificationKind::Cancel, |n| n.prevent_default());
        let (closes, _g) = count(lc.notifier(), NotificationKind::Close);

        lc.show();
        assert!(!lc.request_cancel_and_close());
        assert!(lc.is_open());
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn cancel_request_while_closed_is_silent() {
        let (lc, _surface) = controller();
        let (cancels, _g) = count(lc.notifier(), NotificationKind::Cancel);
        assert!(!lc.request_cancel_and_close());
        assert_eq!(cancels.get(), 0);
    }

    #[test]
    fn dialog_submit_records_value_and_skips_cancel() {
        let (lc, _surface) = controller();
        let (cancels, _c) = count(lc.notifier(), NotificationKind::Cancel);
        let received = Rc::new(RefCell::new(None));
        let r = Rc::clone(&received);
        let _g = lc.notifier().on(NotificationKind::Close, move |n| {
            *r.borrow_mut() = n.return_value().map(str::to_owned);
        });

        lc.show();
        assert!(lc.submit_form(FormMethod::Dialog, Some("confirmed")));
        assert_eq!(received.borrow().as_deref(), Some("confirmed"));
        assert_eq!(cancels.get(), 0);
        assert_eq!(lc.return_value(), "confirmed");
    }

    #[test]
    fn submit_without_value_keeps_previous_return_value() {
        let (lc, _surface) = controller();
        lc.set_return_value("earlier");
        lc.show();
        assert!(lc.submit_form(FormMethod::Dialog, None));
        assert_eq!(lc.return_value(), "earlier");
    }

    #[test]
    fn non_dialog_submit_is_ignored() {
        let (lc, _surface) = controller();
        lc.show();
        assert!(!lc.submit_form(FormMethod::Post, Some("x")));
        assert!(lc.is_open());
        assert_eq!(lc.return_value(), "");
    }

    #[test]
    fn return_value_survives_reopen() {
        let (lc, _surface) = controller();
        lc.show();
        lc.submit_form(FormMethod::Dialog, Some("yes"));
        lc.show();
        assert_eq!(lc.return_value(), "yes");
    }

    #[test]
    fn listener_may_close_during_cancel() {
        let surface = Rc::new(VisibilitySurface::default());
        let lc = Rc::new(LifecycleController::new(surface));
        let (closes, _g) = count(lc.notifier(), NotificationKind::Close);
        let weak = Rc::downgrade(&lc);
        let _c = lc.notifier().on(NotificationKind::Cancel, move |_| {
            if let Some(lc) = weak.upgrade() {
                lc.close();
            }
        });

        lc.show();
        assert!(lc.request_cancel_and_close());
        assert!(!lc.is_open());
        assert_eq!(closes.get(), 1);
    }
}
