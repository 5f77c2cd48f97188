#![forbid(unsafe_code)]

//! Modal sheet widget.
//!
//! A sheet is a modal panel that sits at the bottom of narrow viewports and
//! centers like a dialog on wide ones. This crate owns its behavior; drawing
//! is left to the host, which implements [`sheet::SheetSurface`].

pub mod sheet;

pub use sheet::{
    Cursor, DragOutcome, DragRelease, FormMethod, ListenerGuard, Notification, NotificationKind,
    RegistryError, Sheet, SheetAction, SheetConfig, SheetId, SheetRegistry, SheetSurface,
    SheetTarget, SheetTransform, WeakSheet,
};
