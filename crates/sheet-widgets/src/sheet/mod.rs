#![forbid(unsafe_code)]

//! Sheet component.
//!
//! # Layers
//!
//! | Module | Role |
//! |--------|------|
//! | `config` | Behavior options ([`SheetConfig`]) |
//! | `surface` | Host rendering capabilities ([`SheetSurface`]) |
//! | `notify` | `open` / `close` / `cancel` notifications with veto |
//! | `lifecycle` | Open state, return value, form submission |
//! | `drag` | Handle drag tracking and the dismissal decision |
//! | `element` | [`Sheet`]: ties the above to host input and the input bus |
//! | `registry` | Custom tag names to default options |
//!
//! # Failure Modes
//!
//! - A surface reporting zero or non-finite height freezes a drag at fully
//!   open; the release then restores.
//! - Listeners that panic unwind through the emitting call. Sheet state was
//!   already updated, so the sheet stays consistent.

mod config;
mod drag;
mod element;
mod lifecycle;
mod notify;
mod registry;
mod surface;
#[cfg(test)]
mod testing;

pub use config::SheetConfig;
pub use drag::{
    DISMISS_THRESHOLD_PERCENT, DragOutcome, DragRelease, DragSession, DragState, DragTracker,
    distance_open, drag_transform,
};
pub use element::{Sheet, SheetAction, SheetId, SheetTarget, WeakSheet};
pub use lifecycle::{FormMethod, LifecycleController};
pub use notify::{ListenerGuard, Notification, NotificationKind, Notifier};
pub use registry::{RegistryError, SheetRegistry, is_valid_tag_name};
pub use surface::{Cursor, DEFAULT_SCALE_DOWN, SheetSurface, SheetTransform};
