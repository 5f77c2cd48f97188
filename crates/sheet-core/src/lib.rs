#![forbid(unsafe_code)]

//! Input vocabulary and ambient input plumbing for the sheet widget.
//!
//! - [`event`]: host-agnostic key and pointer events.
//! - [`input`]: the shared [`InputBus`](input::InputBus) that mounted
//!   components subscribe to for window-level move/release tracking.

pub mod event;
pub mod input;

pub use event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, PointerEvent,
    PointerEventKind, PointerType,
};
pub use input::{InputBus, InputSubscription};
