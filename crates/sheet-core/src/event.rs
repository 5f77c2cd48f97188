#![forbid(unsafe_code)]

//! Host-agnostic input events.
//!
//! Hosts translate their native input (DOM events, winit events, terminal
//! sequences) into these types before handing them to a sheet or to the
//! [`InputBus`](crate::input::InputBus).
//!
//! Pointer coordinates are logical pixels as `f32`. Only the vertical
//! coordinate matters to the sheet, but both are carried so a single event
//! type serves every consumer of the bus.

use bitflags::bitflags;

/// A single input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Mouse, touch, or pen input.
    Pointer(PointerEvent),
}

impl Event {
    /// Returns the pointer payload, if this is a pointer event.
    #[must_use]
    pub const fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(pointer) => Some(pointer),
            Self::Key(_) => None,
        }
    }

    /// Returns the key payload, if this is a key event.
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            Self::Pointer(_) => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        Self::Key(key)
    }
}

impl From<PointerEvent> for Event {
    fn from(pointer: PointerEvent) -> Self {
        Self::Pointer(pointer)
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// Whether the key went down, repeated, or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Keyboard modifiers held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is the key-up half of a keystroke.
    #[inline]
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.kind, KeyEventKind::Release)
    }
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Source device of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Pointer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Contact started (mouse button down, finger down).
    Down(MouseButton),
    /// Pointer moved, with or without contact.
    Move,
    /// Contact ended.
    Up(MouseButton),
    /// The platform took the pointer away (touch cancel, capture lost).
    Cancel,
}

/// A pointer event in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
    pub pointer_type: PointerType,
    /// Whether this is the primary contact of a multi-touch sequence.
    pub is_primary: bool,
}

impl PointerEvent {
    /// Create a primary mouse event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            pointer_type: PointerType::Mouse,
            is_primary: true,
        }
    }

    /// Set the pointer device type.
    #[must_use]
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Mark the contact as primary or secondary.
    #[must_use]
    pub const fn with_primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    /// Whether this is a primary press: the kind of contact that activates
    /// controls and starts drags.
    ///
    /// Mice must press the left button; touch and pen must be the primary
    /// contact.
    #[must_use]
    pub const fn is_primary_press(&self) -> bool {
        match (self.kind, self.pointer_type) {
            (PointerEventKind::Down(MouseButton::Left), PointerType::Mouse) => true,
            (PointerEventKind::Down(_), PointerType::Mouse) => false,
            (PointerEventKind::Down(_), _) => self.is_primary,
            _ => false,
        }
    }

    /// Whether this ends a primary press: left button up for mice, the
    /// primary contact lifting for touch and pen.
    #[must_use]
    pub const fn is_primary_release(&self) -> bool {
        match (self.kind, self.pointer_type) {
            (PointerEventKind::Up(MouseButton::Left), PointerType::Mouse) => true,
            (PointerEventKind::Up(_), PointerType::Mouse) => false,
            (PointerEventKind::Up(_), _) => self.is_primary,
            _ => false,
        }
    }
}
