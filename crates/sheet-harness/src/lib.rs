#![forbid(unsafe_code)]

//! Headless host for driving sheets in tests.
//!
//! - [`HeadlessSurface`]: a [`SheetSurface`] that records what the sheet
//!   asked the host to show.
//! - [`NotificationLog`]: records `open` / `close` / `cancel` in order.
//! - [`Host`]: a sheet mounted on a private [`InputBus`], with helpers that
//!   route input the way a browser-like host would (targeted presses to the
//!   sheet, moves and releases to the window).
//!
//! Every helper emits a `trace` event under the `sheet::harness` target so
//! scenario failures can be replayed from captured logs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sheet_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, PointerEvent};
use sheet_core::event::{PointerEventKind, PointerType};
use sheet_core::input::InputBus;
use sheet_widgets::sheet::{
    Cursor, ListenerGuard, NotificationKind, Sheet, SheetAction, SheetConfig, SheetSurface,
    SheetTarget, SheetTransform,
};

/// Default content height of a [`HeadlessSurface`], in logical pixels.
pub const DEFAULT_HEIGHT: f32 = 400.0;

// ============================================================================
// Surface
// ============================================================================

/// Recording [`SheetSurface`] with adjustable measurements.
#[derive(Debug)]
pub struct HeadlessSurface {
    height: Cell<f32>,
    scale_down: Cell<f32>,
    hidden: Cell<bool>,
    resizing: Cell<bool>,
    cursor: Cell<Cursor>,
    transform: Cell<Option<SheetTransform>>,
    transforms_applied: Cell<usize>,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT)
    }
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(height: f32) -> Self {
        Self {
            height: Cell::new(height),
            scale_down: Cell::new(sheet_widgets::sheet::DEFAULT_SCALE_DOWN),
            hidden: Cell::new(false),
            resizing: Cell::new(false),
            cursor: Cell::new(Cursor::Auto),
            transform: Cell::new(None),
            transforms_applied: Cell::new(0),
        }
    }

    pub fn set_height(&self, height: f32) {
        self.height.set(height);
    }

    pub fn set_scale_down(&self, factor: f32) {
        self.scale_down.set(factor);
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        self.resizing.get()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor.get()
    }

    /// The inline drag transform currently applied, if any.
    #[must_use]
    pub fn transform(&self) -> Option<SheetTransform> {
        self.transform.get()
    }

    /// How many drag transforms were applied in total.
    #[must_use]
    pub fn transforms_applied(&self) -> usize {
        self.transforms_applied.get()
    }
}

impl SheetSurface for HeadlessSurface {
    fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    fn set_resizing(&self, resizing: bool) {
        self.resizing.set(resizing);
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.cursor.set(cursor);
    }

    fn apply_drag_transform(&self, transform: SheetTransform) {
        self.transform.set(Some(transform));
        self.transforms_applied.set(self.transforms_applied.get() + 1);
    }

    fn clear_drag_transform(&self) {
        self.transform.set(None);
    }

    fn height(&self) -> f32 {
        self.height.get()
    }

    fn scale_down_factor(&self) -> f32 {
        self.scale_down.get()
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub kind: NotificationKind,
    pub return_value: Option<String>,
}

/// Records every notification a sheet emits, in delivery order.
#[derive(Debug)]
pub struct NotificationLog {
    entries: Rc<RefCell<Vec<Received>>>,
    _guards: Vec<ListenerGuard>,
}

impl NotificationLog {
    /// Start recording notifications from `sheet`.
    #[must_use]
    pub fn attach(sheet: &Sheet) -> Self {
        let entries = Rc::new(RefCell::new(Vec::new()));
        let guards = [
            NotificationKind::Open,
            NotificationKind::Close,
            NotificationKind::Cancel,
        ]
        .into_iter()
        .map(|kind| {
            let entries = Rc::clone(&entries);
            sheet.on(kind, move |n| {
                entries.borrow_mut().push(Received {
                    kind: n.kind(),
                    return_value: n.return_value().map(str::to_owned),
                });
            })
        })
        .collect();
        Self {
            entries,
            _guards: guards,
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<Received> {
        self.entries.borrow().clone()
    }

    /// Kinds only, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.entries.borrow().iter().map(|r| r.kind).collect()
    }

    #[must_use]
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.entries.borrow().iter().filter(|r| r.kind == kind).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

// ============================================================================
// Events
// ============================================================================

#[must_use]
pub fn escape_down() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Escape))
}

#[must_use]
pub fn escape_up() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Release))
}

#[must_use]
pub fn mouse_down(button: MouseButton, y: f32) -> Event {
    Event::Pointer(PointerEvent::new(PointerEventKind::Down(button), 0.0, y))
}

#[must_use]
pub fn press(y: f32) -> Event {
    mouse_down(MouseButton::Left, y)
}

#[must_use]
pub fn move_to(y: f32) -> Event {
    Event::Pointer(PointerEvent::new(PointerEventKind::Move, 0.0, y))
}

#[must_use]
pub fn release(y: f32) -> Event {
    Event::Pointer(PointerEvent::new(
        PointerEventKind::Up(MouseButton::Left),
        0.0,
        y,
    ))
}

#[must_use]
pub fn pointer_cancel() -> Event {
    Event::Pointer(PointerEvent::new(PointerEventKind::Cancel, 0.0, 0.0))
}

/// A touch contact. `primary` is `false` for the second finger onward.
#[must_use]
pub fn touch(kind: PointerEventKind, y: f32, primary: bool) -> Event {
    Event::Pointer(
        PointerEvent::new(kind, 0.0, y)
            .with_pointer_type(PointerType::Touch)
            .with_primary(primary),
    )
}

// ============================================================================
// Host
// ============================================================================

/// A sheet mounted in a headless host.
#[derive(Debug)]
pub struct Host {
    pub sheet: Sheet,
    pub surface: Rc<HeadlessSurface>,
    pub bus: InputBus,
    pub log: NotificationLog,
}

impl Default for Host {
    fn default() -> Self {
        Self::new(SheetConfig::default())
    }
}

impl Host {
    /// Mount a new closed sheet with `config` on a private bus.
    #[must_use]
    pub fn new(config: SheetConfig) -> Self {
        let surface = Rc::new(HeadlessSurface::default());
        let sheet = Sheet::with_config(surface.clone(), config);
        let bus = InputBus::new();
        sheet.mount(&bus);
        let log = NotificationLog::attach(&sheet);
        Self {
            sheet,
            surface,
            bus,
            log,
        }
    }

    /// Like [`Host::new`], then open the sheet and forget the `open` entry.
    #[must_use]
    pub fn opened(config: SheetConfig) -> Self {
        let host = Self::new(config);
        host.sheet.show();
        host.log.clear();
        host
    }

    /// Deliver a targeted event to the sheet.
    pub fn targeted(&self, event: &Event, target: SheetTarget<'_>) -> Option<SheetAction> {
        tracing::trace!(target: "sheet::harness", ?event, ?target, "targeted");
        self.sheet.handle_event(event, target)
    }

    /// Deliver a window-level event through the bus.
    pub fn window(&self, event: &Event) {
        tracing::trace!(target: "sheet::harness", ?event, "window");
        self.bus.dispatch(event);
    }

    /// Press the handle at `from`, move through `path`, release at the last
    /// point (or at `from` when `path` is empty).
    pub fn drag(&self, from: f32, path: &[f32]) {
        self.targeted(&press(from), SheetTarget::Handle);
        for &y in path {
            self.window(&move_to(y));
        }
        let end = path.last().copied().unwrap_or(from);
        self.window(&release(end));
    }

    /// Drag the handle by a fraction of the sheet's height.
    ///
    /// `fraction` `0.25` ends at distance-open 75.
    pub fn drag_fraction(&self, fraction: f32) {
        let height = self.surface.height();
        self.drag(0.0, &[height * fraction]);
    }
}
