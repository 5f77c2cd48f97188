#![forbid(unsafe_code)]

//! Recording surface for unit tests.

use std::cell::Cell;

use super::surface::{Cursor, DEFAULT_SCALE_DOWN, SheetSurface, SheetTransform};

pub(crate) struct RecordingSurface {
    height: Cell<f32>,
    scale_down: f32,
    hidden: Cell<bool>,
    resizing: Cell<bool>,
    cursor: Cell<Cursor>,
    transform: Cell<Option<SheetTransform>>,
    restores: Cell<u32>,
}

impl RecordingSurface {
    pub(crate) fn new(height: f32) -> Self {
        Self {
            height: Cell::new(height),
            scale_down: DEFAULT_SCALE_DOWN,
            hidden: Cell::new(false),
            resizing: Cell::new(false),
            cursor: Cell::new(Cursor::Auto),
            transform: Cell::new(None),
            restores: Cell::new(0),
        }
    }

    pub(crate) fn with_scale_down(mut self, factor: f32) -> Self {
        self.scale_down = factor;
        self
    }

    pub(crate) fn set_height(&self, height: f32) {
        self.height.set(height);
    }

    pub(crate) fn hidden(&self) -> bool {
        self.hidden.get()
    }

    pub(crate) fn resizing(&self) -> bool {
        self.resizing.get()
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor.get()
    }

    pub(crate) fn transform(&self) -> Option<SheetTransform> {
        self.transform.get()
    }

    pub(crate) fn restore_count(&self) -> u32 {
        self.restores.get()
    }
}

impl SheetSurface for RecordingSurface {
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
    }

    fn clear_drag_transform(&self) {
        self.transform.set(None);
        self.restores.set(self.restores.get() + 1);
    }

    fn height(&self) -> f32 {
        self.height.get()
    }

    fn scale_down_factor(&self) -> f32 {
        self.scale_down
    }
}
