#![forbid(unsafe_code)]

//! Host rendering surface.
//!
//! The sheet never draws. It tells the host what to show through
//! [`SheetSurface`], and asks it for the two measurements a drag needs: the
//! rendered height and the scale-down factor from the host's styling.
//!
//! Methods take `&self`: host surfaces are handles (a DOM element, a retained
//! scene node) with their own interior mutability.

/// Scale applied to a fully dragged-down sheet when the host has no styling
/// opinion.
pub const DEFAULT_SCALE_DOWN: f32 = 0.95;

/// Pointer cursor affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Whatever the host shows by default.
    #[default]
    Auto,
    /// Direct manipulation in progress.
    Grabbing,
}

/// Inline transform applied while the handle is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetTransform {
    /// Vertical translation as a percentage of the sheet's own height.
    /// `0.0` is the resting open position, `100.0` is fully off-screen.
    pub translate_y_percent: f32,
    /// Uniform scale in `[scale_down, 1.0]`.
    pub scale: f32,
}

impl SheetTransform {
    /// The untransformed, fully open position.
    pub const IDENTITY: Self = Self {
        translate_y_percent: 0.0,
        scale: 1.0,
    };
}

/// Capabilities a host must provide to present a sheet.
pub trait SheetSurface {
    /// Show or hide the whole sheet, backdrop included.
    fn set_hidden(&self, hidden: bool);

    /// Mark the sheet as being resized: text selection off, resize styling on.
    fn set_resizing(&self, resizing: bool);

    /// Change the pointer cursor.
    fn set_cursor(&self, cursor: Cursor);

    /// Apply a drag transform with transitions disabled, so the sheet tracks
    /// the pointer without lag.
    fn apply_drag_transform(&self, transform: SheetTransform);

    /// Remove any inline transform and transition override so the host's
    /// own transitions govern position again.
    fn clear_drag_transform(&self);

    /// Rendered height of the sheet content in logical pixels.
    fn height(&self) -> f32;

    /// Scale of a fully dragged-down sheet, read from the host's styling.
    fn scale_down_factor(&self) -> f32 {
        DEFAULT_SCALE_DOWN
    }
}
