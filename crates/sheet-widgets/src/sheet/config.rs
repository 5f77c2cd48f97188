#![forbid(unsafe_code)]

//! Sheet behavior options.
//!
//! Every option is a plain boolean. Hosts that mirror options as markup
//! attributes (`close-on-backdrop-click`, ...) own that encoding; with the
//! `serde` feature the struct (de)serializes under those same kebab-case
//! names, and missing fields take their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sheet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct SheetConfig {
    /// A press on the backdrop requests a cancelable close.
    pub close_on_backdrop_click: bool,
    /// Releasing Escape requests a cancelable close, unless focus is in an
    /// editable control inside the sheet.
    pub close_on_escape_key: bool,
    /// Dragging the handle below the dismissal threshold requests a
    /// cancelable close.
    pub close_on_dragging_down: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            close_on_backdrop_click: true,
            close_on_escape_key: true,
            close_on_dragging_down: true,
        }
    }
}

impl SheetConfig {
    /// A config with every dismissal gesture disabled.
    ///
    /// The sheet can then only be closed programmatically or by form
    /// submission.
    #[must_use]
    pub const fn persistent() -> Self {
        Self {
            close_on_backdrop_click: false,
            close_on_escape_key: false,
            close_on_dragging_down: false,
        }
    }

    #[must_use]
    pub fn close_on_backdrop_click(mut self, close: bool) -> Self {
        self.close_on_backdrop_click = close;
        self
    }

    #[must_use]
    pub fn close_on_escape_key(mut self, close: bool) -> Self {
        self.close_on_escape_key = close;
        self
    }

    #[must_use]
    pub fn close_on_dragging_down(mut self, close: bool) -> Self {
        self.close_on_dragging_down = close;
        self
    }
}
