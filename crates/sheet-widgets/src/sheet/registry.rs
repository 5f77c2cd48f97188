#![forbid(unsafe_code)]

//! Custom tag registry.
//!
//! Hosts that expose the sheet as a markup element register it under a
//! custom tag name, optionally with per-tag default options, and create
//! instances from that tag later.
//!
//! Tag names follow the custom element naming rules in their ASCII subset:
//! a lowercase letter first, at least one hyphen, and only lowercase
//! letters, digits, `-`, `.` and `_`.

use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use super::config::SheetConfig;
use super::element::Sheet;
use super::surface::SheetSurface;

/// Errors from [`SheetRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The tag is already registered.
    DuplicateTag(String),
    /// The tag is not a valid custom tag name.
    InvalidTagName(String),
    /// No sheet is registered under the tag.
    UnknownTag(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag(tag) => write!(f, "tag '{tag}' is already defined"),
            Self::InvalidTagName(tag) => write!(f, "invalid custom tag name: '{tag}'"),
            Self::UnknownTag(tag) => write!(f, "no sheet defined for tag '{tag}'"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Whether `tag` is a valid custom tag name.
#[must_use]
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut bytes = tag.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && tag.contains('-')
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b"-._".contains(&b))
}

/// Tag name to default options.
#[derive(Debug, Clone, Default)]
pub struct SheetRegistry {
    tags: AHashMap<String, SheetConfig>,
}

impl SheetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tag` with default options for its instances.
    pub fn define(&mut self, tag: &str, config: SheetConfig) -> Result<(), RegistryError> {
        if !is_valid_tag_name(tag) {
            return Err(RegistryError::InvalidTagName(tag.to_owned()));
        }
        if self.tags.contains_key(tag) {
            return Err(RegistryError::DuplicateTag(tag.to_owned()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sheet::registry", tag, ?config, "define");

        self.tags.insert(tag.to_owned(), config);
        Ok(())
    }

    #[must_use]
    pub fn is_defined(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Default options registered for `tag`.
    #[must_use]
    pub fn config(&self, tag: &str) -> Option<SheetConfig> {
        self.tags.get(tag).copied()
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Create a closed sheet from the options registered for `tag`.
    pub fn create(
        &self,
        tag: &str,
        surface: Rc<dyn SheetSurface>,
    ) -> Result<Sheet, RegistryError> {
        let config = self
            .config(tag)
            .ok_or_else(|| RegistryError::UnknownTag(tag.to_owned()))?;
        Ok(Sheet::with_config(surface, config))
    }
}
