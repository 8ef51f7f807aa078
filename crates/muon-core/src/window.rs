//! Window management types.
//!
//! Protocol-agnostic window representation. The id is the display server's
//! own handle, treated as opaque.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::monitor::MonitorId;

/// Longest class name kept for rule matching, in bytes.
pub const MAX_NAME_LEN: usize = 255;

/// Identifier of a top-level window, as handed out by the display server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl std::str::FromStr for WindowId {
    type Err = std::num::ParseIntError;

    /// Parses a hexadecimal id, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u32::from_str_radix(digits, 16).map(Self)
    }
}

bitflags! {
    /// Window state flags. Floating and fullscreen are independent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowState: u8 {
        const FLOATING   = 0b01;
        const FULLSCREEN = 0b10;
    }
}

/// A managed window.
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WindowId,
    /// Class name used for rule matching. May be empty.
    pub name: String,
    /// Last assigned (tiled) or stored (floating) rectangle.
    pub geometry: Geometry,
    pub monitor: MonitorId,
    pub state: WindowState,
    /// Window this one is a dialog for. Set once at creation.
    pub transient: Option<WindowId>,
}

impl Window {
    pub fn new(id: WindowId, name: &str, monitor: MonitorId) -> Self {
        Self {
            id,
            name: truncate_name(name).to_owned(),
            geometry: Geometry::default(),
            monitor,
            state: WindowState::empty(),
            transient: None,
        }
    }

    pub const fn is_floating(&self) -> bool {
        self.state.contains(WindowState::FLOATING)
    }

    pub const fn is_fullscreen(&self) -> bool {
        self.state.contains(WindowState::FULLSCREEN)
    }

    /// Whether the tiling engine places this window.
    pub const fn is_tiled(&self) -> bool {
        !self.is_floating()
    }
}

fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
