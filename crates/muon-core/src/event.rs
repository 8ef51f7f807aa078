//! Protocol-agnostic events and actions.
//!
//! [`CoreEvent`] represents what the display server tells core.
//! [`CoreAction`] represents what core asks the display server to do.

use crate::geometry::Geometry;
use crate::window::WindowId;

/// Notifications the display adapter feeds to the core.
///
/// Adapters translate protocol events (X11 `MapRequest`, `ClientMessage`,
/// etc.) into these variants. Events for windows core does not manage are
/// dropped by core, so adapters need not filter them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A client asked for its top-level window to be shown.
    MapRequest { id: WindowId },

    /// A window became visible.
    MapNotify { id: WindowId },

    /// A window was hidden.
    UnmapNotify { id: WindowId },

    /// A window was destroyed.
    DestroyNotify { id: WindowId },

    /// A window's geometry changed.
    ConfigureNotify { id: WindowId },

    /// A client asked to move or resize its window.
    ConfigureRequest {
        id: WindowId,
        changes: ConfigureChanges,
    },

    /// A client asked to change its window state (`_NET_WM_STATE`).
    StateRequest {
        id: WindowId,
        action: StateAction,
        states: [Option<WmState>; 2],
    },
}

/// Fields present in a partial configure request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ConfigureChanges {
    /// Overlay the present fields onto `geometry`.
    pub fn apply_to(&self, geometry: &mut Geometry) {
        if let Some(x) = self.x {
            geometry.x = x;
        }
        if let Some(y) = self.y {
            geometry.y = y;
        }
        if let Some(width) = self.width {
            geometry.width = width;
        }
        if let Some(height) = self.height {
            geometry.height = height;
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none()
    }
}

/// `_NET_WM_STATE` client message action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Remove,
    Add,
    Toggle,
}

impl StateAction {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Remove),
            1 => Some(Self::Add),
            2 => Some(Self::Toggle),
            _ => None,
        }
    }
}

/// Window states a client may request. Only fullscreen has an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    Fullscreen,
    Modal,
    Sticky,
    MaximizedVert,
    MaximizedHorz,
    Shaded,
    SkipTaskbar,
    SkipPager,
    Hidden,
    Above,
    Below,
    DemandsAttention,
}

/// Requests core sends to the display server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAction {
    /// Show a window.
    MapWindow { id: WindowId },

    /// Move and resize a window.
    Configure { id: WindowId, geometry: Geometry },

    /// Move a window, keeping its size.
    Move { id: WindowId, x: i32, y: i32 },

    /// Forward the present fields of a client's configure request.
    ApplyConfigure {
        id: WindowId,
        changes: ConfigureChanges,
    },

    SetBorderWidth { id: WindowId, width: u32 },

    /// Paint the border in the active or inactive colour.
    SetBorderColor { id: WindowId, focused: bool },

    Raise { id: WindowId },

    Lower { id: WindowId },

    /// Give input focus to a window, or to the root window for `None`.
    SetInputFocus { id: Option<WindowId> },

    /// Tell a client its authoritative geometry without changing it.
    NotifyGeometry {
        id: WindowId,
        geometry: Geometry,
        border_width: u32,
    },

    /// Politely ask a client to close its window.
    RequestClose { id: WindowId },

    /// Publish the active window (`_NET_ACTIVE_WINDOW`).
    SetActiveWindow { id: WindowId },

    /// Publish every managed window (`_NET_CLIENT_LIST`).
    SetClientList { ids: Vec<WindowId> },

    /// Publish a window's fullscreen state (`_NET_WM_STATE`).
    SetFullscreenState { id: WindowId, fullscreen: bool },
}

impl CoreAction {
    /// The window a request targets, if any.
    pub const fn window(&self) -> Option<WindowId> {
        match self {
            Self::MapWindow { id }
            | Self::Configure { id, .. }
            | Self::Move { id, .. }
            | Self::ApplyConfigure { id, .. }
            | Self::SetBorderWidth { id, .. }
            | Self::SetBorderColor { id, .. }
            | Self::Raise { id }
            | Self::Lower { id }
            | Self::NotifyGeometry { id, .. }
            | Self::RequestClose { id }
            | Self::SetActiveWindow { id }
            | Self::SetFullscreenState { id, .. } => Some(*id),
            Self::SetInputFocus { id } => *id,
            Self::SetClientList { .. } => None,
        }
    }
}
