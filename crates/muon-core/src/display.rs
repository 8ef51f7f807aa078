//! The seam between core and a display server.

use crate::event::CoreAction;
use crate::geometry::Geometry;
use crate::window::WindowId;

/// A failed round trip to the display server.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Window {0} does not exist")]
    NoSuchWindow(WindowId),

    #[error("Display request failed: {0}")]
    Request(String),

    #[error("Display connection lost: {0}")]
    Connection(String),
}

/// Attributes that decide whether a top-level window gets managed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowAttributes {
    pub override_redirect: bool,
    pub viewable: bool,
}

/// Result of a pointer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub x: i32,
    pub y: i32,
    /// Top-level window under the pointer, if any.
    pub child: Option<WindowId>,
}

/// Everything core needs from a display server.
///
/// Queries are synchronous round trips. Requests are buffered until
/// [`flush`](Display::flush).
pub trait Display {
    /// Output rectangles, or one rectangle covering the whole screen.
    fn screens(&mut self) -> Result<Vec<Geometry>, DisplayError>;

    /// Children of the root window, bottom to top.
    fn top_level_windows(&mut self) -> Result<Vec<WindowId>, DisplayError>;

    fn window_attributes(&mut self, id: WindowId) -> Result<WindowAttributes, DisplayError>;

    /// Current on-screen geometry, border excluded from the size.
    fn window_geometry(&mut self, id: WindowId) -> Result<Geometry, DisplayError>;

    /// The class part of `WM_CLASS`.
    fn window_class(&mut self, id: WindowId) -> Result<Option<String>, DisplayError>;

    fn transient_for(&mut self, id: WindowId) -> Result<Option<WindowId>, DisplayError>;

    /// Whether the window type hint names a dialog.
    fn is_dialog(&mut self, id: WindowId) -> Result<bool, DisplayError>;

    fn query_pointer(&mut self) -> Result<Pointer, DisplayError>;

    /// Buffer one request.
    fn request(&mut self, action: CoreAction);

    /// Send buffered requests.
    fn flush(&mut self);
}
