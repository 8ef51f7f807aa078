//! In-memory display server for tests and benchmarks.
//!
//! Requests are recorded and applied to the fake window table so later
//! geometry queries see them, the way a real server would.

use indexmap::IndexMap;

use crate::display::{Display, DisplayError, Pointer, WindowAttributes};
use crate::event::CoreAction;
use crate::geometry::Geometry;
use crate::window::WindowId;

#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub class: Option<String>,
    pub geometry: Geometry,
    pub border_width: u32,
    pub transient_for: Option<WindowId>,
    pub dialog: bool,
    pub override_redirect: bool,
    pub viewable: bool,
}

#[derive(Debug, Clone)]
pub struct FakeDisplay {
    pub screens: Vec<Geometry>,
    /// Top-level windows in stacking order.
    pub windows: IndexMap<WindowId, FakeWindow>,
    pub pointer: Pointer,
    pub requests: Vec<CoreAction>,
    pub flushes: usize,
}

impl FakeDisplay {
    pub fn new(screens: Vec<Geometry>) -> Self {
        Self {
            screens,
            windows: IndexMap::new(),
            pointer: Pointer {
                x: 0,
                y: 0,
                child: None,
            },
            requests: Vec::new(),
            flushes: 0,
        }
    }

    /// A single 1920x1080 screen.
    pub fn single() -> Self {
        Self::new(vec![Geometry::new(0, 0, 1920, 1080)])
    }

    /// Two 1920x1080 screens side by side.
    pub fn dual() -> Self {
        Self::new(vec![
            Geometry::new(0, 0, 1920, 1080),
            Geometry::new(1920, 0, 1920, 1080),
        ])
    }

    /// Create an unmapped client window with the given class.
    pub fn create_window(&mut self, id: WindowId, class: &str) -> &mut FakeWindow {
        self.windows.entry(id).or_insert_with(|| FakeWindow {
            class: Some(class.to_owned()),
            geometry: Geometry::new(0, 0, 640, 480),
            ..FakeWindow::default()
        })
    }

    pub fn destroy_window(&mut self, id: WindowId) {
        self.windows.shift_remove(&id);
    }

    /// Put the pointer at `(x, y)` over `child`.
    pub fn move_pointer(&mut self, x: i32, y: i32, child: Option<WindowId>) {
        self.pointer = Pointer { x, y, child };
    }

    pub fn take_requests(&mut self) -> Vec<CoreAction> {
        std::mem::take(&mut self.requests)
    }

    pub fn geometry_of(&self, id: WindowId) -> Option<Geometry> {
        self.windows.get(&id).map(|w| w.geometry)
    }

    fn window(&self, id: WindowId) -> Result<&FakeWindow, DisplayError> {
        self.windows.get(&id).ok_or(DisplayError::NoSuchWindow(id))
    }

    fn apply(&mut self, action: &CoreAction) {
        let Some(id) = action.window() else {
            return;
        };
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        match action {
            CoreAction::MapWindow { .. } => window.viewable = true,
            CoreAction::Configure { geometry, .. } => window.geometry = *geometry,
            CoreAction::Move { x, y, .. } => {
                window.geometry.x = *x;
                window.geometry.y = *y;
            }
            CoreAction::ApplyConfigure { changes, .. } => changes.apply_to(&mut window.geometry),
            CoreAction::SetBorderWidth { width, .. } => window.border_width = *width,
            _ => {}
        }
    }
}

impl Display for FakeDisplay {
    fn screens(&mut self) -> Result<Vec<Geometry>, DisplayError> {
        Ok(self.screens.clone())
    }

    fn top_level_windows(&mut self) -> Result<Vec<WindowId>, DisplayError> {
        Ok(self.windows.keys().copied().collect())
    }

    fn window_attributes(&mut self, id: WindowId) -> Result<WindowAttributes, DisplayError> {
        let window = self.window(id)?;
        Ok(WindowAttributes {
            override_redirect: window.override_redirect,
            viewable: window.viewable,
        })
    }

    fn window_geometry(&mut self, id: WindowId) -> Result<Geometry, DisplayError> {
        Ok(self.window(id)?.geometry)
    }

    fn window_class(&mut self, id: WindowId) -> Result<Option<String>, DisplayError> {
        Ok(self.window(id)?.class.clone())
    }

    fn transient_for(&mut self, id: WindowId) -> Result<Option<WindowId>, DisplayError> {
        Ok(self.window(id)?.transient_for)
    }

    fn is_dialog(&mut self, id: WindowId) -> Result<bool, DisplayError> {
        Ok(self.window(id)?.dialog)
    }

    fn query_pointer(&mut self) -> Result<Pointer, DisplayError> {
        Ok(self.pointer)
    }

    fn request(&mut self, action: CoreAction) {
        self.apply(&action);
        self.requests.push(action);
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
