//! Core window-manager state.

use indexmap::IndexSet;

use crate::geometry::Geometry;
use crate::monitor::MonitorId;
use crate::registry::Registry;
use crate::window::WindowId;

/// What an interactive pointer grab does to its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabAction {
    Move,
    Resize,
}

impl std::str::FromStr for GrabAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "move" => Ok(Self::Move),
            "resize" => Ok(Self::Resize),
            _ => Err(()),
        }
    }
}

/// State for an interactive pointer drag, from grab to ungrab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub window: WindowId,
    pub action: GrabAction,
    /// Pointer position at grab time.
    pub pointer: (i32, i32),
    /// Window geometry at grab time.
    pub geometry: Geometry,
}

impl DragSession {
    /// Geometry the window should take with the pointer at `(x, y)`: the
    /// grab-time geometry shifted by the pointer's travel since the grab.
    pub fn track(&self, x: i32, y: i32) -> Geometry {
        let dx = x.saturating_sub(self.pointer.0);
        let dy = y.saturating_sub(self.pointer.1);
        Geometry {
            x: self.geometry.x.saturating_add(dx),
            y: self.geometry.y.saturating_add(dy),
            ..self.geometry
        }
    }
}

/// Monitors whose arrangement was deferred by an open `begin`/`end` batch.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub pending: IndexSet<MonitorId>,
}

/// The central window-manager state.
#[derive(Debug)]
pub struct State {
    pub registry: Registry,
    pub drag: Option<DragSession>,
    pub batch: Option<Batch>,
    pub running: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            drag: None,
            batch: None,
            running: true,
        }
    }

    pub const fn in_batch(&self) -> bool {
        self.batch.is_some()
    }

    /// Whether a drag session currently holds `id`.
    pub fn is_dragging(&self, id: WindowId) -> bool {
        self.drag.is_some_and(|d| d.window == id)
    }

    /// Validate core invariants. See `invariants` module.
    pub fn validate_invariants(&self) -> Result<(), crate::invariants::InvariantError> {
        crate::invariants::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(action: GrabAction) -> DragSession {
        DragSession {
            window: WindowId(1),
            action,
            pointer: (100, 100),
            geometry: Geometry::new(50, 60, 300, 200),
        }
    }

    #[test]
    fn test_track_move_applies_delta() {
        let drag = session(GrabAction::Move);
        assert_eq!(drag.track(130, 90), Geometry::new(80, 50, 300, 200));
    }

    #[test]
    fn test_track_resize_grab_still_moves() {
        let drag = session(GrabAction::Resize);
        assert_eq!(drag.track(150, 120), Geometry::new(100, 80, 300, 200));
    }

    #[test]
    fn test_track_saturates_at_extremes() {
        let mut drag = session(GrabAction::Move);
        drag.pointer = (-100, 10);
        let geometry = drag.track(i32::MAX, 10);
        assert_eq!(geometry.x, i32::MAX);
        assert_eq!(geometry.y, 60);

        let geometry = session(GrabAction::Move).track(i32::MIN, i32::MIN);
        assert_eq!((geometry.x, geometry.y), (i32::MIN, i32::MIN));
    }

    #[test]
    fn test_new_state_is_running() {
        let state = State::new();
        assert!(state.running);
        assert!(!state.in_batch());
        assert!(!state.is_dragging(WindowId(1)));
        assert!(state.validate_invariants().is_ok());
    }
}
