//! Reaction to display-server notifications.

use tracing::{debug, info, warn};

use crate::display::Display;
use crate::event::{ConfigureChanges, CoreAction, CoreEvent, StateAction, WmState};
use crate::window::WindowId;
use crate::Core;

impl<D: Display> Core<D> {
    pub(crate) fn reconcile(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::MapRequest { id } => self.on_map_request(id),
            CoreEvent::MapNotify { id } => {
                if let Some(window) = self.state.registry.window(id) {
                    debug!("map-notify {} `{}`", id, window.name);
                }
            }
            CoreEvent::UnmapNotify { id } | CoreEvent::DestroyNotify { id } => {
                if !self.state.registry.contains_window(id) {
                    return;
                }
                debug!("{:?}", event);
                self.remove_window(id);
                self.flush();
            }
            CoreEvent::ConfigureNotify { id } => {
                if self.state.is_dragging(id) {
                    return;
                }
                if let Some(window) = self.state.registry.window(id) {
                    debug!("configure-notify {} `{}`", id, window.name);
                }
            }
            CoreEvent::ConfigureRequest { id, changes } => self.on_configure_request(id, changes),
            CoreEvent::StateRequest { id, action, states } => {
                if !self.state.registry.contains_window(id) {
                    return;
                }
                for state in states.into_iter().flatten() {
                    self.on_state_request(id, action, state);
                }
                self.flush();
            }
        }
    }

    fn on_map_request(&mut self, id: WindowId) {
        match self.display.window_attributes(id) {
            Ok(attributes) if attributes.override_redirect => {
                debug!("Ignoring window {}: override-redirect", id);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read attributes of {}: {}", id, e);
                return;
            }
        }
        if self.state.registry.contains_window(id) {
            debug!("Ignoring window {}: already managed", id);
            return;
        }
        let Some(monitor_id) = self.state.registry.current_monitor_id() else {
            return;
        };

        if !self.add_window(monitor_id, id) {
            return;
        }
        self.display.request(CoreAction::MapWindow { id });

        if self.state.registry.window(id).is_some_and(|w| w.is_tiled()) {
            self.arrange(monitor_id);
        }
        self.focus(Some(id));
        self.flush();
    }

    fn on_configure_request(&mut self, id: WindowId, changes: ConfigureChanges) {
        if self.state.is_dragging(id) {
            debug!("Ignoring configure-request for grabbed window {}", id);
            return;
        }
        let Some(window) = self.state.registry.window_mut(id) else {
            return;
        };
        debug!("configure-request {} `{}`: {:?}", id, window.name, changes);

        let monitor_id = window.monitor;
        if window.is_fullscreen() {
            let Some(monitor) = self.state.registry.monitor(monitor_id) else {
                return;
            };
            let geometry = monitor.geometry;
            self.display.request(CoreAction::NotifyGeometry {
                id,
                geometry,
                border_width: 0,
            });
        } else if window.is_floating() {
            changes.apply_to(&mut window.geometry);
            self.display.request(CoreAction::ApplyConfigure { id, changes });
        } else {
            let geometry = window.geometry;
            let Some(monitor) = self.state.registry.monitor(monitor_id) else {
                return;
            };
            let border_width = monitor.border_width;
            self.display.request(CoreAction::NotifyGeometry {
                id,
                geometry,
                border_width,
            });
        }
        self.flush();
    }

    fn on_state_request(&mut self, id: WindowId, action: StateAction, state: WmState) {
        if state != WmState::Fullscreen {
            debug!("Window {} state request {:?} {:?} ignored", id, action, state);
            return;
        }
        let Some(fullscreen) = self.state.registry.window(id).map(|w| w.is_fullscreen()) else {
            return;
        };

        let flip = match action {
            StateAction::Toggle => true,
            StateAction::Remove => fullscreen,
            StateAction::Add => !fullscreen,
        };
        if flip {
            info!("Window {} fullscreen request: {:?}", id, action);
            self.toggle_fullscreen(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDisplay;
    use crate::geometry::Geometry;
    use pretty_assertions::assert_eq;

    fn core_with(ids: &[u32]) -> Core<FakeDisplay> {
        let mut core = Core::new(FakeDisplay::single());
        core.start().unwrap();
        for &raw in ids {
            let id = WindowId(raw);
            core.display_mut().create_window(id, "xterm");
            core.handle_event(CoreEvent::MapRequest { id });
        }
        core.display_mut().take_requests();
        core
    }

    #[test]
    fn test_map_request_manages_and_focuses() {
        let mut core = core_with(&[]);
        let id = WindowId(0x10);
        core.display_mut().create_window(id, "xterm");
        core.handle_event(CoreEvent::MapRequest { id });

        assert!(core.state.registry.contains_window(id));
        assert_eq!(core.state.registry.current_monitor().unwrap().curwin, Some(id));
        let requests = core.display_mut().take_requests();
        assert!(requests.contains(&CoreAction::MapWindow { id }));
        assert!(requests.contains(&CoreAction::Configure {
            id,
            geometry: Geometry::new(0, 0, 1920, 1080),
        }));
    }

    #[test]
    fn test_map_request_ignores_override_redirect() {
        let mut core = core_with(&[]);
        let id = WindowId(0x10);
        core.display_mut().create_window(id, "menu").override_redirect = true;
        core.handle_event(CoreEvent::MapRequest { id });

        assert!(!core.state.registry.contains_window(id));
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_map_request_twice_is_ignored() {
        let mut core = core_with(&[0x10]);
        core.handle_event(CoreEvent::MapRequest { id: WindowId(0x10) });
        assert_eq!(core.state.registry.windows.len(), 1);
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_unmap_removes_window() {
        let mut core = core_with(&[0x10, 0x11]);
        core.handle_event(CoreEvent::UnmapNotify { id: WindowId(0x11) });

        assert!(!core.state.registry.contains_window(WindowId(0x11)));
        assert_eq!(
            core.state.registry.current_monitor().unwrap().curwin,
            Some(WindowId(0x10))
        );
    }

    #[test]
    fn test_destroy_of_unknown_window_is_ignored() {
        let mut core = core_with(&[0x10]);
        core.handle_event(CoreEvent::DestroyNotify { id: WindowId(0x99) });
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_configure_request_tiled_gets_stored_geometry() {
        let mut core = core_with(&[0x10]);
        let id = WindowId(0x10);
        core.handle_event(CoreEvent::ConfigureRequest {
            id,
            changes: ConfigureChanges {
                width: Some(100),
                ..ConfigureChanges::default()
            },
        });

        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::NotifyGeometry {
                id,
                geometry: Geometry::new(0, 0, 1920, 1080),
                border_width: 5,
            }]
        );
    }

    #[test]
    fn test_configure_request_floating_is_honoured() {
        let mut core = core_with(&[0x10]);
        let id = WindowId(0x10);
        core.exec(crate::Command::ToggleFloating);
        core.display_mut().take_requests();

        let changes = ConfigureChanges {
            x: Some(40),
            height: Some(300),
            ..ConfigureChanges::default()
        };
        core.handle_event(CoreEvent::ConfigureRequest { id, changes });

        let window = core.state.registry.window(id).unwrap();
        assert_eq!(window.geometry.x, 40);
        assert_eq!(window.geometry.height, 300);
        assert_eq!(window.geometry.width, 1920);
        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::ApplyConfigure { id, changes }]
        );
    }

    #[test]
    fn test_state_request_fullscreen_add_and_remove() {
        let mut core = core_with(&[0x10, 0x11]);
        let id = WindowId(0x10);
        let request = |action| CoreEvent::StateRequest {
            id,
            action,
            states: [Some(WmState::Fullscreen), None],
        };

        core.handle_event(request(StateAction::Add));
        assert!(core.state.registry.window(id).unwrap().is_fullscreen());

        // Adding again is a no-op
        core.handle_event(request(StateAction::Add));
        assert!(core.state.registry.window(id).unwrap().is_fullscreen());

        core.handle_event(request(StateAction::Remove));
        assert!(!core.state.registry.window(id).unwrap().is_fullscreen());
        assert_eq!(core.state.registry.current_monitor().unwrap().fullscreen, None);
    }

    #[test]
    fn test_state_request_other_states_ignored() {
        let mut core = core_with(&[0x10]);
        core.handle_event(CoreEvent::StateRequest {
            id: WindowId(0x10),
            action: StateAction::Toggle,
            states: [Some(WmState::Above), Some(WmState::Sticky)],
        });
        assert!(!core.state.registry.window(WindowId(0x10)).unwrap().is_fullscreen());
    }
}
