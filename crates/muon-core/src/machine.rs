//! Window lifecycle, focus, floating and fullscreen transitions.

use tracing::{debug, info, warn};

use crate::display::Display;
use crate::event::CoreAction;
use crate::monitor::MonitorId;
use crate::tiling;
use crate::window::{Window, WindowId, WindowState};
use crate::Core;

impl<D: Display> Core<D> {
    // ── Tiling ───────────────────────────────────────────────────────

    /// Recompute and apply the tiled placement of a monitor. Deferred while
    /// a batch is open; skipped while the monitor shows a fullscreen window.
    pub(crate) fn arrange(&mut self, monitor_id: MonitorId) {
        if let Some(batch) = self.state.batch.as_mut() {
            batch.pending.insert(monitor_id);
            return;
        }

        let Some(monitor) = self.state.registry.monitor(monitor_id) else {
            return;
        };
        if let Some(fullscreen) = monitor.fullscreen {
            debug!(
                "Not arranging monitor {}: {} is fullscreen",
                monitor_id, fullscreen
            );
            return;
        }

        let tiled = self.state.registry.tiled_windows(monitor_id);
        let placements = tiling::tile(monitor, &tiled);
        if !placements.is_empty() {
            debug!("Arranging monitor {}", monitor_id);
        }

        for placement in placements {
            let id = placement.id;
            debug!(" {} -> {}", id, placement.geometry);
            self.display.request(CoreAction::SetBorderWidth {
                id,
                width: placement.border_width,
            });
            self.display.request(CoreAction::Configure {
                id,
                geometry: placement.geometry,
            });
            if let Some(window) = self.state.registry.window_mut(id) {
                window.geometry = placement.geometry;
            }
        }
    }

    /// Push buffered requests unless a batch is open.
    pub(crate) fn flush(&mut self) {
        if !self.state.in_batch() {
            self.display.flush();
        }
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Focus a window, making its monitor current, or focus the root window
    /// of the current monitor for `None`.
    pub(crate) fn focus(&mut self, target: Option<WindowId>) {
        let registry = &self.state.registry;
        let Some(current) = registry.current_monitor_id() else {
            return;
        };
        let monitor_id = match target {
            Some(id) => match registry.window(id) {
                Some(window) => window.monitor,
                None => return,
            },
            None => current,
        };
        let previous = registry.current_monitor().and_then(|m| m.curwin);
        if monitor_id == current && previous == target {
            return;
        }

        if let Some(previous) = previous {
            if Some(previous) != target && registry.contains_window(previous) {
                self.display.request(CoreAction::SetBorderColor {
                    id: previous,
                    focused: false,
                });
            }
        }

        match target {
            Some(id) => {
                self.display
                    .request(CoreAction::SetInputFocus { id: Some(id) });
                self.display
                    .request(CoreAction::SetBorderColor { id, focused: true });
                self.display.request(CoreAction::SetActiveWindow { id });
                if let Some(monitor) = self.state.registry.monitor_mut(monitor_id) {
                    monitor.curwin = Some(id);
                }
                self.state.registry.set_current_monitor(monitor_id);
                info!("Focus window {}, monitor {}", id, monitor_id);
            }
            None => {
                self.display.request(CoreAction::SetInputFocus { id: None });
                if let Some(monitor) = self.state.registry.monitor_mut(monitor_id) {
                    monitor.curwin = None;
                }
                info!("Focus root");
            }
        }
    }

    // ── Floating ─────────────────────────────────────────────────────

    /// Take a window out of the tiling and remember where it really is.
    pub(crate) fn float(&mut self, id: WindowId) {
        let Some(window) = self.state.registry.window(id) else {
            return;
        };
        if window.is_floating() {
            return;
        }
        info!("Floating window {} `{}`", id, window.name);

        self.display.request(CoreAction::Raise { id });
        self.state.registry.set_floating(id, true);
        self.store_geometry(id);
    }

    pub(crate) fn toggle_floating(&mut self, id: WindowId) {
        let Some(floating) = self.state.registry.window(id).map(Window::is_floating) else {
            return;
        };
        self.state.registry.set_floating(id, !floating);
        if floating {
            self.display.request(CoreAction::Lower { id });
        } else {
            self.display.request(CoreAction::Raise { id });
        }
        info!("Window {} floating: {}", id, !floating);
    }

    /// Replace the stored geometry with what the server reports.
    pub(crate) fn store_geometry(&mut self, id: WindowId) {
        match self.display.window_geometry(id) {
            Ok(geometry) => {
                if let Some(window) = self.state.registry.window_mut(id) {
                    window.geometry = geometry;
                }
            }
            Err(e) => warn!("Failed to read geometry of {}: {}", id, e),
        }
    }

    // ── Fullscreen ───────────────────────────────────────────────────

    /// Flip a window's fullscreen state. Every other fullscreen window, on
    /// any monitor, leaves fullscreen first.
    pub(crate) fn toggle_fullscreen(&mut self, id: WindowId) {
        let Some(window) = self.state.registry.window(id) else {
            return;
        };
        let entering = !window.is_fullscreen();

        let others: Vec<WindowId> = self
            .state
            .registry
            .fullscreen_windows()
            .into_iter()
            .filter(|&other| other != id)
            .collect();
        for other in others {
            if let Some(monitor) = self.exit_fullscreen(other) {
                self.arrange(monitor);
            }
        }

        if entering {
            self.enter_fullscreen(id);
        } else if let Some(monitor) = self.exit_fullscreen(id) {
            self.arrange(monitor);
        }
    }

    fn enter_fullscreen(&mut self, id: WindowId) {
        let Some(window) = self.state.registry.window_mut(id) else {
            return;
        };
        window.state.insert(WindowState::FULLSCREEN);
        let monitor_id = window.monitor;

        let Some(monitor) = self.state.registry.monitor_mut(monitor_id) else {
            return;
        };
        monitor.fullscreen = Some(id);
        let area = monitor.geometry;

        self.display.request(CoreAction::SetFullscreenState {
            id,
            fullscreen: true,
        });
        self.display
            .request(CoreAction::SetBorderWidth { id, width: 0 });
        self.display.request(CoreAction::Configure { id, geometry: area });
        self.display.request(CoreAction::Raise { id });
        info!("Set fullscreen {}, monitor {}", id, monitor_id);
    }

    /// Leave fullscreen. Returns the monitor to re-arrange when the window
    /// goes back into the tiling.
    #[must_use]
    pub(crate) fn exit_fullscreen(&mut self, id: WindowId) -> Option<MonitorId> {
        let window = self.state.registry.window_mut(id)?;
        if !window.is_fullscreen() {
            return None;
        }
        window.state.remove(WindowState::FULLSCREEN);
        let floating = window.is_floating();
        let stored = window.geometry;
        let monitor_id = window.monitor;

        let monitor = self.state.registry.monitor_mut(monitor_id)?;
        if monitor.fullscreen == Some(id) {
            monitor.fullscreen = None;
        }
        let border_width = monitor.border_width;

        self.display.request(CoreAction::SetFullscreenState {
            id,
            fullscreen: false,
        });
        info!("Unset fullscreen {}, monitor {}", id, monitor_id);

        if floating {
            self.display.request(CoreAction::SetBorderWidth {
                id,
                width: border_width,
            });
            self.display.request(CoreAction::Configure {
                id,
                geometry: stored,
            });
            None
        } else {
            self.display.request(CoreAction::Lower { id });
            Some(monitor_id)
        }
    }

    // ── Window lifecycle ─────────────────────────────────────────────

    /// Start managing a window on `monitor_id`. Applies transient, dialog
    /// and rule policies but does not arrange or focus.
    pub(crate) fn add_window(&mut self, monitor_id: MonitorId, id: WindowId) -> bool {
        let Some(border_width) = self
            .state
            .registry
            .monitor(monitor_id)
            .map(|m| m.border_width)
        else {
            return false;
        };

        let name = match self.display.window_class(id) {
            Ok(class) => class.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read class of {}: {}", id, e);
                String::new()
            }
        };

        if !self
            .state
            .registry
            .insert_window(Window::new(id, &name, monitor_id))
        {
            return false;
        }
        info!("Added window {} `{}`, monitor {}", id, name, monitor_id);

        self.display.request(CoreAction::SetBorderWidth {
            id,
            width: border_width,
        });
        self.display.request(CoreAction::SetBorderColor {
            id,
            focused: false,
        });

        match self.display.transient_for(id) {
            Ok(Some(parent)) if parent != id && self.state.registry.contains_window(parent) => {
                if let Some(window) = self.state.registry.window_mut(id) {
                    window.transient = Some(parent);
                }
                info!("Window {} is transient for {}", id, parent);
                self.float(id);
                self.center_over(id, parent);
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to read transient hint of {}: {}", id, e),
        }

        match self.display.is_dialog(id) {
            Ok(true) => {
                debug!("Window {} has dialog type", id);
                self.float(id);
            }
            Ok(false) => {}
            Err(e) => warn!("Failed to read window type of {}: {}", id, e),
        }

        self.apply_rules(id);
        self.publish_client_list();
        true
    }

    /// Stop managing a window. Focus moves to the window before it when it
    /// had focus.
    pub(crate) fn remove_window(&mut self, id: WindowId) {
        let Some(window) = self.state.registry.window(id) else {
            return;
        };
        let monitor_id = window.monitor;
        let floating = window.is_floating();
        info!(
            "Removed window {} `{}`, monitor {}",
            id, window.name, monitor_id
        );

        let (had_focus, successor) = self
            .state
            .registry
            .monitor(monitor_id)
            .filter(|m| m.curwin == Some(id))
            .map_or((false, None), |m| {
                (true, m.windows.prev(id).filter(|&prev| prev != id))
            });

        self.state.registry.take_window(id);
        if self.state.is_dragging(id) {
            self.state.drag = None;
        }

        if had_focus {
            if self.state.registry.current_monitor_id() == Some(monitor_id) {
                self.focus(successor);
            } else if let Some(monitor) = self.state.registry.monitor_mut(monitor_id) {
                monitor.curwin = successor;
            }
        }

        if !floating {
            self.arrange(monitor_id);
        }
        self.publish_client_list();
    }

    fn center_over(&mut self, id: WindowId, parent: WindowId) {
        let (Some(parent), Some(window)) = (
            self.state.registry.window(parent),
            self.state.registry.window(id),
        ) else {
            return;
        };
        let (cx, cy) = parent.geometry.center();
        let x = cx.saturating_sub((window.geometry.width / 2) as i32);
        let y = cy.saturating_sub((window.geometry.height / 2) as i32);

        if let Some(window) = self.state.registry.window_mut(id) {
            window.geometry.x = x;
            window.geometry.y = y;
        }
        self.display.request(CoreAction::Move { id, x, y });
    }

    /// Apply every rule matching the window's class.
    pub(crate) fn apply_rules(&mut self, id: WindowId) {
        let Some(window) = self.state.registry.window(id) else {
            return;
        };
        let verdict = self.state.registry.match_rules(&window.name);
        let fullscreen = window.is_fullscreen();

        if verdict.floating {
            self.float(id);
        }
        if verdict.fullscreen && !fullscreen {
            self.toggle_fullscreen(id);
        }
    }

    /// Restore default layout parameters and re-derive floating and
    /// fullscreen from the rules alone.
    pub(crate) fn reset_layout(&mut self, monitor_id: MonitorId) {
        let Some(fullscreen) = self
            .state
            .registry
            .monitor(monitor_id)
            .map(|m| m.fullscreen)
        else {
            return;
        };
        if let Some(id) = fullscreen {
            // arranged below either way
            let _ = self.exit_fullscreen(id);
        }

        let windows = self.state.registry.monitor_windows(monitor_id);
        if let Some(monitor) = self.state.registry.monitor_mut(monitor_id) {
            monitor.reset_parameters();
        }
        for &id in &windows {
            self.state.registry.set_floating(id, false);
        }
        for id in windows {
            self.apply_rules(id);
        }

        info!("Reset layout of monitor {}", monitor_id);
        self.arrange(monitor_id);
    }

    /// Publish every managed window.
    pub(crate) fn publish_client_list(&mut self) {
        let ids = self.state.registry.client_list();
        self.display.request(CoreAction::SetClientList { ids });
    }
}
