//! Execution of control-socket commands.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::{Adjustment, Command, Parameter, Selection, Toggle};
use crate::display::Display;
use crate::event::CoreAction;
use crate::geometry::Geometry;
use crate::monitor::{Monitor, MonitorId};
use crate::rule::Rule;
use crate::state::{Batch, DragSession, GrabAction};
use crate::window::WindowId;
use crate::Core;

/// How a command ended.
enum Outcome {
    /// State changed; pending requests should go out.
    Applied,
    /// A precondition failed. Nothing changed.
    Rejected,
    /// A query answered with text.
    Reply(String),
}

/// Diagnostic dump of one window.
#[derive(Debug, Serialize)]
struct WindowDump {
    id: String,
    stored_geometry: Geometry,
    real_geometry: Option<Geometry>,
    class: String,
    monitor: MonitorId,
    fullscreen: bool,
    floating: bool,
    transient_for: Option<String>,
}

impl<D: Display> Core<D> {
    pub(crate) fn execute_command(&mut self, command: Command) -> Option<String> {
        let Some(monitor_id) = self.state.registry.current_monitor_id() else {
            warn!("No monitor to run {:?} against", command);
            return None;
        };

        let outcome = match command {
            Command::Quit => {
                info!("Quit requested");
                self.state.running = false;
                Outcome::Applied
            }
            Command::Begin => {
                info!("Command batch begin");
                self.state.batch.get_or_insert_with(Batch::default);
                Outcome::Applied
            }
            Command::End => self.end_batch(monitor_id),
            Command::DebugWindow => self.debug_window(),

            Command::RootCount(adjustment) => self.with_windows(2, |core, monitor| {
                let (value, relative) = match adjustment {
                    Adjustment::Absolute(v) => (v, false),
                    Adjustment::Relative(v) => (v, true),
                };
                core.adjust_and_arrange(monitor, |m| m.adjust_root_count(value, relative))
            }),
            Command::RootSize(adjustment) => self.with_windows(2, |core, monitor| {
                let (value, relative) = match adjustment {
                    Adjustment::Absolute(v) => (v, false),
                    Adjustment::Relative(v) => (v, true),
                };
                core.adjust_and_arrange(monitor, |m| m.adjust_root_size(value, relative))
            }),
            Command::WindowGap(gap) => self.adjust_and_arrange(monitor_id, |m| {
                m.set_window_gap(gap);
                true
            }),
            Command::BorderWidth(width) => self.set_border_width(monitor_id, width),
            Command::Padding(edge, value) => self.adjust_and_arrange(monitor_id, |m| {
                m.padding.set(edge, value);
                m.update_geometry();
                true
            }),
            Command::Mirror(toggle) => self.unlocked(|core| {
                core.with_windows(2, |core, monitor| {
                    core.adjust_and_arrange(monitor, |m| {
                        m.mirror = toggle.apply(m.mirror);
                        true
                    })
                })
            }),
            Command::NextLayout => self.unlocked(|core| {
                core.adjust_and_arrange(monitor_id, |m| {
                    m.layout = m.layout.next();
                    true
                })
            }),
            Command::PreviousLayout => self.unlocked(|core| {
                core.adjust_and_arrange(monitor_id, |m| {
                    m.layout = m.layout.prev();
                    true
                })
            }),
            Command::ResetLayout => {
                self.reset_layout(monitor_id);
                Outcome::Applied
            }
            Command::Get(parameter) => self.get(monitor_id, parameter),

            Command::Fullscreen(toggle) => self.with_windows(1, |core, monitor| {
                core.fullscreen(monitor, toggle)
            }),
            Command::MakeRoot => self.unlocked(|core| {
                core.with_windows(2, |core, monitor| {
                    core.with_curwin(monitor, |core, id| {
                        core.adjust_and_arrange(monitor, |m| m.windows.move_to_front(id))
                    })
                })
            }),
            Command::SelectWindow(selection) => {
                self.unlocked(|core| core.select_window(monitor_id, selection))
            }
            Command::ShiftWindow(steps) => self.unlocked(|core| {
                core.with_windows(2, |core, monitor| {
                    core.with_curwin(monitor, |core, id| {
                        core.adjust_and_arrange(monitor, |m| {
                            let len = m.windows.len();
                            for _ in 0..steps.unsigned_abs() as usize % len {
                                if steps < 0 {
                                    m.windows.unshift(id);
                                } else {
                                    m.windows.shift(id);
                                }
                            }
                            true
                        })
                    })
                })
            }),
            Command::ToggleFloating => self.unlocked(|core| {
                core.with_curwin(monitor_id, |core, id| {
                    core.toggle_floating(id);
                    core.arrange(monitor_id);
                    Outcome::Applied
                })
            }),
            Command::CloseWindow => self.with_curwin(monitor_id, |core, id| {
                info!("Closing window {}", id);
                core.display.request(CoreAction::RequestClose { id });
                Outcome::Applied
            }),
            Command::FocusWindow => self.focus_under_pointer(monitor_id),

            Command::Rule { name, attribute } => {
                self.state.registry.add_rule(Rule::new(name, attribute));
                Outcome::Applied
            }

            Command::GrabPointer(action) => {
                self.unlocked(|core| core.grab_pointer(action))
            }
            Command::TrackPointer { x, y } => self.track_pointer(x, y),
            Command::UngrabPointer => self.ungrab_pointer(),
        };

        match outcome {
            Outcome::Applied => {
                self.flush();
                None
            }
            Outcome::Rejected => None,
            Outcome::Reply(text) => Some(text),
        }
    }

    // ── Preconditions ────────────────────────────────────────────────

    fn current(&self) -> Option<&Monitor> {
        self.state.registry.current_monitor()
    }

    /// Run `f` only while the current monitor shows no fullscreen window.
    fn unlocked(&mut self, f: impl FnOnce(&mut Self) -> Outcome) -> Outcome {
        if self.current().map_or(true, |m| m.fullscreen.is_some()) {
            debug!("Rejected: monitor is fullscreen");
            return Outcome::Rejected;
        }
        f(self)
    }

    /// Run `f` only when the current monitor holds at least `min` windows.
    fn with_windows(
        &mut self,
        min: u32,
        f: impl FnOnce(&mut Self, MonitorId) -> Outcome,
    ) -> Outcome {
        match self.current() {
            Some(m) if m.window_count >= min => {
                let id = m.id;
                f(self, id)
            }
            _ => {
                debug!("Rejected: fewer than {} windows", min);
                Outcome::Rejected
            }
        }
    }

    /// Run `f` with the monitor's current window, if it has one.
    fn with_curwin(
        &mut self,
        monitor_id: MonitorId,
        f: impl FnOnce(&mut Self, WindowId) -> Outcome,
    ) -> Outcome {
        match self.state.registry.monitor(monitor_id).and_then(|m| m.curwin) {
            Some(id) => f(self, id),
            None => Outcome::Rejected,
        }
    }

    /// Mutate a monitor and re-arrange it if `f` reports a change.
    fn adjust_and_arrange(
        &mut self,
        monitor_id: MonitorId,
        f: impl FnOnce(&mut Monitor) -> bool,
    ) -> Outcome {
        let Some(monitor) = self.state.registry.monitor_mut(monitor_id) else {
            return Outcome::Rejected;
        };
        if !f(monitor) {
            return Outcome::Rejected;
        }
        self.arrange(monitor_id);
        Outcome::Applied
    }

    // ── Commands ─────────────────────────────────────────────────────

    fn end_batch(&mut self, monitor_id: MonitorId) -> Outcome {
        let pending = self
            .state
            .batch
            .take()
            .map(|batch| batch.pending)
            .unwrap_or_default();
        info!("Command batch end");

        self.arrange(monitor_id);
        for monitor in pending {
            if monitor != monitor_id {
                self.arrange(monitor);
            }
        }
        Outcome::Applied
    }

    fn debug_window(&mut self) -> Outcome {
        let Some(id) = self.current().and_then(|m| m.curwin) else {
            return Outcome::Rejected;
        };
        let real_geometry = match self.display.window_geometry(id) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                warn!("Failed to read geometry of {}: {}", id, e);
                None
            }
        };
        let registry = &self.state.registry;
        let Some(window) = registry.window(id) else {
            return Outcome::Rejected;
        };

        let dump = WindowDump {
            id: id.to_string(),
            stored_geometry: window.geometry,
            real_geometry,
            class: window.name.clone(),
            monitor: window.monitor,
            fullscreen: window.is_fullscreen(),
            floating: window.is_floating(),
            transient_for: window.transient.map(|t| t.to_string()),
        };

        match serde_json::to_string(&dump) {
            Ok(json) => {
                info!("debug-window: {}", json);
                Outcome::Reply(json + "\n")
            }
            Err(e) => {
                warn!("Failed to encode window dump: {}", e);
                Outcome::Rejected
            }
        }
    }

    fn set_border_width(&mut self, monitor_id: MonitorId, width: u32) -> Outcome {
        let Some(monitor) = self.state.registry.monitor_mut(monitor_id) else {
            return Outcome::Rejected;
        };
        monitor.set_border_width(width);
        let width = monitor.border_width;
        let fullscreen = monitor.fullscreen;
        let windows: Vec<WindowId> = monitor.windows.iter().collect();

        for id in windows {
            if Some(id) != fullscreen {
                self.display.request(CoreAction::SetBorderWidth { id, width });
            }
        }
        self.arrange(monitor_id);
        Outcome::Applied
    }

    fn get(&self, monitor_id: MonitorId, parameter: Parameter) -> Outcome {
        let Some(m) = self.state.registry.monitor(monitor_id) else {
            return Outcome::Rejected;
        };
        let text = match parameter {
            Parameter::RootSize => format!("{:.6}\n", m.root_size),
            Parameter::RootCount => format!("{}\n", m.root_count),
            Parameter::WindowGap => format!("{}\n", m.window_gap),
            Parameter::BorderWidth => format!("{}\n", m.border_width),
            Parameter::Fullscreen => format!("{}\n", m.fullscreen.is_some()),
            Parameter::Mirror => format!("{}\n", m.mirror),
            Parameter::Layout => format!("{}\n", m.layout.name()),
        };
        Outcome::Reply(text)
    }

    fn fullscreen(&mut self, monitor_id: MonitorId, toggle: Toggle) -> Outcome {
        let Some(monitor) = self.state.registry.monitor(monitor_id) else {
            return Outcome::Rejected;
        };
        let target = match toggle {
            Toggle::Switch => monitor.fullscreen.or(monitor.curwin),
            Toggle::Enable if monitor.fullscreen.is_none() => monitor.curwin,
            Toggle::Disable => monitor.fullscreen,
            Toggle::Enable => None,
        };

        match target {
            Some(id) => {
                self.toggle_fullscreen(id);
                Outcome::Applied
            }
            None => Outcome::Rejected,
        }
    }

    fn select_window(&mut self, monitor_id: MonitorId, selection: Selection) -> Outcome {
        match selection {
            Selection::Relative(steps) => self.with_windows(2, |core, _| {
                core.with_curwin(monitor_id, |core, start| {
                    let Some(monitor) = core.state.registry.monitor(monitor_id) else {
                        return Outcome::Rejected;
                    };
                    let mut target = start;
                    for _ in 0..steps.unsigned_abs() as usize % monitor.windows.len() {
                        let step = if steps < 0 {
                            monitor.windows.prev(target)
                        } else {
                            monitor.windows.next(target)
                        };
                        target = step.unwrap_or(target);
                    }
                    core.focus(Some(target));
                    Outcome::Applied
                })
            }),
            Selection::Absolute(id) => {
                let curwin = self.current().and_then(|m| m.curwin);
                if curwin == Some(id) || !self.state.registry.contains_window(id) {
                    return Outcome::Rejected;
                }
                self.focus(Some(id));
                Outcome::Applied
            }
        }
    }

    fn focus_under_pointer(&mut self, monitor_id: MonitorId) -> Outcome {
        let pointer = match self.display.query_pointer() {
            Ok(pointer) => pointer,
            Err(e) => {
                warn!("Failed to query pointer: {}", e);
                return Outcome::Rejected;
            }
        };
        let Some(id) = pointer
            .child
            .filter(|&id| self.state.registry.contains_window(id))
        else {
            return Outcome::Rejected;
        };
        let curwin = self
            .state
            .registry
            .monitor(monitor_id)
            .and_then(|m| m.curwin);
        if curwin == Some(id) {
            return Outcome::Rejected;
        }
        self.focus(Some(id));
        Outcome::Applied
    }

    // ── Pointer drag ─────────────────────────────────────────────────

    fn grab_pointer(&mut self, action: GrabAction) -> Outcome {
        let pointer = match self.display.query_pointer() {
            Ok(pointer) => pointer,
            Err(e) => {
                warn!("Failed to query pointer: {}", e);
                return Outcome::Rejected;
            }
        };
        let Some(window) = pointer.child.and_then(|id| self.state.registry.window(id)) else {
            return Outcome::Rejected;
        };
        let id = window.id;
        let monitor_id = window.monitor;
        info!("Grabbing pointer for {} `{}`: {:?}", id, window.name, action);

        if window.is_tiled() {
            self.float(id);
            self.arrange(monitor_id);
        }

        let Some(geometry) = self.state.registry.window(id).map(|w| w.geometry) else {
            return Outcome::Rejected;
        };
        self.state.drag = Some(DragSession {
            window: id,
            action,
            pointer: (pointer.x, pointer.y),
            geometry,
        });

        self.display.request(CoreAction::Raise { id });
        self.focus(Some(id));
        Outcome::Applied
    }

    fn track_pointer(&mut self, x: i32, y: i32) -> Outcome {
        let Some(drag) = self.state.drag else {
            return Outcome::Rejected;
        };
        let geometry = drag.track(x, y);
        self.display.request(CoreAction::Move {
            id: drag.window,
            x: geometry.x,
            y: geometry.y,
        });
        Outcome::Applied
    }

    fn ungrab_pointer(&mut self) -> Outcome {
        let Some(drag) = self.state.drag.take() else {
            return Outcome::Rejected;
        };
        info!("Ungrabbing pointer");
        self.store_geometry(drag.window);
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CoreEvent;
    use crate::testing::FakeDisplay;
    use pretty_assertions::assert_eq;

    const A: WindowId = WindowId(0xa);
    const B: WindowId = WindowId(0xb);
    const C: WindowId = WindowId(0xc);

    fn core_with(ids: &[WindowId]) -> Core<FakeDisplay> {
        let mut core = Core::new(FakeDisplay::single());
        core.start().unwrap();
        for &id in ids {
            core.display_mut().create_window(id, "xterm");
            core.handle_event(CoreEvent::MapRequest { id });
        }
        core.display_mut().take_requests();
        core
    }

    fn order(core: &Core<FakeDisplay>) -> Vec<WindowId> {
        core.state.registry.current_monitor().unwrap().windows.iter().collect()
    }

    fn curwin(core: &Core<FakeDisplay>) -> Option<WindowId> {
        core.state.registry.current_monitor().unwrap().curwin
    }

    #[test]
    fn test_get_defaults() {
        let mut core = core_with(&[]);
        assert_eq!(core.process_message("get root-size"), "0.650000\n");
        assert_eq!(core.process_message("get root-count"), "1\n");
        assert_eq!(core.process_message("get window-gap"), "1\n");
        assert_eq!(core.process_message("get border-width"), "5\n");
        assert_eq!(core.process_message("get fullscreen"), "false\n");
        assert_eq!(core.process_message("get mirror"), "false\n");
        assert_eq!(core.process_message("get layout"), "vertical\n");
    }

    #[test]
    fn test_root_count_needs_two_windows() {
        let mut core = core_with(&[A]);
        core.process_message("root-count +1");
        assert_eq!(core.process_message("get root-count"), "1\n");
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_root_count_clamped_to_window_count() {
        let mut core = core_with(&[A, B, C]);
        core.process_message("root-count +5");
        assert_eq!(core.process_message("get root-count"), "3\n");
        core.process_message("root-count -10");
        assert_eq!(core.process_message("get root-count"), "1\n");
    }

    #[test]
    fn test_root_size_clamped() {
        let mut core = core_with(&[A, B]);
        core.process_message("root-size 0.95");
        assert_eq!(core.process_message("get root-size"), "0.900000\n");
        core.process_message("root-size -2");
        assert_eq!(core.process_message("get root-size"), "0.100000\n");
    }

    #[test]
    fn test_layout_cycles_both_ways() {
        let mut core = core_with(&[A]);
        core.process_message("next-layout");
        assert_eq!(core.process_message("get layout"), "horizontal\n");
        core.process_message("previous-layout");
        assert_eq!(core.process_message("get layout"), "vertical\n");
        core.process_message("previous-layout");
        assert_eq!(core.process_message("get layout"), "horizontal\n");
    }

    #[test]
    fn test_shift_window_wraps() {
        let mut core = core_with(&[A, B, C]);
        assert_eq!(order(&core), vec![A, B, C]);
        assert_eq!(curwin(&core), Some(C));

        core.process_message("shift-window 1");
        assert_eq!(order(&core), vec![C, A, B]);
        core.process_message("shift-window -1");
        assert_eq!(order(&core), vec![A, B, C]);
        core.process_message("shift-window -4");
        assert_eq!(order(&core), vec![A, C, B]);
    }

    #[test]
    fn test_select_window_relative_and_absolute() {
        let mut core = core_with(&[A, B, C]);
        core.process_message("select-window -1");
        assert_eq!(curwin(&core), Some(B));
        core.process_message("select-window +2");
        assert_eq!(curwin(&core), Some(A));
        core.process_message("select-window 0xc");
        assert_eq!(curwin(&core), Some(C));

        core.display_mut().take_requests();
        core.process_message("select-window 0xdead");
        assert_eq!(curwin(&core), Some(C));
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_make_root() {
        let mut core = core_with(&[A, B, C]);
        core.process_message("make-root");
        assert_eq!(order(&core), vec![C, A, B]);
    }

    #[test]
    fn test_fullscreen_locks_ordering_commands() {
        let mut core = core_with(&[A, B, C]);
        core.process_message("fullscreen on");
        assert_eq!(core.process_message("get fullscreen"), "true\n");

        core.process_message("make-root");
        core.process_message("shift-window 1");
        core.process_message("mirror on");
        assert_eq!(order(&core), vec![A, B, C]);
        assert_eq!(core.process_message("get mirror"), "false\n");

        core.process_message("fullscreen off");
        assert_eq!(core.process_message("get fullscreen"), "false\n");
        core.process_message("make-root");
        assert_eq!(order(&core), vec![C, A, B]);
    }

    #[test]
    fn test_border_width_skips_fullscreen_window() {
        let mut core = core_with(&[A, B]);
        core.process_message("fullscreen toggle");
        core.display_mut().take_requests();

        core.process_message("border-width 2");
        let requests = core.display_mut().take_requests();
        assert!(requests.contains(&CoreAction::SetBorderWidth { id: A, width: 2 }));
        assert!(!requests.contains(&CoreAction::SetBorderWidth { id: B, width: 2 }));
    }

    #[test]
    fn test_batch_defers_arrangement() {
        let mut core = core_with(&[A, B]);
        let flushes = core.display().flushes;

        core.process_message("begin");
        core.process_message("window-gap 10");
        core.process_message("root-size 0.5");
        assert!(core
            .display_mut()
            .take_requests()
            .iter()
            .all(|r| !matches!(r, CoreAction::Configure { .. })));
        assert_eq!(core.display().flushes, flushes);

        core.process_message("end");
        let requests = core.display_mut().take_requests();
        assert!(requests.contains(&CoreAction::Configure {
            id: A,
            geometry: Geometry::new(0, 0, 950, 1070),
        }));
        assert_eq!(core.display().flushes, flushes + 1);
        assert!(!core.state.in_batch());
    }

    #[test]
    fn test_debug_window_dump() {
        let mut core = core_with(&[A]);
        let dump = core.process_message("debug-window");
        assert!(dump.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(dump.trim_end()).unwrap();
        assert_eq!(value["id"], "0x0000000a");
        assert_eq!(value["class"], "xterm");
        assert_eq!(value["floating"], false);
        assert_eq!(value["stored_geometry"]["width"], 1920);
    }

    #[test]
    fn test_debug_window_without_windows() {
        let mut core = core_with(&[]);
        assert_eq!(core.process_message("debug-window"), "");
    }

    #[test]
    fn test_rule_then_reset_layout_floats_matching() {
        let mut core = core_with(&[A, B]);
        core.process_message("rule xterm floating");
        core.process_message("reset-layout");

        assert!(core.state.registry.window(A).unwrap().is_floating());
        assert!(core.state.registry.window(B).unwrap().is_floating());
        assert_eq!(core.state.registry.current_monitor().unwrap().floating_count, 2);
    }

    #[test]
    fn test_grab_move_and_ungrab() {
        let mut core = core_with(&[A, B]);
        core.display_mut().move_pointer(100, 100, Some(A));

        core.process_message("grab-pointer move");
        assert!(core.state.registry.window(A).unwrap().is_floating());
        assert_eq!(curwin(&core), Some(A));
        assert!(core.state.is_dragging(A));
        core.display_mut().take_requests();

        core.process_message("track-pointer 150 130");
        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::Move { id: A, x: 50, y: 30 }]
        );

        core.process_message("ungrab-pointer");
        assert!(core.state.drag.is_none());
        assert_eq!(
            core.state.registry.window(A).unwrap().geometry,
            Geometry::new(50, 30, 1238, 1070)
        );
    }

    #[test]
    fn test_grab_resize_tracks_position() {
        let mut core = core_with(&[A, B]);
        core.display_mut().move_pointer(100, 100, Some(A));
        core.process_message("grab-pointer resize");
        core.display_mut().take_requests();

        core.process_message("track-pointer 80 90");
        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::Move { id: A, x: -20, y: -10 }]
        );
    }

    #[test]
    fn test_track_far_away_pointer_saturates() {
        let mut core = core_with(&[A, B]);
        core.display_mut().move_pointer(-100, 10, Some(A));
        core.process_message("grab-pointer move");
        core.display_mut().take_requests();

        core.process_message("track-pointer 2147483647 10");
        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::Move {
                id: A,
                x: i32::MAX,
                y: 0,
            }]
        );
        assert!(core.is_running());
    }

    #[test]
    fn test_extreme_layout_values_are_bounded() {
        let mut core = core_with(&[A, B, C]);
        core.process_message("root-count +9223372036854775807");
        assert_eq!(core.process_message("get root-count"), "3\n");
        core.process_message("root-count -9223372036854775807");
        assert_eq!(core.process_message("get root-count"), "1\n");

        core.process_message("window-gap 4294967295");
        assert_eq!(core.process_message("get window-gap"), "1080\n");
        core.process_message("border-width 3000000000");
        assert_eq!(core.process_message("get border-width"), "540\n");

        for id in [A, B, C] {
            let window = &core.display().windows[&id];
            let outer = window.geometry.with_border(window.border_width);
            assert!(outer.right() <= 1920 && outer.bottom() <= 1080, "{outer}");
        }
        assert_eq!(core.state.validate_invariants(), Ok(()));
    }

    #[test]
    fn test_grab_over_root_is_rejected() {
        let mut core = core_with(&[A]);
        core.display_mut().move_pointer(10, 10, None);
        core.process_message("grab-pointer move");
        assert!(core.state.drag.is_none());
        core.process_message("track-pointer 20 20");
        assert!(core.display_mut().take_requests().is_empty());
    }

    #[test]
    fn test_close_window_targets_focus() {
        let mut core = core_with(&[A, B]);
        core.process_message("close-window");
        assert_eq!(
            core.display_mut().take_requests(),
            vec![CoreAction::RequestClose { id: B }]
        );
    }

    #[test]
    fn test_focus_window_under_pointer() {
        let mut core = core_with(&[A, B]);
        core.display_mut().move_pointer(10, 10, Some(A));
        core.process_message("focus-window");
        assert_eq!(curwin(&core), Some(A));
    }

    #[test]
    fn test_quit() {
        let mut core = core_with(&[]);
        assert!(core.is_running());
        assert_eq!(core.process_message("quit"), "");
        assert!(!core.is_running());
    }

    #[test]
    fn test_unknown_command() {
        let mut core = core_with(&[]);
        assert_eq!(core.process_message("frobnicate"), "unknown command: frobnicate\n");
        assert_eq!(core.process_message("window-gap lots"), "");
    }
}
