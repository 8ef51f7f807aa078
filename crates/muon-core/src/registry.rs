//! Owner of every monitor, window and rule record.
//!
//! Other parts of core refer to records only by id. Removing a record here
//! clears every id that pointed at it.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::info;

use crate::geometry::Geometry;
use crate::monitor::{Monitor, MonitorId};
use crate::rule::{self, Rule, RuleMatch};
use crate::window::{Window, WindowId, WindowState};

#[derive(Debug, Default)]
pub struct Registry {
    /// Monitors in discovery order.
    pub monitors: IndexMap<MonitorId, Monitor>,
    pub windows: HashMap<WindowId, Window>,
    /// Append-only.
    pub rules: Vec<Rule>,
    current: Option<MonitorId>,
    next_monitor_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Monitors ─────────────────────────────────────────────────────

    /// Register an output. The first one becomes the current monitor.
    pub fn add_monitor(&mut self, base_geometry: Geometry) -> MonitorId {
        self.next_monitor_id += 1;
        let id = MonitorId(self.next_monitor_id);
        self.monitors.insert(id, Monitor::new(id, base_geometry));

        if self.current.is_none() {
            self.current = Some(id);
        }

        info!("Added monitor {} at {}", id, base_geometry);
        id
    }

    pub fn monitor(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.get(&id)
    }

    pub fn monitor_mut(&mut self, id: MonitorId) -> Option<&mut Monitor> {
        self.monitors.get_mut(&id)
    }

    /// First monitor whose effective geometry contains the point.
    pub fn find_monitor_at(&self, x: i32, y: i32) -> Option<MonitorId> {
        self.monitors
            .values()
            .find(|m| m.geometry.contains(x, y))
            .map(|m| m.id)
    }

    pub const fn current_monitor_id(&self) -> Option<MonitorId> {
        self.current
    }

    pub fn current_monitor(&self) -> Option<&Monitor> {
        self.current.and_then(|id| self.monitors.get(&id))
    }

    pub fn current_monitor_mut(&mut self) -> Option<&mut Monitor> {
        self.current.and_then(|id| self.monitors.get_mut(&id))
    }

    pub fn set_current_monitor(&mut self, id: MonitorId) {
        if self.monitors.contains_key(&id) {
            self.current = Some(id);
        }
    }

    // ── Windows ──────────────────────────────────────────────────────

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn contains_window(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Store a new window on its monitor, right after the monitor's current
    /// window or at the front when there is none. Returns `false` when the
    /// id is already managed or the monitor is unknown.
    pub fn insert_window(&mut self, window: Window) -> bool {
        if self.windows.contains_key(&window.id) {
            return false;
        }
        let Some(monitor) = self.monitors.get_mut(&window.monitor) else {
            return false;
        };

        let inserted = match monitor.curwin {
            Some(anchor) if monitor.windows.contains(anchor) => {
                monitor.windows.insert_after(anchor, window.id)
            }
            _ => monitor.windows.push_front(window.id),
        };
        if !inserted {
            return false;
        }

        monitor.window_count += 1;
        if window.is_floating() {
            monitor.floating_count += 1;
        }
        self.windows.insert(window.id, window);
        true
    }

    /// Drop a window record. Counts, the fullscreen slot, `root_count` and
    /// transient links are fixed up here. The monitor's `curwin` is left for
    /// the caller, which decides what gets focus next.
    pub fn take_window(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(&id)?;

        if let Some(monitor) = self.monitors.get_mut(&window.monitor) {
            monitor.windows.remove(id);
            monitor.window_count = monitor.window_count.saturating_sub(1);
            if window.is_floating() {
                monitor.floating_count = monitor.floating_count.saturating_sub(1);
            }
            if monitor.fullscreen == Some(id) {
                monitor.fullscreen = None;
            }
            monitor.root_count = monitor.root_count.min(monitor.max_root_count());
        }

        for other in self.windows.values_mut() {
            if other.transient == Some(id) {
                other.transient = None;
            }
        }

        Some(window)
    }

    /// Flip the floating flag, keeping the monitor's count in step.
    /// Returns `false` if nothing changed.
    pub fn set_floating(&mut self, id: WindowId, floating: bool) -> bool {
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if window.is_floating() == floating {
            return false;
        }
        window.state.set(WindowState::FLOATING, floating);

        if let Some(monitor) = self.monitors.get_mut(&window.monitor) {
            if floating {
                monitor.floating_count += 1;
            } else {
                monitor.floating_count = monitor.floating_count.saturating_sub(1);
            }
        }
        true
    }

    /// Windows of a monitor in list order.
    pub fn monitor_windows(&self, id: MonitorId) -> Vec<WindowId> {
        self.monitors
            .get(&id)
            .map(|m| m.windows.iter().collect())
            .unwrap_or_default()
    }

    /// Windows the tiling engine places on a monitor, in list order.
    pub fn tiled_windows(&self, id: MonitorId) -> Vec<WindowId> {
        self.monitors
            .get(&id)
            .map(|m| {
                m.windows
                    .iter()
                    .filter(|wid| self.windows.get(wid).is_some_and(Window::is_tiled))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every managed window, monitor by monitor.
    pub fn client_list(&self) -> Vec<WindowId> {
        self.monitors
            .values()
            .flat_map(|m| m.windows.iter())
            .collect()
    }

    /// Every window flagged fullscreen, on any monitor.
    pub fn fullscreen_windows(&self) -> Vec<WindowId> {
        self.client_list()
            .into_iter()
            .filter(|id| self.windows.get(id).is_some_and(Window::is_fullscreen))
            .collect()
    }

    // ── Rules ────────────────────────────────────────────────────────

    pub fn add_rule(&mut self, rule: Rule) {
        info!("Added rule {:?} for `{}`", rule.attribute, rule.name);
        self.rules.push(rule);
    }

    pub fn match_rules(&self, class: &str) -> RuleMatch {
        rule::evaluate(&self.rules, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleAttribute;
    use pretty_assertions::assert_eq;

    fn registry_with_monitor() -> (Registry, MonitorId) {
        let mut registry = Registry::new();
        let id = registry.add_monitor(Geometry::new(0, 0, 1920, 1080));
        (registry, id)
    }

    #[test]
    fn test_first_monitor_is_current() {
        let mut registry = Registry::new();
        let first = registry.add_monitor(Geometry::new(0, 0, 1920, 1080));
        let second = registry.add_monitor(Geometry::new(1920, 0, 1280, 1024));
        assert_eq!(first, MonitorId(1));
        assert_eq!(second, MonitorId(2));
        assert_eq!(registry.current_monitor_id(), Some(first));
    }

    #[test]
    fn test_find_monitor_at() {
        let mut registry = Registry::new();
        let left = registry.add_monitor(Geometry::new(0, 0, 1920, 1080));
        let right = registry.add_monitor(Geometry::new(1920, 0, 1280, 1024));
        assert_eq!(registry.find_monitor_at(1919, 500), Some(left));
        assert_eq!(registry.find_monitor_at(1920, 500), Some(right));
        assert_eq!(registry.find_monitor_at(1920, 1050), None);
    }

    #[test]
    fn test_insert_after_current_window() {
        let (mut registry, mon) = registry_with_monitor();
        registry.insert_window(Window::new(WindowId(1), "a", mon));
        registry.insert_window(Window::new(WindowId(2), "b", mon));
        registry.monitor_mut(mon).unwrap().curwin = Some(WindowId(2));
        registry.insert_window(Window::new(WindowId(3), "c", mon));

        assert_eq!(
            registry.monitor_windows(mon),
            vec![WindowId(2), WindowId(3), WindowId(1)]
        );
        assert_eq!(registry.monitor(mon).unwrap().window_count, 3);
        assert!(!registry.insert_window(Window::new(WindowId(3), "c", mon)));
    }

    #[test]
    fn test_take_window_fixes_counts_and_links() {
        let (mut registry, mon) = registry_with_monitor();
        registry.insert_window(Window::new(WindowId(1), "a", mon));
        let mut dialog = Window::new(WindowId(2), "b", mon);
        dialog.transient = Some(WindowId(1));
        registry.insert_window(dialog);
        registry.set_floating(WindowId(1), true);
        {
            let monitor = registry.monitor_mut(mon).unwrap();
            monitor.root_count = 2;
            monitor.fullscreen = Some(WindowId(1));
        }

        let removed = registry.take_window(WindowId(1)).unwrap();
        assert_eq!(removed.id, WindowId(1));

        let monitor = registry.monitor(mon).unwrap();
        assert_eq!(monitor.window_count, 1);
        assert_eq!(monitor.floating_count, 0);
        assert_eq!(monitor.fullscreen, None);
        assert_eq!(monitor.root_count, 1);
        assert_eq!(registry.window(WindowId(2)).unwrap().transient, None);
        assert!(registry.take_window(WindowId(1)).is_none());
    }

    #[test]
    fn test_tiled_windows_skip_floating() {
        let (mut registry, mon) = registry_with_monitor();
        for id in 1..=3 {
            registry.insert_window(Window::new(WindowId(id), "", mon));
        }
        registry.set_floating(WindowId(2), true);
        assert!(!registry.set_floating(WindowId(2), true));
        assert_eq!(registry.monitor(mon).unwrap().floating_count, 1);
        assert_eq!(
            registry.tiled_windows(mon),
            vec![WindowId(3), WindowId(1)]
        );
    }

    #[test]
    fn test_rules_match_by_class() {
        let mut registry = Registry::new();
        registry.add_rule(Rule::new("firefox", RuleAttribute::Floating));
        assert!(registry.match_rules("firefox").floating);
        assert!(!registry.match_rules("xterm").floating);
    }
}
