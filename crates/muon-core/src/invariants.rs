//! Invariant validation for the core state.
//!
//! Called after every `handle_event` / `exec` in debug builds.

use crate::monitor::{ROOT_SIZE_MAX, ROOT_SIZE_MIN};
use crate::state::State;

/// Error indicating which invariant was violated.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvariantError {
    #[error("Current monitor {0} does not exist")]
    CurrentMonitorMissing(String),

    #[error("Monitor {monitor} counts {counted} windows but lists {listed}")]
    WindowCountMismatch {
        monitor: String,
        counted: u32,
        listed: usize,
    },

    #[error("Monitor {monitor} counts {counted} floating windows but has {actual}")]
    FloatingCountMismatch {
        monitor: String,
        counted: u32,
        actual: usize,
    },

    #[error("Window {window} is listed on monitor {listed_on} but belongs to {owner}")]
    MonitorMismatch {
        window: String,
        listed_on: String,
        owner: String,
    },

    #[error("Window {0} is not listed on any monitor")]
    WindowUnlisted(String),

    #[error("Monitor {monitor} points at window {window} it does not hold")]
    DanglingHandle { monitor: String, window: String },

    #[error("Fullscreen flag of window {0} disagrees with its monitor")]
    FullscreenMismatch(String),

    #[error("{0} windows are fullscreen")]
    MultipleFullscreen(usize),

    #[error("Monitor {monitor} root_count {root_count} is out of range")]
    RootCountOutOfRange { monitor: String, root_count: u32 },

    #[error("Monitor {monitor} root_size {root_size} is out of range")]
    RootSizeOutOfRange { monitor: String, root_size: f32 },

    #[error("Drag session holds missing window {0}")]
    DragWindowMissing(String),

    #[error("Window {window} is transient for missing window {target}")]
    TransientMissing { window: String, target: String },
}

/// Validate all core invariants. Returns the first violation found.
pub fn validate(state: &State) -> Result<(), InvariantError> {
    let registry = &state.registry;

    // 1. Current monitor exists once any monitor does
    match registry.current_monitor_id() {
        Some(id) if registry.monitor(id).is_none() => {
            return Err(InvariantError::CurrentMonitorMissing(id.to_string()));
        }
        None if !registry.monitors.is_empty() => {
            return Err(InvariantError::CurrentMonitorMissing("none".into()));
        }
        _ => {}
    }

    for monitor in registry.monitors.values() {
        // 2. Counts move in lock-step with the list
        if monitor.window_count as usize != monitor.windows.len() {
            return Err(InvariantError::WindowCountMismatch {
                monitor: monitor.id.to_string(),
                counted: monitor.window_count,
                listed: monitor.windows.len(),
            });
        }

        let mut floating = 0;
        for id in &monitor.windows {
            let Some(window) = registry.window(id) else {
                return Err(InvariantError::WindowUnlisted(id.to_string()));
            };
            // 3. A window sits on exactly the monitor it names
            if window.monitor != monitor.id {
                return Err(InvariantError::MonitorMismatch {
                    window: id.to_string(),
                    listed_on: monitor.id.to_string(),
                    owner: window.monitor.to_string(),
                });
            }
            if window.is_floating() {
                floating += 1;
            }
        }

        if monitor.floating_count as usize != floating {
            return Err(InvariantError::FloatingCountMismatch {
                monitor: monitor.id.to_string(),
                counted: monitor.floating_count,
                actual: floating,
            });
        }

        // 4. curwin and fullscreen point at windows of this monitor
        for handle in [monitor.curwin, monitor.fullscreen].into_iter().flatten() {
            if !monitor.windows.contains(handle) {
                return Err(InvariantError::DanglingHandle {
                    monitor: monitor.id.to_string(),
                    window: handle.to_string(),
                });
            }
        }

        // 5. Layout parameters within bounds
        if monitor.root_count < 1 || monitor.root_count > monitor.max_root_count() {
            return Err(InvariantError::RootCountOutOfRange {
                monitor: monitor.id.to_string(),
                root_count: monitor.root_count,
            });
        }
        if !(ROOT_SIZE_MIN..=ROOT_SIZE_MAX).contains(&monitor.root_size) {
            return Err(InvariantError::RootSizeOutOfRange {
                monitor: monitor.id.to_string(),
                root_size: monitor.root_size,
            });
        }
    }

    for window in registry.windows.values() {
        if !registry
            .monitor(window.monitor)
            .is_some_and(|m| m.windows.contains(window.id))
        {
            return Err(InvariantError::WindowUnlisted(window.id.to_string()));
        }
    }

    // 6. The fullscreen flag agrees with the monitor slot, and is unique
    let fullscreen = registry.fullscreen_windows();
    for id in &fullscreen {
        let owner = registry
            .window(*id)
            .and_then(|w| registry.monitor(w.monitor));
        if owner.map_or(true, |m| m.fullscreen != Some(*id)) {
            return Err(InvariantError::FullscreenMismatch(id.to_string()));
        }
    }
    for monitor in registry.monitors.values() {
        if let Some(id) = monitor.fullscreen {
            if !registry.window(id).is_some_and(|w| w.is_fullscreen()) {
                return Err(InvariantError::FullscreenMismatch(id.to_string()));
            }
        }
    }
    if fullscreen.len() > 1 {
        return Err(InvariantError::MultipleFullscreen(fullscreen.len()));
    }

    // 7. Weak handles are live
    if let Some(drag) = state.drag {
        if !registry.contains_window(drag.window) {
            return Err(InvariantError::DragWindowMissing(drag.window.to_string()));
        }
    }
    for window in registry.windows.values() {
        if let Some(target) = window.transient {
            if !registry.contains_window(target) {
                return Err(InvariantError::TransientMissing {
                    window: window.id.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    Ok(())
}
