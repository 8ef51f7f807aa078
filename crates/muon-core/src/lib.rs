//! Muon Core: protocol-agnostic tiling window manager engine
//!
//! This crate contains the window model (monitors, windows, rules), the
//! root/stack tiling engine, the focus/floating/fullscreen state machine and
//! the command interpreter, with zero dependencies on display protocols.
//!
//! A display adapter implements [`Display`], translates server events into
//! [`CoreEvent`]s and feeds them to [`Core`]. Control-socket messages go to
//! [`Core::process_message`]. Core answers through [`Display::request`].
//!
//! # Quick Start
//! With the `testing` feature, `testing::FakeDisplay` stands in for a real
//! server:
//! ```
//! use muon_core::testing::FakeDisplay;
//! use muon_core::{Core, CoreEvent, WindowId};
//!
//! let mut display = FakeDisplay::single();
//! display.create_window(WindowId(0x40_0001), "xterm");
//!
//! let mut core = Core::new(display);
//! core.start().expect("display is reachable");
//!
//! // The display server reports a client asking to be shown
//! core.handle_event(CoreEvent::MapRequest { id: WindowId(0x40_0001) });
//!
//! // A control-socket message
//! assert_eq!(core.process_message("get root-count "), "1\n");
//! ```

pub mod command;
pub mod display;
pub mod event;
pub mod geometry;
pub mod invariants;
pub mod monitor;
pub mod node_list;
pub mod registry;
pub mod rule;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tiling;
pub mod window;

mod interpreter;
mod machine;
mod reconciler;

// Re-export primary API types at crate root
pub use command::{Command, CommandError};
pub use display::{Display, DisplayError};
pub use event::{CoreAction, CoreEvent};
pub use geometry::Geometry;
pub use monitor::MonitorId;
pub use window::WindowId;

use tracing::{debug, info, warn};

use state::{Batch, State};

/// The protocol-agnostic window manager engine.
///
/// Owns all WM state and the display it drives. Adapters feed it via
/// [`handle_event`](Core::handle_event) and [`exec`](Core::exec).
pub struct Core<D: Display> {
    /// All window-manager state
    pub state: State,
    display: D,
}

impl<D: Display> Core<D> {
    /// Create a core engine over a connected display.
    pub fn new(display: D) -> Self {
        Self {
            state: State::new(),
            display,
        }
    }

    pub const fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// `false` once `quit` has been processed.
    pub const fn is_running(&self) -> bool {
        self.state.running
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Discover monitors and adopt windows that are already on screen.
    pub fn start(&mut self) -> Result<(), DisplayError> {
        let screens = self.display.screens()?;
        if screens.is_empty() {
            return Err(DisplayError::Request("no screens reported".into()));
        }
        for geometry in screens {
            self.state.registry.add_monitor(geometry);
        }

        self.adopt_existing_windows()?;
        self.display.flush();

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after start: {}", e);
        }

        Ok(())
    }

    /// Release every window through the normal removal path.
    pub fn shutdown(&mut self) {
        info!("Releasing {} windows", self.state.registry.windows.len());

        // Suppress the intermediate arrangements
        self.state.batch = Some(Batch::default());
        for id in self.state.registry.client_list() {
            self.remove_window(id);
        }
        self.state.batch = None;

        self.display.flush();
    }

    fn adopt_existing_windows(&mut self) -> Result<(), DisplayError> {
        let mut last = None;

        for id in self.display.top_level_windows()? {
            let attributes = match self.display.window_attributes(id) {
                Ok(attributes) => attributes,
                Err(e) => {
                    warn!("Failed to read attributes of {}: {}", id, e);
                    continue;
                }
            };
            if attributes.override_redirect {
                debug!("Ignoring window {}: override-redirect", id);
                continue;
            }
            if !attributes.viewable {
                debug!("Ignoring window {}: not viewable", id);
                continue;
            }

            let monitor = match self.display.window_geometry(id) {
                Ok(geometry) => {
                    let (x, y) = geometry.center();
                    self.state.registry.find_monitor_at(x, y)
                }
                Err(e) => {
                    warn!("Failed to read geometry of {}: {}", id, e);
                    None
                }
            }
            .or_else(|| self.state.registry.current_monitor_id());

            let Some(monitor) = monitor else {
                continue;
            };
            if self.add_window(monitor, id) {
                last = Some(id);
            }
        }

        if let Some(id) = last {
            let monitors: Vec<MonitorId> = self.state.registry.monitors.keys().copied().collect();
            for monitor in monitors {
                self.arrange(monitor);
            }
            self.focus(Some(id));
        }

        Ok(())
    }

    // ── Event handling (display → core) ──────────────────────────────

    /// Process a display-server notification.
    pub fn handle_event(&mut self, event: CoreEvent) {
        self.reconcile(event);

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after handle_event: {}", e);
        }
    }

    // ── Commands (control socket → core) ─────────────────────────────

    /// Execute a command. Returns the response text for queries.
    pub fn exec(&mut self, command: Command) -> Option<String> {
        debug!("exec: {:?}", command);
        let response = self.execute_command(command);

        #[cfg(debug_assertions)]
        if let Err(e) = self.state.validate_invariants() {
            warn!("Invariant violation after exec: {}", e);
        }

        response
    }

    /// Parse and execute one control-socket message, producing the bytes to
    /// send back. Only unknown commands produce an error line; other
    /// malformed input is dropped silently.
    pub fn process_message(&mut self, message: &str) -> String {
        debug!("command: {}", message.trim_end());

        match Command::parse(message) {
            Ok(command) => self.exec(command).unwrap_or_default(),
            Err(CommandError::Unknown(name)) => format!("unknown command: {name}\n"),
            Err(e) => {
                debug!("Ignoring command `{}`: {}", message.trim(), e);
                String::new()
            }
        }
    }
}
