//! Runtime configuration.
//!
//! Everything is given on the command line or through the environment;
//! layout defaults live in `muon_core::monitor`.

use std::path::PathBuf;

use clap::Parser;
use muon_x11::{BorderColors, Rgb};

/// Control socket used when neither `--socket` nor `MUON_SOCKET` is set.
pub const DEFAULT_SOCKET: &str = "/tmp/muon-socket";

/// Muon - a tiling window manager driven through a control socket
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the control socket
    #[arg(short, long, env = "MUON_SOCKET", default_value = DEFAULT_SOCKET)]
    pub socket: PathBuf,

    /// X display to manage (defaults to $DISPLAY)
    #[arg(long)]
    pub display: Option<String>,

    /// Border colour of the focused window
    #[arg(long, default_value = "#11809E", value_name = "#RRGGBB")]
    pub active_color: Rgb,

    /// Border colour of unfocused windows
    #[arg(long, default_value = "#3F3E3B", value_name = "#RRGGBB")]
    pub inactive_color: Rgb,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    pub const fn border_colors(&self) -> BorderColors {
        BorderColors {
            active: self.active_color,
            inactive: self.inactive_color,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
