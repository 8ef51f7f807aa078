//! Control-socket command language.
//!
//! A message is a line of space-separated tokens; the first names the
//! command. Parsing is separate from execution so that malformed input can
//! be rejected before anything is touched.

use std::str::{FromStr, SplitWhitespace};

use crate::geometry::Edge;
use crate::rule::RuleAttribute;
use crate::state::GrabAction;
use crate::window::WindowId;

/// Why a message did not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0}: missing argument")]
    MissingArgument(&'static str),

    #[error("{command}: invalid argument `{argument}`")]
    InvalidArgument {
        command: &'static str,
        argument: String,
    },
}

/// Three-way switch for boolean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enable,
    Disable,
    Switch,
}

impl Toggle {
    pub const fn apply(self, value: bool) -> bool {
        match self {
            Self::Enable => true,
            Self::Disable => false,
            Self::Switch => !value,
        }
    }
}

impl FromStr for Toggle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle" => Ok(Self::Switch),
            "on" | "true" => Ok(Self::Enable),
            "off" | "false" => Ok(Self::Disable),
            _ => Err(()),
        }
    }
}

/// A value set outright, or moved by a signed step (`+2`, `-0.05`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment<T> {
    Absolute(T),
    Relative(T),
}

impl<T: FromStr> FromStr for Adjustment<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse()?;
        if s.starts_with('+') || s.starts_with('-') {
            Ok(Self::Relative(value))
        } else {
            Ok(Self::Absolute(value))
        }
    }
}

/// Target of `select-window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Steps through list order; negative goes backwards.
    Relative(i32),
    /// A window id in hexadecimal.
    Absolute(WindowId),
}

impl FromStr for Selection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('+') || s.starts_with('-') {
            s.parse().map(Self::Relative).map_err(|_| ())
        } else {
            s.parse().map(Self::Absolute).map_err(|_| ())
        }
    }
}

/// Readable settings of the current monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    RootSize,
    RootCount,
    WindowGap,
    BorderWidth,
    Fullscreen,
    Mirror,
    Layout,
}

impl FromStr for Parameter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root-size" => Ok(Self::RootSize),
            "root-count" => Ok(Self::RootCount),
            "window-gap" => Ok(Self::WindowGap),
            "border-width" => Ok(Self::BorderWidth),
            "fullscreen" => Ok(Self::Fullscreen),
            "mirror" => Ok(Self::Mirror),
            "layout" => Ok(Self::Layout),
            _ => Err(()),
        }
    }
}

/// A parsed control-socket command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Begin,
    End,
    DebugWindow,

    // Layout parameters
    RootCount(Adjustment<i64>),
    RootSize(Adjustment<f32>),
    WindowGap(u32),
    BorderWidth(u32),
    Padding(Edge, u32),
    Mirror(Toggle),
    NextLayout,
    PreviousLayout,
    ResetLayout,
    Get(Parameter),

    // Window placement
    Fullscreen(Toggle),
    MakeRoot,
    SelectWindow(Selection),
    ShiftWindow(i32),
    ToggleFloating,
    CloseWindow,
    FocusWindow,

    // Rules
    Rule {
        name: String,
        attribute: RuleAttribute,
    },

    // Pointer drag
    GrabPointer(GrabAction),
    TrackPointer {
        x: i32,
        y: i32,
    },
    UngrabPointer,
}

impl Command {
    /// Parse one message. Extra trailing tokens are ignored.
    pub fn parse(s: &str) -> Result<Self, CommandError> {
        let mut tokens = s.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;
        let mut args = Args {
            command: "",
            tokens,
        };

        let command = match name {
            "quit" => Self::Quit,
            "begin" => Self::Begin,
            "end" => Self::End,
            "debug-window" => Self::DebugWindow,

            "root-count" => Self::RootCount(args.named("root-count").parse()?),
            "root-size" => Self::RootSize(args.named("root-size").parse()?),
            "window-gap" => Self::WindowGap(args.named("window-gap").parse()?),
            "border-width" => Self::BorderWidth(args.named("border-width").parse()?),
            "padding" => {
                let args = args.named("padding");
                let edge = args.parse()?;
                Self::Padding(edge, args.parse()?)
            }
            "mirror" => Self::Mirror(args.named("mirror").parse()?),
            "next-layout" => Self::NextLayout,
            "previous-layout" => Self::PreviousLayout,
            "reset-layout" => Self::ResetLayout,
            "get" => Self::Get(args.named("get").parse()?),

            "fullscreen" => Self::Fullscreen(args.named("fullscreen").parse()?),
            "make-root" => Self::MakeRoot,
            "select-window" => Self::SelectWindow(args.named("select-window").parse()?),
            "shift-window" => Self::ShiftWindow(args.named("shift-window").parse()?),
            "toggle-floating" => Self::ToggleFloating,
            "close-window" => Self::CloseWindow,
            "focus-window" => Self::FocusWindow,

            "rule" => {
                let args = args.named("rule");
                let name = args.token()?.to_owned();
                Self::Rule {
                    name,
                    attribute: args.parse()?,
                }
            }

            "grab-pointer" => Self::GrabPointer(args.named("grab-pointer").parse()?),
            "track-pointer" => {
                let args = args.named("track-pointer");
                let x = args.parse()?;
                Self::TrackPointer { x, y: args.parse()? }
            }
            "ungrab-pointer" => Self::UngrabPointer,

            _ => return Err(CommandError::Unknown(name.to_owned())),
        };

        Ok(command)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Remaining tokens of a message, tagged with the command they belong to.
struct Args<'a> {
    command: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn named(&mut self, command: &'static str) -> &mut Self {
        self.command = command;
        self
    }

    fn token(&mut self) -> Result<&'a str, CommandError> {
        self.tokens
            .next()
            .ok_or(CommandError::MissingArgument(self.command))
    }

    fn parse<T: FromStr>(&mut self) -> Result<T, CommandError> {
        let token = self.token()?;
        token.parse().map_err(|_| CommandError::InvalidArgument {
            command: self.command,
            argument: token.to_owned(),
        })
    }
}
