//! Monitors and their layout parameters.

use serde::Serialize;

use crate::geometry::{Geometry, Padding};
use crate::node_list::NodeList;
use crate::window::WindowId;

pub const DEFAULT_ROOT_COUNT: u32 = 1;
pub const DEFAULT_ROOT_SIZE: f32 = 0.65;
pub const DEFAULT_MIRROR: bool = false;
pub const DEFAULT_LAYOUT: Layout = Layout::Vertical;
pub const DEFAULT_WINDOW_GAP: u32 = 1;
pub const DEFAULT_BORDER_WIDTH: u32 = 5;

pub const ROOT_SIZE_MIN: f32 = 0.1;
pub const ROOT_SIZE_MAX: f32 = 0.9;

/// Sequential monitor identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonitorId(pub u32);

impl std::fmt::Display for MonitorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation of the root/stack split.
///
/// `Vertical` puts the root band on the left (or right when mirrored) with
/// windows stacked top to bottom inside each band. `Horizontal` is the same
/// arrangement transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Horizontal,
    Vertical,
}

impl Layout {
    const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    const fn index(self) -> usize {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
        }
    }

    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// One physical output.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub id: MonitorId,
    /// Rectangle reported by the display topology.
    pub base_geometry: Geometry,
    pub padding: Padding,
    /// `base_geometry` shrunk by `padding`.
    pub geometry: Geometry,
    pub windows: NodeList<WindowId>,
    pub window_count: u32,
    pub floating_count: u32,
    pub root_count: u32,
    pub root_size: f32,
    pub mirror: bool,
    pub layout: Layout,
    pub border_width: u32,
    pub window_gap: u32,
    pub curwin: Option<WindowId>,
    pub fullscreen: Option<WindowId>,
}

impl Monitor {
    pub fn new(id: MonitorId, base_geometry: Geometry) -> Self {
        Self {
            id,
            base_geometry,
            padding: Padding::default(),
            geometry: base_geometry,
            windows: NodeList::new(),
            window_count: 0,
            floating_count: 0,
            root_count: DEFAULT_ROOT_COUNT,
            root_size: DEFAULT_ROOT_SIZE,
            mirror: DEFAULT_MIRROR,
            layout: DEFAULT_LAYOUT,
            border_width: DEFAULT_BORDER_WIDTH,
            window_gap: DEFAULT_WINDOW_GAP,
            curwin: None,
            fullscreen: None,
        }
    }

    /// Restore every layout parameter to its default.
    pub fn reset_parameters(&mut self) {
        self.root_count = DEFAULT_ROOT_COUNT;
        self.root_size = DEFAULT_ROOT_SIZE;
        self.mirror = DEFAULT_MIRROR;
        self.layout = DEFAULT_LAYOUT;
        self.window_gap = DEFAULT_WINDOW_GAP;
        self.border_width = DEFAULT_BORDER_WIDTH;
    }

    /// Recompute the effective geometry after a padding or topology change.
    pub fn update_geometry(&mut self) {
        self.geometry = self.base_geometry.shrink(self.padding);
    }

    /// Number of windows the tiling engine places.
    pub const fn tiled_count(&self) -> u32 {
        self.window_count.saturating_sub(self.floating_count)
    }

    /// Upper bound for `root_count`; never below one.
    pub fn max_root_count(&self) -> u32 {
        self.window_count.max(1)
    }

    /// Apply an absolute or relative `root_count` change, clamped to
    /// `[1, window_count]`. Returns whether the value changed.
    pub fn adjust_root_count(&mut self, value: i64, relative: bool) -> bool {
        let requested = if relative {
            i64::from(self.root_count).saturating_add(value)
        } else {
            value
        };
        let clamped = requested.clamp(1, i64::from(self.max_root_count())) as u32;
        if clamped == self.root_count {
            return false;
        }
        self.root_count = clamped;
        true
    }

    /// Set the gap between tiled windows, at most the monitor's shorter side.
    pub fn set_window_gap(&mut self, gap: u32) {
        self.window_gap = gap.min(self.shorter_side());
    }

    /// Set the border width, at most half the monitor's shorter side.
    pub fn set_border_width(&mut self, width: u32) {
        self.border_width = width.min(self.shorter_side() / 2);
    }

    const fn shorter_side(&self) -> u32 {
        if self.geometry.width < self.geometry.height {
            self.geometry.width
        } else {
            self.geometry.height
        }
    }

    /// Apply an absolute or relative `root_size` change, clamped to
    /// `[ROOT_SIZE_MIN, ROOT_SIZE_MAX]`. Returns whether the value changed.
    #[allow(clippy::float_cmp)]
    pub fn adjust_root_size(&mut self, value: f32, relative: bool) -> bool {
        let requested = if relative {
            self.root_size + value
        } else {
            value
        };
        let clamped = requested.clamp(ROOT_SIZE_MIN, ROOT_SIZE_MAX);
        if clamped.is_nan() || clamped == self.root_size {
            return false;
        }
        self.root_size = clamped;
        true
    }
}
