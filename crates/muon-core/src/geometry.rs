//! Rectangles in display coordinates.

use serde::Serialize;

/// Geometry of a rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    #[allow(clippy::cast_possible_wrap)]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.x as i64 && x < self.right() && y >= self.y as i64 && y < self.bottom()
    }

    pub const fn intersects(self, other: Self) -> bool {
        (self.x as i64) < other.right()
            && self.right() > other.x as i64
            && (self.y as i64) < other.bottom()
            && self.bottom() > other.y as i64
    }

    /// One past the rightmost column.
    pub const fn right(self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// One past the bottom row.
    pub const fn bottom(self) -> i64 {
        self.y as i64 + self.height as i64
    }

    #[allow(clippy::cast_possible_wrap)]
    pub const fn center(self) -> (i32, i32) {
        (
            self.x.saturating_add((self.width / 2) as i32),
            self.y.saturating_add((self.height / 2) as i32),
        )
    }

    /// Shrink by the given edge insets. Insets larger than the rectangle
    /// collapse it to zero size rather than wrapping.
    pub const fn shrink(self, padding: Padding) -> Self {
        Self {
            x: offset(self.x, padding.left),
            y: offset(self.y, padding.top),
            width: self
                .width
                .saturating_sub(padding.left)
                .saturating_sub(padding.right),
            height: self
                .height
                .saturating_sub(padding.top)
                .saturating_sub(padding.bottom),
        }
    }

    /// The outer rectangle of a window whose inner size is `self` and whose
    /// border is `border` wide. The origin is the border's top-left corner.
    pub const fn with_border(self, border: u32) -> Self {
        Self {
            x: self.x,
            y: self.y,
            width: self.width.saturating_add(border.saturating_mul(2)),
            height: self.height.saturating_add(border.saturating_mul(2)),
        }
    }

    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// `base + delta`, saturating at the ends of the coordinate space.
#[allow(clippy::cast_possible_wrap)]
pub const fn offset(base: i32, delta: u32) -> i32 {
    if delta > i32::MAX as u32 {
        base.saturating_add(i32::MAX)
    } else {
        base.saturating_add(delta as i32)
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Edge insets reserved on a monitor (for panels and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// One side of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl std::str::FromStr for Edge {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

impl Padding {
    pub fn set(&mut self, edge: Edge, value: u32) {
        match edge {
            Edge::Top => self.top = value,
            Edge::Bottom => self.bottom = value,
            Edge::Left => self.left = value,
            Edge::Right => self.right = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let geo = Geometry::new(10, 20, 100, 50);
        assert!(geo.contains(10, 20));
        assert!(geo.contains(109, 69));
        assert!(!geo.contains(110, 20));
        assert!(!geo.contains(10, 70));
        assert!(!geo.contains(9, 20));
    }

    #[test]
    fn test_shrink_by_padding() {
        let geo = Geometry::new(0, 0, 1920, 1080);
        let padding = Padding {
            top: 20,
            bottom: 10,
            left: 5,
            right: 15,
        };
        assert_eq!(geo.shrink(padding), Geometry::new(5, 20, 1900, 1050));
    }

    #[test]
    fn test_shrink_saturates() {
        let geo = Geometry::new(0, 0, 100, 100);
        let padding = Padding {
            top: 80,
            bottom: 80,
            left: 0,
            right: 0,
        };
        assert_eq!(geo.shrink(padding).height, 0);
    }

    #[test]
    fn test_with_border_and_intersects() {
        let inner = Geometry::new(0, 0, 90, 40);
        let outer = inner.with_border(5);
        assert_eq!(outer, Geometry::new(0, 0, 100, 50));
        assert!(outer.intersects(Geometry::new(99, 49, 10, 10)));
        assert!(!outer.intersects(Geometry::new(100, 0, 10, 10)));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let huge = Padding {
            top: u32::MAX,
            bottom: 0,
            left: u32::MAX,
            right: 0,
        };
        let shrunk = Geometry::new(1920, 0, 1280, 1024).shrink(huge);
        assert_eq!((shrunk.x, shrunk.y), (i32::MAX, i32::MAX));
        assert_eq!((shrunk.width, shrunk.height), (0, 0));

        let edge = Geometry::new(i32::MAX, 0, u32::MAX, 10);
        assert!(edge.contains(i32::MAX, 5));
        assert_eq!(edge.center().0, i32::MAX);
        assert_eq!(edge.with_border(u32::MAX).width, u32::MAX);
    }

    #[test]
    fn test_edge_parse() {
        assert_eq!("left".parse::<Edge>(), Ok(Edge::Left));
        assert!("middle".parse::<Edge>().is_err());
    }
}
