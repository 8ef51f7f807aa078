//! Root/stack tiling.
//!
//! The monitor is split along its primary axis (width for
//! [`Layout::Vertical`], height for [`Layout::Horizontal`]) into a root band
//! holding up to `root_count` windows and a stack band holding the rest.
//! Inside a band, windows share the secondary axis equally and the last one
//! absorbs the rounding remainder. Slots never leave the monitor, however
//! large the gap or however many windows share a band, and a border is
//! narrowed until it fits inside its slot.
//!
//! Computation is pure; applying the result to the display is the caller's
//! business.

use crate::geometry::{self, Geometry};
use crate::monitor::{Layout, Monitor};
use crate::window::WindowId;

/// Where one tiled window goes.
///
/// `geometry` follows X conventions: the origin is the outer corner of the
/// border and the size excludes the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: WindowId,
    pub geometry: Geometry,
    pub border_width: u32,
}

impl Placement {
    /// The slot this window occupies on screen, border included.
    pub const fn outer(&self) -> Geometry {
        self.geometry.with_border(self.border_width)
    }
}

/// Compute placements for the monitor's tiled windows, given in list order.
pub fn tile(monitor: &Monitor, tiled: &[WindowId]) -> Vec<Placement> {
    let area = monitor.geometry;

    match tiled {
        [] => Vec::new(),
        [only] => vec![Placement {
            id: *only,
            geometry: area,
            border_width: 0,
        }],
        _ => {
            let wc = tiled.len();
            let rc = (monitor.root_count.max(1) as usize).min(wc);
            let subs = wc - rc;
            let (primary, _) = axes(area, monitor.layout);
            let root_len = ((primary as f32 * monitor.root_size) as u32).min(primary);

            let (root_band, stack_band) = if subs == 0 {
                (Band::new(0, primary), None)
            } else {
                let stack_offset = root_len.saturating_add(monitor.window_gap).min(primary);
                let stack_len = primary - stack_offset;
                if monitor.mirror {
                    (
                        Band::new(primary - root_len, root_len),
                        Some(Band::new(0, stack_len)),
                    )
                } else {
                    (
                        Band::new(0, root_len),
                        Some(Band::new(stack_offset, stack_len)),
                    )
                }
            };

            let mut placements = Vec::with_capacity(wc);
            let (roots, stack) = tiled.split_at(rc);
            fill_band(monitor, root_band, roots, &mut placements);
            if let Some(band) = stack_band {
                fill_band(monitor, band, stack, &mut placements);
            }
            placements
        }
    }
}

/// A stripe along the primary axis, relative to the monitor origin.
#[derive(Debug, Clone, Copy)]
struct Band {
    offset: u32,
    length: u32,
}

impl Band {
    const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }
}

/// (primary, secondary) extents of `area` for `layout`.
const fn axes(area: Geometry, layout: Layout) -> (u32, u32) {
    match layout {
        Layout::Vertical => (area.width, area.height),
        Layout::Horizontal => (area.height, area.width),
    }
}

fn fill_band(monitor: &Monitor, band: Band, ids: &[WindowId], out: &mut Vec<Placement>) {
    if ids.is_empty() {
        return;
    }

    let area = monitor.geometry;
    let (_, secondary) = axes(area, monitor.layout);
    let share = secondary / ids.len() as u32;
    let step = share.saturating_add(monitor.window_gap);
    let last = ids.len() - 1;

    for (i, &id) in ids.iter().enumerate() {
        let start = (i as u32).saturating_mul(step).min(secondary);
        let room = secondary - start;
        let length = if i == last { room } else { share.min(room) };

        let slot = match monitor.layout {
            Layout::Vertical => Geometry::new(
                geometry::offset(area.x, band.offset),
                geometry::offset(area.y, start),
                band.length,
                length,
            ),
            Layout::Horizontal => Geometry::new(
                geometry::offset(area.x, start),
                geometry::offset(area.y, band.offset),
                length,
                band.length,
            ),
        };

        // outer size must stay equal to the slot
        let border = monitor
            .border_width
            .min(slot.width.min(slot.height).saturating_sub(1) / 2);

        out.push(Placement {
            id,
            geometry: Geometry::new(
                slot.x,
                slot.y,
                slot.width - 2 * border,
                slot.height - 2 * border,
            ),
            border_width: border,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorId;
    use pretty_assertions::assert_eq;

    fn monitor(width: u32, height: u32) -> Monitor {
        Monitor::new(MonitorId(1), Geometry::new(0, 0, width, height))
    }

    fn ids(n: u32) -> Vec<WindowId> {
        (1..=n).map(WindowId).collect()
    }

    fn geometries(placements: &[Placement]) -> Vec<Geometry> {
        placements.iter().map(|p| p.geometry).collect()
    }

    #[test]
    fn test_empty_is_noop() {
        assert!(tile(&monitor(1920, 1080), &[]).is_empty());
    }

    #[test]
    fn test_single_window_takes_monitor_without_border() {
        let m = monitor(1920, 1080);
        let placements = tile(&m, &ids(1));
        assert_eq!(
            placements,
            vec![Placement {
                id: WindowId(1),
                geometry: Geometry::new(0, 0, 1920, 1080),
                border_width: 0,
            }]
        );
    }

    #[test]
    fn test_three_windows_vertical() {
        let m = monitor(1920, 1080);
        let placements = tile(&m, &ids(3));
        assert_eq!(
            geometries(&placements),
            vec![
                Geometry::new(0, 0, 1238, 1070),
                Geometry::new(1249, 0, 661, 530),
                Geometry::new(1249, 541, 661, 529),
            ]
        );
        assert!(placements.iter().all(|p| p.border_width == 5));
    }

    #[test]
    fn test_three_windows_vertical_mirrored() {
        let mut m = monitor(1920, 1080);
        m.mirror = true;
        let placements = tile(&m, &ids(3));
        assert_eq!(
            geometries(&placements),
            vec![
                Geometry::new(672, 0, 1238, 1070),
                Geometry::new(0, 0, 661, 530),
                Geometry::new(0, 541, 661, 529),
            ]
        );
    }

    #[test]
    fn test_three_windows_horizontal() {
        let mut m = monitor(1920, 1080);
        m.layout = Layout::Horizontal;
        let placements = tile(&m, &ids(3));
        // root band is 702 high, stack band 377
        assert_eq!(
            geometries(&placements),
            vec![
                Geometry::new(0, 0, 1910, 692),
                Geometry::new(0, 703, 950, 367),
                Geometry::new(961, 703, 949, 367),
            ]
        );
    }

    #[test]
    fn test_root_count_covers_all_windows() {
        let mut m = monitor(1000, 900);
        m.root_count = 5;
        m.mirror = true;
        let placements = tile(&m, &ids(3));
        // no stack band: root band spans the whole width even when mirrored
        assert!(placements.iter().all(|p| p.geometry.x == 0));
        assert!(placements.iter().all(|p| p.geometry.width == 990));
        assert_eq!(placements[2].outer().y + placements[2].outer().height as i32, 900);
    }

    #[test]
    fn test_huge_gap_keeps_slots_on_monitor() {
        let mut m = monitor(1920, 1080);
        m.window_gap = u32::MAX;
        let placements = tile(&m, &ids(3));
        assert_eq!(placements.len(), 3);
        for p in &placements {
            let outer = p.outer();
            assert!(outer.x >= 0 && outer.right() <= 1920, "{outer}");
            assert!(outer.y >= 0 && outer.bottom() <= 1080, "{outer}");
        }
        assert_eq!(placements[0].outer(), Geometry::new(0, 0, 1248, 1080));
    }

    #[test]
    fn test_huge_border_shrinks_to_fit_slot() {
        let mut m = monitor(1920, 1080);
        m.border_width = 3_000_000_000;
        let placements = tile(&m, &ids(3));
        for p in &placements {
            let outer = p.outer();
            assert!(p.border_width < 540);
            assert!(outer.right() <= 1920 && outer.bottom() <= 1080, "{outer}");
        }
        // root slot is 1248x1080, so the border stops at 539
        assert_eq!(placements[0].border_width, 539);
        assert_eq!(placements[0].geometry, Geometry::new(0, 0, 170, 2));
    }

    #[test]
    fn test_crowded_band_stops_at_edge() {
        let mut m = monitor(1920, 10);
        m.window_gap = 4;
        m.border_width = 0;
        let placements = tile(&m, &ids(6));
        assert_eq!(placements.len(), 6);
        for p in &placements {
            let outer = p.outer();
            assert!(outer.y >= 0 && outer.bottom() <= 10, "{outer}");
        }
    }

    #[test]
    fn test_padding_offsets_slots() {
        let mut m = monitor(1920, 1080);
        m.padding.top = 30;
        m.update_geometry();
        let placements = tile(&m, &ids(2));
        assert_eq!(placements[0].geometry.y, 30);
        assert_eq!(placements[1].outer().y + placements[1].outer().height as i32, 1080);
    }
}
