//! Platter widget - the rotating record
//!
//! Terminal cells are roughly twice as tall as wide, so all circle math
//! runs in a "square space" where rows count double. [`PlatterGeometry`]
//! exposes the same space to the app for hit testing and for the gesture
//! controller's center point.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Widget},
};
use revolve_library::Track;
use revolve_motion::{Point, RAD_TO_DEG};

use crate::theme::Theme;

/// Fraction of the platter radius taken by the record label
const LABEL_FRACTION: f64 = 0.38;

/// Half-width of the rotation marker in degrees
const MARKER_HALF_WIDTH_DEG: f64 = 7.0;

/// On-screen circle geometry of the platter, in square space
/// (x = column, y = row * 2)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlatterGeometry {
    pub center: Point,
    pub radius: f64,
}

impl PlatterGeometry {
    /// Geometry of the largest disc that fits `area`
    pub fn from_rect(area: Rect) -> Self {
        let cx = area.x as f64 + area.width as f64 / 2.0;
        let cy = (area.y as f64 + area.height as f64 / 2.0) * 2.0;
        let radius = (area.width as f64 / 2.0)
            .min(area.height as f64)
            .max(1.0);
        Self {
            center: Point::new(cx, cy),
            radius,
        }
    }

    /// Geometry for a widget's full (bordered) area
    ///
    /// Accounts for the border and the caption line, so hit tests in the
    /// app agree exactly with what [`PlatterWidget`] draws. Callers
    /// recompute this from the last rendered rectangle at gesture start,
    /// so layout changes are picked up without long-term caching.
    pub fn from_widget_area(area: Rect) -> Self {
        let inner = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };
        let disc = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        Self::from_rect(disc)
    }

    /// Map a terminal cell to square space
    pub fn to_square(column: u16, row: u16) -> Point {
        Point::new(column as f64 + 0.5, (row as f64 + 0.5) * 2.0)
    }

    /// Whether a terminal cell lies on the record surface
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let p = Self::to_square(column, row);
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Widget for the rotating record
pub struct PlatterWidget<'a> {
    theme: &'a Theme,
    rotation_deg: f64,
    track: Option<&'a Track>,
    drop_hover: bool,
    scratching: bool,
}

impl<'a> PlatterWidget<'a> {
    pub fn new(theme: &'a Theme, rotation_deg: f64) -> Self {
        Self {
            theme,
            rotation_deg,
            track: None,
            drop_hover: false,
            scratching: false,
        }
    }

    pub fn track(mut self, track: Option<&'a Track>) -> Self {
        self.track = track;
        self
    }

    /// Highlight the ring while a dragged track hovers over the record
    pub fn drop_hover(mut self, hover: bool) -> Self {
        self.drop_hover = hover;
        self
    }

    pub fn scratching(mut self, scratching: bool) -> Self {
        self.scratching = scratching;
        self
    }

    /// Angular distance between two angles in degrees, in [0, 180]
    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        if d > 180.0 {
            360.0 - d
        } else {
            d
        }
    }
}

impl Widget for PlatterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.scratching {
            " TURNTABLE ~ scratching "
        } else {
            " TURNTABLE "
        };
        let border_style = if self.drop_hover {
            self.theme.border_active()
        } else {
            self.theme.border()
        };
        let block = Block::default()
            .title(Line::styled(title, self.theme.title()))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 3 {
            return;
        }

        // Reserve a line under the disc for the track caption.
        let disc_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let geometry = PlatterGeometry::from_widget_area(area);
        let label_radius = geometry.radius * LABEL_FRACTION;
        let marker_deg = self.rotation_deg.rem_euclid(360.0);

        for row in disc_area.y..disc_area.y + disc_area.height {
            for column in disc_area.x..disc_area.x + disc_area.width {
                let p = PlatterGeometry::to_square(column, row);
                let dx = p.x - geometry.center.x;
                let dy = p.y - geometry.center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > geometry.radius {
                    continue;
                }

                let cell = &mut buf[(column, row)];

                if dist < 1.2 {
                    // Spindle hole
                    cell.set_char('o');
                    cell.set_style(self.theme.dim());
                } else if dist < label_radius {
                    cell.set_char(' ');
                    cell.set_style(self.theme.label_style());
                } else {
                    let cell_angle = dy.atan2(dx) * RAD_TO_DEG;
                    let on_marker =
                        Self::angular_distance(cell_angle, marker_deg) < MARKER_HALF_WIDTH_DEG;
                    if on_marker {
                        cell.set_char('█');
                        cell.set_style(self.theme.marker_style());
                    } else {
                        // Groove texture: alternate rings by radius parity.
                        let groove = if (dist as u32) % 2 == 0 { '░' } else { '▒' };
                        cell.set_char(groove);
                        cell.set_style(self.theme.vinyl_style());
                    }
                }
            }
        }

        // Caption line: track title/artist, or the drop hint.
        let caption = match self.track {
            Some(track) => format!("{} — {}", track.title, track.artist),
            None => "drop a track here".to_string(),
        };
        let caption_style = if self.track.is_some() {
            self.theme.normal()
        } else {
            self.theme.dim()
        };
        let y = inner.y + inner.height - 1;
        let x = inner.x + (inner.width.saturating_sub(caption.chars().count() as u16)) / 2;
        buf.set_string(x, y, caption, caption_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_center_is_middle_of_area() {
        let geometry = PlatterGeometry::from_rect(Rect::new(0, 0, 40, 20));
        assert!((geometry.center.x - 20.0).abs() < 1e-9);
        assert!((geometry.center.y - 20.0).abs() < 1e-9);
        assert!((geometry.radius - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_center_not_corner() {
        let geometry = PlatterGeometry::from_rect(Rect::new(0, 0, 40, 20));
        assert!(geometry.contains(20, 10));
        assert!(!geometry.contains(0, 0));
        assert!(!geometry.contains(39, 19));
    }

    #[test]
    fn test_widget_area_excludes_border_and_caption() {
        let geometry = PlatterGeometry::from_widget_area(Rect::new(0, 0, 42, 23));
        // Inner is 40x21, disc is 40x20: same circle as from_rect on that.
        let expected = PlatterGeometry::from_rect(Rect::new(1, 1, 40, 20));
        assert_eq!(geometry, expected);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((PlatterWidget::angular_distance(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((PlatterWidget::angular_distance(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((PlatterWidget::angular_distance(-10.0, 10.0) - 20.0).abs() < 1e-9);
    }
}
