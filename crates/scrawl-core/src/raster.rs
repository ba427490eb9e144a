//! Stroke rasterization into a [`Bitmap`].
//!
//! Shapes are rendered to an anti-aliased coverage mask with tiny-skia and
//! blended toward the ink level: `v' = v + (ink - v) * coverage`.

use crate::model::{Bitmap, PixelPoint};
use tiny_skia::{FillRule, LineCap, Mask, Path, PathBuilder, Stroke, Transform};

/// Paint color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ink {
    #[default]
    Black,
    /// Eraser.
    White,
}

impl Ink {
    pub fn luma(self) -> u8 {
        match self {
            Ink::Black => 0,
            Ink::White => 255,
        }
    }
}

/// A single paint operation on the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintOp {
    /// Filled circle, used for the first point of a stroke.
    Dot { center: PixelPoint, diameter: f64 },
    /// Round-capped segment between two consecutive drag points.
    Line {
        from: PixelPoint,
        to: PixelPoint,
        width: f64,
    },
}

impl PaintOp {
    /// Outline of the painted area in pixel-grid coordinates.
    fn path(&self) -> Option<Path> {
        match *self {
            PaintOp::Dot { center, diameter } => {
                if diameter.is_nan() || diameter <= 0.0 {
                    return None;
                }
                PathBuilder::from_circle(center.x as f32, center.y as f32, (diameter / 2.0) as f32)
            }
            PaintOp::Line { from, to, width } => {
                if from == to {
                    return PaintOp::Dot {
                        center: from,
                        diameter: width,
                    }
                    .path();
                }
                if width.is_nan() || width <= 0.0 {
                    return None;
                }
                let mut builder = PathBuilder::new();
                builder.move_to(from.x as f32, from.y as f32);
                builder.line_to(to.x as f32, to.y as f32);
                let centerline = builder.finish()?;
                let stroke = Stroke {
                    width: width as f32,
                    line_cap: LineCap::Round,
                    ..Stroke::default()
                };
                centerline.stroke(&stroke, 1.0)
            }
        }
    }
}

impl Bitmap {
    /// Rasterize `op` with `ink`. Returns `false` when nothing was touched
    /// (degenerate shape or entirely off-canvas).
    pub fn apply(&mut self, op: &PaintOp, ink: Ink) -> bool {
        let Some(path) = op.path() else {
            log::trace!("degenerate paint op {op:?}");
            return false;
        };
        let (width, height) = self.dimensions();
        let Some(mut mask) = Mask::new(width, height) else {
            return false;
        };
        // Pixel grid is y-up from the bottom edge; rows run top-down.
        let flip = Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, height as f32);
        mask.fill_path(&path, FillRule::Winding, true, flip);

        let target = u32::from(ink.luma());
        let mut touched = false;
        for (sample, &coverage) in self.samples_mut().iter_mut().zip(mask.data()) {
            if coverage == 0 {
                continue;
            }
            let c = u32::from(coverage);
            let blended = (u32::from(*sample) * (255 - c) + target * c + 127) / 255;
            *sample = blended as u8;
            touched = true;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PAPER;

    #[test]
    fn dot_paints_around_center() {
        let mut bitmap = Bitmap::blank(10, 10);
        let painted = bitmap.apply(
            &PaintOp::Dot {
                center: PixelPoint::new(5.0, 5.0),
                diameter: 4.0,
            },
            Ink::Black,
        );
        assert!(painted);
        // Pixel (5, 5) on the y-up grid is row 10 - 1 - 5 = 4.
        assert_eq!(bitmap.pixel(5, 4), Some(0));
        assert_eq!(bitmap.pixel(0, 0), Some(PAPER));
    }

    #[test]
    fn grid_bottom_is_last_row() {
        let mut bitmap = Bitmap::blank(4, 4);
        bitmap.apply(
            &PaintOp::Dot {
                center: PixelPoint::new(0.5, 0.5),
                diameter: 1.5,
            },
            Ink::Black,
        );
        assert!(bitmap.pixel(0, 3).unwrap() < 128);
        assert_eq!(bitmap.pixel(0, 0), Some(PAPER));
    }

    #[test]
    fn line_connects_endpoints() {
        let mut bitmap = Bitmap::blank(20, 5);
        bitmap.apply(
            &PaintOp::Line {
                from: PixelPoint::new(2.5, 2.5),
                to: PixelPoint::new(17.5, 2.5),
                width: 2.0,
            },
            Ink::Black,
        );
        for x in 3..17 {
            assert_eq!(bitmap.pixel(x, 2), Some(0), "gap at column {x}");
        }
        assert_eq!(bitmap.pixel(10, 0), Some(PAPER));
    }

    #[test]
    fn white_ink_erases() {
        let mut bitmap = Bitmap::blank(10, 10);
        let op = PaintOp::Dot {
            center: PixelPoint::new(5.0, 5.0),
            diameter: 6.0,
        };
        bitmap.apply(&op, Ink::Black);
        assert!(!bitmap.is_blank());
        let eraser = PaintOp::Dot {
            center: PixelPoint::new(5.0, 5.0),
            diameter: 10.0,
        };
        bitmap.apply(&eraser, Ink::White);
        assert!(bitmap.is_blank());
    }

    #[test]
    fn off_canvas_and_degenerate_ops_touch_nothing() {
        let mut bitmap = Bitmap::blank(8, 8);
        let off = PaintOp::Dot {
            center: PixelPoint::new(-50.0, -50.0),
            diameter: 2.0,
        };
        assert!(!bitmap.apply(&off, Ink::Black));
        let empty = PaintOp::Dot {
            center: PixelPoint::new(4.0, 4.0),
            diameter: 0.0,
        };
        assert!(!bitmap.apply(&empty, Ink::Black));
        assert!(bitmap.is_blank());
    }

    #[test]
    fn zero_length_line_stamps_a_dot() {
        let mut bitmap = Bitmap::blank(8, 8);
        let p = PixelPoint::new(4.0, 4.0);
        assert!(bitmap.apply(
            &PaintOp::Line {
                from: p,
                to: p,
                width: 3.0
            },
            Ink::Black
        ));
    }
}
