//! Draw surface trait and a recording implementation

use crate::foundation::math::{Color, Rect, Vec2};

/// Something the engine can draw 2D primitives onto
///
/// Colors carry their own alpha; implementations alpha-blend over what is
/// already on the surface.
pub trait Surface {
    /// Surface size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline an axis-aligned rectangle
    fn stroke_rect(&mut self, rect: Rect, color: Color);

    /// Fill a circle of `diameter` centered on `center`, rotated by `rotation` degrees
    fn fill_circle(&mut self, center: Vec2, diameter: f32, rotation: f32, color: Color);

    /// Called by the main loop once a frame is fully drawn
    fn present(&mut self) {}
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle
    FillRect {
        /// Area filled
        rect: Rect,
        /// Fill color
        color: Color,
    },

    /// Rectangle outline
    StrokeRect {
        /// Area outlined
        rect: Rect,
        /// Line color
        color: Color,
    },

    /// Filled, rotated circle
    FillCircle {
        /// Circle center
        center: Vec2,
        /// Circle diameter
        diameter: f32,
        /// Rotation in degrees
        rotation: f32,
        /// Fill color
        color: Color,
    },
}

/// Surface that stores every draw call instead of rasterizing it
///
/// Used for headless runs and to assert on what a frame drew.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty recording surface of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every command recorded since the last [`clear`](Self::clear)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget all recorded commands (call at the start of a frame)
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded circle fills
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, diameter: f32, rotation: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            diameter,
            rotation,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_records_in_order() {
        let mut surface = RecordingSurface::new(320, 240);
        surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
        surface.fill_circle(Vec2::new(5.0, 5.0), 4.0, 0.0, Color::WHITE);

        assert_eq!(surface.size(), (320, 240));
        assert_eq!(surface.commands().len(), 2);
        assert!(matches!(surface.commands()[0], DrawCommand::FillRect { .. }));
        assert_eq!(surface.circle_count(), 1);

        surface.clear();
        assert!(surface.commands().is_empty());
    }
}
