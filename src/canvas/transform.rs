use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 4.0;

/// Pan/zoom state for the infinite canvas.
///
/// Screen and canvas space are related by `screen = canvas * scale + offset`.
/// The offset is unbounded; the scale is clamped to [MIN_SCALE, MAX_SCALE].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self { scale: 1.0, offset: Vec2::ZERO }
    }
}

impl CanvasTransform {
    pub fn new(scale: f32, offset: Vec2) -> Self {
        Self { scale: scale.clamp(MIN_SCALE, MAX_SCALE), offset }
    }

    /// Multiply the scale by `factor`, keeping `focal` (a screen point)
    /// visually stationary. When the clamp leaves the scale unchanged the
    /// offset is left alone too.
    pub fn zoom(&mut self, factor: f32, focal: Pos2) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if new_scale == self.scale {
            return;
        }
        let f = focal.to_vec2();
        self.offset = f - (f - self.offset) * (new_scale / self.scale);
        self.scale = new_scale;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn screen_to_canvas(&self, p: Pos2) -> Pos2 {
        ((p.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    pub fn canvas_to_screen(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
