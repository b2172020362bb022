use glam::Vec2;

/// Axis-aligned rectangle in canvas units (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb_hex(0x000000);

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn from_rgb_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 0xff,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS-style `#rrggbbaa`.
    #[cfg(test)]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Font request. The family is a hint; surfaces map it to whatever they have.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f32,
    pub family: &'static str,
}

/// Handle to an image registered with the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// 2D drawing surface the scene renders into.
///
/// The core only consumes this capability set; the host owns the actual surface.
pub trait Canvas {
    fn clear_rect(&mut self, rect: Rect);

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color);

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, line_width: f32, color: Color);

    /// Rendered width of `text` in canvas units.
    fn measure_text(&self, text: &str, font: &Font) -> f32;

    /// Draw `text` horizontally centered on `pos.x`, with `pos.y` as the baseline.
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &Font, color: Color);

    /// Blit the `src` pixel region of `image` into `dst`.
    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// One recorded canvas call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Clear(Rect),
        FillRoundRect(Rect, f32, Color),
        StrokeRoundRect(Rect, f32, f32, Color),
        FillText(String, Vec2, Color),
        DrawImage(ImageId, Rect, Rect),
    }

    /// Canvas double that records calls and measures text at a fixed advance per char.
    pub struct RecordingCanvas {
        pub calls: Vec<Call>,
        pub char_width: f32,
    }

    impl RecordingCanvas {
        pub fn new() -> Self {
            Self {
                calls: Vec::new(),
                char_width: 10.0,
            }
        }
    }

    impl Canvas for RecordingCanvas {
        fn clear_rect(&mut self, rect: Rect) {
            self.calls.push(Call::Clear(rect));
        }

        fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
            self.calls.push(Call::FillRoundRect(rect, radius, color));
        }

        fn stroke_round_rect(&mut self, rect: Rect, radius: f32, line_width: f32, color: Color) {
            self.calls
                .push(Call::StrokeRoundRect(rect, radius, line_width, color));
        }

        fn measure_text(&self, text: &str, _font: &Font) -> f32 {
            text.chars().count() as f32 * self.char_width
        }

        fn fill_text(&mut self, text: &str, pos: Vec2, _font: &Font, color: Color) {
            self.calls.push(Call::FillText(text.to_owned(), pos, color));
        }

        fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) {
            self.calls.push(Call::DrawImage(image, src, dst));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_zero_padded() {
        let c = Color::from_rgb_hex(0xcccccc).with_alpha(0x07);
        assert_eq!(c.to_hex(), "#cccccc07");
        assert_eq!(Color::BLACK.with_alpha(0).to_hex(), "#00000000");
    }

    #[test]
    fn rect_corners() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.min(), Vec2::new(10.0, 20.0));
        assert_eq!(r.max(), Vec2::new(40.0, 60.0));
    }
}
