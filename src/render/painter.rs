use std::collections::HashMap;

use glam::Vec2;

use crate::canvas::{Canvas, Color, Font, ImageId, Rect};

/// Page color painted by `clear_rect`.
const PAGE: egui::Color32 = egui::Color32::WHITE;

/// GPU textures the scene can blit from, keyed by scene-side id.
#[derive(Default)]
pub struct TextureRegistry {
    textures: HashMap<ImageId, (egui::TextureHandle, [f32; 2])>,
}

impl TextureRegistry {
    pub fn insert(&mut self, id: ImageId, handle: egui::TextureHandle) {
        let [w, h] = handle.size();
        self.textures.insert(id, (handle, [w as f32, h as f32]));
    }

    fn get(&self, id: ImageId) -> Option<&(egui::TextureHandle, [f32; 2])> {
        self.textures.get(&id)
    }
}

/// `Canvas` on top of an egui layer painter.
pub struct PainterCanvas<'a> {
    painter: egui::Painter,
    textures: &'a TextureRegistry,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: egui::Painter, textures: &'a TextureRegistry) -> Self {
        Self { painter, textures }
    }
}

fn to_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(to_pos(r.min()), to_pos(r.max()))
}

fn to_pos(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn to_color(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn to_font(font: &Font) -> egui::FontId {
    // Only the bundled proportional family is available.
    egui::FontId::proportional(font.size)
}

impl Canvas for PainterCanvas<'_> {
    fn clear_rect(&mut self, rect: Rect) {
        self.painter.rect_filled(to_rect(rect), 0.0, PAGE);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.painter.rect_filled(to_rect(rect), radius, to_color(color));
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, line_width: f32, color: Color) {
        self.painter.rect_stroke(
            to_rect(rect),
            radius,
            egui::Stroke::new(line_width, to_color(color)),
            egui::StrokeKind::Middle,
        );
    }

    fn measure_text(&self, text: &str, font: &Font) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), to_font(font), egui::Color32::BLACK)
            .size()
            .x
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &Font, color: Color) {
        self.painter.text(
            to_pos(pos),
            egui::Align2::CENTER_BOTTOM,
            text,
            to_font(font),
            to_color(color),
        );
    }

    fn draw_image(&mut self, image: ImageId, src: Rect, dst: Rect) {
        let Some((handle, [w, h])) = self.textures.get(image) else {
            return;
        };
        let uv = egui::Rect::from_min_max(
            egui::pos2(src.x / w, src.y / h),
            egui::pos2((src.x + src.w) / w, (src.y + src.h) / h),
        );
        self.painter
            .image(handle.id(), to_rect(dst), uv, egui::Color32::WHITE);
    }
}
