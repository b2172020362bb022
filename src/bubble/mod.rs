use glam::Vec2;

use crate::canvas::{Canvas, Color, Font, Rect};

/// Opacity change per second, in percentage points.
pub const FADE_RATE: f32 = 95.0;
/// Opacity scale. 0 is invisible, 100 fully opaque.
pub const OPACITY_MAX: f32 = 100.0;

/// Box offset from the anchor (above the duck's head).
const OFFSET: Vec2 = Vec2::new(0.0, -150.0);
const PADDING: Vec2 = Vec2::new(16.0, 16.0);
const HEIGHT: f32 = 50.0;
/// Width before the first text measurement.
const INITIAL_WIDTH: f32 = 250.0;
const CORNER_RADIUS: f32 = 15.0;
const LINE_WIDTH: f32 = 2.0;
const BACKGROUND: Color = Color::from_rgb_hex(0xcccccc);
const FONT: Font = Font {
    size: 24.0,
    family: "Times New Roman",
};

/// Anything with a readable position a bubble can follow.
pub trait Anchor {
    fn anchor_position(&self) -> Vec2;
}

/// Index of an anchor entity in the scene. Non-owning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Speech bubble that fades in and out above an anchor.
#[derive(Debug, Clone)]
pub struct Bubble {
    pub position: Vec2,
    state: BubbleState,
    opacity: f32,
    message: Option<String>,
    anchor: Option<AnchorId>,
    width: f32,
}

impl Default for Bubble {
    fn default() -> Self {
        Self::new()
    }
}

impl Bubble {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            state: BubbleState::Closed,
            opacity: 0.0,
            message: None,
            anchor: None,
            width: INITIAL_WIDTH,
        }
    }

    pub fn state(&self) -> BubbleState {
        self.state
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    pub fn bind(&mut self, anchor: AnchorId) {
        self.anchor = Some(anchor);
    }

    pub fn unbind(&mut self) {
        self.anchor = None;
    }

    /// Start fading in with `text`. Ignored unless fully closed.
    pub fn open(&mut self, text: impl Into<String>) -> bool {
        if self.state != BubbleState::Closed {
            return false;
        }
        let text = text.into();
        log::debug!("bubble opening: {text:?}");
        self.message = Some(text);
        self.state = BubbleState::Opening;
        true
    }

    /// Start fading out. Ignored unless opening or open.
    pub fn close(&mut self) -> bool {
        match self.state {
            BubbleState::Opening | BubbleState::Open => {
                log::debug!("bubble closing");
                self.state = BubbleState::Closing;
                true
            }
            BubbleState::Closed | BubbleState::Closing => false,
        }
    }

    /// Follow `anchor` (if any), then step the fade.
    pub fn update(&mut self, dt_ms: f32, anchor: Option<&dyn Anchor>) {
        if let Some(anchor) = anchor {
            self.position = anchor.anchor_position();
        }

        let step = dt_ms / 1000.0 * FADE_RATE;
        match self.state {
            BubbleState::Closing => {
                self.opacity -= step;
                if self.opacity <= 0.0 {
                    self.opacity = 0.0;
                    self.message = None;
                    self.state = BubbleState::Closed;
                    log::debug!("bubble closed");
                }
            }
            BubbleState::Opening => {
                self.opacity += step;
                if self.opacity >= OPACITY_MAX {
                    self.opacity = OPACITY_MAX;
                    self.state = BubbleState::Open;
                    log::debug!("bubble open");
                }
            }
            BubbleState::Open | BubbleState::Closed => {}
        }
    }

    /// Box rectangle for the current position and width.
    fn frame_rect(&self) -> Rect {
        let x = self.position.x + OFFSET.x - self.width / 2.0;
        let y = self.position.y + OFFSET.y;
        Rect::new(
            x - PADDING.x,
            y - PADDING.y,
            self.width + PADDING.x,
            HEIGHT + PADDING.y,
        )
    }

    /// Draw the box and text. The width adapts to the measured text for the next frame.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let Some(message) = self.message.as_deref() else {
            return;
        };

        let alpha = alpha_byte(self.opacity);
        let ink = Color::BLACK.with_alpha(alpha);
        let rect = self.frame_rect();
        canvas.fill_round_rect(rect, CORNER_RADIUS, BACKGROUND.with_alpha(alpha));
        canvas.stroke_round_rect(rect, CORNER_RADIUS, LINE_WIDTH, ink);

        let x = rect.x + PADDING.x;
        let y = rect.y + PADDING.y;
        let text_pos = Vec2::new(x + self.width / 2.0 - PADDING.x / 2.0, y + HEIGHT / 2.0);
        canvas.fill_text(message, text_pos, &FONT, ink);

        self.width = canvas.measure_text(message, &FONT);
    }
}

/// Map opacity (0..=100) onto an alpha byte.
pub fn alpha_byte(opacity: f32) -> u8 {
    let normalized = opacity / OPACITY_MAX;
    (255.0 * normalized).floor().clamp(0.0, 255.0) as u8
}
