pub mod animation;

use glam::Vec2;

use self::animation::{AnimationState, Clip};
use crate::bubble::Anchor;
use crate::canvas::{Canvas, ImageId, Rect};

/// Closer than this (world units) counts as arrived.
pub const ARRIVAL_THRESHOLD: f32 = 5.0;
/// Sprite sheet cell size in pixels.
pub const FRAME_SIZE: f32 = 128.0;
/// On-screen sprite size.
pub const RENDER_SIZE: f32 = 128.0;

/// The walking duck.
#[derive(Debug, Clone)]
pub struct Duck {
    pub position: Vec2,
    /// Only `x` is used, as travel speed in units/second.
    pub velocity: Vec2,
    pub target: Vec2,
    pub sheet: ImageId,
    anim: AnimationState,
}

impl Duck {
    pub fn new(sheet: ImageId) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            target: Vec2::ZERO,
            sheet,
            anim: AnimationState::default(),
        }
    }

    pub fn clip(&self) -> Clip {
        self.anim.clip
    }

    pub fn frame(&self) -> u32 {
        self.anim.frame
    }

    pub fn set_clip(&mut self, clip: Clip) {
        if clip != self.anim.clip {
            log::debug!("duck clip {:?} -> {:?}", self.anim.clip, clip);
        }
        self.anim.set_clip(clip);
    }

    /// Head for `(x, y)`. Facing is decided here, once, from where the target lies.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
        let dir = self.position - self.target;
        if dir.x < 0.0 {
            self.set_clip(Clip::Walk);
        } else {
            self.set_clip(Clip::WalkReversed);
        }
    }

    /// Jump once in the current facing direction. A walking duck resumes walking
    /// (and idles on arrival as usual); anything else lands idle.
    pub fn jump(&mut self) {
        let clip = self.anim.clip;
        let after = match clip {
            Clip::Walk | Clip::WalkReversed => clip,
            _ => clip.idle(),
        };
        log::debug!("duck clip {:?} -> {:?}", clip, clip.jump());
        self.anim.play_once(clip.jump(), after);
    }

    pub fn update(&mut self, dt_ms: f32) {
        let to_target = self.target - self.position;
        if to_target.length() > ARRIVAL_THRESHOLD {
            self.position += to_target.normalize() * self.velocity.x * (dt_ms / 1000.0);
        } else {
            match self.anim.clip {
                Clip::Walk => self.set_clip(Clip::Idle),
                Clip::WalkReversed => self.set_clip(Clip::IdleReversed),
                _ => {}
            }
        }

        self.anim.advance(dt_ms);
    }

    /// Source cell of the current frame in the sheet.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.anim.frame as f32 * FRAME_SIZE,
            self.anim.clip.info().row as f32 * FRAME_SIZE,
            FRAME_SIZE,
            FRAME_SIZE,
        )
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        let origin = self.position - Vec2::splat(RENDER_SIZE / 2.0);
        canvas.draw_image(
            self.sheet,
            self.source_rect(),
            Rect::new(origin.x, origin.y, RENDER_SIZE, RENDER_SIZE),
        );
    }
}

impl Anchor for Duck {
    fn anchor_position(&self) -> Vec2 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::animation::FRAME_INTERVAL_MS;
    use super::*;
    use crate::canvas::testing::{Call, RecordingCanvas};

    fn duck_at(x: f32, y: f32) -> Duck {
        let mut duck = Duck::new(ImageId(0));
        duck.position = Vec2::new(x, y);
        duck
    }

    #[test]
    fn move_to_right_walks_forward() {
        let mut duck = duck_at(0.0, 0.0);
        duck.move_to(100.0, 0.0);
        assert_eq!(duck.clip(), Clip::Walk);
        assert_eq!(duck.target, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn move_to_left_or_straight_walks_reversed() {
        let mut duck = duck_at(50.0, 0.0);
        duck.move_to(-10.0, 0.0);
        assert_eq!(duck.clip(), Clip::WalkReversed);

        // Same x: not strictly to the right.
        duck.move_to(50.0, 300.0);
        assert_eq!(duck.clip(), Clip::WalkReversed);
    }

    #[test]
    fn walks_then_idles_on_arrival() {
        let mut duck = duck_at(0.0, 0.0);
        duck.velocity = Vec2::new(100.0, 0.0);
        duck.move_to(100.0, 0.0);

        let before = duck.target.distance(duck.position);
        duck.update(1000.0);
        let after = duck.target.distance(duck.position);
        assert!(after < before);
        assert!(after <= ARRIVAL_THRESHOLD);
        assert_eq!(duck.clip(), Clip::Walk);

        duck.update(16.0);
        assert_eq!(duck.clip(), Clip::Idle);
    }

    #[test]
    fn reversed_walk_idles_reversed() {
        let mut duck = duck_at(100.0, 0.0);
        duck.velocity = Vec2::new(50.0, 0.0);
        duck.move_to(0.0, 0.0);
        for _ in 0..200 {
            duck.update(16.0);
        }
        assert_eq!(duck.clip(), Clip::IdleReversed);
        assert!(duck.position.distance(duck.target) <= ARRIVAL_THRESHOLD);
    }

    #[test]
    fn step_uses_velocity_x_as_speed() {
        let mut duck = duck_at(0.0, 0.0);
        duck.velocity = Vec2::new(10.0, 999.0);
        duck.move_to(0.0, 100.0);
        duck.update(1000.0);
        assert!((duck.position - Vec2::new(0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn arrival_leaves_jump_alone() {
        let mut duck = duck_at(0.0, 0.0);
        duck.jump();
        assert_eq!(duck.clip(), Clip::Jump);
        duck.update(16.0);
        assert_eq!(duck.clip(), Clip::Jump);
    }

    #[test]
    fn jump_plays_once_then_idles() {
        let mut duck = duck_at(0.0, 0.0);
        duck.set_clip(Clip::Idle);
        duck.jump();
        assert_eq!(duck.clip(), Clip::Jump);
        for _ in 0..600 {
            duck.update(16.0);
        }
        assert_eq!(duck.clip(), Clip::Idle);

        duck.set_clip(Clip::IdleReversed);
        duck.jump();
        assert_eq!(duck.clip(), Clip::JumpReversed);
        for _ in 0..6 {
            duck.update(FRAME_INTERVAL_MS);
        }
        assert_eq!(duck.clip(), Clip::IdleReversed);
    }

    #[test]
    fn jump_mid_walk_resumes_walking_then_arrives_idle() {
        let mut duck = duck_at(0.0, 0.0);
        duck.velocity = Vec2::new(100.0, 0.0);
        duck.move_to(1000.0, 0.0);
        duck.jump();
        for _ in 0..6 {
            duck.update(FRAME_INTERVAL_MS);
        }
        assert_eq!(duck.clip(), Clip::Walk);

        for _ in 0..1000 {
            duck.update(16.0);
        }
        assert_eq!(duck.clip(), Clip::Idle);
    }

    #[test]
    fn frame_advances_with_update() {
        let mut duck = duck_at(0.0, 0.0);
        duck.set_clip(Clip::Idle);
        duck.update(FRAME_INTERVAL_MS);
        assert_eq!(duck.frame(), 1);
    }

    #[test]
    fn render_blits_current_cell_centered() {
        let mut duck = duck_at(200.0, 100.0);
        duck.set_clip(Clip::WalkReversed);
        duck.update(0.0);
        duck.update(FRAME_INTERVAL_MS);
        duck.update(FRAME_INTERVAL_MS);

        let mut canvas = RecordingCanvas::new();
        duck.render(&mut canvas);
        assert_eq!(
            canvas.calls,
            vec![Call::DrawImage(
                ImageId(0),
                Rect::new(256.0, 384.0, 128.0, 128.0),
                Rect::new(136.0, 36.0, 128.0, 128.0),
            )]
        );
    }
}
