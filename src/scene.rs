use crate::bubble::{Anchor, AnchorId, Bubble};
use crate::canvas::{Canvas, Rect};
use crate::duck::Duck;

/// Index of a bubble in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleId(pub usize);

/// Fire-once deferred action, counted down by tick deltas.
#[derive(Debug, Clone, Copy)]
struct PendingClose {
    bubble: BubbleId,
    remaining_ms: f32,
}

/// Everything that updates and renders each tick.
///
/// Entities live for the whole scene; the lists only grow.
pub struct Scene {
    width: f32,
    height: f32,
    ducks: Vec<Duck>,
    bubbles: Vec<Bubble>,
    pending: Vec<PendingClose>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ducks: Vec::new(),
            bubbles: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn add_duck(&mut self, duck: Duck) -> AnchorId {
        self.ducks.push(duck);
        AnchorId(self.ducks.len() - 1)
    }

    pub fn add_bubble(&mut self, bubble: Bubble) -> BubbleId {
        self.bubbles.push(bubble);
        BubbleId(self.bubbles.len() - 1)
    }

    pub fn duck(&self, id: AnchorId) -> Option<&Duck> {
        self.ducks.get(id.0)
    }

    pub fn duck_mut(&mut self, id: AnchorId) -> Option<&mut Duck> {
        self.ducks.get_mut(id.0)
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(id.0)
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.get_mut(id.0)
    }

    /// Close `bubble` once `delay_ms` of tick time has passed. Each call is independent.
    pub fn schedule_close(&mut self, bubble: BubbleId, delay_ms: f32) {
        self.pending.push(PendingClose {
            bubble,
            remaining_ms: delay_ms,
        });
    }

    pub fn pending_closes(&self) -> usize {
        self.pending.len()
    }

    pub fn update(&mut self, dt_ms: f32) {
        for duck in &mut self.ducks {
            duck.update(dt_ms);
        }

        for bubble in &mut self.bubbles {
            let anchor = bubble
                .anchor()
                .and_then(|id| self.ducks.get(id.0))
                .map(|duck| duck as &dyn Anchor);
            bubble.update(dt_ms, anchor);
        }

        self.run_pending(dt_ms);
    }

    fn run_pending(&mut self, dt_ms: f32) {
        for p in &mut self.pending {
            p.remaining_ms -= dt_ms;
        }

        let bubbles = &mut self.bubbles;
        self.pending.retain(|p| {
            if p.remaining_ms > 0.0 {
                return true;
            }
            if let Some(bubble) = bubbles.get_mut(p.bubble.0) {
                bubble.close();
            }
            false
        });
    }

    /// Clear, then ducks, then bubbles on top.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear_rect(Rect::new(0.0, 0.0, self.width, self.height));
        for duck in &self.ducks {
            duck.render(canvas);
        }
        for bubble in &mut self.bubbles {
            bubble.draw(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::bubble::BubbleState;
    use crate::canvas::testing::{Call, RecordingCanvas};
    use crate::canvas::ImageId;
    use crate::duck::animation::Clip;

    fn walking_scene() -> (Scene, AnchorId, BubbleId) {
        let mut scene = Scene::new(800.0, 600.0);
        let mut duck = Duck::new(ImageId(1));
        duck.position = Vec2::new(-128.0, 300.0);
        duck.velocity = Vec2::new(350.0, 0.0);
        duck.move_to(400.0, 300.0);
        let duck_id = scene.add_duck(duck);

        let mut bubble = Bubble::new();
        bubble.bind(duck_id);
        let bubble_id = scene.add_bubble(bubble);
        (scene, duck_id, bubble_id)
    }

    #[test]
    fn bubble_tracks_duck_after_it_moves() {
        let (mut scene, duck_id, bubble_id) = walking_scene();
        scene.update(100.0);

        let duck_pos = scene.duck(duck_id).unwrap().position;
        assert!(duck_pos.x > -128.0);
        assert_eq!(scene.bubble(bubble_id).unwrap().position, duck_pos);
    }

    #[test]
    fn unbound_bubble_stays_where_it_was_left() {
        let (mut scene, duck_id, bubble_id) = walking_scene();
        scene.update(100.0);
        let left_at = scene.bubble(bubble_id).unwrap().position;

        scene.bubble_mut(bubble_id).unwrap().unbind();
        assert_eq!(scene.bubble(bubble_id).unwrap().anchor(), None);
        scene.update(100.0);

        assert_ne!(scene.duck(duck_id).unwrap().position, left_at);
        assert_eq!(scene.bubble(bubble_id).unwrap().position, left_at);

        // Rebinding picks the duck up again on the next tick.
        scene.bubble_mut(bubble_id).unwrap().bind(duck_id);
        scene.update(16.0);
        assert_eq!(
            scene.bubble(bubble_id).unwrap().position,
            scene.duck(duck_id).unwrap().position
        );
    }

    #[test]
    fn duck_arrives_and_idles() {
        let (mut scene, duck_id, _) = walking_scene();
        for _ in 0..200 {
            scene.update(16.0);
        }
        let duck = scene.duck(duck_id).unwrap();
        assert_eq!(duck.clip(), Clip::Idle);
        assert!(duck.position.distance(Vec2::new(400.0, 300.0)) <= 5.0);
    }

    #[test]
    fn scheduled_close_fires_once() {
        let (mut scene, _, bubble_id) = walking_scene();
        scene.bubble_mut(bubble_id).unwrap().open("hello");
        scene.schedule_close(bubble_id, 3500.0);

        scene.update(3000.0);
        assert_eq!(scene.bubble(bubble_id).unwrap().state(), BubbleState::Open);
        assert_eq!(scene.pending_closes(), 1);

        scene.update(600.0);
        assert_eq!(scene.pending_closes(), 0);
        assert_eq!(scene.bubble(bubble_id).unwrap().state(), BubbleState::Closing);

        scene.update(2000.0);
        assert_eq!(scene.bubble(bubble_id).unwrap().state(), BubbleState::Closed);
    }

    #[test]
    fn stale_close_can_cut_a_later_message_short() {
        let (mut scene, _, bubble_id) = walking_scene();
        scene.bubble_mut(bubble_id).unwrap().open("first");
        scene.schedule_close(bubble_id, 1000.0);
        scene.update(1100.0);
        scene.update(1100.0);
        assert_eq!(scene.bubble(bubble_id).unwrap().state(), BubbleState::Closed);

        scene.bubble_mut(bubble_id).unwrap().open("second");
        scene.schedule_close(bubble_id, 100.0);
        scene.schedule_close(bubble_id, 5000.0);
        scene.update(200.0);
        assert_eq!(scene.bubble(bubble_id).unwrap().state(), BubbleState::Closing);
        assert_eq!(scene.pending_closes(), 1);
    }

    #[test]
    fn render_order_clear_ducks_bubbles() {
        let (mut scene, _, bubble_id) = walking_scene();
        scene.bubble_mut(bubble_id).unwrap().open("hi");
        scene.update(16.0);

        let mut canvas = RecordingCanvas::new();
        scene.render(&mut canvas);

        assert_eq!(canvas.calls[0], Call::Clear(Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(matches!(canvas.calls[1], Call::DrawImage(ImageId(1), _, _)));
        assert!(matches!(canvas.calls[2], Call::FillRoundRect(..)));
        assert!(matches!(canvas.calls.last(), Some(Call::FillText(..))));
    }

    #[test]
    fn resize_changes_clear_rect() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.resize(20.0, 30.0);
        assert_eq!(scene.size(), (20.0, 30.0));

        let mut canvas = RecordingCanvas::new();
        scene.render(&mut canvas);
        assert_eq!(canvas.calls, vec![Call::Clear(Rect::new(0.0, 0.0, 20.0, 30.0))]);
    }
}
