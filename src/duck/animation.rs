/// Sprite sheet frame rate.
pub const FRAMES_PER_SECOND: f32 = 24.0;
/// Milliseconds each frame stays on screen.
pub const FRAME_INTERVAL_MS: f32 = 1000.0 / FRAMES_PER_SECOND;

/// Named animation sequence. One row of the sprite sheet each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Clip {
    Idle,
    IdleReversed,
    Walk,
    WalkReversed,
    Jump,
    JumpReversed,
}

/// Where a clip lives in the sheet and how long it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipInfo {
    pub row: u32,
    pub frame_count: u32,
}

const CLIPS: [ClipInfo; 6] = [
    ClipInfo { row: 0, frame_count: 6 },
    ClipInfo { row: 1, frame_count: 6 },
    ClipInfo { row: 2, frame_count: 8 },
    ClipInfo { row: 3, frame_count: 8 },
    ClipInfo { row: 4, frame_count: 6 },
    ClipInfo { row: 5, frame_count: 6 },
];

impl Clip {
    pub const ALL: [Clip; 6] = [
        Self::Idle,
        Self::IdleReversed,
        Self::Walk,
        Self::WalkReversed,
        Self::Jump,
        Self::JumpReversed,
    ];

    pub fn info(self) -> ClipInfo {
        CLIPS[self as usize]
    }

    /// True for the left-facing rows.
    pub fn is_reversed(self) -> bool {
        matches!(
            self,
            Self::IdleReversed | Self::WalkReversed | Self::JumpReversed
        )
    }

    /// The idle clip facing the same way.
    pub fn idle(self) -> Self {
        if self.is_reversed() {
            Self::IdleReversed
        } else {
            Self::Idle
        }
    }

    /// The jump clip facing the same way.
    pub fn jump(self) -> Self {
        if self.is_reversed() {
            Self::JumpReversed
        } else {
            Self::Jump
        }
    }
}

/// Playback cursor into the current clip.
#[derive(Debug, Clone, Copy)]
pub struct AnimationState {
    pub clip: Clip,
    pub frame: u32,
    /// Milliseconds since the last frame advance.
    pub elapsed_ms: f32,
    /// Clip to switch to when the current one wraps. `None` loops.
    pub then: Option<Clip>,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            clip: Clip::Walk,
            frame: 0,
            elapsed_ms: 0.0,
            then: None,
        }
    }
}

impl AnimationState {
    /// Switch clips and restart from the first frame.
    pub fn set_clip(&mut self, clip: Clip) {
        self.clip = clip;
        self.frame = 0;
        self.elapsed_ms = 0.0;
        self.then = None;
    }

    /// Play `clip` through once, then continue with `then` (which loops).
    pub fn play_once(&mut self, clip: Clip, then: Clip) {
        self.set_clip(clip);
        self.then = Some(then);
    }

    /// Accumulate `dt_ms`; step at most one frame once the interval is reached.
    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms >= FRAME_INTERVAL_MS {
            self.elapsed_ms = 0.0;
            self.frame += 1;
            if self.frame >= self.clip.info().frame_count {
                match self.then.take() {
                    Some(next) => self.set_clip(next),
                    None => self.frame = 0,
                }
            }
        }
    }
}
