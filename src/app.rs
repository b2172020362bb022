use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::assets::SheetImage;
use crate::bubble::{AnchorId, Bubble};
use crate::canvas::ImageId;
use crate::config::Config;
use crate::duck::Duck;
use crate::phrases::PhraseBook;
use crate::render::frontend::Frontend;
use crate::render::{GpuState, RenderError};
use crate::scene::{BubbleId, Scene};

/// Longest tick we simulate (ms). Longer gaps (window drags, breakpoints) are clamped.
const MAX_FRAME_DT_MS: f32 = 250.0;
/// How often to log tick rate and scene status (seconds).
const STATUS_LOG_INTERVAL: f64 = 5.0;
/// Scene id of the duck sprite sheet.
const DUCK_SHEET: ImageId = ImageId(0);
/// The duck starts this far off the left edge.
const START_OFFSCREEN: f32 = -128.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

/// Tick rate and scene status, logged every `STATUS_LOG_INTERVAL`.
struct FrameStats {
    ticks: u64,
    last_log_time: Instant,
    ticks_since_log: u32,
    worst_dt_ms: f32,
    /// Ticks whose delta hit `MAX_FRAME_DT_MS`.
    clamped: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            ticks: 0,
            last_log_time: Instant::now(),
            ticks_since_log: 0,
            worst_dt_ms: 0.0,
            clamped: 0,
        }
    }

    fn record_tick(&mut self, dt_ms: f32, scene: &Scene, duck: AnchorId, bubble: BubbleId) {
        self.ticks += 1;
        self.ticks_since_log += 1;
        self.worst_dt_ms = self.worst_dt_ms.max(dt_ms);
        if dt_ms >= MAX_FRAME_DT_MS {
            self.clamped += 1;
        }

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed < STATUS_LOG_INTERVAL {
            return;
        }

        let fps = self.ticks_since_log as f64 / elapsed;
        log::info!(
            "FPS: {:.0} | worst: {:.1}ms | clamped: {} | ticks: {}",
            fps,
            self.worst_dt_ms,
            self.clamped,
            self.ticks,
        );
        if let (Some(d), Some(b)) = (scene.duck(duck), scene.bubble(bubble)) {
            log::debug!(
                "duck {:?} frame {} at ({:.0}, {:.0}) | bubble {:?} {:.0}% | pending closes: {}",
                d.clip(),
                d.frame(),
                d.position.x,
                d.position.y,
                b.state(),
                b.opacity(),
                scene.pending_closes(),
            );
        }

        self.last_log_time = Instant::now();
        self.ticks_since_log = 0;
        self.worst_dt_ms = 0.0;
        self.clamped = 0;
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    frontend: Option<Frontend>,

    scene: Scene,
    duck: AnchorId,
    bubble: BubbleId,
    phrases: PhraseBook,
    rng: fastrand::Rng,

    last_frame_time: Option<Instant>,
    frame_stats: FrameStats,

    screen_w: u32,
    screen_h: u32,

    /// Set when setup fails; `run` returns it after the loop exits.
    fatal: Option<RenderError>,
}

impl App {
    fn new(config: Config) -> Self {
        let phrases = PhraseBook::load_or_builtin(&config.phrases_path);

        let mut scene = Scene::new(config.window_width as f32, config.window_height as f32);
        let duck = scene.add_duck(Duck::new(DUCK_SHEET));
        let bubble = scene.add_bubble(Bubble::new());

        Self {
            config,
            window: None,
            gpu: None,
            frontend: None,
            scene,
            duck,
            bubble,
            phrases,
            rng: fastrand::Rng::new(),
            last_frame_time: None,
            frame_stats: FrameStats::new(),
            screen_w: 0,
            screen_h: 0,
            fatal: None,
        }
    }

    /// Walk the duck in from the left, bind the bubble and say hello.
    fn stage_intro(&mut self) {
        let (w, h) = self.scene.size();
        if let Some(duck) = self.scene.duck_mut(self.duck) {
            duck.position = Vec2::new(START_OFFSCREEN, h / 2.0);
            duck.velocity = Vec2::new(self.config.duck_speed, 0.0);
            duck.move_to(w / 2.0, h / 2.0);
        }
        if let Some(bubble) = self.scene.bubble_mut(self.bubble) {
            bubble.bind(self.duck);
            bubble.open(self.config.greeting.clone());
        }
        self.scene
            .schedule_close(self.bubble, self.config.close_delay_ms);
    }

    /// Left click: say something random, and schedule it away.
    fn speak(&mut self) {
        let Some(phrase) = self.phrases.pick(&mut self.rng) else {
            return;
        };
        if let Some(bubble) = self.scene.bubble_mut(self.bubble) {
            if !bubble.open(phrase.to_owned()) {
                log::debug!("bubble busy with {:?}, {phrase:?} dropped", bubble.message());
            }
        }
        // Scheduled even when the open was dropped; a stale close may cut the next message short.
        self.scene
            .schedule_close(self.bubble, self.config.close_delay_ms);
    }

    /// F: detach the bubble where it is, or reattach it to the duck.
    fn toggle_follow(&mut self) {
        let duck = self.duck;
        if let Some(bubble) = self.scene.bubble_mut(self.bubble) {
            if bubble.anchor().is_some() {
                bubble.unbind();
                log::info!("bubble detached");
            } else {
                bubble.bind(duck);
                log::info!("bubble following duck again");
            }
        }
    }

    fn jump(&mut self) {
        if let Some(duck) = self.scene.duck_mut(self.duck) {
            duck.jump();
        }
    }

    /// Build the window, GPU surface and frontend. Any failure here is fatal.
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let attrs = WindowAttributes::default()
            .with_title("duckwalk")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        self.screen_w = size.width;
        self.screen_h = size.height;
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = GpuState::new(window.clone())?;
        let mut frontend = Frontend::new(&window, &gpu);

        let sheet = SheetImage::load_or_procedural(&self.config.sprites_path);
        frontend.register_image(DUCK_SHEET, "duck_sheet", &sheet);

        // Scene coordinates are egui points (logical pixels).
        let logical = size.to_logical::<f32>(window.scale_factor());
        self.scene.resize(logical.width, logical.height);

        self.gpu = Some(gpu);
        self.frontend = Some(frontend);
        self.window = Some(window);
        Ok(())
    }

    fn redraw(&mut self) {
        // --- Timing ---
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt_ms = (now.duration_since(last).as_secs_f64() * 1000.0) as f32;
            let dt_ms = dt_ms.min(MAX_FRAME_DT_MS);
            self.scene.update(dt_ms);
            self.frame_stats
                .record_tick(dt_ms, &self.scene, self.duck, self.bubble);
        }
        self.last_frame_time = Some(now);

        // --- Render ---
        let (Some(window), Some(gpu), Some(frontend)) =
            (&self.window, &self.gpu, &mut self.frontend)
        else {
            return;
        };

        let scene = &mut self.scene;
        let output = frontend.run_frame(window, self.screen_w, self.screen_h, |canvas| {
            scene.render(canvas)
        });

        let Some(mut frame) = gpu.begin_frame() else {
            frontend.free_textures(&output);
            return;
        };

        let cmd_bufs = frontend.prepare(&gpu.device, &gpu.queue, &mut frame.encoder, &output);
        {
            let mut pass = GpuState::begin_scene_pass(&mut frame.encoder, &frame.view);
            frontend.render(&mut pass, &output);
        }
        gpu.finish_frame(frame.encoder, frame.output, cmd_bufs);
        frontend.free_textures(&output);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Setup failed: {e}");
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }

        self.stage_intro();
        log::info!("Scene ready");

        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.frontend) {
            (Some(window), Some(frontend)) => frontend.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.screen_w = new_size.width;
                    self.screen_h = new_size.height;
                }
                if let Some(window) = &self.window {
                    let logical = new_size.to_logical::<f32>(window.scale_factor());
                    self.scene.resize(logical.width, logical.height);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !consumed => self.speak(),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !consumed =>
            {
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => {
                        log::info!("ESC pressed, exiting");
                        event_loop.exit();
                    }
                    Key::Named(NamedKey::Space) if !event.repeat => self.jump(),
                    Key::Character(ref c) if !event.repeat && c.eq_ignore_ascii_case("f") => {
                        self.toggle_follow()
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Entry point: create event loop and run.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    log::debug!("Config: {config:?}");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
