use std::path::PathBuf;

/// Initial window size (logical pixels).
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;
/// Duck walking speed in units/second.
const DUCK_SPEED: f32 = 350.0;
/// How long a bubble stays up before it's told to close.
const CLOSE_DELAY_MS: f32 = 3500.0;
/// First thing the duck says.
const GREETING: &str = "Привет, я доктор-утка :)";
const SPRITES_PATH: &str = "assets/duck.png";
const PHRASES_PATH: &str = "assets/data.json";

/// Startup settings. Defaults come from the constants above; a few can be
/// overridden through `DUCKWALK_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    pub duck_speed: f32,
    pub close_delay_ms: f32,
    pub greeting: String,
    pub sprites_path: PathBuf,
    pub phrases_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            duck_speed: DUCK_SPEED,
            close_delay_ms: CLOSE_DELAY_MS,
            greeting: GREETING.to_owned(),
            sprites_path: PathBuf::from(SPRITES_PATH),
            phrases_path: PathBuf::from(PHRASES_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unparseable values are logged and skipped.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("DUCKWALK_SPRITES") {
            self.sprites_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DUCKWALK_PHRASES") {
            self.phrases_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("DUCKWALK_SPEED") {
            match raw.parse::<f32>() {
                Ok(speed) if speed.is_finite() && speed >= 0.0 => self.duck_speed = speed,
                _ => log::warn!("Ignoring DUCKWALK_SPEED={raw:?}: not a non-negative number"),
            }
        }
        self
    }
}
