use std::path::Path;

use crate::duck::animation::Clip;

/// Sprite sheet cell size in pixels.
pub const CELL_SIZE: u32 = 128;
/// Columns in the sheet (longest clip).
pub const SHEET_COLUMNS: u32 = 8;
/// Rows in the sheet, one per clip.
pub const SHEET_ROWS: u32 = 6;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("sprite sheet {path} is {width}x{height}, need at least {need_w}x{need_h}")]
    TooSmall {
        path: String,
        width: u32,
        height: u32,
        need_w: u32,
        need_h: u32,
    },
}

/// Decoded RGBA8 sprite sheet, ready for texture upload.
pub struct SheetImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SheetImage {
    /// Decode a PNG sheet laid out as 128px cells, one clip per row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| AssetError::Decode {
                path: path.display().to_string(),
                source,
            })?
            .to_rgba8();

        let (width, height) = img.dimensions();
        let need_w = CELL_SIZE * SHEET_COLUMNS;
        let need_h = CELL_SIZE * SHEET_ROWS;
        if width < need_w || height < need_h {
            return Err(AssetError::TooSmall {
                path: path.display().to_string(),
                width,
                height,
                need_w,
                need_h,
            });
        }

        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Load `path`, or fall back to the procedural sheet if it can't be used.
    pub fn load_or_procedural(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(sheet) => {
                log::info!("Loaded sprite sheet {}x{}", sheet.width, sheet.height);
                sheet
            }
            Err(e) => {
                log::warn!("{e}; using procedural duck sheet");
                Self::procedural()
            }
        }
    }

    /// Placeholder duck drawn in code with the same grid as the real sheet.
    pub fn procedural() -> Self {
        let width = CELL_SIZE * SHEET_COLUMNS;
        let height = CELL_SIZE * SHEET_ROWS;
        let mut sheet = Self {
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        };

        for clip in Clip::ALL {
            let info = clip.info();
            for frame in 0..info.frame_count {
                sheet.paint_duck(clip, frame, info.frame_count);
            }
        }
        sheet
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba[i..i + 4].copy_from_slice(&rgba);
    }

    /// Paint one cell: body, head, beak and eye. Walk bobs, jump follows an arc.
    fn paint_duck(&mut self, clip: Clip, frame: u32, frame_count: u32) {
        const BODY: [u8; 4] = [250, 210, 60, 255];
        const BEAK: [u8; 4] = [240, 130, 30, 255];
        const EYE: [u8; 4] = [20, 20, 20, 255];

        let phase = frame as f32 / frame_count as f32 * std::f32::consts::TAU;
        let lift = match clip {
            Clip::Walk | Clip::WalkReversed => phase.sin().abs() * 4.0,
            Clip::Jump | Clip::JumpReversed => (phase / 2.0).sin() * 28.0,
            Clip::Idle | Clip::IdleReversed => (phase.sin() * 1.5).max(0.0),
        };
        // Reversed rows face left.
        let facing = if clip.is_reversed() { -1.0 } else { 1.0 };

        let cell_x = frame * CELL_SIZE;
        let cell_y = clip.info().row * CELL_SIZE;
        let c = CELL_SIZE as f32 / 2.0;

        for py in 0..CELL_SIZE {
            for px in 0..CELL_SIZE {
                // Local coords, mirrored so +x is "forward".
                let x = (px as f32 + 0.5 - c) * facing;
                let y = py as f32 + 0.5 - c + lift;

                let in_body = ellipse(x, y, -6.0, 22.0, 34.0, 24.0);
                let in_head = ellipse(x, y, 18.0, -12.0, 16.0, 16.0);
                let in_beak = ellipse(x, y, 37.0, -9.0, 9.0, 4.0);
                let in_eye = ellipse(x, y, 22.0, -16.0, 2.5, 2.5);

                let color = if in_eye {
                    Some(EYE)
                } else if in_beak {
                    Some(BEAK)
                } else if in_head || in_body {
                    Some(BODY)
                } else {
                    None
                };
                if let Some(color) = color {
                    self.put(cell_x + px, cell_y + py, color);
                }
            }
        }
    }
}

fn ellipse(x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x - cx) / rx;
    let dy = (y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}
