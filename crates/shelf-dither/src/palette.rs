use serde::{Deserialize, Serialize};

/// Four tones ordered light to dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub tones: [[u8; 3]; 4],
}

impl Palette {
    pub const fn new(tones: [[u8; 3]; 4]) -> Self {
        Self { tones }
    }

    /// The DMG handheld's green palette.
    pub const fn game_boy() -> Self {
        Self::new([[155, 188, 15], [139, 172, 15], [48, 98, 48], [15, 56, 15]])
    }

    pub const fn grayscale() -> Self {
        Self::new([[255, 255, 255], [170, 170, 170], [85, 85, 85], [0, 0, 0]])
    }

    /// Tone for a luminance, bucketed at fixed quartile breakpoints rather
    /// than by nearest color.
    pub fn tone_for(&self, luminance: f32) -> [u8; 3] {
        self.tones[Self::bucket(luminance)]
    }

    pub fn bucket(luminance: f32) -> usize {
        if luminance > 191.0 {
            0
        } else if luminance > 127.0 {
            1
        } else if luminance > 63.0 {
            2
        } else {
            3
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::game_boy()
    }
}
