//! Wave generation
//!
//! A wave is a fixed-length list of squadron sizes. Sizes for wave `n` are
//! drawn uniformly from `[1 + n, 2 + n]` and rounded, so every wave is a
//! little heavier than the last.

use rand::Rng;

/// Squadron sizes for one wave, in spawn order
pub type Wave = Vec<u32>;

/// Inclusive bounds of squadron sizes for a 0-based wave count
pub fn squadron_range(wave_count: u32) -> (u32, u32) {
    (1 + wave_count, 2 + wave_count)
}

/// Generate the squadrons for wave `wave_count` (0-based)
pub fn generate_wave<R: Rng>(rng: &mut R, wave_count: u32, len: usize) -> Wave {
    let (lo, hi) = squadron_range(wave_count);
    let (lo, hi) = (lo as f32, hi as f32);

    let wave: Wave = (0..len)
        .map(|_| (lo + rng.random::<f32>() * (hi - lo)).round() as u32)
        .collect();

    log::debug!("wave {} squadrons: {:?}", wave_count + 1, wave);
    wave
}

/// Read position inside the current wave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveCursor {
    index: usize,
}

impl WaveCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unread squadron, or `None` once the wave is exhausted.
    /// A `Some(0)` squadron is legitimate and means "spawn nothing".
    pub fn next_squadron(&mut self, wave: &[u32]) -> Option<u32> {
        let squadron = wave.get(self.index).copied()?;
        self.index += 1;
        Some(squadron)
    }

    /// Start reading from the first squadron again
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    pub fn position(&self) -> usize {
        self.index
    }
}
