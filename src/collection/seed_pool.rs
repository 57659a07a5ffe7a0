use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Episode seeds handed out at random, each at most once
///
/// Seed files hold one seed per line; blank lines and lines starting with
/// `#` are skipped.
#[derive(Debug, Clone)]
pub struct SeedPool {
    seeds: Vec<u64>,
    rng: StdRng,
}

impl SeedPool {
    /// Pool over `seeds`; `draw_seed` fixes the order they come out in
    pub fn new(seeds: Vec<u64>, draw_seed: u64) -> Self {
        Self {
            seeds,
            rng: StdRng::seed_from_u64(draw_seed),
        }
    }

    /// Load a seed file
    pub fn load(path: &Path, draw_seed: u64) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {:?}", path))?;

        let mut seeds = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let seed = line.parse::<u64>().with_context(|| {
                format!("Invalid seed {:?} on line {} of {:?}", line, number + 1, path)
            })?;
            seeds.push(seed);
        }
        Ok(Self::new(seeds, draw_seed))
    }

    /// Take a random seed out of the pool, `None` once it is empty
    pub fn draw(&mut self) -> Option<u64> {
        if self.seeds.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.seeds.len());
        Some(self.seeds.swap_remove(index))
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
