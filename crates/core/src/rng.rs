//! RNG module - deterministic token generation
//!
//! Boards must be reproducible from a seed (tests, replays, headless runs),
//! so the engine carries its own small LCG instead of a thread-local source.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Uniform color index in [0, num_colors)
    pub fn color(&mut self, num_colors: u8) -> u8 {
        self.next_range(num_colors as u32) as u8
    }

    /// Uniform cosmetic variant in [0, num_varieties)
    pub fn variant(&mut self, num_varieties: u8) -> u8 {
        self.next_range(num_varieties as u32) as u8
    }

    /// Current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
