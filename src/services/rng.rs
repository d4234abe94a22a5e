//! Park–Miller ("minimal standard") pseudo-random generator.
//!
//! Used by the mock weather synthesizer so that a given seed always yields
//! the same sequence of values.

const MODULUS: i64 = 2_147_483_647;
const MULTIPLIER: i64 = 16_807;

/// Seeded Lehmer generator producing values in `[0, 1)`
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: i64,
}

impl SeededRandom {
    /// Any integer is a valid seed. Seeds that reduce to zero or below are
    /// shifted into `1..MODULUS` so the generator never sticks at zero.
    pub fn new(seed: i64) -> Self {
        let mut state = seed % MODULUS;
        if state <= 0 {
            state += MODULUS - 1;
        }
        // -(MODULUS - 1) lands exactly on zero after the offset
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { state }
    }

    /// Advance the state and return the next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// `floor(next * span)`, i.e. an integer in `0..span`
    pub fn next_below(&mut self, span: u32) -> u32 {
        (self.next_f64() * f64::from(span)).floor() as u32
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        for seed in [1, 42, 518, 2_147_483_646, i64::MAX, -7] {
            let a: Vec<f64> = SeededRandom::new(seed).take(32).collect();
            let b: Vec<f64> = SeededRandom::new(seed).take(32).collect();
            assert_eq!(a, b, "seed {seed} diverged");
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        for seed in [0, 1, 99, -1_000_000, -2_147_483_646, i64::MIN] {
            for value in SeededRandom::new(seed).take(1000) {
                assert!((0.0..1.0).contains(&value), "seed {seed} produced {value}");
            }
        }
    }

    #[test]
    fn test_zero_seed_does_not_degenerate() {
        let mut rng = SeededRandom::new(0);
        let first = rng.next_f64();
        let second = rng.next_f64();
        assert_ne!(first, second);
    }

    #[test]
    fn test_known_first_value() {
        // 1 * 16807 = 16807 -> (16807 - 1) / 2147483646
        let mut rng = SeededRandom::new(1);
        assert_eq!(rng.next_f64(), 16806.0 / 2_147_483_646.0);
    }

    #[test]
    fn test_next_below_bounds() {
        let mut rng = SeededRandom::new(12345);
        for _ in 0..500 {
            assert!(rng.next_below(4) < 4);
        }
    }
}
