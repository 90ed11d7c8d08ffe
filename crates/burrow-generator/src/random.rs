use crate::Generator;
use burrow_core::ShortCode;
use rand::Rng;

const BASE62: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

pub const DEFAULT_LENGTH: usize = 7;

/// Draws fixed-length codes uniformly from the base62 alphabet.
///
/// With the default length of 7 there are 62^7 (about 3.5 trillion) codes,
/// so collisions stay rare until the store holds billions of links.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Lengths outside the valid short code range are clamped into it.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, burrow_core::shortcode::MAX_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| BASE62[rng.random_range(0..BASE62.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
