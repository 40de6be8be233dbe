use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use parking_lot::Mutex;

/// Non-cryptographic randomness for cosmetic choices.
///
/// Picking a display domain or a theme color needs no secrecy, so it is kept
/// apart from [`IdGenerator`](crate::IdGenerator), which must use a CSPRNG.
pub trait Chance: Send + Sync + 'static {
    /// Returns an index in `0..len`. `len` must be non-zero.
    fn pick(&self, len: usize) -> usize;

    /// Returns a random `#rrggbb` color.
    fn hex_color(&self) -> String;
}

/// [`Chance`] backed by a small, fast PRNG.
#[derive(Debug)]
pub struct PseudoChance {
    rng: Mutex<SmallRng>,
}

impl PseudoChance {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// A reproducible sequence, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        f(&mut self.rng.lock())
    }
}

impl Default for PseudoChance {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Chance for PseudoChance {
    fn pick(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len))
    }

    fn hex_color(&self) -> String {
        let value: u32 = self.with_rng(|rng| rng.gen_range(0..=0xFF_FFFF));
        format!("#{value:06x}")
    }
}
