//! Source of randomness for role assignment, bot moves and tools.

use rand::Rng as _;

/// Uniform random numbers.
///
/// Everything random in the arcade goes through this so tests can script it.
pub trait Dice: Send + Sync {
    /// Returns a uniformly distributed value in `0..n`.
    ///
    /// `n` must not be zero.
    fn below(&self, n: u32) -> u32;
}

/// [`Dice`] backed by the thread-local [`rand`] generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDice;

impl Dice for ThreadDice {
    fn below(&self, n: u32) -> u32 {
        rand::rng().random_range(0..n)
    }
}
