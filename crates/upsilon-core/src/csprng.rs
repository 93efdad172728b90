//! Cryptographically secure randomness.
//!
//! Backed by `rand`'s thread-local generator: OS-seeded, reseeding, and
//! never shared across threads.

use rand::rngs::ThreadRng;
use rand::{CryptoRng, RngCore};

/// A handle to this thread's CSPRNG.
#[derive(Clone, Default)]
pub struct Csprng {
    inner: ThreadRng,
}

impl Csprng {
    pub fn new() -> Self {
        Self {
            inner: rand::thread_rng(),
        }
    }

    /// Run `f` with this thread's generator.
    pub fn with_standard<R>(f: impl FnOnce(&mut Csprng) -> R) -> R {
        f(&mut Csprng::new())
    }

    pub fn next_byte(&mut self) -> u8 {
        let mut b = [0u8; 1];
        self.inner.fill_bytes(&mut b);
        b[0]
    }

    pub fn fill(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }
}

impl std::fmt::Debug for Csprng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Csprng(..)")
    }
}

impl RngCore for Csprng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for Csprng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_not_constant() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        Csprng::with_standard(|rng| {
            rng.fill(&mut a);
            rng.fill(&mut b);
        });
        assert_ne!(a, b);
    }

    #[test]
    fn test_with_standard_nests() {
        let (outer, inner) = Csprng::with_standard(|rng| {
            let inner = Csprng::with_standard(|nested| nested.next_u64());
            (rng.next_u64(), inner)
        });
        assert_ne!(outer, inner);
    }

    #[test]
    fn test_threads_have_independent_generators() {
        let here = Csprng::with_standard(|rng| rng.next_u64());
        let there = std::thread::spawn(|| Csprng::with_standard(|rng| rng.next_u64()))
            .join()
            .unwrap();
        assert_ne!(here, there);
    }
}
