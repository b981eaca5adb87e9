//! Exponential backoff with jitter for store retries

use std::time::Duration;

/// Doubling backoff with a cap and random jitter.
///
/// Instances are cheap and single-use: each retrying operation constructs
/// its own and drops it when the operation resolves.
pub struct Backoff {
    next_ms: u64,
    cap_ms: u64,
}

impl Backoff {
    /// Start at `base_ms`, doubling up to `cap_ms` per delay.
    pub fn new(base_ms: u64, cap_ms: u64) -> Self {
        Self {
            next_ms: base_ms.max(1),
            cap_ms: cap_ms.max(1),
        }
    }

    /// The next delay to sleep: the current step plus up to 25% jitter.
    pub fn next_delay(&mut self) -> Duration {
        let step = self.next_ms.min(self.cap_ms);
        self.next_ms = self.next_ms.saturating_mul(2);
        let jitter = rand::random::<u64>() % (step / 4 + 1);
        Duration::from_millis(step + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_until_capped() {
        let mut backoff = Backoff::new(100, 10_000);

        assert!(backoff.next_delay().as_millis() >= 100);
        assert!(backoff.next_delay().as_millis() >= 200);
        assert!(backoff.next_delay().as_millis() >= 400);
    }

    #[test]
    fn delays_never_exceed_cap_plus_jitter() {
        let mut backoff = Backoff::new(100, 500);

        for _ in 0..20 {
            // cap + 25% jitter
            assert!(backoff.next_delay().as_millis() <= 625);
        }
    }

    #[test]
    fn zero_base_is_clamped() {
        let mut backoff = Backoff::new(0, 0);
        // Must still terminate and produce a sane delay
        assert!(backoff.next_delay().as_millis() >= 1);
    }
}
