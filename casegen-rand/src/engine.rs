use crate::error::RandError;

/// The delimiter joining the generation script into the seed material.
const SCRIPT_DELIMITER: &str = "|";

/// Deterministic random source for test data generation.
///
/// The engine is seeded exactly once, at construction, from the generation
/// script: the ordered argument list of one generator invocation. From then
/// on every sample is a pure function of the seed and of the sequence of
/// calls made so far, so two engines built from the same script and driven
/// through the same calls produce the same values. Task generation runs one
/// process per generator invocation and relies on this to make every
/// testcase reproducible.
///
/// Re-seeding is not part of the contract: to sample from a different seed,
/// build a different engine.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: fastrand::Rng,
}

impl SeededRng {
    /// Build an engine seeded from the generation script.
    ///
    /// The script tokens are joined with `|`, hashed, and the first 8 bytes
    /// of the digest become the engine seed. An empty script is rejected.
    pub fn from_script<S: AsRef<str>>(script: &[S]) -> Result<SeededRng, RandError> {
        if script.is_empty() {
            return Err(RandError::EmptyScript);
        }
        let joined = script
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(SCRIPT_DELIMITER);
        let digest = blake3::hash(joined.as_bytes());
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest.as_bytes()[..8]);
        let seed = u64::from_le_bytes(seed_bytes);
        debug!("seeded random engine from {:?} (seed {:#018x})", joined, seed);
        Ok(SeededRng {
            rng: fastrand::Rng::with_seed(seed),
        })
    }

    /// Uniform integer over the inclusive range `[l, r]`.
    ///
    /// # Panics
    ///
    /// Panics when `l > r`.
    pub fn randint(&mut self, l: i64, r: i64) -> i64 {
        assert!(l <= r, "invalid range [{}, {}]", l, r);
        self.rng.i64(l..=r)
    }

    /// Uniform real over the half-open range `[l, r)`.
    ///
    /// # Panics
    ///
    /// Panics when `l > r`.
    pub fn randreal(&mut self, l: f64, r: f64) -> f64 {
        assert!(l <= r, "invalid range [{}, {})", l, r);
        l + self.rng.f64() * (r - l)
    }

    /// `true` or `false` with equal probability.
    pub fn randbool(&mut self) -> bool {
        self.randint(0, 1) == 1
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_script_is_rejected() {
        assert_eq!(
            SeededRng::from_script::<&str>(&[]).unwrap_err(),
            RandError::EmptyScript
        );
    }

    #[test]
    fn identical_scripts_replay_identically() {
        let script = ["a", "b", "3"];
        let mut first = SeededRng::from_script(&script).unwrap();
        let mut second = SeededRng::from_script(&script).unwrap();
        for step in 0..100 {
            match step % 3 {
                0 => assert_eq!(first.randint(0, 1_000_000), second.randint(0, 1_000_000)),
                1 => assert_eq!(first.randbool(), second.randbool()),
                _ => assert_eq!(first.randreal(0.0, 1.0), second.randreal(0.0, 1.0)),
            }
        }
    }

    #[test]
    fn different_scripts_diverge() {
        let mut first = SeededRng::from_script(&["gen", "1"]).unwrap();
        let mut second = SeededRng::from_script(&["gen", "2"]).unwrap();
        let a: Vec<i64> = (0..100).map(|_| first.randint(0, i64::MAX)).collect();
        let b: Vec<i64> = (0..100).map(|_| second.randint(0, i64::MAX)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn script_joining_is_order_sensitive() {
        let mut first = SeededRng::from_script(&["a", "b"]).unwrap();
        let mut second = SeededRng::from_script(&["b", "a"]).unwrap();
        let a: Vec<i64> = (0..100).map(|_| first.randint(0, i64::MAX)).collect();
        let b: Vec<i64> = (0..100).map(|_| second.randint(0, i64::MAX)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn randint_stays_in_range() {
        let mut rng = SeededRng::from_script(&["range"]).unwrap();
        for _ in 0..1000 {
            let sample = rng.randint(-5, 5);
            assert!((-5..=5).contains(&sample));
        }
        // A degenerate range has a single outcome.
        assert_eq!(rng.randint(7, 7), 7);
    }

    #[test]
    fn randint_reaches_both_endpoints() {
        let mut rng = SeededRng::from_script(&["endpoints"]).unwrap();
        let samples: Vec<i64> = (0..200).map(|_| rng.randint(0, 1)).collect();
        assert!(samples.contains(&0));
        assert!(samples.contains(&1));
    }

    #[test]
    fn randreal_stays_in_half_open_range() {
        let mut rng = SeededRng::from_script(&["real"]).unwrap();
        let mut sum = 0.0;
        let samples = 10_000;
        for _ in 0..samples {
            let value = rng.randreal(2.0, 3.0);
            assert!((2.0..3.0).contains(&value));
            sum += value;
        }
        assert_abs_diff_eq!(sum / samples as f64, 2.5, epsilon = 0.05);
    }

    #[test]
    fn randbool_takes_both_values() {
        let mut rng = SeededRng::from_script(&["bool"]).unwrap();
        let samples: Vec<bool> = (0..200).map(|_| rng.randbool()).collect();
        assert!(samples.contains(&true));
        assert!(samples.contains(&false));
    }
}
