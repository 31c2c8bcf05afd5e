//! Deterministic seeded random generation for task generators.
//!
//! A generator process receives its argument list (the generation script),
//! builds a [`SeededRng`] from it and samples every random choice from that
//! engine. Because the seed is derived from the script and every sample is
//! a pure function of the seed and of the call sequence, running the same
//! generator with the same arguments reproduces the same test data, which
//! is what makes generated testcases comparable across runs and machines.
//!
//! # Example
//!
//! ```
//! use casegen_rand::SeededRng;
//!
//! # fn main() -> Result<(), casegen_rand::RandError> {
//! // The script is the generator's argument list.
//! let mut rng = SeededRng::from_script(&["big-graph", "17"])?;
//!
//! let nodes = rng.randint(2, 10);
//! let weight = rng.randreal(0.0, 1.0);
//! assert!((2..=10).contains(&nodes));
//! assert!((0.0..1.0).contains(&weight));
//!
//! // A random relabeling of the nodes.
//! let labels = rng.permutation(nodes, 0)?;
//! assert_eq!(labels.len(), nodes as usize);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

mod engine;
mod error;
mod shuffle;

pub use engine::SeededRng;
pub use error::RandError;
