//! # casegen
//!
//! Core building blocks for authoring tasks for informatics competitions:
//! the data interchange protocol spoken by generators, validators and
//! solutions, and the deterministic random engine that makes generated
//! test data reproducible. The functionality lives in the member crates;
//! this crate re-exports their public API under one roof.
//!
//! # Example
//!
//! A generator samples its data from the seeded engine and serializes it,
//! a solution reads it back:
//!
//! ```
//! use casegen::{Decoder, Encoder, ScalarKind, SeededRng, Shape, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut rng = SeededRng::from_script(&["random-list", "8"])?;
//! let items: Vec<i64> = (0..8).map(|_| rng.randint(0, 100)).collect();
//!
//! let mut testcase = Vec::new();
//! Encoder::new(&mut testcase).put(&Value::from(items))?;
//!
//! let read_back = Decoder::new(testcase.as_slice()).get(Shape::new(ScalarKind::Long, 1))?;
//! assert_eq!(read_back.as_array().unwrap().len(), 8);
//! # Ok(())
//! # }
//! ```

pub use casegen_iodata as iodata;
pub use casegen_rand as rand;

pub use casegen_iodata::{
    is_rectangular, live_raw_allocations, Decoder, Encoder, IoDataError, Param, RawView, Scalar,
    ScalarKind, Shape, Value,
};
pub use casegen_rand::{RandError, SeededRng};
