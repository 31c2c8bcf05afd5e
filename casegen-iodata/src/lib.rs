//! The data interchange protocol between the processes of a task.
//!
//! Generators, validators and solutions exchange parameters through a
//! whitespace-tokenized text protocol: every scalar is one token, text is a
//! length followed by one character code per token, an array is a length
//! followed by its elements. [`Encoder`] writes that format one token per
//! line, [`Decoder`] reads it back accepting any whitespace arrangement,
//! and both agree with the protocol's grammar byte for byte so that
//! processes written in different languages interoperate on the same files.
//!
//! [`RawView`] is the in-process companion for consumers without dynamic
//! containers: it converts a decoded [`Value`] to the sentinel-terminated
//! pointer convention and owns the release of that memory.
//!
//! # Example
//!
//! ```
//! use casegen_iodata::{Decoder, Encoder, ScalarKind, Shape, Value};
//!
//! # fn main() -> Result<(), casegen_iodata::IoDataError> {
//! let matrix = Value::from(vec![vec![1, 2, 3], vec![4, 5, 6]]);
//!
//! // A generator writes the parameter to the testcase file...
//! let mut encoded = Vec::new();
//! Encoder::new(&mut encoded).put_checked(&matrix)?;
//!
//! // ...and a solution reads it back with the declared shape.
//! let mut decoder = Decoder::new(encoded.as_slice());
//! let decoded = decoder.get(Shape::new(ScalarKind::Int, 2))?;
//! assert_eq!(decoded, matrix);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod codec;
mod data;
mod error;
mod raw;
mod tokens;

pub use codec::{is_rectangular, Decoder, Encoder};
pub use data::{Param, Scalar, ScalarKind, Shape, Value};
pub use error::IoDataError;
pub use raw::{live_raw_allocations, RawView};
