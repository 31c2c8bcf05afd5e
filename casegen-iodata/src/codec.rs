use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::data::{format_real, Scalar, ScalarKind, Shape, Value};
use crate::error::IoDataError;
use crate::tokens::Tokens;

/// Check that every array in `items` has the same length.
///
/// Arrays of length 0 or 1 are trivially rectangular. A mix of arrays and
/// scalars at the same depth is never rectangular.
pub fn is_rectangular(items: &[Value]) -> bool {
    items
        .iter()
        .map(|item| item.as_array().map(<[Value]>::len))
        .all_equal()
}

/// Reads values from a whitespace-tokenized text stream.
///
/// Reading is purely sequential and single pass: every call consumes the
/// tokens of exactly one value, so consecutive calls read consecutive
/// parameters of the same stream.
pub struct Decoder<R> {
    tokens: Tokens<R>,
}

impl<R: BufRead> Decoder<R> {
    /// Make a decoder reading from `reader`.
    pub fn new(reader: R) -> Decoder<R> {
        Decoder {
            tokens: Tokens::new(reader),
        }
    }

    /// Read one value of the given shape.
    pub fn get(&mut self, shape: Shape) -> Result<Value, IoDataError> {
        debug!("reading a {} value", shape);
        self.read_value(shape, false)
    }

    /// Read one value of the given shape, also checking that every nesting
    /// level of dimension 2 or more is a rectangle.
    pub fn get_checked(&mut self, shape: Shape) -> Result<Value, IoDataError> {
        debug!("reading a {} value (rectangle checked)", shape);
        self.read_value(shape, true)
    }

    fn read_value(&mut self, shape: Shape, check: bool) -> Result<Value, IoDataError> {
        if shape.dimension == 0 {
            return Ok(Value::Scalar(self.read_scalar(shape.kind)?));
        }
        let len = self.read_len()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_value(shape.inner(), check)?);
        }
        if check && shape.dimension >= 2 && !is_rectangular(&items) {
            return Err(IoDataError::RectangleMismatch);
        }
        Ok(Value::Array(items))
    }

    /// Read a non-negative length prefix.
    fn read_len(&mut self) -> Result<usize, IoDataError> {
        let token = self.tokens.next_token()?;
        let len: i64 = token.parse().map_err(|_| IoDataError::Parse {
            kind: ScalarKind::Int,
            token,
        })?;
        if len < 0 {
            return Err(IoDataError::InvalidSize(len));
        }
        Ok(len as usize)
    }

    fn read_scalar(&mut self, kind: ScalarKind) -> Result<Scalar, IoDataError> {
        if kind == ScalarKind::Text {
            return Ok(Scalar::Text(self.read_text()?));
        }
        let token = self.tokens.next_token()?;
        let parse_error = |token| IoDataError::Parse { kind, token };
        Ok(match kind {
            ScalarKind::Int => Scalar::Int(token.parse().map_err(|_| parse_error(token))?),
            ScalarKind::Long => Scalar::Long(token.parse().map_err(|_| parse_error(token))?),
            ScalarKind::Float => Scalar::Float(token.parse().map_err(|_| parse_error(token))?),
            ScalarKind::Double => Scalar::Double(token.parse().map_err(|_| parse_error(token))?),
            ScalarKind::Bool => {
                if token == "true" {
                    Scalar::Bool(true)
                } else if token == "false" {
                    Scalar::Bool(false)
                } else {
                    return Err(parse_error(token));
                }
            }
            ScalarKind::Text => unreachable!("text is handled by read_text"),
        })
    }

    /// Text on the wire is a length followed by one character code per
    /// token, each in `[0, 255]`.
    fn read_text(&mut self) -> Result<Vec<u8>, IoDataError> {
        let len = self.read_len()?;
        let mut text = Vec::with_capacity(len);
        for _ in 0..len {
            let token = self.tokens.next_token()?;
            let code: i64 = token.parse().map_err(|_| IoDataError::Parse {
                kind: ScalarKind::Int,
                token,
            })?;
            if !(0..=255).contains(&code) {
                return Err(IoDataError::NonAsciiChar(code));
            }
            text.push(code as u8);
        }
        Ok(text)
    }
}

/// Writes values to a text stream, one token per line.
///
/// Writing is streaming as well: tokens are emitted while the value is
/// walked, nothing beyond the value itself is buffered.
pub struct Encoder<W> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    /// Make an encoder writing to `writer`.
    pub fn new(writer: W) -> Encoder<W> {
        Encoder { writer }
    }

    /// Write one value.
    pub fn put(&mut self, value: &Value) -> Result<(), IoDataError> {
        self.write_value(value, false)
    }

    /// Write one value, first checking that every nesting level of
    /// dimension 2 or more is a rectangle.
    pub fn put_checked(&mut self, value: &Value) -> Result<(), IoDataError> {
        self.write_value(value, true)
    }

    fn write_value(&mut self, value: &Value, check: bool) -> Result<(), IoDataError> {
        match value {
            Value::Scalar(scalar) => self.write_scalar(scalar),
            Value::Array(items) => {
                let nested = items.iter().any(|item| item.as_array().is_some());
                if check && nested && !is_rectangular(items) {
                    return Err(IoDataError::RectangleMismatch);
                }
                writeln!(self.writer, "{}", items.len())?;
                for item in items {
                    self.write_value(item, check)?;
                }
                Ok(())
            }
        }
    }

    fn write_scalar(&mut self, scalar: &Scalar) -> Result<(), IoDataError> {
        match scalar {
            Scalar::Int(value) => writeln!(self.writer, "{}", value)?,
            Scalar::Long(value) => writeln!(self.writer, "{}", value)?,
            Scalar::Float(value) => writeln!(self.writer, "{}", format_real(value))?,
            Scalar::Double(value) => writeln!(self.writer, "{}", format_real(value))?,
            Scalar::Bool(value) => {
                writeln!(self.writer, "{}", if *value { "true" } else { "false" })?
            }
            Scalar::Text(text) => {
                writeln!(self.writer, "{}", text.len())?;
                for &byte in text {
                    writeln!(self.writer, "{}", byte)?;
                }
            }
        }
        Ok(())
    }
}
