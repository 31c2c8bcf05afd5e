use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IoDataError;

/// The primitive kind of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Boolean.
    Bool,
    /// Sequence of character codes, each in `[0, 255]`.
    Text,
}

impl ScalarKind {
    /// The canonical name of the kind, as spelled in task configurations.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Long => "long",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Bool => "bool",
            ScalarKind::Text => "str",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = IoDataError;

    /// Parse a kind name. Besides the canonical names, the alias spellings
    /// accepted by task configurations are recognized as well.
    fn from_str(name: &str) -> Result<ScalarKind, IoDataError> {
        Ok(match name {
            "int" | "integer" | "int32" => ScalarKind::Int,
            "long" | "long long" | "long long int" | "int64" => ScalarKind::Long,
            "float" | "float32" => ScalarKind::Float,
            "double" | "real" | "float64" => ScalarKind::Double,
            "bool" | "boolean" => ScalarKind::Bool,
            "str" | "string" | "char*" => ScalarKind::Text,
            _ => return Err(IoDataError::UnknownKind(name.into())),
        })
    }
}

impl Serialize for ScalarKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ScalarKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<ScalarKind, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(D::Error::custom)
    }
}

/// A single tagged scalar value. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Signed 32-bit integer.
    Int(i32),
    /// Signed 64-bit integer.
    Long(i64),
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// Boolean.
    Bool(bool),
    /// Text as raw character codes; any byte value is allowed, including 0
    /// and 255.
    Text(Vec<u8>),
}

impl Scalar {
    /// The kind tag of this scalar.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Long(_) => ScalarKind::Long,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Double(_) => ScalarKind::Double,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Text(_) => ScalarKind::Text,
        }
    }

    /// Render the scalar in the bracketed human-readable form used when
    /// exporting data to judge templates. Reals always carry a decimal
    /// point, text is quoted with embedded quotes escaped.
    pub fn to_display_string(&self) -> String {
        match self {
            Scalar::Int(value) => value.to_string(),
            Scalar::Long(value) => value.to_string(),
            Scalar::Float(value) => format_real(value),
            Scalar::Double(value) => format_real(value),
            Scalar::Bool(value) => (if *value { "true" } else { "false" }).to_string(),
            Scalar::Text(text) => {
                let mut quoted = String::with_capacity(text.len() + 2);
                quoted.push('"');
                for &byte in text {
                    if byte == b'"' {
                        quoted.push('\\');
                    }
                    quoted.push(byte as char);
                }
                quoted.push('"');
                quoted
            }
        }
    }
}

/// Format a real number, forcing a decimal point on integral values so that
/// the rendering is distinguishable from the integer kinds.
pub(crate) fn format_real<T: fmt::Display>(value: T) -> String {
    let mut repr = value.to_string();
    if repr.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        repr.push_str(".0");
    }
    repr
}

/// A value exchanged between the processes of a task: either a scalar or an
/// ordered array of values.
///
/// The nesting depth is the dimension of the value: a bare scalar has
/// dimension 0, an array of scalars dimension 1 and so on. Element order is
/// the serialization order and is preserved exactly on round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A dimension-0 value.
    Scalar(Scalar),
    /// A dimension-N value, holding elements of dimension N-1.
    Array(Vec<Value>),
}

impl Value {
    /// The elements of the value, if it is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            Value::Scalar(_) => None,
        }
    }

    /// Render the value in the bracketed human-readable form used when
    /// exporting data to judge templates: `[[1,2],[3,4]]`.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Scalar(scalar) => scalar.to_display_string(),
            Value::Array(items) => {
                let inner = items.iter().map(Value::to_display_string).join(",");
                format!("[{}]", inner)
            }
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Value {
        Value::Scalar(scalar)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Scalar(Scalar::Int(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Scalar(Scalar::Long(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Value {
        Value::Scalar(Scalar::Float(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Scalar(Scalar::Double(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Scalar(Scalar::Bool(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Scalar(Scalar::Text(value.as_bytes().to_vec()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Scalar(Scalar::Text(value.into_bytes()))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// The runtime (kind, dimension) tag of a value.
///
/// One codec instance handles every combination by recursing on the
/// dimension, so the pair travels as a plain runtime value read from the
/// task configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// The primitive kind of the innermost elements.
    #[serde(rename = "type")]
    pub kind: ScalarKind,
    /// The nesting depth; 0 is a bare scalar.
    pub dimension: usize,
}

impl Shape {
    /// A shape with the given kind and dimension.
    pub fn new(kind: ScalarKind, dimension: usize) -> Shape {
        Shape { kind, dimension }
    }

    /// A dimension-0 shape.
    pub fn scalar(kind: ScalarKind) -> Shape {
        Shape::new(kind, 0)
    }

    /// The shape of the elements of an array with this shape.
    pub(crate) fn inner(self) -> Shape {
        Shape::new(self.kind, self.dimension - 1)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for _ in 0..self.dimension {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A named parameter as declared in the task configuration.
///
/// The configuration declares each parameter of the task as a
/// `(name, type, dimension)` triple; generators print the parameters in
/// declaration order and validators/solutions read them back in the same
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// The parameter name.
    pub name: String,
    /// The primitive kind, under the `type` key of the configuration.
    #[serde(rename = "type")]
    pub kind: ScalarKind,
    /// The nesting depth.
    pub dimension: usize,
}

impl Param {
    /// The (kind, dimension) tag of this parameter.
    pub fn shape(&self) -> Shape {
        Shape::new(self.kind, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            ScalarKind::Int,
            ScalarKind::Long,
            ScalarKind::Float,
            ScalarKind::Double,
            ScalarKind::Bool,
            ScalarKind::Text,
        ] {
            assert_eq!(kind.name().parse::<ScalarKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_aliases() {
        assert_eq!("long long int".parse::<ScalarKind>().unwrap(), ScalarKind::Long);
        assert_eq!("int64".parse::<ScalarKind>().unwrap(), ScalarKind::Long);
        assert_eq!("real".parse::<ScalarKind>().unwrap(), ScalarKind::Double);
        assert_eq!("char*".parse::<ScalarKind>().unwrap(), ScalarKind::Text);
        assert_eq!("boolean".parse::<ScalarKind>().unwrap(), ScalarKind::Bool);
        assert!(matches!(
            "uint".parse::<ScalarKind>(),
            Err(IoDataError::UnknownKind(_))
        ));
    }

    #[test]
    fn param_from_config() {
        let config = r#"[
            {"name": "n", "type": "int", "dimension": 0},
            {"name": "edges", "type": "long long", "dimension": 2}
        ]"#;
        let params: Vec<Param> = serde_json::from_str(config).unwrap();
        assert_eq!(params[0].shape(), Shape::scalar(ScalarKind::Int));
        assert_eq!(params[1].shape(), Shape::new(ScalarKind::Long, 2));
        assert_eq!(params[1].name, "edges");
    }

    #[test]
    fn shape_display() {
        assert_eq!(Shape::new(ScalarKind::Int, 2).to_string(), "int[][]");
        assert_eq!(Shape::scalar(ScalarKind::Text).to_string(), "str");
    }

    #[test]
    fn display_string_rendering() {
        let matrix = Value::from(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(matrix.to_display_string(), "[[1,2],[3,4]]");
        assert_eq!(Value::from(true).to_display_string(), "true");
        assert_eq!(Value::from(2.5).to_display_string(), "2.5");
        assert_eq!(Value::from(3.0).to_display_string(), "3.0");
        assert_eq!(Value::from(-4.0f64).to_display_string(), "-4.0");
        assert_eq!(Value::from("a\"b").to_display_string(), "\"a\\\"b\"");
    }

    #[test]
    fn from_impls_tag_kinds() {
        assert_eq!(Value::from(5), Value::Scalar(Scalar::Int(5)));
        assert_eq!(Value::from(5i64), Value::Scalar(Scalar::Long(5)));
        assert_eq!(
            Value::from("hi"),
            Value::Scalar(Scalar::Text(vec![b'h', b'i']))
        );
        let nested = Value::from(vec![vec![true], vec![false]]);
        let rows = nested.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Value::from(vec![true]));
    }
}
