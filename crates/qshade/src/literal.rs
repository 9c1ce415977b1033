//! Rendering host values as GLSL literals.

use std::str::FromStr;

use derive_more::derive::{Display, From, IsVariant};
use itertools::Itertools;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum LiteralError {
    #[error("type `{0}` has no literal form")]
    UnsupportedType(String),
    #[error("invalid value `{0}`, expected a number or comma-separated numbers")]
    InvalidValue(String),
    #[error("`{0}` is a scalar type, found a vector of {1} components")]
    ExpectedScalar(LiteralType, usize),
    #[error("`{0}` is a vector type, found a scalar")]
    ExpectedVector(LiteralType),
    #[error("`{0}` has {} components, found {1}", .0.size())]
    ComponentCount(LiteralType, usize),
    #[error("{0} is not a finite number")]
    NotFinite(f64),
}

/// The types a value can be rendered as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IsVariant)]
pub enum LiteralType {
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("vec{_0}")]
    Vec(usize),
    #[display("ivec{_0}")]
    IVec(usize),
}

impl LiteralType {
    /// Number of components, 1 for scalars.
    pub fn size(&self) -> usize {
        match self {
            LiteralType::Int | LiteralType::Float => 1,
            LiteralType::Vec(n) | LiteralType::IVec(n) => *n,
        }
    }
}

impl FromStr for LiteralType {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "vec2" => Ok(Self::Vec(2)),
            "vec3" => Ok(Self::Vec(3)),
            "vec4" => Ok(Self::Vec(4)),
            "ivec2" => Ok(Self::IVec(2)),
            "ivec3" => Ok(Self::IVec(3)),
            "ivec4" => Ok(Self::IVec(4)),
            _ => Err(LiteralError::UnsupportedType(s.to_string())),
        }
    }
}

/// A value supplied by the host: a number or a list of numbers.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
#[derive(Clone, Debug, PartialEq, From, IsVariant)]
pub enum ConstValue {
    Scalar(f64),
    Vector(Vec<f64>),
}

/// Parses `3`, `1,0,0.5` or `[1, 0, 0.5]`.
impl FromStr for ConstValue {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LiteralError::InvalidValue(s.to_string());
        let trimmed = s.trim();
        let list = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'));
        if list.is_none() && !trimmed.contains(',') {
            return trimmed.parse().map(Self::Scalar).map_err(|_| invalid());
        }
        list.unwrap_or(trimmed)
            .split(',')
            .map(|n| n.trim().parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Vector)
    }
}

fn finite(n: f64) -> Result<f64, LiteralError> {
    if n.is_finite() {
        Ok(n)
    } else {
        Err(LiteralError::NotFinite(n))
    }
}

fn components(value: &ConstValue, ty: LiteralType) -> Result<&[f64], LiteralError> {
    match value {
        ConstValue::Vector(v) if v.len() == ty.size() => Ok(v),
        ConstValue::Vector(v) => Err(LiteralError::ComponentCount(ty, v.len())),
        ConstValue::Scalar(_) => Err(LiteralError::ExpectedVector(ty)),
    }
}

fn scalar(value: &ConstValue, ty: LiteralType) -> Result<f64, LiteralError> {
    match value {
        ConstValue::Scalar(n) => finite(*n),
        ConstValue::Vector(v) => Err(LiteralError::ExpectedScalar(ty, v.len())),
    }
}

/// Render `value` as a GLSL literal of type `ty`.
///
/// * `int`: truncated toward zero.
/// * `float`: always shows a decimal point.
/// * `vecN`, `ivecN`: a constructor call, `ivecN` components truncated.
///
/// ```rust
/// # use qshade::{render_literal, ConstValue, LiteralType};
/// assert_eq!(render_literal(&ConstValue::Scalar(3.0), LiteralType::Float).unwrap(), "3.0");
/// assert_eq!(render_literal(&ConstValue::Scalar(-2.7), LiteralType::Int).unwrap(), "-2");
/// let v = ConstValue::Vector(vec![1.0, 0.0, 0.5]);
/// assert_eq!(render_literal(&v, LiteralType::Vec(3)).unwrap(), "vec3(1, 0, 0.5)");
/// ```
pub fn render_literal(value: &ConstValue, ty: LiteralType) -> Result<String, LiteralError> {
    match ty {
        LiteralType::Int => {
            let n = scalar(value, ty)?;
            Ok(format!("{}", n as i64))
        }
        LiteralType::Float => {
            let n = scalar(value, ty)?;
            if n.fract() == 0.0 {
                Ok(format!("{}.0", n))
            } else {
                Ok(format!("{n}"))
            }
        }
        LiteralType::Vec(_) => {
            let v = components(value, ty)?
                .iter()
                .map(|n| finite(*n))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{ty}({})", v.iter().format(", ")))
        }
        LiteralType::IVec(_) => {
            let v = components(value, ty)?
                .iter()
                .map(|n| finite(*n).map(|n| n as i64))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{ty}({})", v.iter().format(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: impl Into<ConstValue>, ty: &str) -> Result<String, LiteralError> {
        render_literal(&value.into(), ty.parse()?)
    }

    #[test]
    fn ints_truncate_toward_zero() {
        assert_eq!(render(3.0, "int").unwrap(), "3");
        assert_eq!(render(3.9, "int").unwrap(), "3");
        assert_eq!(render(-3.9, "int").unwrap(), "-3");
        assert_eq!(render(-0.5, "int").unwrap(), "0");
    }

    #[test]
    fn floats_show_a_decimal_point() {
        assert_eq!(render(3.0, "float").unwrap(), "3.0");
        assert_eq!(render(0.25, "float").unwrap(), "0.25");
        assert_eq!(render(-1.0, "float").unwrap(), "-1.0");
    }

    #[test]
    fn vectors() {
        assert_eq!(render(vec![1.0, 0.0, 0.5], "vec3").unwrap(), "vec3(1, 0, 0.5)");
        assert_eq!(render(vec![1.5, -2.5], "ivec2").unwrap(), "ivec2(1, -2)");
        assert_eq!(
            render(vec![0.1, 0.2, 0.3, 1.0], "vec4").unwrap(),
            "vec4(0.1, 0.2, 0.3, 1)"
        );
    }

    #[test]
    fn shape_mismatches() {
        assert_eq!(
            render(vec![1.0, 2.0], "vec3"),
            Err(LiteralError::ComponentCount(LiteralType::Vec(3), 2))
        );
        assert_eq!(
            render(1.0, "vec2"),
            Err(LiteralError::ExpectedVector(LiteralType::Vec(2)))
        );
        assert_eq!(
            render(vec![1.0], "float"),
            Err(LiteralError::ExpectedScalar(LiteralType::Float, 1))
        );
        assert!(matches!(render(f64::NAN, "float"), Err(LiteralError::NotFinite(_))));
        assert_eq!(
            render(1.0, "sampler2D"),
            Err(LiteralError::UnsupportedType("sampler2D".to_string()))
        );
    }

    #[test]
    fn parse_values() {
        assert_eq!("3".parse(), Ok(ConstValue::Scalar(3.0)));
        assert_eq!(" -0.5 ".parse(), Ok(ConstValue::Scalar(-0.5)));
        assert_eq!("1,0,0.5".parse(), Ok(ConstValue::Vector(vec![1.0, 0.0, 0.5])));
        assert_eq!("[1, 2]".parse(), Ok(ConstValue::Vector(vec![1.0, 2.0])));
        assert!("x".parse::<ConstValue>().is_err());
        assert!("1,,2".parse::<ConstValue>().is_err());
    }

    #[test]
    fn type_names_round_trip() {
        for name in ["int", "float", "vec2", "vec3", "vec4", "ivec2", "ivec3", "ivec4"] {
            assert_eq!(name.parse::<LiteralType>().unwrap().to_string(), name);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn untagged_json() {
        let value: ConstValue = serde_json::from_str("[1, 0, 0.5]").unwrap();
        assert_eq!(value, ConstValue::Vector(vec![1.0, 0.0, 0.5]));
        let value: ConstValue = serde_json::from_str("3").unwrap();
        assert_eq!(value, ConstValue::Scalar(3.0));
    }
}
