//! Dynamically-typed property default values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A property default value.
///
/// The variant is the stored representation only. The nominal type of the
/// property lives in its type token (see [`crate::PropertyType`]), so a `color`
/// input and a `point` input can both carry a [`Value::Float3`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Float3([f64; 3]),
	Float4([f64; 4]),
	Matrix([[f64; 4]; 4]),
	/// Homogeneous array of scalar values.
	Array(Vec<Value>),
}

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	Bool,
	Int,
	Float,
	String,
	Float3,
	Float4,
	Matrix,
	Array,
}

impl Value {
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Bool(_) => ValueKind::Bool,
			Self::Int(_) => ValueKind::Int,
			Self::Float(_) => ValueKind::Float,
			Self::String(_) => ValueKind::String,
			Self::Float3(_) => ValueKind::Float3,
			Self::Float4(_) => ValueKind::Float4,
			Self::Matrix(_) => ValueKind::Matrix,
			Self::Array(_) => ValueKind::Array,
		}
	}

	/// Returns the kind shared by every element of an array value.
	///
	/// `None` for scalars, empty arrays, and mixed arrays.
	pub fn element_kind(&self) -> Option<ValueKind> {
		let Self::Array(items) = self else {
			return None;
		};
		let first = items.first()?.kind();
		items.iter().all(|item| item.kind() == first).then_some(first)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the value as a float, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			Self::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::Float3 => "float3",
			Self::Float4 => "float4",
			Self::Matrix => "matrix",
			Self::Array => "array",
		};
		f.write_str(name)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Self::Int(i64::from(v))
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::String(v.to_owned())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::String(v)
	}
}

impl From<[f64; 3]> for Value {
	fn from(v: [f64; 3]) -> Self {
		Self::Float3(v)
	}
}

impl From<[f64; 4]> for Value {
	fn from(v: [f64; 4]) -> Self {
		Self::Float4(v)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Self::Array(items.into_iter().map(Into::into).collect())
	}
}
