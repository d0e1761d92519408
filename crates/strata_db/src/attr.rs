//! Typed attribute values for the per-instance attribute bag.
//!
//! Instances carry an open-ended set of named attributes; the partitioning
//! stage uses an integer attribute to record each instance's assigned die.

use serde::{Deserialize, Serialize};

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Integer attribute.
    Int(i64),
    /// String attribute.
    Str(String),
    /// Real-valued attribute.
    Real(f64),
    /// Boolean attribute.
    Bool(bool),
}

impl AttrValue {
    /// Returns the integer value, if this is an [`AttrValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is an [`AttrValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the real value, if this is an [`AttrValue::Real`].
    pub fn as_real(&self) -> Option<f64> {
        match self {
            AttrValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is an [`AttrValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}
