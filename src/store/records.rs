//! Frame record structures persisted in the store container

use super::bbox::CenterBox;
use super::constants::{ATTR_SUBSET, ATTR_TIME};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar attribute value attached to a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Integer view of the value, if it is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view of the value; integers promote
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

/// A model-attributed bounding box, distinct from the ground-truth annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub model: String,
    pub bbox: CenterBox,
}

/// One frame entry: image payload, attribute map, optional ground-truth box,
/// insertion-ordered predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub image: ArrayD<u8>,
    pub attrs: BTreeMap<String, AttrValue>,
    pub annotation: Option<CenterBox>,
    pub predictions: Vec<Prediction>,
}

impl FrameRecord {
    /// Create an unannotated record around an image payload
    pub fn new(image: ArrayD<u8>) -> Self {
        FrameRecord {
            image,
            attrs: BTreeMap::new(),
            annotation: None,
            predictions: Vec::new(),
        }
    }

    /// Subset mask of this frame; absent attribute reads as unset (0)
    pub fn subset(&self) -> u32 {
        self.attrs
            .get(ATTR_SUBSET)
            .and_then(|v| v.as_int())
            .unwrap_or(0) as u32
    }

    /// Timestamp of this frame, if one is recorded
    pub fn time(&self) -> Option<f64> {
        self.attrs.get(ATTR_TIME).and_then(|v| v.as_float())
    }

    /// Set a scalar attribute, overwriting any previous value
    pub fn set_attr(&mut self, key: &str, value: AttrValue) -> &mut Self {
        self.attrs.insert(key.to_string(), value);
        self
    }

    /// Set the subset mask attribute
    pub fn set_subset(&mut self, mask: u32) -> &mut Self {
        self.set_attr(ATTR_SUBSET, AttrValue::Int(i64::from(mask)))
    }

    /// Set the timestamp attribute
    pub fn set_time(&mut self, time: f64) -> &mut Self {
        self.set_attr(ATTR_TIME, AttrValue::Float(time))
    }
}

/// Root of the persisted store: the named frame collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Root {
    pub frames: BTreeMap<String, FrameRecord>,
}
