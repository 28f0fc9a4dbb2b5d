//! Per-object metadata
//!
//! The host editor stores optional metadata as free-form custom properties on
//! each object. Only a handful of well-known keys matter to the exporter, so
//! they are lifted into [`ObjectMetadata`] when the object enters the scene
//! graph. Validation happens there, once, instead of at every read.

use std::collections::BTreeMap;
use std::fmt;

use level_math::Vec3;
use serde::{Serialize, Deserialize};

/// Key holding the external asset reference
pub const FILE_NAME_KEY: &str = "file_name";
/// Key holding the collider shape tag
pub const COLLIDER_KEY: &str = "collider";
/// Key holding the collider center (object-local)
pub const COLLIDER_CENTER_KEY: &str = "collider_center";
/// Key holding the collider full extents (object-local)
pub const COLLIDER_SIZE_KEY: &str = "collider_size";

/// A raw custom property value as supplied by the host editor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Number(_) => "number",
            AttributeValue::Text(_) => "string",
            AttributeValue::List(_) => "list",
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<Vec3> for AttributeValue {
    fn from(v: Vec3) -> Self {
        AttributeValue::List(
            v.to_array()
                .iter()
                .map(|c| AttributeValue::Number(f64::from(*c)))
                .collect(),
        )
    }
}

/// Open custom property map, ordered by key
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Problem found while lifting custom properties into [`ObjectMetadata`]
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeError {
    /// The value has the wrong type for its key
    WrongType { key: String, expected: &'static str, found: &'static str },
    /// A collider is declared but one of its companion keys is missing
    MissingKey(&'static str),
    /// A vector value does not have exactly three components
    WrongArity { key: String, len: usize },
    /// A vector component is not a number
    NonNumeric { key: String, index: usize },
    /// A vector component is NaN or infinite
    NonFinite { key: String, index: usize },
    /// Collider center/size given without a collider tag
    StrayColliderField(&'static str),
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::WrongType { key, expected, found } => {
                write!(f, "'{}' should be a {}, found {}", key, expected, found)
            }
            AttributeError::MissingKey(key) => {
                write!(f, "collider declared without '{}'", key)
            }
            AttributeError::WrongArity { key, len } => {
                write!(f, "'{}' needs 3 components, found {}", key, len)
            }
            AttributeError::NonNumeric { key, index } => {
                write!(f, "'{}' component {} is not a number", key, index)
            }
            AttributeError::NonFinite { key, index } => {
                write!(f, "'{}' component {} is not finite", key, index)
            }
            AttributeError::StrayColliderField(key) => {
                write!(f, "'{}' present without a collider", key)
            }
        }
    }
}

impl std::error::Error for AttributeError {}

/// Axis-aligned box collider description in object-local space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderDescriptor {
    /// Shape tag, e.g. "BOX"
    pub shape: String,
    /// Box center in object-local coordinates
    pub center: Vec3,
    /// Full extents along the local axes
    pub size: Vec3,
}

impl ColliderDescriptor {
    /// Shape tag written by the editor's "add collider" action
    pub const BOX: &'static str = "BOX";

    /// Create a box collider
    pub fn new_box(center: Vec3, size: Vec3) -> Self {
        Self {
            shape: Self::BOX.to_string(),
            center,
            size,
        }
    }
}

impl Default for ColliderDescriptor {
    /// Unit-centered box with extents 2, as the editor creates it
    fn default() -> Self {
        Self::new_box(Vec3::ZERO, Vec3::splat(2.0))
    }
}

/// Optional, validated metadata attached to a scene object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectMetadata {
    /// External asset reference (`file_name`)
    pub file_name: Option<String>,
    /// Box collider (`collider`, `collider_center`, `collider_size`)
    pub collider: Option<ColliderDescriptor>,
}

impl ObjectMetadata {
    /// Empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the collider
    pub fn with_collider(mut self, collider: ColliderDescriptor) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Editor action: add an empty file name if none exists yet
    pub fn add_file_name(&mut self) {
        if self.file_name.is_none() {
            self.file_name = Some(String::new());
        }
    }

    /// Editor action: add the default box collider if none exists yet
    pub fn add_default_collider(&mut self) {
        if self.collider.is_none() {
            self.collider = Some(ColliderDescriptor::default());
        }
    }

    /// Lift well-known keys out of a custom property map
    ///
    /// Never fails as a whole: each problem is reported and only the affected
    /// feature is dropped. A malformed collider leaves `collider` as `None`
    /// while `file_name` is still read, and unknown keys are ignored.
    pub fn from_attributes(attributes: &Attributes) -> (Self, Vec<AttributeError>) {
        let mut errors = Vec::new();

        let file_name = match attributes.get(FILE_NAME_KEY) {
            None => None,
            Some(AttributeValue::Text(s)) => Some(s.clone()),
            Some(other) => {
                errors.push(AttributeError::WrongType {
                    key: FILE_NAME_KEY.to_string(),
                    expected: "string",
                    found: other.type_name(),
                });
                None
            }
        };

        let collider = match parse_collider(attributes) {
            Ok(collider) => collider,
            Err(e) => {
                errors.push(e);
                None
            }
        };

        if !attributes.contains_key(COLLIDER_KEY) {
            for key in [COLLIDER_CENTER_KEY, COLLIDER_SIZE_KEY] {
                if attributes.contains_key(key) {
                    errors.push(AttributeError::StrayColliderField(key));
                }
            }
        }

        (Self { file_name, collider }, errors)
    }

    /// Write the metadata back out as custom properties
    pub fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(ref file_name) = self.file_name {
            attributes.insert(FILE_NAME_KEY.to_string(), file_name.as_str().into());
        }
        if let Some(ref collider) = self.collider {
            attributes.insert(COLLIDER_KEY.to_string(), collider.shape.as_str().into());
            attributes.insert(COLLIDER_CENTER_KEY.to_string(), collider.center.into());
            attributes.insert(COLLIDER_SIZE_KEY.to_string(), collider.size.into());
        }
        attributes
    }
}

fn parse_collider(attributes: &Attributes) -> Result<Option<ColliderDescriptor>, AttributeError> {
    let shape = match attributes.get(COLLIDER_KEY) {
        None => return Ok(None),
        Some(AttributeValue::Text(s)) => s.clone(),
        Some(other) => {
            return Err(AttributeError::WrongType {
                key: COLLIDER_KEY.to_string(),
                expected: "string",
                found: other.type_name(),
            })
        }
    };

    let center = attributes
        .get(COLLIDER_CENTER_KEY)
        .ok_or(AttributeError::MissingKey(COLLIDER_CENTER_KEY))?;
    let size = attributes
        .get(COLLIDER_SIZE_KEY)
        .ok_or(AttributeError::MissingKey(COLLIDER_SIZE_KEY))?;

    Ok(Some(ColliderDescriptor {
        shape,
        center: parse_vec3(COLLIDER_CENTER_KEY, center)?,
        size: parse_vec3(COLLIDER_SIZE_KEY, size)?,
    }))
}

fn parse_vec3(key: &str, value: &AttributeValue) -> Result<Vec3, AttributeError> {
    let items = match value {
        AttributeValue::List(items) => items,
        other => {
            return Err(AttributeError::WrongType {
                key: key.to_string(),
                expected: "list",
                found: other.type_name(),
            })
        }
    };
    if items.len() != 3 {
        return Err(AttributeError::WrongArity { key: key.to_string(), len: items.len() });
    }

    let mut out = [0.0f32; 3];
    for (index, item) in items.iter().enumerate() {
        let n = match item {
            AttributeValue::Number(n) => *n as f32,
            _ => return Err(AttributeError::NonNumeric { key: key.to_string(), index }),
        };
        if !n.is_finite() {
            return Err(AttributeError::NonFinite { key: key.to_string(), index });
        }
        out[index] = n;
    }
    Ok(Vec3::from_array(out))
}
