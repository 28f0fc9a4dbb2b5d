//! Snapshot validation
//!
//! Validates snapshots for common errors before export. The
//! [`SnapshotValidator`] checks for issues like empty scenes, duplicate
//! object names, dangling or looping parent links, non-finite transforms,
//! non-unit rotations, degenerate scale and malformed custom properties.

use std::collections::{HashMap, HashSet};

use level_math::{Quat, Vec3};

use crate::metadata::{AttributeError, ObjectMetadata};
use crate::snapshot::{find_parent_cycle, SceneSnapshot};

/// Allowed deviation of a rotation quaternion's length from 1
const ROTATION_LENGTH_TOLERANCE: f32 = 1e-3;

/// Validation error found in a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Snapshot has no objects
    EmptyScene,
    /// Duplicate object name found
    DuplicateName(String),
    /// Object names a parent that is not in the snapshot
    UnknownParent { object: String, parent: String },
    /// Parent links loop back on themselves
    ParentCycle(String),
    /// A transform component is NaN or infinite
    NonFiniteTransform(String),
    /// Rotation quaternion is not unit length
    NonUnitRotation { object: String, length: f32 },
    /// A scale component is zero, which collapses the object
    ZeroScale(String),
    /// Custom properties could not be read
    InvalidAttribute { object: String, error: AttributeError },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyScene => write!(f, "Scene has no objects"),
            ValidationError::DuplicateName(name) => {
                write!(f, "Duplicate object name: '{}'", name)
            }
            ValidationError::UnknownParent { object, parent } => {
                write!(f, "Object '{}' has unknown parent '{}'", object, parent)
            }
            ValidationError::ParentCycle(name) => {
                write!(f, "Object '{}' is its own ancestor", name)
            }
            ValidationError::NonFiniteTransform(name) => {
                write!(f, "Object '{}' has a non-finite transform", name)
            }
            ValidationError::NonUnitRotation { object, length } => {
                write!(f, "Object '{}' has non-unit rotation (length {})", object, length)
            }
            ValidationError::ZeroScale(name) => {
                write!(f, "Object '{}' has a zero scale component", name)
            }
            ValidationError::InvalidAttribute { object, error } => {
                write!(f, "Object '{}': {}", object, error)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Snapshot validator that checks for common errors
///
/// # Example
/// ```ignore
/// let errors = SnapshotValidator::validate(&snapshot);
/// for error in &errors {
///     log::warn!("Validation error: {}", error);
/// }
/// ```
pub struct SnapshotValidator;

impl SnapshotValidator {
    /// Validate a snapshot, returning all errors found
    ///
    /// Returns an empty vector if no validation errors are detected.
    pub fn validate(snapshot: &SceneSnapshot) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if snapshot.objects.is_empty() {
            errors.push(ValidationError::EmptyScene);
        }

        let mut seen_names = HashSet::new();
        for record in &snapshot.objects {
            if !seen_names.insert(record.name.as_str()) {
                errors.push(ValidationError::DuplicateName(record.name.clone()));
            }
        }

        // First occurrence wins for parent resolution
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, record) in snapshot.objects.iter().enumerate() {
            index.entry(record.name.as_str()).or_insert(i);
        }

        let mut parents = Vec::with_capacity(snapshot.objects.len());
        for record in &snapshot.objects {
            let parent = record.parent.as_ref().and_then(|parent| {
                let found = index.get(parent.as_str()).copied();
                if found.is_none() {
                    errors.push(ValidationError::UnknownParent {
                        object: record.name.clone(),
                        parent: parent.clone(),
                    });
                }
                found
            });
            parents.push(parent);
        }

        if let Some(i) = find_parent_cycle(&parents) {
            errors.push(ValidationError::ParentCycle(snapshot.objects[i].name.clone()));
        }

        for record in &snapshot.objects {
            if !record.transform.is_finite() {
                // NaN slips through the range checks below
                errors.push(ValidationError::NonFiniteTransform(record.name.clone()));
            } else {
                let length = Quat::from_array(record.transform.rotation).length();
                if (length - 1.0).abs() > ROTATION_LENGTH_TOLERANCE {
                    errors.push(ValidationError::NonUnitRotation {
                        object: record.name.clone(),
                        length,
                    });
                }

                let scale = Vec3::from_array(record.transform.scale);
                if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 {
                    errors.push(ValidationError::ZeroScale(record.name.clone()));
                }
            }

            let (_, attribute_errors) = ObjectMetadata::from_attributes(&record.attributes);
            errors.extend(attribute_errors.into_iter().map(|error| {
                ValidationError::InvalidAttribute { object: record.name.clone(), error }
            }));
        }

        errors
    }

    /// Validate and return Result (Ok if no errors, Err with all errors)
    pub fn validate_or_error(snapshot: &SceneSnapshot) -> Result<(), Vec<ValidationError>> {
        let errors = Self::validate(snapshot);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
