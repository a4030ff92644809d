//! Path validation for the request boundary

use std::error::Error;
use std::fmt;
use std::path::{Component, Path};

/// Validation error raised at the request boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// Invalid path
	PathError(String),
	/// Invalid argument shape
	ArgumentError(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::PathError(msg) => write!(f, "Path validation error: {}", msg),
			ValidationError::ArgumentError(msg) => {
				write!(f, "Argument validation error: {}", msg)
			}
		}
	}
}

impl Error for ValidationError {}

/// Check if a path is safe (no parent directory references)
pub fn is_path_safe(path: &Path) -> bool {
	!path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Validate a path is safe
///
/// # Returns
/// `Ok(())` if valid, `Err(ValidationError)` if the path contains a `..`
/// component
pub fn validate_path_safe(path: &Path) -> Result<(), ValidationError> {
	if !is_path_safe(path) {
		return Err(ValidationError::PathError(format!(
			"path contains parent directory reference: {}",
			path.display()
		)));
	}
	Ok(())
}

/// Validate that a path is absolute
pub fn validate_path_absolute(path: &Path) -> Result<(), ValidationError> {
	if !path.is_absolute() {
		return Err(ValidationError::PathError(format!(
			"path must be absolute: {}",
			path.display()
		)));
	}
	Ok(())
}


// vim: ts=4
