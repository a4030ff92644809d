//! Error types for fansync operations

use std::error::Error;
use std::fmt;
use std::io;

/// Main error type for the fallible library surfaces
///
/// The sync engine itself reports operational failure inside SyncResult;
/// this type is returned by the hasher, the request adapter, and the CLI
/// paths where a hard error is the right answer.
#[derive(Debug)]
pub enum SyncError {
	/// I/O error
	Io(io::Error),

	/// Hash target is not a regular file
	NotAFile { path: String },

	/// An option string could not be parsed
	InvalidOption { message: String },

	/// Result serialization failed
	Serialize(serde_json::Error),

	/// Generic error message
	Other { message: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::Io(e) => write!(f, "I/O error: {}", e),
			SyncError::NotAFile { path } => {
				write!(f, "Not a regular file: {}", path)
			}
			SyncError::InvalidOption { message } => {
				write!(f, "Invalid option: {}", message)
			}
			SyncError::Serialize(e) => write!(f, "Serialization failed: {}", e),
			SyncError::Other { message } => write!(f, "{}", message),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::Io(e) => Some(e),
			SyncError::Serialize(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for SyncError {
	fn from(e: io::Error) -> Self {
		SyncError::Io(e)
	}
}

impl From<serde_json::Error> for SyncError {
	fn from(e: serde_json::Error) -> Self {
		SyncError::Serialize(e)
	}
}


// vim: ts=4
