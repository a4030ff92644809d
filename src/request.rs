//! Transport-free request adapter for the sync operation
//!
//! Whatever wraps the engine in a server endpoint hands the raw JSON body
//! to this module and maps `RequestError::status()` onto its response
//! codes. The adapter owns parsing, boundary validation, and result
//! serialization; it never touches the transport itself.

use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::callbacks::NoCallbacks;
use crate::cancel::CancelToken;
use crate::engine::Engine;
use crate::types::{CompareMethod, HashAlgorithm, SyncOptions, SyncResult};
use crate::validation::{validate_path_absolute, validate_path_safe, ValidationError};

fn default_operation() -> String {
	"sync-all".to_string()
}

/// JSON request body for the sync-all operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
	#[serde(default = "default_operation")]
	pub operation: String,

	#[serde(default)]
	pub sources: Vec<String>,

	#[serde(default)]
	pub destinations: Vec<String>,

	#[serde(default, rename = "move")]
	pub move_source: bool,

	#[serde(default)]
	pub compare_method: CompareMethod,

	#[serde(default)]
	pub hash_algorithm: HashAlgorithm,

	#[serde(default)]
	pub verify: bool,
}

/// Request-boundary error with an HTTP-style status mapping
#[derive(Debug)]
pub enum RequestError {
	/// Body failed to parse as JSON
	Malformed(String),

	/// Body parsed but failed boundary validation
	Validation(ValidationError),

	/// Unsupported operation name
	UnknownOperation(String),

	/// Result serialization failed
	Internal(String),
}

impl RequestError {
	/// HTTP status the transport should answer with
	pub fn status(&self) -> u16 {
		match self {
			RequestError::Internal(_) => 500,
			_ => 400,
		}
	}
}

impl fmt::Display for RequestError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RequestError::Malformed(msg) => write!(f, "Malformed request: {}", msg),
			RequestError::Validation(e) => write!(f, "{}", e),
			RequestError::UnknownOperation(op) => write!(f, "Unknown operation: {}", op),
			RequestError::Internal(msg) => write!(f, "Internal error: {}", msg),
		}
	}
}

impl Error for RequestError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			RequestError::Validation(e) => Some(e),
			_ => None,
		}
	}
}

impl From<ValidationError> for RequestError {
	fn from(e: ValidationError) -> Self {
		RequestError::Validation(e)
	}
}

impl SyncRequest {
	/// Parse a raw JSON body
	pub fn parse(body: &str) -> Result<Self, RequestError> {
		serde_json::from_str(body).map_err(|e| RequestError::Malformed(e.to_string()))
	}

	/// Boundary validation: operation name, non-empty arrays, absolute
	/// traversal-free paths
	pub fn validate(&self) -> Result<(), RequestError> {
		if self.operation != "sync-all" {
			return Err(RequestError::UnknownOperation(self.operation.clone()));
		}
		if self.sources.is_empty() {
			return Err(RequestError::Validation(ValidationError::ArgumentError(
				"sources must be a non-empty array".to_string(),
			)));
		}
		if self.destinations.is_empty() {
			return Err(RequestError::Validation(ValidationError::ArgumentError(
				"destinations must be a non-empty array".to_string(),
			)));
		}
		for raw in self.sources.iter().chain(self.destinations.iter()) {
			let path = Path::new(raw);
			validate_path_absolute(path)?;
			validate_path_safe(path)?;
		}
		Ok(())
	}

	/// Decompose into engine inputs
	pub fn into_parts(self) -> (Vec<PathBuf>, Vec<PathBuf>, SyncOptions) {
		let sources = self.sources.iter().map(PathBuf::from).collect();
		let destinations = self.destinations.iter().map(PathBuf::from).collect();
		let options = SyncOptions {
			move_source: self.move_source,
			compare_method: self.compare_method,
			hash_algorithm: self.hash_algorithm,
			verify_destination: self.verify,
		};
		(sources, destinations, options)
	}
}

/// Run a sync-all request end to end and serialize the result
///
/// Returns the JSON body for a 200 response, or a `RequestError` whose
/// `status()` the transport maps onto its reply.
pub async fn handle_sync_all(body: &str) -> Result<String, RequestError> {
	let request = SyncRequest::parse(body)?;
	request.validate()?;
	let (sources, destinations, options) = request.into_parts();

	let engine = Engine::new();
	let result: SyncResult = engine
		.sync(&sources, &destinations, &options, &NoCallbacks, &CancelToken::new())
		.await;

	serde_json::to_string(&result).map_err(|e| RequestError::Internal(e.to_string()))
}


// vim: ts=4
