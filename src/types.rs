//! Core data types for fansync

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::SyncError;

/// Content digest algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
	Blake3,
	Sha256,
	Xxh3,
}

impl Default for HashAlgorithm {
	fn default() -> Self {
		HashAlgorithm::Blake3
	}
}

impl fmt::Display for HashAlgorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HashAlgorithm::Blake3 => write!(f, "blake3"),
			HashAlgorithm::Sha256 => write!(f, "sha256"),
			HashAlgorithm::Xxh3 => write!(f, "xxh3"),
		}
	}
}

impl FromStr for HashAlgorithm {
	type Err = SyncError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"blake3" => Ok(HashAlgorithm::Blake3),
			"sha256" => Ok(HashAlgorithm::Sha256),
			"xxh3" => Ok(HashAlgorithm::Xxh3),
			_ => Err(SyncError::InvalidOption {
				message: format!("unknown hash algorithm: {}", s),
			}),
		}
	}
}

/// Policy deciding whether an existing destination file is equivalent
/// to the source and can be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMethod {
	/// Never equivalent - always copy
	None,

	/// Byte-length equality
	Size,

	/// Modification time equality within tolerance
	Mtime,

	/// Both size and mtime
	SizeMtime,

	/// Digest equality
	Hash,
}

impl Default for CompareMethod {
	fn default() -> Self {
		CompareMethod::SizeMtime
	}
}

impl fmt::Display for CompareMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CompareMethod::None => write!(f, "none"),
			CompareMethod::Size => write!(f, "size"),
			CompareMethod::Mtime => write!(f, "mtime"),
			CompareMethod::SizeMtime => write!(f, "size-mtime"),
			CompareMethod::Hash => write!(f, "hash"),
		}
	}
}

impl FromStr for CompareMethod {
	type Err = SyncError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" => Ok(CompareMethod::None),
			"size" => Ok(CompareMethod::Size),
			"mtime" => Ok(CompareMethod::Mtime),
			"size-mtime" => Ok(CompareMethod::SizeMtime),
			"hash" => Ok(CompareMethod::Hash),
			_ => Err(SyncError::InvalidOption {
				message: format!("unknown compare method: {}", s),
			}),
		}
	}
}

/// Behavioral category of a per-destination failure
///
/// StoreUnavailable errors feed the store monitor's streak; FileSpecific
/// and VerifyFailed never promote a store to unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
	StoreUnavailable,
	FileSpecific,
	VerifyFailed,
}

impl fmt::Display for ErrorClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ErrorClass::StoreUnavailable => write!(f, "StoreUnavailable"),
			ErrorClass::FileSpecific => write!(f, "FileSpecific"),
			ErrorClass::VerifyFailed => write!(f, "VerifyFailed"),
		}
	}
}

/// Options for a sync invocation
///
/// All fields are present and defaulted; there is no missing-vs-unset
/// distinction.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
	/// Copy then delete each source; delete only when every destination
	/// succeeded for that source
	pub move_source: bool,

	/// Skip policy for existing destination files
	pub compare_method: CompareMethod,

	/// Algorithm used for hash compare and destination verification
	pub hash_algorithm: HashAlgorithm,

	/// Recompute the destination digest after copy and fail the
	/// destination on mismatch
	pub verify_destination: bool,
}

/// Immutable snapshot of the work ahead, emitted once at sync start
#[derive(Debug, Clone)]
pub struct SyncPlan {
	pub total_items: usize,
	pub total_destinations: usize,

	/// Sum of source sizes. Destinations multiply the raw byte work but
	/// this stays per-source.
	pub total_bytes: u64,

	pub sources: Vec<PathBuf>,
	pub destinations: Vec<PathBuf>,
}

/// Per-source item description, created before the destination fan-out
#[derive(Debug, Clone)]
pub struct ItemInfo {
	pub source_path: PathBuf,
	pub size: u64,
	pub is_directory: bool,
}

/// Error attached to a failed destination
#[derive(Debug, Clone)]
pub struct DestError {
	pub message: String,
	pub class: ErrorClass,
}

/// Outcome for one destination of one item
///
/// Exactly one of three states holds: skipped, errored, or copied
/// (neither flag set).
#[derive(Debug, Clone)]
pub struct DestResult {
	pub dest_path: PathBuf,
	pub skipped: bool,
	pub error: Option<DestError>,
}

impl DestResult {
	pub fn copied(dest_path: PathBuf) -> Self {
		DestResult { dest_path, skipped: false, error: None }
	}

	pub fn skipped(dest_path: PathBuf) -> Self {
		DestResult { dest_path, skipped: true, error: None }
	}

	pub fn failed(dest_path: PathBuf, message: String, class: ErrorClass) -> Self {
		DestResult { dest_path, skipped: false, error: Some(DestError { message, class }) }
	}

	pub fn is_copied(&self) -> bool {
		!self.skipped && self.error.is_none()
	}
}

/// Aggregate outcome for one source item
#[derive(Debug, Clone)]
pub struct ItemResult {
	pub dest_results: Vec<DestResult>,

	/// Set when any destination errored (first failing destination's message)
	pub error: Option<String>,
}

impl ItemResult {
	pub fn new(dest_results: Vec<DestResult>) -> Self {
		let error =
			dest_results.iter().find_map(|d| d.error.as_ref().map(|e| e.message.clone()));
		ItemResult { dest_results, error }
	}
}

/// Rolling statistics, updated after each source
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStats {
	pub bytes_copied: u64,
	pub items_completed: usize,
	pub items_failed: usize,
	pub items_skipped: usize,
}

/// One aggregated error in the final result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncErrorEntry {
	/// Source path the error belongs to
	pub item: String,
	pub message: String,
	pub error_class: ErrorClass,
}

/// Final result of a sync invocation
///
/// The engine reports all operational failure here; it never returns Err
/// for per-item or per-store trouble. `items_completed + items_failed +
/// items_skipped` is at most the planned item count, short by the items
/// not started due to cancellation or store-failure abort.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
	pub cancelled: bool,
	pub store_failure_abort: bool,
	pub items_completed: usize,
	pub items_failed: usize,
	pub items_skipped: usize,
	pub bytes_copied: u64,
	pub duration_ms: u64,
	pub errors: Vec<SyncErrorEntry>,
}

impl Default for SyncResult {
	fn default() -> Self {
		SyncResult {
			cancelled: false,
			store_failure_abort: false,
			items_completed: 0,
			items_failed: 0,
			items_skipped: 0,
			bytes_copied: 0,
			duration_ms: 0,
			errors: vec![],
		}
	}
}

impl SyncResult {
	/// Rolling stats snapshot for progress callbacks
	pub fn stats(&self) -> SyncStats {
		SyncStats {
			bytes_copied: self.bytes_copied,
			items_completed: self.items_completed,
			items_failed: self.items_failed,
			items_skipped: self.items_skipped,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_hash_algorithm_default() {
		assert_eq!(HashAlgorithm::default(), HashAlgorithm::Blake3);
	}

	#[test]
	fn test_compare_method_default() {
		assert_eq!(CompareMethod::default(), CompareMethod::SizeMtime);
	}

	#[test]
	fn test_hash_algorithm_roundtrip() {
		for alg in [HashAlgorithm::Blake3, HashAlgorithm::Sha256, HashAlgorithm::Xxh3].iter() {
			let parsed: HashAlgorithm = alg.to_string().parse().unwrap();
			assert_eq!(parsed, *alg);
		}
	}

	#[test]
	fn test_compare_method_roundtrip() {
		for method in [
			CompareMethod::None,
			CompareMethod::Size,
			CompareMethod::Mtime,
			CompareMethod::SizeMtime,
			CompareMethod::Hash,
		]
		.iter()
		{
			let parsed: CompareMethod = method.to_string().parse().unwrap();
			assert_eq!(parsed, *method);
		}
	}

	#[test]
	fn test_compare_method_parse_unknown() {
		assert!("checksum".parse::<CompareMethod>().is_err());
	}

	#[test]
	fn test_compare_method_serde() {
		let method: CompareMethod = serde_json::from_str("\"size-mtime\"").unwrap();
		assert_eq!(method, CompareMethod::SizeMtime);
		assert_eq!(serde_json::to_string(&CompareMethod::Hash).unwrap(), "\"hash\"");
	}

	#[test]
	fn test_hash_algorithm_serde() {
		let alg: HashAlgorithm = serde_json::from_str("\"xxh3\"").unwrap();
		assert_eq!(alg, HashAlgorithm::Xxh3);
	}

	#[test]
	fn test_sync_options_defaults() {
		let opts = SyncOptions::default();
		assert!(!opts.move_source);
		assert!(!opts.verify_destination);
		assert_eq!(opts.compare_method, CompareMethod::SizeMtime);
		assert_eq!(opts.hash_algorithm, HashAlgorithm::Blake3);
	}

	#[test]
	fn test_dest_result_states() {
		let copied = DestResult::copied(PathBuf::from("/d/a"));
		assert!(copied.is_copied());

		let skipped = DestResult::skipped(PathBuf::from("/d/a"));
		assert!(skipped.skipped);
		assert!(!skipped.is_copied());

		let failed = DestResult::failed(
			PathBuf::from("/d/a"),
			"boom".to_string(),
			ErrorClass::FileSpecific,
		);
		assert!(!failed.is_copied());
		assert_eq!(failed.error.as_ref().unwrap().class, ErrorClass::FileSpecific);
	}

	#[test]
	fn test_item_result_error_propagation() {
		let results = vec![
			DestResult::copied(PathBuf::from("/d1/a")),
			DestResult::failed(
				PathBuf::from("/d2/a"),
				"read-only".to_string(),
				ErrorClass::StoreUnavailable,
			),
		];
		let item = ItemResult::new(results);
		assert_eq!(item.error.as_deref(), Some("read-only"));
	}

	#[test]
	fn test_item_result_no_error() {
		let item = ItemResult::new(vec![DestResult::copied(PathBuf::from("/d1/a"))]);
		assert!(item.error.is_none());
	}

	#[test]
	fn test_sync_result_serialization_keys() {
		let result = SyncResult::default();
		let json = serde_json::to_string(&result).unwrap();
		assert!(json.contains("\"storeFailureAbort\""));
		assert!(json.contains("\"itemsCompleted\""));
		assert!(json.contains("\"bytesCopied\""));
		assert!(json.contains("\"durationMs\""));
	}
}

// vim: ts=4
