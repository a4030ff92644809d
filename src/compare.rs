//! Source/destination equivalence decisions
//!
//! A destination that is "equivalent" under the active policy is skipped
//! instead of copied. Any I/O failure during the decision means "not
//! equivalent": the copy proceeds and surfaces the real error if there is
//! one.

use std::path::Path;
use std::time::SystemTime;
use tokio::fs;
use tracing::warn;

use crate::hasher;
use crate::types::{CompareMethod, HashAlgorithm};

/// Modification times within this many milliseconds (inclusive) compare equal
const MTIME_TOLERANCE_MS: u128 = 1000;

/// Decide whether `dest` is equivalent to `source` under `method`
///
/// `Hash` requires an algorithm; without one the decision degrades to
/// `SizeMtime` with a warning, never silently to equivalent.
pub async fn are_equivalent(
	source: &Path,
	dest: &Path,
	method: CompareMethod,
	algorithm: Option<HashAlgorithm>,
) -> bool {
	match method {
		CompareMethod::None => false,
		CompareMethod::Size => sizes_equal(source, dest).await,
		CompareMethod::Mtime => mtimes_equal(source, dest).await,
		CompareMethod::SizeMtime => {
			sizes_equal(source, dest).await && mtimes_equal(source, dest).await
		}
		CompareMethod::Hash => match algorithm {
			Some(alg) => hashes_equal(source, dest, alg).await,
			None => {
				warn!(
					"hash compare requested without an algorithm, falling back to size-mtime"
				);
				sizes_equal(source, dest).await && mtimes_equal(source, dest).await
			}
		},
	}
}

async fn sizes_equal(source: &Path, dest: &Path) -> bool {
	let src_meta = match fs::metadata(source).await {
		Ok(m) => m,
		Err(_) => return false,
	};
	let dst_meta = match fs::metadata(dest).await {
		Ok(m) => m,
		Err(_) => return false,
	};
	src_meta.len() == dst_meta.len()
}

async fn mtimes_equal(source: &Path, dest: &Path) -> bool {
	let src_mtime = match modified(source).await {
		Some(t) => t,
		None => return false,
	};
	let dst_mtime = match modified(dest).await {
		Some(t) => t,
		None => return false,
	};
	within_tolerance(src_mtime, dst_mtime)
}

async fn modified(path: &Path) -> Option<SystemTime> {
	fs::metadata(path).await.ok()?.modified().ok()
}

fn within_tolerance(a: SystemTime, b: SystemTime) -> bool {
	let diff = match a.duration_since(b) {
		Ok(d) => d,
		Err(e) => e.duration(),
	};
	diff.as_millis() <= MTIME_TOLERANCE_MS
}

async fn hashes_equal(source: &Path, dest: &Path, algorithm: HashAlgorithm) -> bool {
	let src_digest = match hasher::hash_file(source, algorithm).await {
		Ok(d) => d,
		Err(_) => return false,
	};
	let dst_digest = match hasher::hash_file(dest, algorithm).await {
		Ok(d) => d,
		Err(_) => return false,
	};
	hasher::verify(&src_digest, &dst_digest)
}


// vim: ts=4
