//! Post-copy destination verification

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::hasher;
use crate::types::HashAlgorithm;

/// Recompute the destination digest and compare against the source digest
///
/// Verification fails closed: any I/O error reading the destination counts
/// as a mismatch.
pub async fn verify_destination(
	source_digest: &str,
	dest_path: &Path,
	algorithm: HashAlgorithm,
) -> bool {
	match hasher::hash_file(dest_path, algorithm).await {
		Ok(dest_digest) => hasher::verify(source_digest, &dest_digest),
		Err(e) => {
			warn!("verification read failed for {}: {}", dest_path.display(), e);
			false
		}
	}
}

/// Verify many destinations against one source digest, in parallel
///
/// The result vector order matches the input order.
pub async fn verify_many(
	source_digest: &str,
	dest_paths: &[PathBuf],
	algorithm: HashAlgorithm,
) -> Vec<bool> {
	join_all(
		dest_paths.iter().map(|dest| verify_destination(source_digest, dest, algorithm)),
	)
	.await
}


// vim: ts=4
