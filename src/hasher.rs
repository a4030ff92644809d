//! Content digest computation over files and buffers
//!
//! One logical `hash_file` operation covers both small and large files:
//! anything under the whole-read limit is pulled into memory and hashed in
//! one pass, larger files are hashed from a streamed read to cap the
//! working set. Both paths produce identical digests for the same content.

use sha2::Digest;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::error::SyncError;
use crate::types::HashAlgorithm;

/// Files at or above this size are hashed via a streamed read.
/// Internal tuning constant, not part of the digest contract.
const WHOLE_READ_LIMIT: u64 = 1_048_576;

/// Read buffer size for the streamed path
const STREAM_BUF_SIZE: usize = 64 * 1024;

/// Incremental hasher over the supported algorithms
enum StreamingHasher {
	Blake3(blake3::Hasher),
	Sha256(sha2::Sha256),
	Xxh3(xxhash_rust::xxh3::Xxh3),
}

impl StreamingHasher {
	fn new(algorithm: HashAlgorithm) -> Self {
		match algorithm {
			HashAlgorithm::Blake3 => StreamingHasher::Blake3(blake3::Hasher::new()),
			HashAlgorithm::Sha256 => StreamingHasher::Sha256(sha2::Sha256::new()),
			HashAlgorithm::Xxh3 => StreamingHasher::Xxh3(xxhash_rust::xxh3::Xxh3::new()),
		}
	}

	fn update(&mut self, data: &[u8]) {
		match self {
			StreamingHasher::Blake3(h) => {
				h.update(data);
			}
			StreamingHasher::Sha256(h) => h.update(data),
			StreamingHasher::Xxh3(h) => h.update(data),
		}
	}

	/// Finalize into a lowercase hex digest
	fn finalize_hex(self) -> String {
		match self {
			StreamingHasher::Blake3(h) => hex::encode(h.finalize().as_bytes()),
			StreamingHasher::Sha256(h) => hex::encode(h.finalize()),
			StreamingHasher::Xxh3(h) => format!("{:032x}", h.digest128()),
		}
	}
}

/// Hash a buffer with the given algorithm, returning lowercase hex
pub fn hash_buffer(bytes: &[u8], algorithm: HashAlgorithm) -> String {
	let mut hasher = StreamingHasher::new(algorithm);
	hasher.update(bytes);
	hasher.finalize_hex()
}

/// Hash a file's content with the given algorithm, returning lowercase hex
///
/// Fails when the target is not a regular file; read errors bubble up.
pub async fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, SyncError> {
	let meta = fs::metadata(path).await?;
	if !meta.is_file() {
		return Err(SyncError::NotAFile { path: path.display().to_string() });
	}

	if meta.len() < WHOLE_READ_LIMIT {
		let contents = fs::read(path).await?;
		return Ok(hash_buffer(&contents, algorithm));
	}

	let mut file = fs::File::open(path).await?;
	let mut hasher = StreamingHasher::new(algorithm);
	let mut buf = vec![0u8; STREAM_BUF_SIZE];
	loop {
		let n = file.read(&mut buf).await?;
		if n == 0 {
			break;
		}
		hasher.update(&buf[..n]);
	}
	Ok(hasher.finalize_hex())
}

/// Compare two hex digests, case-insensitively
pub fn verify(a_hex: &str, b_hex: &str) -> bool {
	a_hex.eq_ignore_ascii_case(b_hex)
}


// vim: ts=4
