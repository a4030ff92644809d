//! Typed filesystem operations behind the `FileStore` seam
//!
//! The engine talks to storage through a boxed trait object so tests can
//! substitute faulty or corrupting stores. `LocalStore` is the production
//! implementation over tokio's filesystem API.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Metadata subset the sync engine needs
#[derive(Debug, Clone, Copy)]
pub struct FileStat {
	pub size: u64,
	pub is_dir: bool,
	pub modified: Option<SystemTime>,
}

/// Storage operations used by the engine
#[async_trait]
pub trait FileStore: Send + Sync {
	/// Byte-for-byte content copy. Missing parent directories of `dst` are
	/// created recursively before writing. Returns bytes written.
	async fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;

	async fn delete(&self, path: &Path) -> io::Result<()>;

	async fn exists(&self, path: &Path) -> bool;

	async fn stat(&self, path: &Path) -> io::Result<FileStat>;
}

/// Production store over the local filesystem
pub struct LocalStore;

#[async_trait]
impl FileStore for LocalStore {
	async fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
		if let Some(parent) = dst.parent() {
			fs::create_dir_all(parent).await?;
		}
		fs::copy(src, dst).await
	}

	async fn delete(&self, path: &Path) -> io::Result<()> {
		fs::remove_file(path).await
	}

	async fn exists(&self, path: &Path) -> bool {
		fs::metadata(path).await.is_ok()
	}

	async fn stat(&self, path: &Path) -> io::Result<FileStat> {
		let meta = fs::metadata(path).await?;
		Ok(FileStat {
			size: meta.len(),
			is_dir: meta.is_dir(),
			modified: meta.modified().ok(),
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use std::io::Write;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_copy_creates_parent_dirs() {
		let dir = TempDir::new().unwrap();
		let src = dir.path().join("src.txt");
		std::fs::File::create(&src).unwrap().write_all(b"payload").unwrap();

		let dst = dir.path().join("a/b/c/dst.txt");
		let written = LocalStore.copy(&src, &dst).await.unwrap();
		assert_eq!(written, 7);
		assert_eq!(std::fs::read(&dst).unwrap(), b"payload");
	}

	#[tokio::test]
	async fn test_copy_overwrites_existing() {
		let dir = TempDir::new().unwrap();
		let src = dir.path().join("src.txt");
		let dst = dir.path().join("dst.txt");
		std::fs::write(&src, b"new content").unwrap();
		std::fs::write(&dst, b"old").unwrap();

		LocalStore.copy(&src, &dst).await.unwrap();
		assert_eq!(std::fs::read(&dst).unwrap(), b"new content");
	}

	#[tokio::test]
	async fn test_stat_and_exists() {
		let dir = TempDir::new().unwrap();
		let file = dir.path().join("f.bin");
		std::fs::write(&file, vec![0u8; 1234]).unwrap();

		assert!(LocalStore.exists(&file).await);
		assert!(!LocalStore.exists(&dir.path().join("absent")).await);

		let stat = LocalStore.stat(&file).await.unwrap();
		assert_eq!(stat.size, 1234);
		assert!(!stat.is_dir);
		assert!(stat.modified.is_some());

		let dir_stat = LocalStore.stat(dir.path()).await.unwrap();
		assert!(dir_stat.is_dir);
	}

	#[tokio::test]
	async fn test_delete() {
		let dir = TempDir::new().unwrap();
		let file = dir.path().join("gone.txt");
		std::fs::write(&file, b"x").unwrap();

		LocalStore.delete(&file).await.unwrap();
		assert!(!LocalStore.exists(&file).await);

		// Deleting again surfaces the error
		assert!(LocalStore.delete(&file).await.is_err());
	}
}

// vim: ts=4
