//! Sync engine - fans a source set out to every destination
//!
//! The outer source loop is sequential so item ordering and observer
//! events stay deterministic; the per-item destination fan-out runs one
//! concurrent task per destination. Operational failure never escapes as
//! Err: everything lands in the returned SyncResult.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::callbacks::SyncObserver;
use crate::cancel::CancelToken;
use crate::compare;
use crate::fileops::{FileStore, LocalStore};
use crate::hasher;
use crate::logging::*;
use crate::monitor::StoreMonitor;
use crate::types::{
	CompareMethod, DestResult, ErrorClass, ItemInfo, ItemResult, SyncErrorEntry, SyncOptions,
	SyncPlan, SyncResult,
};
use crate::verify;

/// Multi-destination sync engine
///
/// Stateless across invocations: the store monitor is created fresh for
/// every `sync` call. The storage backend is swappable through the
/// `FileStore` seam.
pub struct Engine {
	store: Box<dyn FileStore>,
	threshold: Option<u32>,
}

impl Engine {
	/// Engine over the local filesystem with the default failure threshold
	pub fn new() -> Self {
		Engine { store: Box::new(LocalStore), threshold: None }
	}

	/// Engine over a caller-supplied storage backend
	pub fn with_store(store: Box<dyn FileStore>) -> Self {
		Engine { store, threshold: None }
	}

	/// Override the consecutive-error threshold for store unavailability
	pub fn with_threshold(mut self, threshold: u32) -> Self {
		self.threshold = Some(threshold);
		self
	}

	/// Synchronize every source to every destination directory
	///
	/// Sources are processed in input order. For each source the
	/// destinations are written concurrently; the item's outcome is the
	/// aggregate of its per-destination outcomes. When `move_source` is
	/// set, sources whose destinations all succeeded are deleted after
	/// the last item.
	pub async fn sync(
		&self,
		sources: &[PathBuf],
		destinations: &[PathBuf],
		options: &SyncOptions,
		observer: &dyn SyncObserver,
		cancel: &CancelToken,
	) -> SyncResult {
		let start_time = Instant::now();
		let monitor = match self.threshold {
			Some(t) => StoreMonitor::new(t),
			None => StoreMonitor::default(),
		};

		let plan = self.build_plan(sources, destinations).await;
		info!(
			"sync start: {} items x {} destinations, {} bytes",
			plan.total_items, plan.total_destinations, plan.total_bytes
		);
		observer.on_start(&plan);

		let mut result = SyncResult::default();
		let mut to_delete: Vec<PathBuf> = Vec::new();

		for source in sources {
			if cancel.is_cancelled() {
				info!("sync cancelled before {}", source.display());
				result.cancelled = true;
				break;
			}
			if monitor.has_unavailable_store() {
				warn!("aborting sync: a destination store is unavailable");
				result.store_failure_abort = true;
				break;
			}

			self.sync_item(
				source,
				destinations,
				options,
				observer,
				cancel,
				&monitor,
				&mut result,
				&mut to_delete,
			)
			.await;

			observer.on_progress(&result.stats());
		}

		if options.move_source && !result.cancelled && !result.store_failure_abort {
			for path in &to_delete {
				debug!("move: deleting source {}", path.display());
				if let Err(e) = self.store.delete(path).await {
					// The copies already landed; a failed source delete is
					// reported but does not retroactively fail the item.
					result.errors.push(SyncErrorEntry {
						item: path.display().to_string(),
						message: format!("failed to delete source after move: {}", e),
						error_class: ErrorClass::FileSpecific,
					});
				}
			}
		}

		result.duration_ms = start_time.elapsed().as_millis() as u64;
		observer.on_finish(&result);
		result
	}

	/// Stat every source up front for the plan totals.
	/// Stat failures contribute 0 bytes and surface later per item.
	async fn build_plan(&self, sources: &[PathBuf], destinations: &[PathBuf]) -> SyncPlan {
		let mut total_bytes = 0u64;
		for source in sources {
			match self.store.stat(source).await {
				Ok(stat) => total_bytes += stat.size,
				Err(e) => {
					debug!("plan stat failed for {}: {}", source.display(), e);
				}
			}
		}
		SyncPlan {
			total_items: sources.len(),
			total_destinations: destinations.len(),
			total_bytes,
			sources: sources.to_vec(),
			destinations: destinations.to_vec(),
		}
	}

	#[allow(clippy::too_many_arguments)]
	async fn sync_item(
		&self,
		source: &Path,
		destinations: &[PathBuf],
		options: &SyncOptions,
		observer: &dyn SyncObserver,
		cancel: &CancelToken,
		monitor: &StoreMonitor,
		result: &mut SyncResult,
		to_delete: &mut Vec<PathBuf>,
	) {
		let stat = match self.store.stat(source).await {
			Ok(stat) => stat,
			Err(e) => {
				error!("source stat failed for {}: {}", source.display(), e);
				let item = ItemInfo {
					source_path: source.to_path_buf(),
					size: 0,
					is_directory: false,
				};
				let message = format!("source unavailable: {}", e);
				result.items_failed += 1;
				result.errors.push(SyncErrorEntry {
					item: source.display().to_string(),
					message: message.clone(),
					error_class: ErrorClass::FileSpecific,
				});
				let item_result = ItemResult { dest_results: vec![], error: Some(message) };
				observer.on_item_complete(&item, &item_result);
				return;
			}
		};

		let item = ItemInfo {
			source_path: source.to_path_buf(),
			size: stat.size,
			is_directory: stat.is_dir,
		};
		observer.on_item_start(&item);

		// The source digest feeds destination verification. A digest
		// failure does not abort the item; the affected per-destination
		// verifications fail instead.
		let source_digest = if options.verify_destination
			|| options.compare_method == CompareMethod::Hash
		{
			match hasher::hash_file(source, options.hash_algorithm).await {
				Ok(digest) => Some(digest),
				Err(e) => {
					warn!("source digest failed for {}: {}", source.display(), e);
					None
				}
			}
		} else {
			None
		};

		let dest_results: Vec<DestResult> = join_all(destinations.iter().map(|dest_dir| {
			self.sync_to_destination(
				&item,
				dest_dir,
				options,
				source_digest.as_deref(),
				observer,
				cancel,
				monitor,
			)
		}))
		.await;

		let item_result = ItemResult::new(dest_results);

		if item_result.error.is_some() {
			result.items_failed += 1;
			for dest in &item_result.dest_results {
				if let Some(err) = &dest.error {
					result.errors.push(SyncErrorEntry {
						item: source.display().to_string(),
						message: format!("{}: {}", dest.dest_path.display(), err.message),
						error_class: err.class,
					});
				}
			}
		} else if !item_result.dest_results.is_empty()
			&& item_result.dest_results.iter().all(|d| d.skipped)
		{
			result.items_skipped += 1;
		} else {
			result.items_completed += 1;
			let copied = item_result.dest_results.iter().filter(|d| d.is_copied()).count();
			result.bytes_copied += item.size * copied as u64;
			if options.move_source {
				to_delete.push(source.to_path_buf());
			}
		}

		observer.on_item_complete(&item, &item_result);
	}

	#[allow(clippy::too_many_arguments)]
	async fn sync_to_destination(
		&self,
		item: &ItemInfo,
		dest_dir: &Path,
		options: &SyncOptions,
		source_digest: Option<&str>,
		observer: &dyn SyncObserver,
		cancel: &CancelToken,
		monitor: &StoreMonitor,
	) -> DestResult {
		let file_name = match item.source_path.file_name() {
			Some(name) => name,
			None => {
				return DestResult::failed(
					dest_dir.to_path_buf(),
					format!("source has no file name: {}", item.source_path.display()),
					ErrorClass::FileSpecific,
				);
			}
		};
		let dest_path = dest_dir.join(file_name);

		if cancel.is_cancelled() {
			return DestResult::failed(
				dest_path,
				"operation cancelled".to_string(),
				ErrorClass::FileSpecific,
			);
		}

		if compare::are_equivalent(
			&item.source_path,
			&dest_path,
			options.compare_method,
			Some(options.hash_algorithm),
		)
		.await
		{
			debug!("skipping equivalent destination {}", dest_path.display());
			monitor.record_success(&dest_path);
			return DestResult::skipped(dest_path);
		}

		if let Err(e) = self.store.copy(&item.source_path, &dest_path).await {
			let class = StoreMonitor::classify_error(&e);
			warn!("copy to {} failed: {} ({})", dest_path.display(), e, class);
			monitor.record_error(&dest_path, class);
			return DestResult::failed(dest_path, e.to_string(), class);
		}

		if options.verify_destination {
			let verified = match source_digest {
				Some(digest) => {
					verify::verify_destination(digest, &dest_path, options.hash_algorithm).await
				}
				None => false,
			};
			if !verified {
				monitor.record_error(&dest_path, ErrorClass::VerifyFailed);
				return DestResult::failed(
					dest_path.clone(),
					format!("destination verification failed for {}", dest_path.display()),
					ErrorClass::VerifyFailed,
				);
			}
		}

		monitor.record_success(&dest_path);
		observer.on_item_progress(item, item.size);
		DestResult::copied(dest_path)
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::callbacks::NoCallbacks;
	use tempfile::TempDir;

	fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
		let path = dir.path().join(name);
		std::fs::write(&path, content).unwrap();
		path
	}

	#[tokio::test]
	async fn test_plan_totals() {
		let dir = TempDir::new().unwrap();
		let a = write(&dir, "a.txt", b"12345");
		let b = write(&dir, "b.txt", b"1234567890");
		let missing = dir.path().join("missing.txt");

		let engine = Engine::new();
		let destinations = vec![dir.path().join("d1"), dir.path().join("d2")];
		let plan = engine.build_plan(&[a, b, missing], &destinations).await;

		assert_eq!(plan.total_items, 3);
		assert_eq!(plan.total_destinations, 2);
		// The missing source contributes 0; its error surfaces per item
		assert_eq!(plan.total_bytes, 15);
	}

	#[tokio::test]
	async fn test_missing_source_counts_failed() {
		let dir = TempDir::new().unwrap();
		let missing = dir.path().join("missing.txt");
		let dest = dir.path().join("d1");
		std::fs::create_dir(&dest).unwrap();

		let engine = Engine::new();
		let result = engine
			.sync(
				&[missing],
				&[dest.clone()],
				&SyncOptions::default(),
				&NoCallbacks,
				&CancelToken::new(),
			)
			.await;

		assert_eq!(result.items_failed, 1);
		assert_eq!(result.items_completed, 0);
		assert_eq!(result.errors.len(), 1);
		assert!(!dest.join("missing.txt").exists());
	}

	#[tokio::test]
	async fn test_empty_destination_list_counts_completed() {
		let dir = TempDir::new().unwrap();
		let source = write(&dir, "a.txt", b"payload");

		let engine = Engine::new();
		let result = engine
			.sync(
				&[source.clone()],
				&[],
				&SyncOptions::default(),
				&NoCallbacks,
				&CancelToken::new(),
			)
			.await;

		assert_eq!(result.items_completed, 1);
		assert_eq!(result.bytes_copied, 0);
		assert!(source.exists());
	}
}

// vim: ts=4
