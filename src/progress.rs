//! Progress display observer for CLI sync

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::callbacks::SyncObserver;
use crate::types::{ItemInfo, ItemResult, SyncPlan, SyncResult, SyncStats};

/// Bytes per megabyte for display conversions
const BYTES_PER_MB: f64 = 1_000_000.0;

/// Minimum interval between progress lines
const UPDATE_INTERVAL_MS: u128 = 100;

/// CLI progress observer - prints sync progress to stderr
pub struct CliProgress {
	bytes_seen: AtomicU64,
	last_update: Mutex<Instant>,
}

impl CliProgress {
	pub fn new() -> Self {
		CliProgress { bytes_seen: AtomicU64::new(0), last_update: Mutex::new(Instant::now()) }
	}
}

impl Default for CliProgress {
	fn default() -> Self {
		Self::new()
	}
}

impl SyncObserver for CliProgress {
	fn on_start(&self, plan: &SyncPlan) {
		eprintln!(
			"Syncing {} item(s) to {} destination(s), {:.2} MB...",
			plan.total_items,
			plan.total_destinations,
			plan.total_bytes as f64 / BYTES_PER_MB
		);
	}

	fn on_item_progress(&self, item: &ItemInfo, bytes_added: u64) {
		let total = self.bytes_seen.fetch_add(bytes_added, Ordering::SeqCst) + bytes_added;

		// Throttle to avoid flooding the terminal on many small files
		let mut last = self.last_update.lock().unwrap_or_else(|e| e.into_inner());
		if last.elapsed().as_millis() < UPDATE_INTERVAL_MS {
			return;
		}
		*last = Instant::now();
		eprint!(
			"\r  {} ({:.2} MB written)",
			item.source_path.display(),
			total as f64 / BYTES_PER_MB
		);
	}

	fn on_item_complete(&self, item: &ItemInfo, result: &ItemResult) {
		let status = if result.error.is_some() {
			"FAILED"
		} else if !result.dest_results.is_empty() && result.dest_results.iter().all(|d| d.skipped)
		{
			"skipped"
		} else {
			"ok"
		};
		eprintln!("\r  {} [{}]", item.source_path.display(), status);
		if let Some(error) = &result.error {
			eprintln!("    {}", error);
		}
	}

	fn on_progress(&self, stats: &SyncStats) {
		tracing::debug!(
			"progress: {} completed, {} skipped, {} failed, {} bytes",
			stats.items_completed,
			stats.items_skipped,
			stats.items_failed,
			stats.bytes_copied
		);
	}

	fn on_finish(&self, result: &SyncResult) {
		eprintln!(
			"Done in {} ms: {} completed, {} skipped, {} failed, {:.2} MB copied",
			result.duration_ms,
			result.items_completed,
			result.items_skipped,
			result.items_failed,
			result.bytes_copied as f64 / BYTES_PER_MB
		);
		if result.cancelled {
			eprintln!("Sync was cancelled.");
		}
		if result.store_failure_abort {
			eprintln!("Sync aborted: a destination store became unavailable.");
		}
	}
}

// vim: ts=4
