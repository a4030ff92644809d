//! Per-store failure streak tracking
//!
//! A "store" is the parent directory of a destination file. Consecutive
//! store-level errors at one store promote it to unavailable for the rest
//! of the run; the engine checks `has_unavailable_store` between items and
//! aborts early rather than grinding through a dead target.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, warn};

use crate::types::ErrorClass;

/// Consecutive store-level errors before a store is marked unavailable
const DEFAULT_STREAK_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Default)]
struct StoreState {
	error_streak: u32,
	unavailable: bool,
	last_error_time: Option<Instant>,
}

/// Tracks error streaks per destination store for one sync invocation
///
/// Mutated concurrently by destination tasks; all state sits behind one
/// mutex. Created fresh for every sync call so verdicts never leak
/// between invocations.
pub struct StoreMonitor {
	threshold: u32,
	stores: Mutex<BTreeMap<PathBuf, StoreState>>,
}

impl StoreMonitor {
	pub fn new(threshold: u32) -> Self {
		StoreMonitor { threshold, stores: Mutex::new(BTreeMap::new()) }
	}

	/// Classify an I/O error into its behavioral category
	///
	/// Works off the raw OS errno where available; `ErrorKind` is the
	/// fallback for synthesized errors without one.
	pub fn classify_error(error: &io::Error) -> ErrorClass {
		if let Some(code) = error.raw_os_error() {
			return match code {
				libc::ENOENT | libc::ENOTDIR | libc::EROFS | libc::EIO | libc::EBUSY
				| libc::EAGAIN => ErrorClass::StoreUnavailable,
				libc::EACCES | libc::EPERM => ErrorClass::FileSpecific,
				_ => ErrorClass::FileSpecific,
			};
		}
		match error.kind() {
			io::ErrorKind::NotFound => ErrorClass::StoreUnavailable,
			_ => ErrorClass::FileSpecific,
		}
	}

	/// Record a successful operation against the store containing `dest_path`
	///
	/// Resets the error streak. A store already past the threshold stays
	/// unavailable for the remainder of the run.
	pub fn record_success(&self, dest_path: &Path) {
		let key = store_key(dest_path);
		let mut stores = self.stores.lock().unwrap_or_else(|e| e.into_inner());
		let state = stores.entry(key).or_insert_with(StoreState::default);
		state.error_streak = 0;
	}

	/// Record a failed operation against the store containing `dest_path`
	///
	/// Only StoreUnavailable-classed errors feed the streak; file-specific
	/// faults and verification mismatches never promote a store.
	pub fn record_error(&self, dest_path: &Path, class: ErrorClass) {
		let key = store_key(dest_path);
		let mut stores = self.stores.lock().unwrap_or_else(|e| e.into_inner());
		let state = stores.entry(key.clone()).or_insert_with(StoreState::default);
		state.last_error_time = Some(Instant::now());

		if class != ErrorClass::StoreUnavailable {
			debug!("{} error at {} (streak untouched)", class, dest_path.display());
			return;
		}

		state.error_streak += 1;
		if state.error_streak >= self.threshold && !state.unavailable {
			state.unavailable = true;
			warn!(
				"store {} marked unavailable after {} consecutive errors",
				key.display(),
				state.error_streak
			);
		}
	}

	/// Whether any store crossed the unavailability threshold this run
	pub fn has_unavailable_store(&self) -> bool {
		let stores = self.stores.lock().unwrap_or_else(|e| e.into_inner());
		stores.values().any(|s| s.unavailable)
	}

	/// Whether the store containing `dest_path` is unavailable
	pub fn is_unavailable(&self, dest_path: &Path) -> bool {
		let stores = self.stores.lock().unwrap_or_else(|e| e.into_inner());
		stores.get(&store_key(dest_path)).map(|s| s.unavailable).unwrap_or(false)
	}

	/// Current error streak of the store containing `dest_path`
	pub fn error_streak(&self, dest_path: &Path) -> u32 {
		let stores = self.stores.lock().unwrap_or_else(|e| e.into_inner());
		stores.get(&store_key(dest_path)).map(|s| s.error_streak).unwrap_or(0)
	}
}

impl Default for StoreMonitor {
	fn default() -> Self {
		StoreMonitor::new(DEFAULT_STREAK_THRESHOLD)
	}
}

/// Stores are identified by the destination file's parent directory
fn store_key(dest_path: &Path) -> PathBuf {
	dest_path.parent().map(Path::to_path_buf).unwrap_or_else(|| dest_path.to_path_buf())
}

#[cfg(test)]
mod test {
	use super::*;

	fn os_error(code: i32) -> io::Error {
		io::Error::from_raw_os_error(code)
	}

	#[test]
	fn test_classification_store_unavailable() {
		for code in
			[libc::ENOENT, libc::ENOTDIR, libc::EROFS, libc::EIO, libc::EBUSY, libc::EAGAIN].iter()
		{
			assert_eq!(
				StoreMonitor::classify_error(&os_error(*code)),
				ErrorClass::StoreUnavailable
			);
		}
	}

	#[test]
	fn test_classification_file_specific() {
		for code in [libc::EACCES, libc::EPERM, libc::ENOSPC].iter() {
			assert_eq!(
				StoreMonitor::classify_error(&os_error(*code)),
				ErrorClass::FileSpecific
			);
		}
	}

	#[test]
	fn test_classification_fallback_without_errno() {
		let not_found = io::Error::new(io::ErrorKind::NotFound, "synthesized");
		assert_eq!(StoreMonitor::classify_error(&not_found), ErrorClass::StoreUnavailable);

		let other = io::Error::new(io::ErrorKind::InvalidData, "synthesized");
		assert_eq!(StoreMonitor::classify_error(&other), ErrorClass::FileSpecific);
	}

	#[test]
	fn test_streak_reaches_threshold() {
		let monitor = StoreMonitor::new(3);
		let dest = Path::new("/mnt/backup/file.txt");

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(!monitor.has_unavailable_store());

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(monitor.has_unavailable_store());
		assert!(monitor.is_unavailable(dest));
	}

	#[test]
	fn test_success_resets_streak_below_threshold() {
		let monitor = StoreMonitor::new(3);
		let dest = Path::new("/mnt/backup/file.txt");

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_success(dest);
		assert_eq!(monitor.error_streak(dest), 0);

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(!monitor.has_unavailable_store());
	}

	#[test]
	fn test_file_specific_does_not_feed_streak() {
		let monitor = StoreMonitor::new(2);
		let dest = Path::new("/mnt/backup/file.txt");

		monitor.record_error(dest, ErrorClass::FileSpecific);
		monitor.record_error(dest, ErrorClass::FileSpecific);
		monitor.record_error(dest, ErrorClass::VerifyFailed);
		assert_eq!(monitor.error_streak(dest), 0);
		assert!(!monitor.has_unavailable_store());
	}

	#[test]
	fn test_unavailable_is_terminal_for_the_run() {
		let monitor = StoreMonitor::new(2);
		let dest = Path::new("/mnt/backup/file.txt");

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(monitor.is_unavailable(dest));

		monitor.record_success(dest);
		assert!(monitor.is_unavailable(dest));
		assert!(monitor.has_unavailable_store());
	}

	#[test]
	fn test_stores_keyed_by_parent_directory() {
		let monitor = StoreMonitor::new(2);

		// Two files in the same directory share a streak
		monitor.record_error(Path::new("/mnt/d1/a.txt"), ErrorClass::StoreUnavailable);
		monitor.record_error(Path::new("/mnt/d1/b.txt"), ErrorClass::StoreUnavailable);
		assert!(monitor.is_unavailable(Path::new("/mnt/d1/c.txt")));

		// A different directory is an independent store
		assert!(!monitor.is_unavailable(Path::new("/mnt/d2/a.txt")));
	}

	#[test]
	fn test_default_threshold() {
		let monitor = StoreMonitor::default();
		let dest = Path::new("/mnt/backup/file.txt");

		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(!monitor.has_unavailable_store());
		monitor.record_error(dest, ErrorClass::StoreUnavailable);
		assert!(monitor.has_unavailable_store());
	}
}

// vim: ts=4
