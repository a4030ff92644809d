//! Cooperative cancellation handle for sync operations

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag checked cooperatively by the engine
///
/// The engine checks the token at the head of the source loop and at the
/// head of each destination task. An in-flight copy is never interrupted;
/// cancellation takes effect at the next check point.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
	flag: Arc<AtomicBool>,
}

impl CancelToken {
	pub fn new() -> Self {
		CancelToken { flag: Arc::new(AtomicBool::new(false)) }
	}

	/// Request cancellation. Safe to call from any thread, any number of times.
	pub fn cancel(&self) {
		self.flag.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_token_starts_clear() {
		let token = CancelToken::new();
		assert!(!token.is_cancelled());
	}

	#[test]
	fn test_cancel_visible_through_clones() {
		let token = CancelToken::new();
		let clone = token.clone();
		clone.cancel();
		assert!(token.is_cancelled());
	}

	#[test]
	fn test_cancel_is_idempotent() {
		let token = CancelToken::new();
		token.cancel();
		token.cancel();
		assert!(token.is_cancelled());
	}
}

// vim: ts=4
