//! Observer traits for sync progress reporting and event handling

use crate::types::{ItemInfo, ItemResult, SyncPlan, SyncResult, SyncStats};

// Type aliases to reduce complexity
type StartFn = dyn Fn(&SyncPlan) + Send + Sync;
type ItemStartFn = dyn Fn(&ItemInfo) + Send + Sync;
type ItemProgressFn = dyn Fn(&ItemInfo, u64) + Send + Sync;
type ItemCompleteFn = dyn Fn(&ItemInfo, &ItemResult) + Send + Sync;
type ProgressFn = dyn Fn(&SyncStats) + Send + Sync;
type FinishFn = dyn Fn(&SyncResult) + Send + Sync;

/// Observer capability the engine calls during a sync invocation
///
/// All methods default to no-ops, so implementors only override the events
/// they care about. `on_item_progress` may be invoked from concurrent
/// destination tasks; every other method fires from the engine's outer
/// loop, one event at a time.
pub trait SyncObserver: Send + Sync {
	/// Called once at entry with the immutable plan
	fn on_start(&self, _plan: &SyncPlan) {}

	/// Called per source, before the destination fan-out
	fn on_item_start(&self, _item: &ItemInfo) {}

	/// Called per destination after a successful copy (and verification,
	/// when requested)
	fn on_item_progress(&self, _item: &ItemInfo, _bytes_added: u64) {}

	/// Called after the fan-out for a source completes
	fn on_item_complete(&self, _item: &ItemInfo, _result: &ItemResult) {}

	/// Called with rolling statistics after each source
	fn on_progress(&self, _stats: &SyncStats) {}

	/// Called once at exit with the final result
	fn on_finish(&self, _result: &SyncResult) {}
}

/// Default observer implementation that does nothing
pub struct NoCallbacks;

impl SyncObserver for NoCallbacks {}

/// Builder for observers using function closures
pub struct ObserverBuilder {
	start: Option<Box<StartFn>>,
	item_start: Option<Box<ItemStartFn>>,
	item_progress: Option<Box<ItemProgressFn>>,
	item_complete: Option<Box<ItemCompleteFn>>,
	progress: Option<Box<ProgressFn>>,
	finish: Option<Box<FinishFn>>,
}

impl ObserverBuilder {
	/// Create a new observer builder
	pub fn new() -> Self {
		ObserverBuilder {
			start: None,
			item_start: None,
			item_progress: None,
			item_complete: None,
			progress: None,
			finish: None,
		}
	}

	/// Set the start callback
	pub fn on_start<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncPlan) + Send + Sync + 'static,
	{
		self.start = Some(Box::new(callback));
		self
	}

	/// Set the per-item start callback
	pub fn on_item_start<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ItemInfo) + Send + Sync + 'static,
	{
		self.item_start = Some(Box::new(callback));
		self
	}

	/// Set the per-destination progress callback
	pub fn on_item_progress<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ItemInfo, u64) + Send + Sync + 'static,
	{
		self.item_progress = Some(Box::new(callback));
		self
	}

	/// Set the per-item completion callback
	pub fn on_item_complete<F>(mut self, callback: F) -> Self
	where
		F: Fn(&ItemInfo, &ItemResult) + Send + Sync + 'static,
	{
		self.item_complete = Some(Box::new(callback));
		self
	}

	/// Set the rolling statistics callback
	pub fn on_progress<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncStats) + Send + Sync + 'static,
	{
		self.progress = Some(Box::new(callback));
		self
	}

	/// Set the finish callback
	pub fn on_finish<F>(mut self, callback: F) -> Self
	where
		F: Fn(&SyncResult) + Send + Sync + 'static,
	{
		self.finish = Some(Box::new(callback));
		self
	}

	/// Build the observer
	pub fn build(self) -> Box<dyn SyncObserver> {
		Box::new(CompositeObserver {
			start: self.start,
			item_start: self.item_start,
			item_progress: self.item_progress,
			item_complete: self.item_complete,
			progress: self.progress,
			finish: self.finish,
		})
	}
}

impl Default for ObserverBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Internal composite observer implementation
struct CompositeObserver {
	start: Option<Box<StartFn>>,
	item_start: Option<Box<ItemStartFn>>,
	item_progress: Option<Box<ItemProgressFn>>,
	item_complete: Option<Box<ItemCompleteFn>>,
	progress: Option<Box<ProgressFn>>,
	finish: Option<Box<FinishFn>>,
}

impl SyncObserver for CompositeObserver {
	fn on_start(&self, plan: &SyncPlan) {
		if let Some(ref callback) = self.start {
			callback(plan);
		}
	}

	fn on_item_start(&self, item: &ItemInfo) {
		if let Some(ref callback) = self.item_start {
			callback(item);
		}
	}

	fn on_item_progress(&self, item: &ItemInfo, bytes_added: u64) {
		if let Some(ref callback) = self.item_progress {
			callback(item, bytes_added);
		}
	}

	fn on_item_complete(&self, item: &ItemInfo, result: &ItemResult) {
		if let Some(ref callback) = self.item_complete {
			callback(item, result);
		}
	}

	fn on_progress(&self, stats: &SyncStats) {
		if let Some(ref callback) = self.progress {
			callback(stats);
		}
	}

	fn on_finish(&self, result: &SyncResult) {
		if let Some(ref callback) = self.finish {
			callback(result);
		}
	}
}


// vim: ts=4
