//! # fansync - Multi-Target File Sync Engine
//!
//! fansync copies (or moves) a set of source files to many destination
//! directories at once, with policy-driven skip decisions, optional digest
//! verification, per-store failure tracking, and cooperative cancellation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fansync::{CancelToken, Engine, NoCallbacks, SyncOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = Engine::new();
//!     let result = engine
//!         .sync(&sources, &destinations, &SyncOptions::default(), &NoCallbacks, &CancelToken::new())
//!         .await;
//!     println!("copied {} bytes", result.bytes_copied);
//! }
//! ```
//!
//! ## Observing Progress
//!
//! ```rust,ignore
//! use fansync::ObserverBuilder;
//!
//! let observer = ObserverBuilder::new()
//!     .on_item_progress(|item, bytes| eprintln!("{}: +{}", item.source_path.display(), bytes))
//!     .build();
//! ```

#![deny(unsafe_code)]
#![warn(dead_code)]

pub mod callbacks;
pub mod cancel;
pub mod compare;
pub mod engine;
pub mod error;
pub mod fileops;
pub mod hasher;
pub mod logging;
pub mod monitor;
pub mod progress;
pub mod request;
pub mod types;
pub mod validation;
pub mod verify;

// Re-export commonly used types and functions
pub use callbacks::{NoCallbacks, ObserverBuilder, SyncObserver};
pub use cancel::CancelToken;
pub use engine::Engine;
pub use error::SyncError;
pub use fileops::{FileStat, FileStore, LocalStore};
pub use monitor::StoreMonitor;
pub use request::{handle_sync_all, RequestError, SyncRequest};
pub use types::{
	CompareMethod, DestResult, ErrorClass, HashAlgorithm, ItemInfo, ItemResult, SyncOptions,
	SyncPlan, SyncResult, SyncStats,
};

// vim: ts=4
