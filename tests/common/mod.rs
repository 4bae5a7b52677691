//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{collector_for, healthy_library};
//!
//! #[tokio::test]
//! async fn test_collect() {
//!     let mock = healthy_library().spawn().await;
//!     let stats = collector_for(&mock).collect().await;
//!     assert_eq!(stats.total_movies, 10);
//! }
//! ```

#![allow(dead_code)]

mod fixtures;
mod mock_kodi;

pub use fixtures::*;
pub use mock_kodi::{MockKodi, MockKodiBuilder, Reply};
