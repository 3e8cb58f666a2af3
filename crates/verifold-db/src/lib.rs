//! Verifold Ledger Layer
//!
//! This crate provides the embedded discovery ledger using LanceDB for
//! zero-dependency storage of validated discovery records.
//!
//! # Features
//!
//! - Embedded columnar database (no external server required)
//! - Filtered listing with pagination for the explorer UI
//! - Aggregate statistics (quality tiers, duplicate rate, priority counts)
//! - JSON-file fallback store for degraded operation
//!
//! # Example
//!
//! ```rust,no_run
//! use verifold_db::{Database, DiscoveryRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open("./data/verifold.db").await?;
//!     db.initialize().await?;
//!
//!     let ledger = DiscoveryRepository::new(std::sync::Arc::new(db));
//!     println!("{} discoveries", ledger.count().await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod discoveries;
pub mod error;
pub mod fallback;
pub mod schema;
pub mod schema_arrow;

pub use database::Database;
pub use discoveries::{DiscoveryFilter, DiscoveryRepository, LedgerStats, QualityDistribution};
pub use error::{DbError, Result};
pub use fallback::FallbackStore;
pub use schema::{Discovery, TABLE_DISCOVERIES};
