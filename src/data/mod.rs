//! Data layer: core types, loading, caching, filtering and binning.
//!
//! Architecture:
//! ```text
//!  housing.csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  cache    │  source identity unchanged → reuse Arc<Dataset>
//!   └──────────┘
//!        │ miss
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (or LoadError)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  region ∧ income band ∧ price range → FilteredView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ histogram │  house values → 30 fixed-width bins
//!   └───────────┘
//! ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
