//! # folio-engine: Pricing Engine Facade
//!
//! Wires the pure rules in `folio-core` to the storage in `folio-db` and
//! exposes them as one async call surface.
//!
//! ## Module Structure
//! ```text
//! folio_engine/
//! ├── lib.rs          ← You are here (re-exports)
//! ├── engine.rs       ← PricingEngine and request types
//! ├── error.rs        ← ApiError / ErrorCode wire format
//! ├── config.rs       ← EngineConfig (TOML + environment)
//! ├── telemetry.rs    ← Tracing subscriber setup
//! └── bin/
//!     └── maintenance.rs ← Scheduled orphan sweep
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! use folio_engine::{telemetry, EngineConfig, PricingEngine};
//! use folio_db::Database;
//!
//! telemetry::init_tracing();
//! let config = EngineConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//! let engine = PricingEngine::new(&db, config.cache_ttl());
//!
//! let sizes = engine.available_book_sizes().await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use engine::{AllowedOptionsRequest, CalculatePriceRequest, PricingEngine};
pub use error::{ApiError, ApiResult, ErrorCode};
