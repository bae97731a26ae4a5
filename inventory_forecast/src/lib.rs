//! # Inventory Forecast
//!
//! Feature engineering and naive stock forecasting for daily, per-product
//! inventory records.
//!
//! ## Features
//!
//! - Schema-driven CSV parsing (`ID_PRODUTO,DATA_EVENTO,QUANTIDADE_ESTOQUE,PRECO,FLAG_PROMOCAO`, any column order)
//! - Calendar, lag, rolling-mean and threshold features per product
//! - 7-day linear extrapolation of the recent average daily delta
//! - Carry-forward baseline metrics (RMSE, MAPE, MAE, synthetic R²)
//! - Product summaries, promotion impact and critical product ranking
//!
//! ## Quick Start
//!
//! ```rust
//! use inventory_forecast::{Dashboard, Settings};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let csv = "ID_PRODUTO,DATA_EVENTO,QUANTIDADE_ESTOQUE,PRECO,FLAG_PROMOCAO\n\
//!            1,2024-01-01,80,9.9,0\n\
//!            1,2024-01-02,74,9.9,0\n\
//!            1,2024-01-03,69,9.9,0\n";
//!
//! let dashboard = Dashboard::from_csv_text(csv, &Settings::default())?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let forecast = dashboard.forecast_for(1, &mut rng)?;
//!
//! assert_eq!(forecast.points.len(), 7);
//! # Ok::<(), inventory_forecast::InventoryError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::data::{parse_records, DataLoader, RawRecord};
pub use crate::error::{InventoryError, Result};
pub use crate::features::{EnrichedRecord, FeatureEngineer};
pub use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
pub use crate::pipeline::{Dashboard, DashboardSnapshot, ProductForecast};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
