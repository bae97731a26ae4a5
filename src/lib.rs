//! # StockOwl
//!
//! Facade over the workspace crates: [`stock_math`] for the numeric
//! building blocks and [`inventory_forecast`] for the inventory pipeline.
//!
//! ## Example
//!
//! ```
//! use stock_owl_workspace::{Dashboard, Settings};
//!
//! let dashboard = Dashboard::from_csv_text("", &Settings::default()).unwrap();
//! assert!(dashboard.records().is_empty());
//! ```

pub use inventory_forecast;
pub use stock_math;

pub use inventory_forecast::{Dashboard, InventoryError, Result, Settings};

use std::path::Path;

/// Build a dashboard from a CSV file, with settings from an optional TOML file.
///
/// Without a settings file the defaults apply.
pub fn open_dashboard<P, Q>(csv_path: P, settings_path: Option<Q>) -> Result<Dashboard>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let settings = match settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let records = inventory_forecast::DataLoader::from_csv(csv_path, settings.parser.row_policy)?;
    Dashboard::new(&records, &settings)
}
