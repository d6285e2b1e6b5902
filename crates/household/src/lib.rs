//! # meterstat-household
//!
//! Per-household tables: monthly and temperature-banded profiles built from
//! cleaned readings, day-weighted rollups of monthly profiles into annual
//! or heating-season figures, and the no-gas total correction.
//!
//! ## Pipeline
//!
//! ```text
//! readings ──monthly_*_profiles()──► monthly EnergyTable ──rollup()──► period EnergyTable
//!          └─banded_*_profiles()───► banded EnergyTable
//!
//! any EnergyTable ──apply_no_gas_total()──► corrected totals
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `profile` | Monthly and temperature-banded profile builders |
//! | `rollup` | Day-weighted rollup over a `RollupPeriod` |
//! | `correction` | Total equals electricity for households without gas |
//! | `band` | Temperature bands |
//! | `config` | `ProfileConfig` |
//! | `error` | Error types |

mod band;
mod config;
mod correction;
mod error;
mod profile;
mod rollup;

pub use band::{DEFAULT_BAND_BOUNDS, TemperatureBand};
pub use config::ProfileConfig;
pub use correction::apply_no_gas_total;
pub use error::HouseholdError;
pub use profile::{banded_daily_profiles, banded_hh_profiles, monthly_daily_profiles, monthly_hh_profiles};
pub use rollup::rollup;
