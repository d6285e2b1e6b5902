//! # meterstat-context
//!
//! Turns the survey, EPC, participant and meter tables into the categorical
//! columns statistics are segmented by, and decides which households have
//! solar PV and which have no gas supply.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["ContextTables::load()"] --> B["ContextTables"]
//!     B -->|"Context::build()"| C["Context"]
//!     C -->|".column(var)"| D["SegmentColumn"]
//!     C -->|".no_gas()"| E["no-gas PUPRNs"]
//!     C -->|"supplementary_rows()"| F["SupplementaryRow"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `recode` | Code to category mappings and segment merges |
//! | `segments` | Segmentation variables, recoded columns, unmapped counts |
//! | `pv` | Solar PV detection |
//! | `gas` | Gas supply detection |
//! | `supplementary` | Floor area, bedroom and occupant means per segment |
//! | `error` | Error types |

mod error;
mod gas;
mod pv;
pub mod recode;
mod segments;
mod supplementary;

pub use error::ContextError;
pub use gas::{GAS_PROXY_DEVICE, MAINS_GAS_FUELS, gas_households, no_gas_households};
pub use pv::pv_households;
pub use segments::{
    Context, ContextTables, SegmentColumn, SegmentVariable, SourceTable, UnmappedCounts,
};
pub use supplementary::{SupplementaryRow, supplementary_rows};

pub use meterstat_io::{EpcRecord, ParticipantRecord, ReadTypeRecord, SurveyRecord};
