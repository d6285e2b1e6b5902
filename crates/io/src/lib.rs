//! # meterstat-io
//!
//! Read household energy summaries, cleaned readings and contextual tables
//! from CSV, and write energy tables to CSV and statistics to Parquet.
//! Columns are found by name and nullable cells become `Option` values.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `energy` | `EnergyRow`, `EnergyTable`, table kinds and fuels |
//! | `reader` | Energy table reading with key validation |
//! | `readings` | Daily and half-hourly readings |
//! | `context_tables` | Survey, EPC, participant, read-type and exporter tables |
//! | `naming` | File name templates |
//! | `writer` | Energy table CSV output and Parquet output |

mod context_tables;
mod csv_read;
mod energy;
mod error;
mod naming;
mod parquet_write;
mod reader;
mod readings;
mod validate;
mod writer;

pub use context_tables::{
    EpcRecord, ParticipantRecord, ReadTypeRecord, SurveyRecord, read_epc, read_exporters,
    read_participants, read_read_types, read_survey,
};
pub use energy::{EnergyRow, EnergyTable, Fuel, Granularity, Layout, TableKind};
pub use error::IoError;
pub use naming::{EnergyFile, FileNames};
pub use reader::read_energy_table;
pub use readings::{DailyReading, HalfHourReading, read_daily_readings, read_half_hour_readings};
pub use writer::{Compression, WriterConfig, format_cell, write_energy_table, write_parquet};
