//! # meterstat-calendar
//!
//! Gregorian date arithmetic for household energy summaries: weekday/weekend
//! classification, day counts per month and per rollup period, and the
//! `summary_time` labels used in statistics tables.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["DayType"] -->|"days_of_type_in_month()"| B["days in month"]
//!     C["RollupPeriod"] -->|".months()"| D["YearMonth list"]
//!     D -->|".weight()"| E["month weight"]
//!     B --> E
//!     F["half-hour index"] -->|"half_hour_label()"| G["HH:MM"]
//!     H["(year, month)"] -->|"month_label()"| I["Mon-YY"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use meterstat_calendar::{DayType, RollupPeriod, half_hour_label, month_label};
//!
//! let year = RollupPeriod::annual(2021).unwrap();
//! assert_eq!(year.days_of_type(DayType::Weekday), 261);
//!
//! let season = RollupPeriod::heating_season(2020).unwrap(); // Oct 2020 .. May 2021
//! assert_eq!(season.label(), "2020_2021");
//!
//! assert_eq!(half_hour_label(48).unwrap(), "00:00");
//! assert_eq!(month_label(2021, 3).unwrap(), "Mar-21");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `day_type` | Weekday/weekend classification and day counting |
//! | `period` | Annual, heating-season and custom rollup periods |
//! | `label` | Half-hour and month labels |
//! | `error` | Error types |

mod day_type;
mod error;
mod label;
mod period;

pub use day_type::{DayType, days_of_type, days_of_type_in_month, month_start};
pub use error::CalendarError;
pub use label::{HALF_HOURS_PER_DAY, half_hour_clock, half_hour_label, month_label};
pub use period::{
    HEATING_SEASON_END_MONTH, HEATING_SEASON_START_MONTH, RollupPeriod, YearMonth,
};
