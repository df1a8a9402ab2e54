//! `clc-output` — run log writers for the rust_clc framework.
//!
//! Three files per run, all driven through [`LogObserver`], which implements
//! `clc_sim::LoopObserver`:
//!
//! | File           | One row per                                  |
//! |----------------|----------------------------------------------|
//! | `actions.csv`  | controlled-vehicle decision                  |
//! | `mobility.csv` | vehicle per tick                             |
//! | `rollouts.csv` | logged leader-prediction point               |
//!
//! # Usage
//!
//! ```rust,ignore
//! use clc_output::{CsvWriter, LogObserver};
//!
//! let writer = CsvWriter::new(Path::new("./out"))?;
//! let mut observer = LogObserver::new(writer);
//! sim.run(&mut observer)?;
//! observer.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::LogObserver;
pub use row::{ActionRow, MobilityRow, RolloutRow};
pub use writer::OutputWriter;
