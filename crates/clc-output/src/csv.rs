//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `actions.csv`
//! - `mobility.csv`
//! - `rollouts.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ActionRow, MobilityRow, OutputResult, RolloutRow};

/// Writes run output to three CSV files.
pub struct CsvWriter {
    actions: Writer<File>,
    mobility: Writer<File>,
    rollouts: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut actions = Writer::from_path(dir.join("actions.csv"))?;
        actions.write_record([
            "t",
            "vehicle",
            "node",
            "current_lane",
            "target_lane",
            "target_lane_idx",
            "action",
            "reason",
            "pdr",
            "lat_p95",
            "min_ttc",
            "min_th",
            "min_gap",
            "coord_ok",
        ])?;

        let mut mobility = Writer::from_path(dir.join("mobility.csv"))?;
        mobility.write_record([
            "t", "vehicle", "node", "x", "y", "v", "psi", "lane", "controlled",
        ])?;

        let mut rollouts = Writer::from_path(dir.join("rollouts.csv"))?;
        rollouts.write_record(["t", "node", "track", "step", "px", "py"])?;

        Ok(Self {
            actions,
            mobility,
            rollouts,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_action(&mut self, row: &ActionRow) -> OutputResult<()> {
        self.actions.write_record(&[
            format!("{:.3}", row.t),
            row.vehicle.clone(),
            row.node.to_string(),
            row.current_lane.clone(),
            row.target_lane.clone(),
            row.target_lane_index.to_string(),
            row.action.to_string(),
            row.reason.to_string(),
            format!("{:.4}", row.pdr),
            format!("{:.4}", row.latency_p95),
            format!("{:.3}", row.min_ttc),
            format!("{:.3}", row.min_th),
            format!("{:.3}", row.min_gap),
            (row.coordination_ok as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_mobility(&mut self, row: &MobilityRow) -> OutputResult<()> {
        self.mobility.write_record(&[
            format!("{:.3}", row.t),
            row.vehicle.clone(),
            row.node.to_string(),
            format!("{:.3}", row.x),
            format!("{:.3}", row.y),
            format!("{:.3}", row.speed),
            format!("{:.4}", row.heading),
            row.lane.clone(),
            (row.controlled as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_rollout(&mut self, row: &RolloutRow) -> OutputResult<()> {
        self.rollouts.write_record(&[
            format!("{:.3}", row.t),
            row.node.to_string(),
            row.track.to_string(),
            row.step.to_string(),
            format!("{:.3}", row.x),
            format!("{:.3}", row.y),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.actions.flush()?;
        self.mobility.flush()?;
        self.rollouts.flush()?;
        Ok(())
    }
}
