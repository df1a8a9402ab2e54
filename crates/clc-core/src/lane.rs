//! Opaque lane labels of the external mobility tool.
//!
//! Lane labels follow the `edgeId_laneIndex` convention (`"main_0"`,
//! `"ramp_2"`).  The core never enumerates lanes itself — adjacency comes
//! from the topology port — but it does need to split a label into its edge
//! and numeric index for intent-conflict matching and candidate generation.

use std::fmt;

use crate::LaneIndex;

/// An opaque lane label, e.g. `"main_1"`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct LaneId(pub String);

impl LaneId {
    pub fn new(label: impl Into<String>) -> Self {
        LaneId(label.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The edge part of the label (everything before the last `_`).
    ///
    /// Labels without a `_` separator are returned whole.
    pub fn edge(&self) -> &str {
        match self.0.rsplit_once('_') {
            Some((edge, _)) => edge,
            None => &self.0,
        }
    }

    /// The numeric lane index after the last `_`, or `LaneIndex::INVALID`
    /// when the label does not parse.
    pub fn index(&self) -> LaneIndex {
        match self.0.rsplit_once('_') {
            Some((_, idx)) => idx
                .parse::<i64>()
                .map(LaneIndex::from_raw)
                .unwrap_or(LaneIndex::INVALID),
            None => LaneIndex::INVALID,
        }
    }

    /// Build the sibling label on the same edge with lane index `idx`.
    pub fn sibling(&self, idx: u8) -> LaneId {
        LaneId(format!("{}_{}", self.edge(), idx))
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LaneId {
    fn from(s: &str) -> Self {
        LaneId(s.to_owned())
    }
}
