//! Explicit ablation switches.
//!
//! Experiment variants (no-prediction, no-intent, non-adaptive, gap-only)
//! are expressed as a plain struct handed to the builder — never read from
//! environment variables or other ambient state, so a run's behavior is
//! fully determined by its constructor arguments.

/// Which decision-path capabilities are active for a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct FeatureToggles {
    /// Use tracker rollouts for risk.  Off: instantaneous gap proxy.
    pub prediction: bool,
    /// Honor peers' declared intents.  Off: coordination always passes.
    pub intent_coordination: bool,
    /// Adapt gate thresholds to measured link quality.  Off: the gate sees
    /// a perfect link.
    pub link_adaptation: bool,
}

impl FeatureToggles {
    /// Everything on — the full communication-aware controller.
    pub fn full() -> Self {
        Self {
            prediction: true,
            intent_coordination: true,
            link_adaptation: true,
        }
    }

    /// Everything off: pure gap-based baseline with no communication
    /// awareness.
    pub fn gap_only() -> Self {
        Self {
            prediction: false,
            intent_coordination: false,
            link_adaptation: false,
        }
    }
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self::full()
    }
}
