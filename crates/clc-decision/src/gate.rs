//! `DecisionGate` — the guarded lane-change state machine.
//!
//! # Gate order is a contract
//!
//! Checks run strictly in this order, first match wins:
//!
//! 1. cooldown                → DEFER("cooldown")
//! 2. threshold adaptation    (PDR below floor or latency above ceiling
//!                             multiplies every safety threshold by
//!                             `strict_factor`)
//! 3. safety gate             → CANCEL("safety_gate")
//! 4. coordination gate       → DEFER("coordination_conflict")
//! 5.                         → EXECUTE("ok")
//!
//! An agent inside its cooldown always reports DEFER("cooldown"), even when
//! the same inputs would fail the safety gate.

use clc_comm::LinkQualitySample;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Gate thresholds and link-adaptation parameters.
#[derive(Copy, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GateConfig {
    /// Minimum acceptable time-to-collision, seconds.
    pub ttc_min: f64,
    /// Minimum acceptable time-headway, seconds.
    pub th_min: f64,
    /// Minimum acceptable longitudinal gap, metres.
    pub gap_min: f64,
    /// Quiet period after an executed change, seconds.
    pub cooldown_secs: f64,
    /// PDR below this enters degraded mode.
    pub pdr_floor: f64,
    /// Latency p95 above this enters degraded mode, seconds.
    pub latency_ceiling: f64,
    /// Multiplier (> 1) applied to the three safety thresholds in degraded
    /// mode.
    pub strict_factor: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ttc_min: 2.0,
            th_min: 1.2,
            gap_min: 5.0,
            cooldown_secs: 2.0,
            pdr_floor: 0.85,
            latency_ceiling: 0.15,
            strict_factor: 1.35,
        }
    }
}

// ── Inputs / outputs ──────────────────────────────────────────────────────────

/// The risk summary the gate consumes: the tracker's assessment reduced to
/// its three gateable minima.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RiskTriple {
    pub min_ttc: f64,
    pub min_th: f64,
    pub min_gap: f64,
}

impl RiskTriple {
    /// The triple reported when no leader (or no track) exists: all zero,
    /// which the safety gate reads as "cannot show this is safe" and
    /// cancels.  Absence of evidence is not evidence of a clear lane.
    pub const NO_TRACK: RiskTriple = RiskTriple { min_ttc: 0.0, min_th: 0.0, min_gap: 0.0 };
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    Execute,
    Defer,
    Cancel,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Reason {
    Cooldown,
    SafetyGate,
    CoordinationConflict,
    Ok,
}

impl Reason {
    /// Stable tag for action logs and KPI grouping.
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Cooldown => "cooldown",
            Reason::SafetyGate => "safety_gate",
            Reason::CoordinationConflict => "coordination_conflict",
            Reason::Ok => "ok",
        }
    }
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Execute => "EXECUTE",
            Action::Defer => "DEFER",
            Action::Cancel => "CANCEL",
        }
    }
}

/// The gate's verdict for one agent at one tick.  Never persisted by the
/// core — the orchestration layer logs it and moves on.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

impl Decision {
    fn new(action: Action, reason: Reason) -> Self {
        Self { action, reason }
    }
}

// ── Gate ──────────────────────────────────────────────────────────────────────

/// Stateless decision function; the only history it sees is the caller-owned
/// `last_execute_at`, which the orchestration layer updates on EXECUTE.
#[derive(Clone, Debug, Default)]
pub struct DecisionGate {
    config: GateConfig,
}

impl DecisionGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run the gate.  See the module docs for the check order.
    pub fn decide(
        &self,
        now: f64,
        last_execute_at: f64,
        risk: &RiskTriple,
        link: &LinkQualitySample,
        coordination_ok: bool,
    ) -> Decision {
        if (now - last_execute_at) < self.config.cooldown_secs {
            return Decision::new(Action::Defer, Reason::Cooldown);
        }

        let degraded =
            link.pdr < self.config.pdr_floor || link.latency_p95 > self.config.latency_ceiling;
        let factor = if degraded { self.config.strict_factor } else { 1.0 };
        let ttc_thr = self.config.ttc_min * factor;
        let th_thr = self.config.th_min * factor;
        let gap_thr = self.config.gap_min * factor;

        if risk.min_gap < gap_thr || risk.min_ttc < ttc_thr || risk.min_th < th_thr {
            return Decision::new(Action::Cancel, Reason::SafetyGate);
        }

        if !coordination_ok {
            return Decision::new(Action::Defer, Reason::CoordinationConflict);
        }

        Decision::new(Action::Execute, Reason::Ok)
    }
}
