//! `LinkQualityEstimator` — sliding-window delivery ratio and latency
//! percentile, receiver-centric.
//!
//! # Attempted-count approximation
//!
//! The attempted count for a receiver's window sums the attempted
//! transmissions of exactly those senders that delivered *to this receiver*
//! in the window.  Senders whose every packet was lost are invisible to the
//! receiver and are not counted, so the reported PDR is biased high under
//! heavy loss.  This conservative bias is a known property of the
//! definition, kept as-is — downstream KPI comparisons assume it.

use rustc_hash::FxHashMap;

use clc_core::VehicleId;

use crate::{RxEvent, TxEvent};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Communication-side tunables.
#[derive(Copy, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CommConfig {
    /// Trailing window length for PDR / latency queries, seconds.
    pub window_secs: f64,
    /// TTL for received lane-change intents, seconds.
    pub intent_ttl_secs: f64,
}

impl Default for CommConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            intent_ttl_secs: 0.4,
        }
    }
}

// ── Sample ────────────────────────────────────────────────────────────────────

/// One windowed link-quality measurement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkQualitySample {
    /// Packet delivery ratio in `[0, 1]`.
    pub pdr: f64,
    /// 95th-percentile one-way latency over delivered messages, seconds.
    /// Zero when nothing was delivered in the window.
    pub latency_p95: f64,
}

impl LinkQualitySample {
    /// The sample reported for a receiver with no delivery history at all.
    pub const UNSEEN: LinkQualitySample = LinkQualitySample { pdr: 0.0, latency_p95: 0.0 };

    /// A perfect link — used when link adaptation is toggled off.
    pub const PERFECT: LinkQualitySample = LinkQualitySample { pdr: 1.0, latency_p95: 0.0 };
}

// ── Estimator ─────────────────────────────────────────────────────────────────

/// Answers windowed PDR / latency queries against pre-loaded attempted and
/// delivered logs.
///
/// Both logs are filtered to the kinds that count for link quality (beacon,
/// intent) at construction and indexed per receiver / per sender, sorted by
/// time, so each query is two binary searches plus a scan of the window.
pub struct LinkQualityEstimator {
    window_secs: f64,
    /// Delivered events per receiver, ascending `t_rx`.
    rx_by_receiver: FxHashMap<VehicleId, Vec<RxEvent>>,
    /// Attempted-transmission timestamps per sender, ascending.
    tx_by_sender: FxHashMap<VehicleId, Vec<f64>>,
}

impl LinkQualityEstimator {
    /// Build from full trace logs.  `rx` need not be pre-sorted.
    pub fn new(rx: &[RxEvent], tx: &[TxEvent], window_secs: f64) -> Self {
        let mut rx_by_receiver: FxHashMap<VehicleId, Vec<RxEvent>> = FxHashMap::default();
        for ev in rx {
            if ev.kind.counts_for_link_quality() {
                rx_by_receiver.entry(ev.receiver).or_default().push(ev.clone());
            }
        }
        for events in rx_by_receiver.values_mut() {
            events.sort_by(|a, b| a.t_rx.total_cmp(&b.t_rx));
        }

        let mut tx_by_sender: FxHashMap<VehicleId, Vec<f64>> = FxHashMap::default();
        for ev in tx {
            if ev.kind.counts_for_link_quality() {
                tx_by_sender.entry(ev.sender).or_default().push(ev.t_tx);
            }
        }
        for times in tx_by_sender.values_mut() {
            times.sort_by(f64::total_cmp);
        }

        Self { window_secs, rx_by_receiver, tx_by_sender }
    }

    /// Windowed sample for `receiver` over `(t_end − window, t_end]`.
    ///
    /// A receiver absent from the delivered log returns
    /// [`LinkQualitySample::UNSEEN`].
    pub fn query(&self, receiver: VehicleId, t_end: f64) -> LinkQualitySample {
        let Some(events) = self.rx_by_receiver.get(&receiver) else {
            return LinkQualitySample::UNSEEN;
        };

        let t0 = t_end - self.window_secs;
        let lo = events.partition_point(|e| e.t_rx <= t0);
        let hi = events.partition_point(|e| e.t_rx <= t_end);
        let window = &events[lo..hi];
        let delivered = window.len();

        // Distinct senders seen delivering in-window; attempts from anyone
        // else are invisible to this receiver (see module docs).
        let mut senders: Vec<VehicleId> = window.iter().map(|e| e.sender).collect();
        senders.sort_unstable();
        senders.dedup();

        let mut attempted = 0usize;
        for sender in senders {
            if let Some(times) = self.tx_by_sender.get(&sender) {
                let s_lo = times.partition_point(|&t| t <= t0);
                let s_hi = times.partition_point(|&t| t <= t_end);
                attempted += s_hi - s_lo;
            }
        }

        let pdr = if attempted > 0 {
            (delivered as f64 / attempted as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut latencies: Vec<f64> = window
            .iter()
            .map(RxEvent::latency)
            .filter(|l| l.is_finite())
            .collect();
        let latency_p95 = percentile_nearest_rank(&mut latencies, 0.95);

        LinkQualitySample { pdr, latency_p95 }
    }
}

/// Nearest-rank percentile: the value at rank `ceil(q · n)` of the sorted
/// sample.  Empty input yields 0.
fn percentile_nearest_rank(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let rank = (q * values.len() as f64).ceil() as usize;
    values[rank.clamp(1, values.len()) - 1]
}
