use std::collections::BTreeMap;

use tracing::info;

pub const FRAMES_RUN: &str = "frames.run";
pub const FRAMES_SKIPPED: &str = "frames.skipped";
pub const INTENTS_APPLIED: &str = "intents.applied";
pub const INTENTS_REJECTED: &str = "intents.rejected";
pub const LABELS_VISIBLE: &str = "labels.visible";
pub const PARTICLES_RESPAWNED: &str = "particles.respawned";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Gauge {
    pub current: i64,
    /// Highest value seen since the gauge was first set.
    pub peak: i64,
}

/// Run counters and gauges for the frame loop.
///
/// Sorted maps keep snapshots stable so they can be compared in tests and
/// logged without reordering noise.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<String, u64>,
    gauges: BTreeMap<String, Gauge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(String, u64)>,
    pub gauges: Vec<(String, Gauge)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: impl Into<String>, by: u64) {
        let slot = self.counters.entry(name.into()).or_insert(0);
        *slot = slot.saturating_add(by);
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).map(|g| g.current)
    }

    pub fn set_gauge(&mut self, name: impl Into<String>, value: i64) {
        self.gauges
            .entry(name.into())
            .and_modify(|g| {
                g.current = value;
                g.peak = g.peak.max(value);
            })
            .or_insert(Gauge {
                current: value,
                peak: value,
            });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        }
    }

    /// One log line per metric, in name order.
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        for (name, value) in snapshot.counters {
            info!(metric = %name, value, "counter");
        }
        for (name, gauge) in snapshot.gauges {
            info!(metric = %name, current = gauge.current, peak = gauge.peak, "gauge");
        }
    }
}
