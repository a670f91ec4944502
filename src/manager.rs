//! Per-sensor-type orchestration of the evaluation pipeline.
//!
//! A [`Manager`] owns the raw store of one sensor type and republishes a
//! complete [`Snapshot`] of derived state every time the temporal window or
//! the static filter changes. Each pass walks every point from its raw
//! history forward:
//!
//! ```text
//! Loaded ─▶ StaticFiltered ─▶ TimeFiltered ─▶ BaselineComputed ─▶ AlarmEvaluated
//! ```
//!
//! Passes are serialized by a mutex and build their snapshot off to the
//! side; publication is a single swap on a watch channel, so readers never
//! observe a mix of two windows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDateTime;
use deformwatch_types::{AlarmThreshold, MonitoringPoint, Observation, ObservationRecord, TemporalRange};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::data::alarm::{self, AlarmLevel, AlarmOutcome};
use crate::data::baseline::{self, AlarmBasis, Delta, RollingBaseline};
use crate::data::histogram::MonthlyCounts;
use crate::data::store::{LoadReport, PointHistory, Store};
use crate::data::temporal;
use crate::filter::{AcceptAll, PointFilter};
use crate::sensor::SensorKind;

/// Knobs that shape every recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationSettings {
    pub rolling: RollingBaseline,
    pub alarm_basis: AlarmBasis,
}

/// Everything derived for one point in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState<R> {
    pub time_filtered: Vec<Observation<R>>,
    pub first_filtered: Option<Observation<R>>,
    pub last_filtered: Option<Observation<R>>,
    pub zero_observation: Option<Observation<R>>,
    pub rolling_reference: Option<Observation<R>>,
    pub delta_zero: Option<Delta<R>>,
    pub delta_rolling: Option<Delta<R>>,
    pub delta_first: Option<Delta<R>>,
    pub alarm_level: AlarmLevel,
    pub alarm_percent: Option<f64>,
    pub measurement_count_by_month: MonthlyCounts,
}

/// Point counts per alarm level over the time-filtered set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct AlarmSummary {
    pub total: usize,
    pub unknown: usize,
    pub nominal: usize,
    pub warning: usize,
    pub alarm: usize,
}

/// A consistent view of one sensor type's derived state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<R> {
    /// Window used for this pass; `None` means unbounded.
    pub window: Option<TemporalRange>,
    /// Points accepted by the static filter, in load order.
    pub filtered: Vec<Arc<MonitoringPoint>>,
    /// Filtered points that are active under the window.
    pub time_filtered: Vec<Arc<MonitoringPoint>>,
    /// Derived state of every filtered point, keyed by name.
    pub derived: BTreeMap<String, DerivedState<R>>,
    /// Monthly observation counts over all time-filtered points.
    pub measurement_count_by_month: MonthlyCounts,
}

impl<R> Snapshot<R> {
    fn empty() -> Self {
        Self {
            window: None,
            filtered: Vec::new(),
            time_filtered: Vec::new(),
            derived: BTreeMap::new(),
            measurement_count_by_month: MonthlyCounts::new(),
        }
    }

    pub fn derived(&self, name: &str) -> Option<&DerivedState<R>> {
        self.derived.get(name)
    }

    /// Time-filtered points paired with their derived state.
    pub fn time_filtered_states(
        &self,
    ) -> impl Iterator<Item = (&Arc<MonitoringPoint>, &DerivedState<R>)> {
        self.time_filtered
            .iter()
            .filter_map(|p| self.derived.get(&p.name).map(|d| (p, d)))
    }

    pub fn summary(&self) -> AlarmSummary {
        let mut summary = AlarmSummary::default();
        for (_, state) in self.time_filtered_states() {
            summary.total += 1;
            match state.alarm_level {
                AlarmLevel::Unknown => summary.unknown += 1,
                AlarmLevel::Nominal => summary.nominal += 1,
                AlarmLevel::Warning => summary.warning += 1,
                AlarmLevel::Alarm => summary.alarm += 1,
            }
        }
        summary
    }
}

/// Inputs of the next pass; guarded by the pass mutex.
#[derive(Debug)]
struct PassInputs {
    window: Option<TemporalRange>,
    filter: Arc<dyn PointFilter>,
}

/// Orchestrates store, temporal filter, baselines and alarms for sensor type `K`.
pub struct Manager<K: SensorKind> {
    store: Store<K::Reading>,
    thresholds: BTreeMap<String, AlarmThreshold>,
    settings: EvaluationSettings,
    inputs: Mutex<PassInputs>,
    published: watch::Sender<Arc<Snapshot<K::Reading>>>,
}

impl<K: SensorKind> std::fmt::Debug for Manager<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("sensor", &K::NAME)
            .field("points", &self.store.len())
            .field("thresholds", &self.thresholds.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<K: SensorKind> Manager<K> {
    /// Create a manager and run an initial pass with an unbounded window.
    pub fn new(
        store: Store<K::Reading>,
        thresholds: impl IntoIterator<Item = AlarmThreshold>,
        settings: EvaluationSettings,
    ) -> Self {
        let thresholds: BTreeMap<String, AlarmThreshold> =
            thresholds.into_iter().map(|t| (t.name.clone(), t)).collect();

        for point in store.points() {
            for name in &point.thresholds {
                if !thresholds.contains_key(name) {
                    warn!(
                        sensor = K::NAME,
                        point = %point.name,
                        threshold = %name,
                        "alarm threshold reference does not resolve"
                    );
                }
            }
        }

        for (threshold, component) in misordered_bands::<K>(&thresholds) {
            warn!(
                sensor = K::NAME,
                threshold,
                component,
                "warning band is not inside alarm band"
            );
        }

        let (published, _) = watch::channel(Arc::new(Snapshot::empty()));
        let manager = Self {
            store,
            thresholds,
            settings,
            inputs: Mutex::new(PassInputs {
                window: None,
                filter: Arc::new(AcceptAll),
            }),
            published,
        };
        manager.refresh();
        manager
    }

    /// Load a batch from the data loader and build a manager over it.
    pub fn from_batch(
        points: Vec<MonitoringPoint>,
        observations: Vec<ObservationRecord<K::Reading>>,
        thresholds: impl IntoIterator<Item = AlarmThreshold>,
        settings: EvaluationSettings,
    ) -> Self {
        Self::new(Store::load(points, observations), thresholds, settings)
    }

    pub fn sensor_name(&self) -> &'static str {
        K::NAME
    }

    pub fn store(&self) -> &Store<K::Reading> {
        &self.store
    }

    pub fn settings(&self) -> EvaluationSettings {
        self.settings
    }

    pub fn load_report(&self) -> LoadReport {
        self.store.report()
    }

    /// Distinct point origins, for filter pickers.
    pub fn origins(&self) -> &BTreeSet<String> {
        self.store.origins()
    }

    /// Every loaded point, ignoring all filters.
    pub fn all_items(&self) -> Vec<Arc<MonitoringPoint>> {
        self.store.points().cloned().collect()
    }

    /// Points accepted by the current static filter.
    pub fn filtered_items(&self) -> Vec<Arc<MonitoringPoint>> {
        self.snapshot().filtered.clone()
    }

    /// Filtered points that are active under the current window.
    pub fn time_filtered_items(&self) -> Vec<Arc<MonitoringPoint>> {
        self.snapshot().time_filtered.clone()
    }

    /// First and last observation date across all points.
    pub fn temporal_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.store.temporal_bounds()
    }

    /// Derived state of a filtered point from the latest snapshot.
    pub fn derived_state(&self, name: &str) -> Option<DerivedState<K::Reading>> {
        self.snapshot().derived(name).cloned()
    }

    pub fn measurement_count_by_month(&self) -> MonthlyCounts {
        self.snapshot().measurement_count_by_month.clone()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot<K::Reading>> {
        self.published.borrow().clone()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<K::Reading>>> {
        self.published.subscribe()
    }

    /// Set the window to `[low, high]` and recompute.
    ///
    /// `low > high` is accepted and selects nothing.
    pub fn apply_temporal_filter(
        &self,
        low: NaiveDateTime,
        high: NaiveDateTime,
    ) -> Arc<Snapshot<K::Reading>> {
        self.apply_range(Some(TemporalRange::new(low, high)))
    }

    /// Set (or clear, with `None`) the window and recompute.
    pub fn apply_range(&self, window: Option<TemporalRange>) -> Arc<Snapshot<K::Reading>> {
        let mut inputs = self.inputs.lock();
        inputs.window = window;
        self.recompute(&inputs)
    }

    /// Replace the static filter and recompute with the current window.
    pub fn set_filter(&self, filter: Arc<dyn PointFilter>) -> Arc<Snapshot<K::Reading>> {
        let mut inputs = self.inputs.lock();
        inputs.filter = filter;
        self.recompute(&inputs)
    }

    /// Recompute with unchanged inputs.
    pub fn refresh(&self) -> Arc<Snapshot<K::Reading>> {
        let inputs = self.inputs.lock();
        self.recompute(&inputs)
    }

    /// One full pass. Callers hold the inputs lock for its whole duration.
    fn recompute(&self, inputs: &PassInputs) -> Arc<Snapshot<K::Reading>> {
        let range = inputs.window.unwrap_or_default();
        let mut snapshot = Snapshot::empty();
        snapshot.window = inputs.window;

        for history in self.store.histories() {
            if !inputs.filter.accepts(&history.point) {
                continue;
            }
            snapshot.filtered.push(history.point.clone());

            let filtered = temporal::filter_by_range(&history.observations, &range);
            if temporal::is_time_selected(history, filtered) {
                snapshot.time_filtered.push(history.point.clone());
            }

            let state = self.evaluate_point(history, filtered);
            snapshot
                .measurement_count_by_month
                .merge(&state.measurement_count_by_month);
            snapshot.derived.insert(history.point.name.clone(), state);
        }

        debug!(
            sensor = K::NAME,
            filtered = snapshot.filtered.len(),
            time_filtered = snapshot.time_filtered.len(),
            window = ?inputs.window,
            "recompute pass complete"
        );

        let snapshot = Arc::new(snapshot);
        self.published.send_replace(snapshot.clone());
        snapshot
    }

    fn evaluate_point(
        &self,
        history: &PointHistory<K::Reading>,
        filtered: &[Observation<K::Reading>],
    ) -> DerivedState<K::Reading> {
        let baselines =
            baseline::compute::<K>(&history.observations, filtered, self.settings.rolling);
        let outcome = self.evaluate_alarm(&history.point, baselines.delta_for(self.settings.alarm_basis));

        DerivedState {
            time_filtered: filtered.to_vec(),
            measurement_count_by_month: MonthlyCounts::from_timestamps(
                filtered.iter().map(|o| o.timestamp),
            ),
            first_filtered: baselines.first_filtered,
            last_filtered: baselines.last_filtered,
            zero_observation: baselines.zero_observation,
            rolling_reference: baselines.rolling_reference,
            delta_zero: baselines.delta_zero,
            delta_rolling: baselines.delta_rolling,
            delta_first: baselines.delta_first,
            alarm_level: outcome.level,
            alarm_percent: outcome.percent,
        }
    }

    /// Combine every resolvable threshold of the point; unresolved names are skipped.
    fn evaluate_alarm(
        &self,
        point: &MonitoringPoint,
        delta: Option<&Delta<K::Reading>>,
    ) -> AlarmOutcome {
        point
            .thresholds
            .iter()
            .filter_map(|name| self.thresholds.get(name))
            .map(|threshold| alarm::evaluate(delta, Some(threshold)))
            .reduce(AlarmOutcome::combine)
            .unwrap_or(AlarmOutcome::UNKNOWN)
    }
}

/// `(threshold, component)` pairs known to `K` whose warning band pokes out
/// of the alarm band.
fn misordered_bands<K: SensorKind>(
    thresholds: &BTreeMap<String, AlarmThreshold>,
) -> Vec<(&str, &str)> {
    thresholds
        .values()
        .flat_map(|t| {
            t.components
                .iter()
                .filter(|(key, bands)| K::component(key).is_some() && !bands.is_nested())
                .map(move |(key, _)| (t.name.as_str(), key.as_str()))
        })
        .collect()
}
