//! Point/observation store for one sensor type.
//!
//! The store is built once per import and never mutated afterwards. It owns
//! every point and its complete, time-sorted observation history.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDateTime;
use deformwatch_types::{MonitoringPoint, Observation, ObservationRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

/// A point together with its raw observation history.
#[derive(Debug, Clone)]
pub struct PointHistory<R> {
    pub point: Arc<MonitoringPoint>,
    /// Sorted by ascending timestamp; stable for equal timestamps.
    pub observations: Vec<Observation<R>>,
}

impl<R> PointHistory<R> {
    pub fn name(&self) -> &str {
        &self.point.name
    }

    /// Timestamp of the first observation, absent for undated points.
    pub fn date_first(&self) -> Option<NaiveDateTime> {
        self.observations.first().map(|o| o.timestamp)
    }

    /// Timestamp of the latest observation, absent for undated points.
    pub fn date_latest(&self) -> Option<NaiveDateTime> {
        self.observations.last().map(|o| o.timestamp)
    }

    pub fn is_dated(&self) -> bool {
        !self.observations.is_empty()
    }
}

/// What was discarded while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub points: usize,
    pub observations: usize,
    /// Observations without a usable timestamp.
    pub dropped_undated: usize,
    /// Observations naming a point that does not exist.
    pub dropped_orphaned: usize,
    /// Point definitions ignored because the name was already taken.
    pub duplicate_points: usize,
    /// Kept observations dated outside their point's validity period.
    pub outside_validity: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.dropped_undated + self.dropped_orphaned
    }
}

/// All points and observations of one sensor type.
#[derive(Debug, Clone)]
pub struct Store<R> {
    histories: Vec<PointHistory<R>>,
    index: HashMap<String, usize>,
    origins: BTreeSet<String>,
    report: LoadReport,
}

impl<R> Default for Store<R> {
    fn default() -> Self {
        Self {
            histories: Vec::new(),
            index: HashMap::new(),
            origins: BTreeSet::new(),
            report: LoadReport::default(),
        }
    }
}

impl<R> Store<R> {
    /// Group observations under their points.
    ///
    /// Points keep their input order. Undated and orphaned observations are
    /// dropped with a warning; loading never fails.
    pub fn load(points: Vec<MonitoringPoint>, records: Vec<ObservationRecord<R>>) -> Self {
        let mut store = Self::default();

        for point in points {
            if store.index.contains_key(&point.name) {
                warn!(point = %point.name, "duplicate point definition ignored");
                store.report.duplicate_points += 1;
                continue;
            }
            if let Some(ref origin) = point.origin {
                store.origins.insert(origin.clone());
            }
            store.index.insert(point.name.clone(), store.histories.len());
            store.histories.push(PointHistory {
                point: Arc::new(point),
                observations: Vec::new(),
            });
        }

        for record in records {
            let point = record.point.clone();
            let Some(observation) = record.into_observation() else {
                warn!(point = %point, "observation without usable timestamp dropped");
                store.report.dropped_undated += 1;
                continue;
            };
            match store.index.get(&observation.point) {
                Some(&idx) => {
                    let history = &mut store.histories[idx];
                    if !history.point.validity.contains(observation.timestamp) {
                        debug!(point = %point, timestamp = %observation.timestamp, "observation outside validity");
                        store.report.outside_validity += 1;
                    }
                    history.observations.push(observation);
                    store.report.observations += 1;
                }
                None => {
                    warn!(point = %point, "observation for unknown point dropped");
                    store.report.dropped_orphaned += 1;
                }
            }
        }

        for history in &mut store.histories {
            history.observations.sort_by_key(|o| o.timestamp);
        }

        store.report.points = store.histories.len();
        info!(
            points = store.report.points,
            observations = store.report.observations,
            dropped = store.report.dropped(),
            outside_validity = store.report.outside_validity,
            "store loaded"
        );
        store
    }

    /// All point histories, in load order.
    pub fn histories(&self) -> &[PointHistory<R>] {
        &self.histories
    }

    pub fn get(&self, name: &str) -> Option<&PointHistory<R>> {
        self.index.get(name).map(|&idx| &self.histories[idx])
    }

    pub fn points(&self) -> impl Iterator<Item = &Arc<MonitoringPoint>> {
        self.histories.iter().map(|h| &h.point)
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Distinct `origin` values across all points.
    pub fn origins(&self) -> &BTreeSet<String> {
        &self.origins
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Earliest and latest observation across all dated points.
    pub fn temporal_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.histories.iter().filter_map(PointHistory::date_first).min()?;
        let last = self.histories.iter().filter_map(PointHistory::date_latest).max()?;
        Some((first, last))
    }
}
