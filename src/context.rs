//! One manager per sensor type, built from a single import.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDateTime;
use deformwatch_types::TemporalRange;
use tracing::{debug, info};

use crate::data::store::LoadReport;
use crate::filter::PointFilter;
use crate::manager::{EvaluationSettings, Manager};
use crate::sensor::{InclinometerSensor, PrismSensor, SensorKind, TiltSensor};
use crate::source::{ImportDocument, ImportSource};

/// The evaluation services of one import.
///
/// Built once per import and passed by reference to whoever needs derived
/// state. Window and filter changes fan out to every manager.
#[derive(Debug)]
pub struct MonitoringContext {
    pub tilt: Manager<TiltSensor>,
    pub displacement: Manager<PrismSensor>,
    pub inclinometer: Manager<InclinometerSensor>,
}

impl MonitoringContext {
    /// Load every sensor batch of `document` and run the initial passes.
    pub fn from_document(document: ImportDocument, settings: EvaluationSettings) -> Self {
        let ImportDocument {
            version,
            thresholds,
            tilt,
            displacement,
            inclinometer,
        } = document;

        let context = Self {
            tilt: Manager::from_batch(tilt.points, tilt.observations, thresholds.clone(), settings),
            displacement: Manager::from_batch(
                displacement.points,
                displacement.observations,
                thresholds.clone(),
                settings,
            ),
            inclinometer: Manager::from_batch(
                inclinometer.points,
                inclinometer.observations,
                thresholds,
                settings,
            ),
        };

        info!(
            version = %version,
            rolling = %settings.rolling,
            alarm_basis = %settings.alarm_basis,
            "import loaded"
        );
        context
    }

    /// Apply the same window to every sensor type.
    pub fn apply_temporal_filter(&self, low: NaiveDateTime, high: NaiveDateTime) {
        self.apply_range(Some(TemporalRange::new(low, high)));
    }

    pub fn apply_range(&self, window: Option<TemporalRange>) {
        self.tilt.apply_range(window);
        self.displacement.apply_range(window);
        self.inclinometer.apply_range(window);
    }

    pub fn set_filter(&self, filter: Arc<dyn PointFilter>) {
        self.tilt.set_filter(filter.clone());
        self.displacement.set_filter(filter.clone());
        self.inclinometer.set_filter(filter);
    }

    /// Earliest and latest observation over all sensor types.
    pub fn temporal_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        [
            self.tilt.temporal_range(),
            self.displacement.temporal_range(),
            self.inclinometer.temporal_range(),
        ]
        .into_iter()
        .flatten()
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }

    /// Distinct origins over all sensor types.
    pub fn origins(&self) -> BTreeSet<String> {
        self.tilt
            .origins()
            .iter()
            .chain(self.displacement.origins())
            .chain(self.inclinometer.origins())
            .cloned()
            .collect()
    }

    /// Load reports keyed by sensor name.
    pub fn load_reports(&self) -> [(&'static str, LoadReport); 3] {
        [
            (TiltSensor::NAME, self.tilt.load_report()),
            (PrismSensor::NAME, self.displacement.load_report()),
            (InclinometerSensor::NAME, self.inclinometer.load_report()),
        ]
    }
}

/// Rebuilds a [`MonitoringContext`] each time its source delivers a new
/// import. The window and filter carry over to every rebuilt context.
#[derive(Debug)]
pub struct Reloader {
    source: Box<dyn ImportSource>,
    settings: EvaluationSettings,
    window: Option<TemporalRange>,
    filter: Option<Arc<dyn PointFilter>>,
    context: Option<MonitoringContext>,
    imports: usize,
}

impl Reloader {
    pub fn new(source: Box<dyn ImportSource>, settings: EvaluationSettings) -> Self {
        Self {
            source,
            settings,
            window: None,
            filter: None,
            context: None,
            imports: 0,
        }
    }

    pub fn with_window(mut self, window: Option<TemporalRange>) -> Self {
        self.window = window;
        self
    }

    pub fn with_filter(mut self, filter: Arc<dyn PointFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Poll the source once. Returns `true` if a new context was built; on
    /// `false` the previous context, if any, stays current.
    pub fn poll(&mut self) -> bool {
        let Some(document) = self.source.poll() else {
            return false;
        };

        let context = MonitoringContext::from_document(document, self.settings);
        if let Some(ref filter) = self.filter {
            context.set_filter(filter.clone());
        }
        context.apply_range(self.window);

        self.imports += 1;
        debug!(source = %self.source.description(), imports = self.imports, "context rebuilt");
        self.context = Some(context);
        true
    }

    /// Change the window of the current context and of every later one.
    pub fn set_window(&mut self, window: Option<TemporalRange>) {
        self.window = window;
        if let Some(ref context) = self.context {
            context.apply_range(window);
        }
    }

    /// The context of the latest successful import.
    pub fn context(&self) -> Option<&MonitoringContext> {
        self.context.as_ref()
    }

    pub fn source(&self) -> &dyn ImportSource {
        self.source.as_ref()
    }

    /// Number of imports loaded so far.
    pub fn imports(&self) -> usize {
        self.imports
    }
}
