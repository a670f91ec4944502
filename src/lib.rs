//! # deformwatch
//!
//! Evaluation engine for structural deformation monitoring.
//!
//! Monitoring points (tilt meters, survey prisms, inclinometer casings) are
//! loaded once per import together with their complete observation history.
//! Whenever the analysis window or the point filter changes, every point is
//! re-evaluated from its raw history: observations inside the window are
//! selected, baselines are chosen, deltas are computed and compared against
//! alarm thresholds.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        MonitoringContext                         │
//! │                                                                  │
//! │  ┌─────────┐   ┌──────────────────────────────────────────────┐ │
//! │  │ source  │──▶│ Manager<TiltSensor> / <PrismSensor> / <Incl.> │ │
//! │  │ (input) │   │   Store ─▶ temporal ─▶ baseline ─▶ alarm     │ │
//! │  └─────────┘   └──────────────────────┬───────────────────────┘ │
//! │                                       │ watch::Sender<Snapshot>  │
//! │                                       ▼                          │
//! │                              readers / export                    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Import sources ([`ImportSource`] trait) for JSON files and channels
//! - **[`data`]**: The evaluation pipeline stages
//! - **[`sensor`]**: Sensor types and their component registries
//! - **[`manager`]**: Per-sensor-type orchestration and snapshot publication
//! - **[`context`]**: One manager per sensor type, built from one import
//! - **[`filter`]**: Static (non-temporal) point filters
//! - **[`export`]**: JSON export of derived state
//! - **[`config`]**: Settings from file and environment
//!
//! ## Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use deformwatch::{EvaluationSettings, ImportDocument, MonitoringContext};
//!
//! let document = ImportDocument::from_json(r#"{
//!     "displacement": {
//!         "points": [ { "name": "PR-01" } ],
//!         "observations": [
//!             { "point": "PR-01", "timestamp": "2024-03-01", "is_zero": true,
//!               "reading": { "east": 0.0, "north": 0.0, "height": 0.0 } },
//!             { "point": "PR-01", "timestamp": "2024-03-08",
//!               "reading": { "east": 0.0, "north": 0.0, "height": -0.004 } }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let context = MonitoringContext::from_document(document, EvaluationSettings::default());
//!
//! let low = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let high = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! context.apply_temporal_filter(low, high);
//!
//! let state = context.displacement.derived_state("PR-01").unwrap();
//! let settlement = state.delta_zero.unwrap().get("height").unwrap();
//! assert!((settlement + 0.004).abs() < 1e-12);
//! ```

pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod export;
pub mod filter;
pub mod manager;
pub mod sensor;
pub mod source;

pub use config::Settings;
pub use context::{MonitoringContext, Reloader};
pub use data::{
    AlarmBasis, AlarmLevel, AlarmOutcome, Baselines, ComponentValue, Delta, LoadReport,
    MonthlyCounts, PointHistory, RollingBaseline, Store,
};
pub use error::{Error, Result};
pub use export::{ComponentInfo, ExportDocument, PointReport, SensorReport};
pub use filter::{AcceptAll, PointFilter, StaticFilter};
pub use manager::{AlarmSummary, DerivedState, EvaluationSettings, Manager, Snapshot};
pub use sensor::{
    Component, ComponentCategory, InclinometerSensor, PrismSensor, ProfileRow, SensorKind,
    TiltSensor,
};
pub use source::{
    ChannelSource, DocumentSender, FileSource, ImportDocument, ImportSource, SensorBatch,
};

pub use deformwatch_types as types;
