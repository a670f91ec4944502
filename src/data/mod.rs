//! Data models and the evaluation pipeline.
//!
//! This module turns raw point histories into derived, alarm-annotated state.
//! Each stage is a pure function of its inputs; the [`Manager`](crate::Manager)
//! strings them together on every recompute pass.
//!
//! ## Submodules
//!
//! - [`store`]: Point/observation store built once per import
//! - [`temporal`]: Window selection and the pass-through rule for undated points
//! - [`baseline`]: Zero/first/rolling baseline selection and structured deltas
//! - [`alarm`]: Alarm level and percent-consumed evaluation
//! - [`histogram`]: Observation counts per month
//! - [`duration`]: Parsing and formatting of period strings (e.g., "30d", "12h")
//! - [`timestamp`]: Lenient date-time parsing
//!
//! ## Data Flow
//!
//! ```text
//! Store (raw histories)
//!        │
//!        ▼
//! temporal::filter_by_range()  ──▶ time-filtered slice per point
//!        │
//!        ▼
//! baseline::compute()          ──▶ zero / first / rolling deltas
//!        │
//!        ▼
//! alarm::evaluate()            ──▶ level + percent per point
//! ```

pub mod alarm;
pub mod baseline;
pub mod duration;
pub mod histogram;
pub mod store;
pub mod temporal;
pub mod timestamp;

pub use alarm::{AlarmLevel, AlarmOutcome};
pub use baseline::{AlarmBasis, Baselines, ComponentValue, Delta, RollingBaseline};
pub use histogram::MonthlyCounts;
pub use store::{LoadReport, PointHistory, Store};
