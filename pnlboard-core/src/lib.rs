//! PnLBoard Core: calendar helpers, daily PnL records, month policies,
//! and the synthetic daily PnL generator.
//!
//! This crate contains the only non-trivial logic of the dashboard:
//! - Month labels, month keys and Gregorian month lengths
//! - `DailyRecord`, the unit the calendar and list views render
//! - Injectable uniform random sources (thread, seeded, scripted)
//! - Per-month policies: display cutoff, simulation horizon, fixed overrides
//! - Two-phase allocator that reproduces a monthly target exactly
//! - The generator that ties it all together

pub mod allocator;
pub mod calendar;
pub mod domain;
pub mod generator;
pub mod params;
pub mod policy;
pub mod rng;

pub use calendar::{parse_month_label, CalendarError, MonthKey};
pub use domain::{round_pct, DailyRecord, Side, SimulatedValue, PLACEHOLDER_STRATEGY};
pub use generator::{generate, GeneratedMonth, GenerationPlan, PnlGenerator};
pub use params::{GeneratorParams, ParamsError};
pub use policy::{FixedDay, MonthPolicy, PolicyError, PolicyTable, ResolvedPolicy};
pub use rng::{RngSource, ScriptedSource, SeedHierarchy, UniformSource};
