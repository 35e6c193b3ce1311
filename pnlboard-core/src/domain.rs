//! Daily PnL record: the unit rendered by the calendar and list views.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Strategy label carried by days without data.
pub const PLACEHOLDER_STRATEGY: &str = "-";

/// Label attached to fixed override days.
pub const DEFAULT_FIXED_STRATEGY: &str = "SmartMoney-X AI V4.0";

/// Sub-strategies a simulated day may be attributed to.
pub const DEFAULT_STRATEGIES: [&str; 6] = [
    "Alpha-X AI V4.0",
    "Apex Flow Execution",
    "Precision Liquidity",
    "Quantum Pullback",
    "Velocity Break",
    "Adaptive Range",
];

/// One calendar day of PnL.
///
/// A `percentage` of exactly zero means "no data". Placeholders report
/// `is_profit = true` so they render as neutral rather than as losses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub percentage: f64,
    pub is_profit: bool,
    pub strategy: String,
}

impl DailyRecord {
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            percentage: 0.0,
            is_profit: true,
            strategy: PLACEHOLDER_STRATEGY.to_string(),
        }
    }

    /// A fixed override, emitted verbatim.
    pub fn fixed(date: NaiveDate, percentage: f64, strategy: &str) -> Self {
        Self {
            date,
            percentage,
            is_profit: percentage > 0.0,
            strategy: strategy.to_string(),
        }
    }

    /// A simulated day. The value is rounded to 2 decimals here and only here.
    pub fn simulated(date: NaiveDate, value: f64, strategy: &str) -> Self {
        Self {
            date,
            percentage: round_pct(value),
            is_profit: value > 0.0,
            strategy: strategy.to_string(),
        }
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn has_data(&self) -> bool {
        self.percentage != 0.0
    }

    pub fn is_placeholder(&self) -> bool {
        !self.has_data() && self.strategy == PLACEHOLDER_STRATEGY
    }
}

/// Which pool a simulated value was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Loss,
    Profit,
}

/// A sign-tagged simulated value, before it is assigned to a calendar day.
///
/// The tag keeps the pool a value came from across the shuffle. Emission
/// still derives `is_profit` from the value, since the final profit sample
/// is a remainder and may be negative; the generator only checks the tag
/// against loss values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedValue {
    pub value: f64,
    pub side: Side,
}

/// Round a percentage to 2 decimals. `-0.0` is normalized to `0.0`.
pub fn round_pct(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}
