//! Dashboard statistics: pure functions over generated records and config.
//!
//! Every statistic is a pure function: records or monthly results in,
//! scalar out. Days with a zero percentage count as "no data" everywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pnlboard_core::DailyRecord;

use crate::config::MonthlyResult;

/// Deposit / withdrawal totals and the headline profit rate (percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub deposited: f64,
    pub withdrawn: f64,
    pub profit_rate: f64,
}

impl FinanceSummary {
    /// `deposited * (1 + profit_rate / 100) - withdrawn`.
    pub fn current_assets(&self) -> f64 {
        self.deposited * (1.0 + self.profit_rate / 100.0) - self.withdrawn
    }

    /// Net dollar profit of a month with the given gross return (percent).
    pub fn net_profit(&self, result_pct: f64) -> f64 {
        self.deposited * result_pct / 100.0
    }
}

/// A single best or worst day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayExtreme {
    pub date: NaiveDate,
    pub percentage: f64,
}

/// Aggregates for one generated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    /// Days with a non-zero percentage.
    pub trading_days: usize,
    pub profit_days: usize,
    pub loss_days: usize,
    /// Win rate in percent, over trading days only.
    pub win_rate: f64,
    pub realized_total: f64,
    pub best_day: Option<DayExtreme>,
    pub worst_day: Option<DayExtreme>,
}

impl MonthStats {
    pub fn compute(records: &[DailyRecord]) -> Self {
        let trading: Vec<&DailyRecord> = records.iter().filter(|r| r.has_data()).collect();
        let profit_days = trading.iter().filter(|r| r.is_profit).count();

        let best_day = trading
            .iter()
            .max_by(|a, b| a.percentage.total_cmp(&b.percentage))
            .map(|r| DayExtreme {
                date: r.date,
                percentage: r.percentage,
            });
        let worst_day = trading
            .iter()
            .min_by(|a, b| a.percentage.total_cmp(&b.percentage))
            .map(|r| DayExtreme {
                date: r.date,
                percentage: r.percentage,
            });

        Self {
            trading_days: trading.len(),
            profit_days,
            loss_days: trading.len() - profit_days,
            win_rate: win_rate(records),
            realized_total: realized_total(records),
            best_day,
            worst_day,
        }
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Profit days / days with data, in percent. 0.0 when no day has data.
pub fn win_rate(records: &[DailyRecord]) -> f64 {
    let with_data = records.iter().filter(|r| r.has_data()).count();
    if with_data == 0 {
        return 0.0;
    }
    let wins = records
        .iter()
        .filter(|r| r.has_data() && r.is_profit)
        .count();
    wins as f64 / with_data as f64 * 100.0
}

/// Sum of all percentages. Placeholders contribute nothing.
pub fn realized_total(records: &[DailyRecord]) -> f64 {
    records.iter().map(|r| r.percentage).sum()
}

/// Mean of the configured monthly results. 0.0 for an empty table.
pub fn average_monthly_return(months: &[MonthlyResult]) -> f64 {
    if months.is_empty() {
        return 0.0;
    }
    months.iter().map(|m| m.result).sum::<f64>() / months.len() as f64
}

/// Index of the month with the highest result (first one on ties).
pub fn best_month(months: &[MonthlyResult]) -> Option<usize> {
    months
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, m)| match best {
            Some((_, r)) if r >= m.result => best,
            _ => Some((i, m.result)),
        })
        .map(|(i, _)| i)
}
