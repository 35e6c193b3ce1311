//! Dashboard assembly: generate month histories and build the snapshot the
//! views render.
//!
//! A `Dashboard` is built once from a validated `DashboardConfig`. Histories
//! are regenerated on every call: unseeded runs give fresh simulated days each
//! time, seeded runs derive one sub-seed per month so a month's history does
//! not depend on which other months were generated before it.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use pnlboard_core::{
    DailyRecord, GeneratedMonth, GenerationPlan, MonthKey, PnlGenerator, PolicyTable, RngSource,
    SeedHierarchy,
};

use crate::config::{ConfigError, DashboardConfig, MonthlyResult};
use crate::leaderboard::{CopyLeaderboard, MasterEntry};
use crate::stats::{average_monthly_return, best_month, MonthStats};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown month id '{0}'")]
    UnknownMonth(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where simulated draws come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeding {
    /// Fresh thread RNG per month; results differ on every run.
    Unseeded,
    /// One reproducible source per month.
    Seeded(SeedHierarchy),
}

impl Seeding {
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or(Seeding::Unseeded, |s| Seeding::Seeded(SeedHierarchy::new(s)))
    }
}

/// One configured month with its generated daily history.
#[derive(Debug, Clone, Serialize)]
pub struct MonthHistory {
    pub id: String,
    pub label: String,
    pub key: MonthKey,
    /// Configured gross result (the generator target).
    pub result: f64,
    pub records: Vec<DailyRecord>,
    pub win_rate: f64,
    pub stats: MonthStats,
    pub plan: GenerationPlan,
}

impl MonthHistory {
    fn from_generated(month: &MonthlyResult, generated: GeneratedMonth) -> Self {
        let stats = MonthStats::compute(&generated.records);
        Self {
            id: month.id.clone(),
            label: month.label.clone(),
            key: generated.key,
            result: month.result,
            win_rate: stats.win_rate,
            records: generated.records,
            stats,
            plan: generated.plan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthStatus {
    /// Highest result of all configured months.
    Record,
    Good,
}

/// One row of the monthly results table.
#[derive(Debug, Clone, Serialize)]
pub struct MonthRow {
    pub id: String,
    pub label: String,
    pub year: i32,
    /// `MM/YY`.
    pub short_label: String,
    pub gross_return: f64,
    pub net_profit: f64,
    pub status: MonthStatus,
}

/// Headline cards.
#[derive(Debug, Clone, Serialize)]
pub struct Headline {
    pub current_assets: f64,
    pub profit_rate: f64,
    pub average_monthly_return: f64,
    pub months_counted: usize,
    pub deposited: f64,
    pub withdrawn: f64,
}

/// Everything one dashboard render needs.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub username: String,
    pub as_of: Option<NaiveDate>,
    pub headline: Headline,
    pub months: Vec<MonthRow>,
    pub masters: Vec<MasterEntry>,
    pub selected: Option<MonthHistory>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    policies: PolicyTable,
    generator: PnlGenerator,
    leaderboard: CopyLeaderboard,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policies = config.policy_table()?;
        let generator = config.generator();
        let leaderboard = CopyLeaderboard::from_entries(config.masters.iter().cloned());
        Ok(Self {
            config,
            policies,
            generator,
            leaderboard,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn leaderboard(&self) -> &CopyLeaderboard {
        &self.leaderboard
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Generate the history of one configured month.
    pub fn history(&self, month_id: &str, seeding: Seeding) -> Result<MonthHistory, DashboardError> {
        let month = self
            .config
            .month(month_id)
            .ok_or_else(|| DashboardError::UnknownMonth(month_id.to_string()))?;
        Ok(self.generate_month(month, seeding)?)
    }

    /// Generate every configured month, in config order.
    pub fn histories(&self, seeding: Seeding) -> Result<Vec<MonthHistory>, DashboardError> {
        self.config
            .months
            .iter()
            .map(|m| self.generate_month(m, seeding).map_err(DashboardError::from))
            .collect()
    }

    /// Build the full snapshot. `selected` picks the month whose daily
    /// history is included; `None` includes no history.
    pub fn snapshot(
        &self,
        selected: Option<&str>,
        seeding: Seeding,
    ) -> Result<DashboardSnapshot, DashboardError> {
        let selected = selected
            .map(|id| self.history(id, seeding))
            .transpose()?;
        self.assemble(selected)
    }

    /// Build the snapshot around histories that were already generated, so
    /// the selected month matches them even for unseeded runs.
    pub fn snapshot_from(
        &self,
        histories: &[MonthHistory],
        selected: Option<&str>,
    ) -> Result<DashboardSnapshot, DashboardError> {
        let selected = selected
            .map(|id| {
                histories
                    .iter()
                    .find(|h| h.id == id)
                    .cloned()
                    .ok_or_else(|| DashboardError::UnknownMonth(id.to_string()))
            })
            .transpose()?;
        self.assemble(selected)
    }

    fn assemble(&self, selected: Option<MonthHistory>) -> Result<DashboardSnapshot, DashboardError> {
        let finance = &self.config.finance;
        let months = &self.config.months;
        let record_idx = best_month(months);

        let rows = months
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let key = m.key().map_err(|source| ConfigError::MonthLabel {
                    id: m.id.clone(),
                    source,
                })?;
                Ok(MonthRow {
                    id: m.id.clone(),
                    label: m.label.clone(),
                    year: m.year,
                    short_label: key.short_label(),
                    gross_return: m.result,
                    net_profit: finance.net_profit(m.result),
                    status: if Some(i) == record_idx {
                        MonthStatus::Record
                    } else {
                        MonthStatus::Good
                    },
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(DashboardSnapshot {
            username: self.config.username.clone(),
            as_of: self.config.as_of,
            headline: Headline {
                current_assets: finance.current_assets(),
                profit_rate: finance.profit_rate,
                average_monthly_return: average_monthly_return(months),
                months_counted: months.len(),
                deposited: finance.deposited,
                withdrawn: finance.withdrawn,
            },
            months: rows,
            masters: self.leaderboard.entries().to_vec(),
            selected,
        })
    }

    fn generate_month(
        &self,
        month: &MonthlyResult,
        seeding: Seeding,
    ) -> Result<MonthHistory, ConfigError> {
        let key = month.key().map_err(|source| ConfigError::MonthLabel {
            id: month.id.clone(),
            source,
        })?;
        let policy = self.policies.resolve(key);
        debug!(id = %month.id, month = %key, ?seeding, "generating month history");

        let generated = match seeding {
            Seeding::Unseeded => {
                self.generator
                    .generate(key, month.result, &policy, &mut RngSource::thread())
            }
            Seeding::Seeded(seeds) => {
                self.generator
                    .generate(key, month.result, &policy, &mut seeds.source_for(key))
            }
        };
        Ok(MonthHistory::from_generated(month, generated))
    }
}
