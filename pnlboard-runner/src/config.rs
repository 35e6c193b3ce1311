//! Serializable dashboard configuration.
//!
//! One TOML file describes everything the dashboard shows:
//! - account name and optional as-of date
//! - deposit / withdrawal totals and the headline profit rate
//! - the monthly results table (these targets feed the generator)
//! - the copy-trading leaderboard
//! - generator draw parameters and per-month policies
//!
//! Dates are TOML strings (`as_of = "2026-02-04"`), not TOML date literals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use pnlboard_core::{
    CalendarError, FixedDay, GeneratorParams, MonthKey, MonthPolicy, ParamsError, PnlGenerator,
    PolicyError, PolicyTable,
};

use crate::leaderboard::MasterEntry;
use crate::stats::FinanceSummary;

/// Errors from loading or validating a `DashboardConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no months configured")]
    NoMonths,
    #[error("month '{id}': {source}")]
    MonthLabel {
        id: String,
        #[source]
        source: CalendarError,
    },
    #[error("duplicate month id '{0}'")]
    DuplicateMonthId(String),
    #[error("month '{0}' has a non-finite result")]
    NonFiniteResult(String),
    #[error("duplicate master rank {0}")]
    DuplicateRank(u32),
    #[error("duplicate master name '{0}'")]
    DuplicateMasterName(String),
    #[error("master '{0}' has a non-finite value")]
    NonFiniteMaster(String),
    #[error("finance values must be finite")]
    NonFiniteFinance,
    #[error("policy {year}-{month:02}: {source}")]
    PolicyMonth {
        year: i32,
        month: u32,
        #[source]
        source: CalendarError,
    },
    #[error("duplicate policy for {0}")]
    DuplicatePolicy(MonthKey),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// One row of the monthly results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyResult {
    pub id: String,
    /// `"<Prefix> <N>"`, e.g. `"Month 02"`.
    pub label: String,
    pub year: i32,
    /// Gross monthly return in percent.
    pub result: f64,
}

impl MonthlyResult {
    pub fn key(&self) -> Result<MonthKey, CalendarError> {
        MonthKey::from_label(&self.label, self.year)
    }
}

/// A month policy as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_horizon: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed: Vec<FixedDay>,
}

impl PolicyEntry {
    pub fn from_policy(key: MonthKey, policy: &MonthPolicy) -> Self {
        Self {
            year: key.year(),
            month: key.month(),
            cutoff_day: policy.cutoff_day,
            simulation_horizon: policy.simulation_horizon,
            consumed_target: policy.consumed_target,
            fixed: policy.fixed.clone(),
        }
    }

    pub fn key(&self) -> Result<MonthKey, ConfigError> {
        MonthKey::new(self.year, self.month).map_err(|source| ConfigError::PolicyMonth {
            year: self.year,
            month: self.month,
            source,
        })
    }

    pub fn to_policy(&self) -> MonthPolicy {
        MonthPolicy {
            cutoff_day: self.cutoff_day,
            simulation_horizon: self.simulation_horizon,
            fixed: self.fixed.clone(),
            consumed_target: self.consumed_target,
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub username: String,
    /// "Today" for months without an explicit policy. `None` = all elapsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub finance: FinanceSummary,
    #[serde(default)]
    pub generator: GeneratorParams,
    pub months: Vec<MonthlyResult>,
    #[serde(default)]
    pub masters: Vec<MasterEntry>,
    #[serde(default)]
    pub policies: Vec<PolicyEntry>,
}

impl Default for DashboardConfig {
    /// The dashboard as it shipped: three months from December 2025 to the
    /// in-progress February 2026, five masters, and the observed policies.
    fn default() -> Self {
        let policies = PolicyTable::observed()
            .iter()
            .map(|(key, policy)| PolicyEntry::from_policy(*key, policy))
            .collect();

        Self {
            username: "demo".into(),
            as_of: None,
            finance: FinanceSummary {
                deposited: 8500.0,
                withdrawn: 4000.0,
                profit_rate: 25.1,
            },
            generator: GeneratorParams::default(),
            months: vec![
                month("m0", "Month 02", 2026, 2.15),
                month("m1", "Month 01", 2026, 8.30),
                month("m2", "Month 12", 2025, 14.65),
            ],
            masters: vec![
                master(1, "Apex Flow Execution (AFE)", 1.13, 16240.5, true),
                master(2, "Precision Liquidity Strike (PLS)", 0.85, 4120.0, false),
                master(3, "Quantum Pullback System (QPS)", 0.42, 2890.0, false),
                master(4, "Adaptive Range Reversal (ARR)", -0.12, 910.0, false),
                master(5, "Velocity Break Structure (VBS)", 0.25, 1310.0, false),
            ],
            policies,
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months.is_empty() {
            return Err(ConfigError::NoMonths);
        }
        let mut ids = BTreeSet::new();
        for m in &self.months {
            if !ids.insert(m.id.as_str()) {
                return Err(ConfigError::DuplicateMonthId(m.id.clone()));
            }
            m.key().map_err(|source| ConfigError::MonthLabel {
                id: m.id.clone(),
                source,
            })?;
            if !m.result.is_finite() {
                return Err(ConfigError::NonFiniteResult(m.id.clone()));
            }
        }

        // The leaderboard keys entries by name, so a repeated name would
        // silently drop a row.
        let mut ranks = BTreeSet::new();
        let mut names = BTreeSet::new();
        for master in &self.masters {
            if !ranks.insert(master.rank) {
                return Err(ConfigError::DuplicateRank(master.rank));
            }
            if !names.insert(master.name.as_str()) {
                return Err(ConfigError::DuplicateMasterName(master.name.clone()));
            }
            if !master.pnl_24h.is_finite() || !master.amount.is_finite() {
                return Err(ConfigError::NonFiniteMaster(master.name.clone()));
            }
        }

        let f = &self.finance;
        if !(f.deposited.is_finite() && f.withdrawn.is_finite() && f.profit_rate.is_finite()) {
            return Err(ConfigError::NonFiniteFinance);
        }

        self.generator.validate()?;
        self.policy_table()?;
        Ok(())
    }

    /// Build the policy table, validating every entry.
    pub fn policy_table(&self) -> Result<PolicyTable, ConfigError> {
        let mut table = PolicyTable::new().with_as_of(self.as_of);
        for entry in &self.policies {
            let key = entry.key()?;
            if table.insert(key, entry.to_policy())?.is_some() {
                return Err(ConfigError::DuplicatePolicy(key));
            }
        }
        Ok(table)
    }

    pub fn generator(&self) -> PnlGenerator {
        PnlGenerator::new(self.generator.clone())
    }

    pub fn month(&self, id: &str) -> Option<&MonthlyResult> {
        self.months.iter().find(|m| m.id == id)
    }
}

fn month(id: &str, label: &str, year: i32, result: f64) -> MonthlyResult {
    MonthlyResult {
        id: id.into(),
        label: label.into(),
        year,
        result,
    }
}

fn master(rank: u32, name: &str, pnl_24h: f64, amount: f64, private: bool) -> MasterEntry {
    MasterEntry {
        rank,
        name: name.into(),
        pnl_24h,
        amount,
        private,
    }
}
