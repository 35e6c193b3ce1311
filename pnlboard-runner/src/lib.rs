//! PnLBoard Runner: the dashboard built on top of `pnlboard-core`.
//!
//! This crate provides:
//! - TOML configuration (account, finance totals, monthly results, masters,
//!   generator parameters, month policies)
//! - Statistics (win rate, average monthly return, current assets)
//! - Copy-trading leaderboard
//! - Dashboard snapshots with generated month histories
//! - Text and Markdown rendering
//! - JSON / CSV artifact export

pub mod config;
pub mod dashboard;
pub mod export;
pub mod leaderboard;
pub mod report;
pub mod stats;

pub use config::{ConfigError, DashboardConfig, MonthlyResult, PolicyEntry};
pub use dashboard::{
    Dashboard, DashboardError, DashboardSnapshot, Headline, MonthHistory, MonthRow, MonthStatus,
    Seeding,
};
pub use export::{save_artifacts, HistoryExport, SCHEMA_VERSION};
pub use leaderboard::{CopyAction, CopyLeaderboard, InsertResult, MasterEntry};
pub use stats::{average_monthly_return, win_rate, FinanceSummary, MonthStats};
