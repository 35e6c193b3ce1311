//! Export: JSON and CSV artifacts for generated histories and snapshots.
//!
//! Persisted JSON carries a `schema_version` field. Unknown (newer) versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use pnlboard_core::DailyRecord;

use crate::dashboard::{DashboardSnapshot, MonthHistory};

pub const SCHEMA_VERSION: u32 = 1;

/// A month's daily history as persisted to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryExport {
    pub schema_version: u32,
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub result: f64,
    pub win_rate: f64,
    pub records: Vec<DailyRecord>,
}

impl HistoryExport {
    pub fn from_history(history: &MonthHistory) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: history.id.clone(),
            year: history.key.year(),
            month: history.key.month(),
            result: history.result,
            win_rate: history.win_rate,
            records: history.records.clone(),
        }
    }
}

#[derive(Serialize)]
struct SnapshotExport<'a> {
    schema_version: u32,
    #[serde(flatten)]
    snapshot: &'a DashboardSnapshot,
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_history_json(history: &MonthHistory) -> Result<String> {
    serde_json::to_string_pretty(&HistoryExport::from_history(history))
        .context("failed to serialize month history to JSON")
}

/// Deserialize a month history, rejecting unknown schema versions.
pub fn import_history_json(json: &str) -> Result<HistoryExport> {
    let export: HistoryExport =
        serde_json::from_str(json).context("failed to deserialize month history from JSON")?;
    if export.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            export.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(export)
}

pub fn export_snapshot_json(snapshot: &DashboardSnapshot) -> Result<String> {
    let export = SnapshotExport {
        schema_version: SCHEMA_VERSION,
        snapshot,
    };
    serde_json::to_string_pretty(&export).context("failed to serialize dashboard snapshot to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: date, percentage, is_profit, strategy. One row per calendar
/// day, placeholders included.
pub fn export_history_csv(records: &[DailyRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "percentage", "is_profit", "strategy"])?;
    for r in records {
        wtr.write_record([
            &r.date.to_string(),
            &format!("{:.2}", r.percentage),
            &r.is_profit.to_string(),
            &r.strategy,
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write the artifact set into `output_dir` (created if missing):
/// - `dashboard.json`: the snapshot
/// - `history_<year>_<month>.csv` and `.json` per generated month
///
/// Returns the paths written, `dashboard.json` first.
pub fn save_artifacts(
    snapshot: &DashboardSnapshot,
    histories: &[MonthHistory],
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(1 + 2 * histories.len());

    let dashboard_path = output_dir.join("dashboard.json");
    write_artifact(&dashboard_path, &export_snapshot_json(snapshot)?)?;
    written.push(dashboard_path);

    for history in histories {
        let stem = format!(
            "history_{}_{:02}",
            history.key.year(),
            history.key.month()
        );

        let csv_path = output_dir.join(format!("{stem}.csv"));
        write_artifact(&csv_path, &export_history_csv(&history.records)?)?;
        written.push(csv_path);

        let json_path = output_dir.join(format!("{stem}.json"));
        write_artifact(&json_path, &export_history_json(history)?)?;
        written.push(json_path);
    }

    Ok(written)
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}
