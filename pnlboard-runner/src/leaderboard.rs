//! Copy-trading leaderboard: masters ordered by rank.
//!
//! Deduplication key: master name. Inserting a master that is already on the
//! board replaces the existing entry. Entries with non-finite figures are
//! skipped.

use serde::{Deserialize, Serialize};

/// A copy-trading strategy shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterEntry {
    pub rank: u32,
    pub name: String,
    /// Last 24h return in percent.
    pub pnl_24h: f64,
    /// Capital currently following the master.
    pub amount: f64,
    /// Private masters cannot be copied.
    #[serde(default)]
    pub private: bool,
}

/// What the follower can do with a master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyAction {
    Copy,
    Private,
}

impl MasterEntry {
    pub fn action(&self) -> CopyAction {
        if self.private {
            CopyAction::Private
        } else {
            CopyAction::Copy
        }
    }

    pub fn is_up(&self) -> bool {
        self.pnl_24h >= 0.0
    }
}

/// Outcome of an insert operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    Inserted,
    /// Replaced an existing entry with the same name.
    Replaced,
    /// Skipped: non-finite figures.
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct CopyLeaderboard {
    entries: Vec<MasterEntry>,
}

impl CopyLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = MasterEntry>) -> Self {
        let mut board = Self::new();
        for entry in entries {
            board.insert(entry);
        }
        board
    }

    pub fn insert(&mut self, entry: MasterEntry) -> InsertResult {
        if !entry.pnl_24h.is_finite() || !entry.amount.is_finite() {
            return InsertResult::Skipped;
        }
        let outcome = match self.entries.iter().position(|e| e.name == entry.name) {
            Some(idx) => {
                self.entries[idx] = entry;
                InsertResult::Replaced
            }
            None => {
                self.entries.push(entry);
                InsertResult::Inserted
            }
        };
        self.sort_entries();
        outcome
    }

    pub fn entries(&self) -> &[MasterEntry] {
        &self.entries
    }

    /// The rank-1 master (lowest rank number).
    pub fn leader(&self) -> Option<&MasterEntry> {
        self.entries.first()
    }

    pub fn top(&self, n: usize) -> &[MasterEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Total capital following all masters.
    pub fn total_amount(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sort_entries(&mut self) {
        // Stable, so equal ranks keep insertion order.
        self.entries.sort_by_key(|e| e.rank);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
