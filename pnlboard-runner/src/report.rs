//! Text rendering: calendar grid, list view, month table, leaderboard and a
//! Markdown report.
//!
//! Every renderer returns a `String`; the CLI decides where it goes.
//! Percentages are signed by `is_profit`, not by the value itself, so a
//! `-0.00` never shows up as `+0.00%`.

use pnlboard_core::DailyRecord;

use crate::dashboard::{DashboardSnapshot, MonthHistory, MonthStatus};
use crate::leaderboard::{CopyAction, MasterEntry};

/// Cell shown for a day with no data.
pub const NO_DATA: &str = "·";

/// `+1.23%` / `-0.75%`.
pub fn signed_pct(record: &DailyRecord) -> String {
    let sign = if record.is_profit { '+' } else { '-' };
    format!("{sign}{:.2}%", record.percentage.abs())
}

/// `1234567.5` → `1,234,567.50`.
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Calendar grid: `columns` days per row, each cell `DD +1.23%`.
pub fn render_grid(records: &[DailyRecord], columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::new();
    for row in records.chunks(columns) {
        let cells: Vec<String> = row
            .iter()
            .map(|r| {
                let value = if r.has_data() {
                    signed_pct(r)
                } else {
                    NO_DATA.to_string()
                };
                format!("{:02} {:>7}", r.day(), value)
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// List view: days with data, newest first, `DD/MM/YYYY  +1.23%  Alpha-X`.
pub fn render_list(records: &[DailyRecord]) -> String {
    let mut out = String::new();
    for r in records.iter().rev().filter(|r| r.has_data()) {
        let strategy = r.strategy.split_whitespace().next().unwrap_or("");
        out.push_str(&format!(
            "{}  {:>7}  {}\n",
            r.date.format("%d/%m/%Y"),
            signed_pct(r),
            strategy
        ));
    }
    out
}

/// Headline cards as a short block.
pub fn render_headline(snapshot: &DashboardSnapshot) -> String {
    let h = &snapshot.headline;
    let mut out = String::new();
    out.push_str(&format!("Account:          {}\n", snapshot.username));
    if let Some(as_of) = snapshot.as_of {
        out.push_str(&format!("As of:            {as_of}\n"));
    }
    out.push_str(&format!("Current assets:   $ {}\n", format_money(h.current_assets)));
    out.push_str(&format!("Profit rate:      {:+.2}%\n", h.profit_rate));
    out.push_str(&format!(
        "Avg monthly:      {:+.2}% ({} months)\n",
        h.average_monthly_return, h.months_counted
    ));
    out.push_str(&format!("Deposited:        $ {}\n", format_money(h.deposited)));
    out.push_str(&format!("Withdrawn:        $ {}\n", format_money(h.withdrawn)));
    out
}

/// Monthly results table.
pub fn render_month_table(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<10} {:>9} {:>13}  {}\n",
        "ID", "Month", "Gross", "Net", "Status"
    ));
    for row in &snapshot.months {
        out.push_str(&format!(
            "{:<6} {:<10} {:>+8.2}% {:>13}  {}\n",
            row.id,
            row.short_label,
            row.gross_return,
            format!("$ {}", format_money(row.net_profit)),
            status_label(row.status)
        ));
    }
    out
}

/// Copy-trading leaderboard.
pub fn render_leaderboard(masters: &[MasterEntry]) -> String {
    let mut out = String::new();
    for m in masters {
        out.push_str(&format!(
            "#{:<2} {:<36} {:>+6.2}% {:>12}  {}\n",
            m.rank,
            m.name,
            m.pnl_24h,
            format!("$ {}", format_money(m.amount)),
            action_label(m.action())
        ));
    }
    out
}

/// Selected month header: label, result and win rate.
pub fn render_month_header(history: &MonthHistory) -> String {
    format!(
        "{} ({})  result {:+.2}%  win rate {:.2}%  trading days {}\n",
        history.label,
        history.key.short_label(),
        history.result,
        history.win_rate,
        history.stats.trading_days
    )
}

/// Full Markdown report of a snapshot.
pub fn render_markdown(snapshot: &DashboardSnapshot) -> String {
    let h = &snapshot.headline;
    let mut report = format!(
        "# PnL Dashboard: {}\n\n\
## Summary\n\
- Current Assets: $ {}\n\
- Profit Rate: {:+.2}%\n\
- Average Monthly Return: {:+.2}%\n\
- Deposited: $ {}\n\
- Withdrawn: $ {}\n",
        snapshot.username,
        format_money(h.current_assets),
        h.profit_rate,
        h.average_monthly_return,
        format_money(h.deposited),
        format_money(h.withdrawn),
    );

    if !snapshot.months.is_empty() {
        report.push_str("\n## Monthly Results\n\n");
        report.push_str("| Month | Gross | Net Profit | Status |\n");
        report.push_str("|-------|-------|------------|--------|\n");
        for row in &snapshot.months {
            report.push_str(&format!(
                "| {} | {:+.2}% | $ {} | {} |\n",
                row.short_label,
                row.gross_return,
                format_money(row.net_profit),
                status_label(row.status)
            ));
        }
    }

    if !snapshot.masters.is_empty() {
        report.push_str("\n## Copy Trading\n\n");
        report.push_str("| Rank | Master | 24h | Following | Action |\n");
        report.push_str("|------|--------|-----|-----------|--------|\n");
        for m in &snapshot.masters {
            report.push_str(&format!(
                "| {} | {} | {:+.2}% | $ {} | {} |\n",
                m.rank,
                m.name,
                m.pnl_24h,
                format_money(m.amount),
                action_label(m.action())
            ));
        }
    }

    if let Some(history) = &snapshot.selected {
        report.push_str(&format!(
            "\n## Daily History {}\n\n- Result: {:+.2}%\n- Win Rate: {:.2}%\n- Trading Days: {}\n",
            history.key.short_label(),
            history.result,
            history.win_rate,
            history.stats.trading_days
        ));
        if let Some(best) = &history.stats.best_day {
            report.push_str(&format!("- Best Day: {} ({:+.2}%)\n", best.date, best.percentage));
        }
        if let Some(worst) = &history.stats.worst_day {
            report.push_str(&format!("- Worst Day: {} ({:+.2}%)\n", worst.date, worst.percentage));
        }

        report.push_str("\n| Date | PnL | Strategy |\n");
        report.push_str("|------|-----|----------|\n");
        for r in history.records.iter().filter(|r| r.has_data()) {
            report.push_str(&format!("| {} | {} | {} |\n", r.date, signed_pct(r), r.strategy));
        }
    }

    report
}

fn status_label(status: MonthStatus) -> &'static str {
    match status {
        MonthStatus::Record => "Record",
        MonthStatus::Good => "Good",
    }
}

fn action_label(action: CopyAction) -> &'static str {
    match action {
        CopyAction::Copy => "Copy",
        CopyAction::Private => "Private",
    }
}
