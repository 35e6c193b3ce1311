//! Daily PnL generator.
//!
//! Turns a monthly target return into one `DailyRecord` per calendar day:
//!
//! 1. Resolve month length, display cutoff and simulation horizon (policy).
//! 2. Emit fixed override days verbatim; subtract what they consume from the target.
//! 3. Split the simulable days into losses and profits by a random ratio.
//! 4. Draw each loss from `[-1.0, -0.5]`.
//! 5. Allocate the remaining target plus the losses across the profit days,
//!    exactly (see `allocator::allocate_exact_total`).
//! 6. Shuffle losses and profits together.
//! 7. Walk the month: override, else next shuffled value, else placeholder.
//!
//! Degenerate inputs never fail. With no profit days the profit sum has
//! nowhere to go and is dropped; `GenerationPlan::dropped_excess` records it.

use serde::Serialize;
use tracing::debug;

use crate::allocator::{
    allocate_exact_total, draw_loss_ratio, draw_losses, loss_day_count, merge_tagged, shuffle,
};
use crate::calendar::{CalendarError, MonthKey};
use crate::domain::{DailyRecord, Side};
use crate::params::GeneratorParams;
use crate::policy::{PolicyTable, ResolvedPolicy};
use crate::rng::UniformSource;

/// How a month was generated. Pure diagnostics, not needed for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPlan {
    pub days_in_month: u32,
    pub cutoff: u32,
    pub horizon: u32,
    pub simulable_days: u32,
    pub loss_ratio: f64,
    pub loss_count: u32,
    pub profit_count: u32,
    pub fixed_sum: f64,
    pub consumed_target: f64,
    pub remaining_target: f64,
    pub loss_sum: f64,
    pub needed_profit_sum: f64,
    /// Profit sum that could not be placed because there were no profit days.
    pub dropped_excess: f64,
}

/// A fully generated month.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMonth {
    pub key: MonthKey,
    pub target: f64,
    pub plan: GenerationPlan,
    pub records: Vec<DailyRecord>,
}

impl GeneratedMonth {
    /// Sum of all emitted percentages (placeholders contribute zero).
    pub fn realized_total(&self) -> f64 {
        self.records.iter().map(|r| r.percentage).sum()
    }

    /// Days with a non-zero percentage.
    pub fn days_with_data(&self) -> usize {
        self.records.iter().filter(|r| r.has_data()).count()
    }
}

/// Daily PnL generator with a fixed set of draw parameters.
#[derive(Debug, Clone, Default)]
pub struct PnlGenerator {
    params: GeneratorParams,
}

impl PnlGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Generate every day of `key` under an already resolved policy.
    pub fn generate<R: UniformSource + ?Sized>(
        &self,
        key: MonthKey,
        target: f64,
        policy: &ResolvedPolicy,
        rng: &mut R,
    ) -> GeneratedMonth {
        let params = &self.params;
        let simulable_days = policy.simulable_days;

        let loss_ratio = draw_loss_ratio(params, rng);
        let loss_count = loss_day_count(simulable_days, loss_ratio);
        let profit_count = simulable_days - loss_count;

        let losses = draw_losses(loss_count as usize, params, rng);
        let loss_sum: f64 = losses.iter().sum();

        let remaining_target = target - policy.consumed_target;
        let needed_profit_sum = remaining_target - loss_sum;
        let profits = allocate_exact_total(needed_profit_sum, profit_count as usize, params, rng);
        let dropped_excess = if profit_count == 0 {
            needed_profit_sum
        } else {
            0.0
        };

        let plan = GenerationPlan {
            days_in_month: policy.days_in_month,
            cutoff: policy.cutoff,
            horizon: policy.horizon,
            simulable_days,
            loss_ratio,
            loss_count,
            profit_count,
            fixed_sum: policy.fixed_sum(),
            consumed_target: policy.consumed_target,
            remaining_target,
            loss_sum,
            needed_profit_sum,
            dropped_excess,
        };
        debug!(
            month = %key,
            target_return = target,
            simulable_days,
            loss_count,
            profit_count,
            remaining_target,
            "generation plan"
        );
        if dropped_excess != 0.0 {
            debug!(month = %key, dropped_excess, "no profit days to carry the needed profit sum");
        }

        let mut values = merge_tagged(&losses, &profits);
        shuffle(&mut values, rng);
        let mut pending = values.into_iter();

        let mut records = Vec::with_capacity(policy.days_in_month as usize);
        for day in 1..=policy.days_in_month {
            let Some(date) = key.date(day) else {
                continue;
            };
            if let Some(fixed) = policy.fixed_value(day) {
                records.push(DailyRecord::fixed(date, fixed, &params.fixed_strategy));
                continue;
            }
            if day <= policy.cutoff {
                if let Some(sim) = pending.next() {
                    debug_assert!(
                        sim.side == Side::Profit || sim.value < 0.0,
                        "loss draw must be negative"
                    );
                    let strategy = self.pick_strategy(rng);
                    records.push(DailyRecord::simulated(date, sim.value, strategy));
                    continue;
                }
            }
            records.push(DailyRecord::placeholder(date));
        }

        GeneratedMonth {
            key,
            target,
            plan,
            records,
        }
    }

    fn pick_strategy<R: UniformSource + ?Sized>(&self, rng: &mut R) -> &str {
        let strategies = &self.params.strategies;
        strategies
            .get(rng.index(strategies.len()))
            .map_or(self.params.fixed_strategy.as_str(), |s| s.as_str())
    }
}

/// Generate a month from its label, using default draw parameters.
///
/// This is the dashboard's entry point: `generate("Month 02", 2026, 2.15, ...)`.
/// The only failure is a label that does not name a month.
pub fn generate<R: UniformSource + ?Sized>(
    month_label: &str,
    year: i32,
    target_total_return: f64,
    policies: &PolicyTable,
    rng: &mut R,
) -> Result<GeneratedMonth, CalendarError> {
    let key = MonthKey::from_label(month_label, year)?;
    let policy = policies.resolve(key);
    Ok(PnlGenerator::default().generate(key, target_total_return, &policy, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PLACEHOLDER_STRATEGY;
    use crate::rng::{RngSource, ScriptedSource};

    #[test]
    fn february_observed_scenario() {
        let mut rng = RngSource::thread();
        let month = generate("Month 02", 2026, 2.15, &PolicyTable::observed(), &mut rng).unwrap();

        assert_eq!(month.records.len(), 28);
        let expected = [1.12, 0.84, 1.31, 0.95];
        for (record, value) in month.records.iter().zip(expected) {
            assert_eq!(record.percentage, value);
            assert!(record.is_profit);
            assert_eq!(record.strategy, "SmartMoney-X AI V4.0");
        }
        for record in &month.records[4..] {
            assert!(record.is_placeholder());
        }
        assert!((month.realized_total() - 4.22).abs() < 1e-9);
        assert_eq!(month.plan.simulable_days, 0);
        assert!((month.plan.dropped_excess - (2.15 - 4.22)).abs() < 1e-9);
    }

    #[test]
    fn january_partition_uses_horizon() {
        // U = 0.5 everywhere: ratio 0.235, floor(25 * 0.235) = 5 losses.
        let mut rng = ScriptedSource::constant(0.5);
        let month = generate("Month 01", 2026, 8.30, &PolicyTable::observed(), &mut rng).unwrap();

        assert_eq!(month.plan.simulable_days, 25);
        assert_eq!(month.plan.loss_count, 5);
        assert_eq!(month.plan.profit_count, 20);
        assert_eq!(month.plan.loss_count + month.plan.profit_count, 25);

        let simulated: Vec<_> = month.records[..25].iter().collect();
        assert_eq!(simulated.iter().filter(|r| !r.is_profit).count(), 5);
        assert!(simulated.iter().all(|r| r.has_data()));
        assert_eq!(month.records[25].percentage, 0.77);
        assert_eq!(month.records[30].percentage, 0.88);
    }

    #[test]
    fn unparseable_label_is_an_error() {
        let mut rng = ScriptedSource::constant(0.5);
        let err = generate("Month ??", 2026, 1.0, &PolicyTable::new(), &mut rng).unwrap_err();
        assert!(matches!(err, CalendarError::UnparseableLabel(_)));
    }

    #[test]
    fn default_policy_hits_target() {
        let generator = PnlGenerator::default();
        let key = MonthKey::new(2025, 12).unwrap();
        let policy = PolicyTable::new().resolve(key);
        let mut rng = RngSource::seeded(99);
        let month = generator.generate(key, 14.65, &policy, &mut rng);

        assert_eq!(month.records.len(), 31);
        let simulated = month.plan.simulable_days as f64;
        assert!((month.realized_total() - 14.65).abs() <= 0.005 * simulated + 1e-9);
    }

    #[test]
    fn zero_cutoff_month_is_all_placeholders() {
        let generator = PnlGenerator::default();
        let key = MonthKey::new(2026, 6).unwrap();
        let policy = PolicyTable::new()
            .with_as_of(chrono::NaiveDate::from_ymd_opt(2026, 5, 20))
            .resolve(key);
        let mut rng = ScriptedSource::constant(0.3);
        let month = generator.generate(key, 5.0, &policy, &mut rng);

        assert_eq!(month.records.len(), 30);
        assert!(month
            .records
            .iter()
            .all(|r| r.percentage == 0.0 && r.strategy == PLACEHOLDER_STRATEGY));
        assert!((month.plan.dropped_excess - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_simulable_day_carries_whole_target() {
        let generator = PnlGenerator::default();
        let key = MonthKey::new(2026, 3).unwrap();
        let policy = PolicyTable::new()
            .with_as_of(chrono::NaiveDate::from_ymd_opt(2026, 3, 1))
            .resolve(key);
        let mut rng = ScriptedSource::constant(0.5);
        let month = generator.generate(key, 1.234, &policy, &mut rng);

        assert_eq!(month.plan.loss_count, 0);
        assert_eq!(month.records[0].percentage, 1.23);
        assert!(month.records[1..].iter().all(|r| r.is_placeholder()));
    }

    #[test]
    fn strategies_come_from_catalog() {
        let generator = PnlGenerator::default();
        let key = MonthKey::new(2025, 12).unwrap();
        let policy = PolicyTable::new().resolve(key);
        let month = generator.generate(key, 14.65, &policy, &mut RngSource::seeded(1));
        for record in &month.records {
            assert!(generator.params().strategies.contains(&record.strategy));
        }
    }

    #[test]
    fn loss_tags_survive_shuffle() {
        use crate::allocator::{draw_losses, merge_tagged, shuffle};

        let params = GeneratorParams::default();
        let mut rng = RngSource::seeded(17);
        let losses = draw_losses(6, &params, &mut rng);
        let mut values = merge_tagged(&losses, &[0.4, 0.6, -0.1]);
        shuffle(&mut values, &mut rng);

        let tagged_losses: Vec<_> = values.iter().filter(|v| v.side == Side::Loss).collect();
        assert_eq!(tagged_losses.len(), 6);
        assert!(tagged_losses.iter().all(|v| v.value < 0.0));
        // A negative remainder stays on the profit side.
        assert!(values.iter().any(|v| v.side == Side::Profit && v.value < 0.0));
    }
}
