//! Random draws behind simulated days.
//!
//! The profit side uses a two-phase allocator: `n - 1` noisy samples around
//! the average, then one remainder sample that makes the total exact. No
//! iterative rebalancing is needed and the total holds whatever the noise.

use crate::domain::{Side, SimulatedValue};
use crate::params::GeneratorParams;
use crate::rng::UniformSource;

/// Draw the fraction of simulable days that will be losses.
pub fn draw_loss_ratio<R: UniformSource + ?Sized>(params: &GeneratorParams, rng: &mut R) -> f64 {
    rng.uniform(params.loss_ratio_base, params.loss_ratio_span)
}

/// `floor(simulable_days * ratio)`, never more than `simulable_days`.
pub fn loss_day_count(simulable_days: u32, ratio: f64) -> u32 {
    let count = (simulable_days as f64 * ratio).floor();
    if count <= 0.0 {
        0
    } else {
        (count as u32).min(simulable_days)
    }
}

/// Draw `count` independent loss values in `[-(base + span), -base]`.
pub fn draw_losses<R: UniformSource + ?Sized>(
    count: usize,
    params: &GeneratorParams,
    rng: &mut R,
) -> Vec<f64> {
    (0..count)
        .map(|_| -rng.uniform(params.loss_base, params.loss_span))
        .collect()
}

/// Distribute `total` across `count` samples with bounded noise.
///
/// Each of the first `count - 1` samples is `avg + avg * U(-band, band)`;
/// any sample below `profit_floor` is replaced by a draw from the floor reset
/// range. The last sample is `total - sum(others)`, so the values always sum
/// to `total` (up to float addition). Returns an empty vec for `count == 0`.
pub fn allocate_exact_total<R: UniformSource + ?Sized>(
    total: f64,
    count: usize,
    params: &GeneratorParams,
    rng: &mut R,
) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let average = total / count as f64;
    let mut values = Vec::with_capacity(count);
    let mut allocated = 0.0;

    for _ in 0..count - 1 {
        let variance = average * rng.uniform(-params.variance_band, 2.0 * params.variance_band);
        let mut value = average + variance;
        if value < params.profit_floor {
            value = rng.uniform(params.floor_reset_base, params.floor_reset_span);
        }
        allocated += value;
        values.push(value);
    }

    values.push(total - allocated);
    values
}

/// Concatenate losses then profits, tagging each with its side.
pub fn merge_tagged(losses: &[f64], profits: &[f64]) -> Vec<SimulatedValue> {
    losses
        .iter()
        .map(|&value| SimulatedValue {
            value,
            side: Side::Loss,
        })
        .chain(profits.iter().map(|&value| SimulatedValue {
            value,
            side: Side::Profit,
        }))
        .collect()
}

/// Fisher–Yates: walk from the last index down to 1, swapping each element
/// with a uniformly chosen element at or before it.
pub fn shuffle<T, R: UniformSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngSource, ScriptedSource};

    #[test]
    fn loss_ratio_range() {
        let params = GeneratorParams::default();
        let lo = draw_loss_ratio(&params, &mut ScriptedSource::constant(0.0));
        let hi = draw_loss_ratio(&params, &mut ScriptedSource::constant(0.999_999));
        assert!((lo - 0.185).abs() < 1e-12);
        assert!(hi < 0.285);
    }

    #[test]
    fn loss_day_count_floors() {
        assert_eq!(loss_day_count(25, 0.235), 5);
        assert_eq!(loss_day_count(31, 0.185), 5);
        assert_eq!(loss_day_count(0, 0.2), 0);
        assert_eq!(loss_day_count(3, 0.2), 0);
        assert_eq!(loss_day_count(4, 1.5), 4);
    }

    #[test]
    fn losses_stay_in_band() {
        let params = GeneratorParams::default();
        let mut rng = RngSource::seeded(11);
        let losses = draw_losses(500, &params, &mut rng);
        assert_eq!(losses.len(), 500);
        assert!(losses.iter().all(|&l| (-1.0..=-0.5).contains(&l)));
    }

    #[test]
    fn allocation_hits_total_exactly() {
        let params = GeneratorParams::default();
        let mut rng = RngSource::seeded(3);
        for &(total, count) in &[(14.65, 24usize), (6.05, 20), (0.5, 7), (-2.0, 5)] {
            let values = allocate_exact_total(total, count, &params, &mut rng);
            assert_eq!(values.len(), count);
            let sum: f64 = values.iter().sum();
            assert!((sum - total).abs() < 1e-9, "sum {sum} != total {total}");
        }
    }

    #[test]
    fn allocation_of_zero_count_is_empty() {
        let params = GeneratorParams::default();
        let mut rng = ScriptedSource::constant(0.5);
        assert!(allocate_exact_total(3.0, 0, &params, &mut rng).is_empty());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn single_sample_takes_whole_total() {
        let params = GeneratorParams::default();
        let mut rng = ScriptedSource::constant(0.5);
        assert_eq!(allocate_exact_total(2.3, 1, &params, &mut rng), vec![2.3]);
    }

    #[test]
    fn floor_resets_small_samples() {
        // Average 0.05 is under the 0.1 floor, so every noisy sample resets
        // into [0.2, 0.3).
        let params = GeneratorParams::default();
        let mut rng = ScriptedSource::constant(0.5);
        let values = allocate_exact_total(0.25, 5, &params, &mut rng);
        for v in &values[..4] {
            assert!((v - 0.25).abs() < 1e-12);
        }
        let sum: f64 = values.iter().sum();
        assert!((sum - 0.25).abs() < 1e-12);
        assert!(values[4] < 0.0);
    }

    #[test]
    fn noise_is_bounded_by_band() {
        let params = GeneratorParams::default();
        let mut rng = RngSource::seeded(21);
        let values = allocate_exact_total(20.0, 40, &params, &mut rng);
        let avg = 0.5;
        for v in &values[..39] {
            assert!(*v >= avg * 0.8 - 1e-12 && *v < avg * 1.2 + 1e-12);
        }
    }

    #[test]
    fn merge_keeps_order_and_tags() {
        let merged = merge_tagged(&[-0.7], &[1.0, 2.0]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].side, Side::Loss);
        assert_eq!(merged[2].value, 2.0);
        assert_eq!(merged[2].side, Side::Profit);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut RngSource::seeded(5));
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_with_top_draws_keeps_order() {
        // U just below 1 always picks j == i, so nothing moves.
        let mut items = vec![1, 2, 3, 4];
        let mut rng = ScriptedSource::constant(0.999_999);
        shuffle(&mut items, &mut rng);
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn shuffle_with_zero_draws_rotates() {
        // j == 0 every step: [a,b,c] -> swap(2,0) [c,b,a] -> swap(1,0) [b,c,a]
        let mut items = vec!['a', 'b', 'c'];
        shuffle(&mut items, &mut ScriptedSource::constant(0.0));
        assert_eq!(items, vec!['b', 'c', 'a']);
    }
}
