use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::TableError;
use crate::models::{DrawTable, ScoreEntry, ScoreParams};

/// Floor applied to the largest frequency before normalizing by it.
const MIN_FREQUENCY_MAX: f64 = 0.01;

pub type FrequencyDistribution = BTreeMap<i64, f64>;
pub type CoOccurrenceCounts = BTreeMap<(i64, i64), u32>;

/// Share of each value among all the values of `rows`.
pub fn frequency_distribution(rows: &[Vec<i64>]) -> FrequencyDistribution {
    let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
    let mut total = 0u32;

    for row in rows {
        for &n in row {
            *counts.entry(n).or_insert(0) += 1;
            total += 1;
        }
    }

    counts
        .into_iter()
        .map(|(n, count)| (n, count as f64 / total as f64))
        .collect()
}

/// The last `recent_n` rows, or all of them when the table is shorter.
pub fn recent_rows(rows: &[Vec<i64>], recent_n: usize) -> &[Vec<i64>] {
    &rows[rows.len().saturating_sub(recent_n)..]
}

pub fn co_occurrence_counts(rows: &[Vec<i64>]) -> CoOccurrenceCounts {
    let mut counts = CoOccurrenceCounts::new();

    for row in rows {
        for i in 0..row.len() {
            for j in (i + 1)..row.len() {
                // Keyed on values, not positions: a value repeated inside one
                // row yields a (v, v) pair and bumps its partners twice.
                let pair = if row[i] <= row[j] {
                    (row[i], row[j])
                } else {
                    (row[j], row[i])
                };
                *counts.entry(pair).or_insert(0) += 1;
            }
        }
    }

    counts
}

/// Pair mass of every number in `1..=max_number`, per draw.
pub fn co_occurrence_scores(
    counts: &CoOccurrenceCounts,
    max_number: i64,
    row_count: usize,
) -> BTreeMap<i64, f64> {
    let mut totals: BTreeMap<i64, u32> = BTreeMap::new();
    for (&(a, b), &count) in counts {
        *totals.entry(a).or_insert(0) += count;
        if b != a {
            *totals.entry(b).or_insert(0) += count;
        }
    }

    let denominator = row_count.max(1) as f64;
    (1..=max_number)
        .map(|n| {
            let total = totals.get(&n).copied().unwrap_or(0);
            (n, total as f64 / denominator)
        })
        .collect()
}

fn max_value(values: &BTreeMap<i64, f64>) -> f64 {
    values.values().copied().fold(0.0, f64::max)
}

/// Rounds to 4 decimals on the exact binary value, ties to even.
fn round4(x: f64) -> f64 {
    let scaled = x * 10_000.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor == 0.5 {
        // Product error is exact under fma: it tells a real tie from a value
        // that only lands on the midpoint after rounding.
        let error = x.mul_add(10_000.0, -scaled);
        if error > 0.0 {
            floor + 1.0
        } else if error < 0.0 || floor % 2.0 == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / 10_000.0
}

/// Scores the numbers found in `columns` of `table`, best first.
///
/// The only error is a column absent from the table.
pub fn score(
    table: &DrawTable,
    columns: &[&str],
    max_number: i64,
    params: &ScoreParams,
) -> Result<Vec<ScoreEntry>, TableError> {
    let rows = table.select(columns)?;
    Ok(score_rows(&rows, max_number, params))
}

/// Blends full-history frequency, recent frequency and co-occurrence into a
/// composite score per number.
///
/// Candidates are every number seen in the rows plus every number in
/// `1..=max_number`. Each signal is divided by its own maximum (floored at
/// 0.01 for the frequencies and at 1 for an all-zero co-occurrence map), then
/// weighted by `alpha`, `beta` and `gamma` as given and rounded to 4 decimals.
/// Ties keep ascending number order.
pub fn score_rows(rows: &[Vec<i64>], max_number: i64, params: &ScoreParams) -> Vec<ScoreEntry> {
    let freq_total = frequency_distribution(rows);
    let freq_recent = frequency_distribution(recent_rows(rows, params.recent_n));
    let pairs = co_occurrence_counts(rows);
    let co_scores = co_occurrence_scores(&pairs, max_number, rows.len());

    let max_freq = max_value(&freq_total).max(MIN_FREQUENCY_MAX);
    let max_recent = max_value(&freq_recent).max(MIN_FREQUENCY_MAX);
    let max_co = match max_value(&co_scores) {
        m if m > 0.0 => m,
        _ => 1.0,
    };

    log::debug!(
        "score: {} tirages, {} paires, max_freq={:.4} max_recent={:.4} max_co={:.4}",
        rows.len(),
        pairs.len(),
        max_freq,
        max_recent,
        max_co
    );

    let candidates: BTreeSet<i64> = freq_total
        .keys()
        .chain(freq_recent.keys())
        .chain(co_scores.keys())
        .copied()
        .collect();

    let mut entries: Vec<ScoreEntry> = candidates
        .into_iter()
        .map(|n| {
            let f_total = freq_total.get(&n).copied().unwrap_or(0.0) / max_freq;
            let f_recent = freq_recent.get(&n).copied().unwrap_or(0.0) / max_recent;
            let f_co = co_scores.get(&n).copied().unwrap_or(0.0) / max_co;
            let score = params.alpha * f_total + params.beta * f_recent + params.gamma * f_co;
            ScoreEntry {
                number: n,
                score: round4(score),
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_rows() -> Vec<Vec<i64>> {
        vec![
            vec![1, 2, 3, 4, 5],
            vec![1, 2, 6, 7, 8],
            vec![3, 4, 9, 10, 11],
        ]
    }

    fn params(recent_n: usize, alpha: f64, beta: f64, gamma: f64) -> ScoreParams {
        ScoreParams {
            recent_n,
            alpha,
            beta,
            gamma,
        }
    }

    fn score_of(entries: &[ScoreEntry], n: i64) -> f64 {
        entries.iter().find(|e| e.number == n).unwrap().score
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let rows = scenario_rows();
        let total: f64 = frequency_distribution(&rows).values().sum();
        assert!((total - 1.0).abs() < 1e-10, "Sum = {}", total);

        let recent: f64 = frequency_distribution(recent_rows(&rows, 2)).values().sum();
        assert!((recent - 1.0).abs() < 1e-10, "Sum = {}", recent);
    }

    #[test]
    fn test_frequency_values() {
        let freq = frequency_distribution(&scenario_rows());
        assert!((freq[&1] - 2.0 / 15.0).abs() < 1e-12);
        assert!((freq[&10] - 1.0 / 15.0).abs() < 1e-12);
        assert!(!freq.contains_key(&12));
    }

    #[test]
    fn test_recent_rows_takes_tail() {
        let rows = scenario_rows();
        assert_eq!(recent_rows(&rows, 1), &rows[2..]);
        assert_eq!(recent_rows(&rows, 3).len(), 3);
        assert_eq!(recent_rows(&rows, 1000).len(), 3);
        assert!(recent_rows(&rows, 0).is_empty());
    }

    #[test]
    fn test_recent_window_clamp_matches_total() {
        let rows = scenario_rows();
        let total = frequency_distribution(&rows);
        let recent = frequency_distribution(recent_rows(&rows, 1000));
        assert_eq!(total, recent);
    }

    #[test]
    fn test_co_occurrence_counts() {
        let counts = co_occurrence_counts(&scenario_rows());
        assert_eq!(counts[&(1, 2)], 2);
        assert_eq!(counts[&(3, 4)], 2);
        assert_eq!(counts[&(9, 11)], 1);
        assert!(!counts.contains_key(&(1, 9)));
        // 3 rows x 10 pairs, 2 pairs seen twice
        assert_eq!(counts.values().sum::<u32>(), 30);
        assert_eq!(counts.len(), 28);
    }

    #[test]
    fn test_co_occurrence_pair_key_is_sorted() {
        let counts = co_occurrence_counts(&[vec![7, 3], vec![3, 7]]);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&(3, 7)], 2);
    }

    #[test]
    fn test_duplicate_values_collapse_into_self_pair() {
        let counts = co_occurrence_counts(&[vec![5, 5, 8]]);
        assert_eq!(counts[&(5, 5)], 1);
        assert_eq!(counts[&(5, 8)], 2);

        let scores = co_occurrence_scores(&counts, 10, 1);
        // (5,5) once plus (5,8) twice
        assert!((scores[&5] - 3.0).abs() < 1e-12);
        assert!((scores[&8] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_co_occurrence_scores_cover_range() {
        let rows = scenario_rows();
        let scores = co_occurrence_scores(&co_occurrence_counts(&rows), 12, rows.len());
        assert_eq!(scores.len(), 12);
        assert_eq!(scores.keys().next(), Some(&1));
        assert_eq!(scores.keys().last(), Some(&12));
        // 1 pairs with 2 twice and with 3,4,5,6,7,8 once
        assert!((scores[&1] - 8.0 / 3.0).abs() < 1e-12);
        assert_eq!(scores[&12], 0.0);
    }

    #[test]
    fn test_co_occurrence_scores_ignore_out_of_range() {
        let counts = co_occurrence_counts(&[vec![1, 60]]);
        let scores = co_occurrence_scores(&counts, 50, 1);
        assert!(!scores.contains_key(&60));
        assert!((scores[&1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scenario_frequent_numbers_rank_first() {
        let entries = score_rows(&scenario_rows(), 11, &params(3, 0.4, 0.4, 0.2));
        let s1 = score_of(&entries, 1);
        let s2 = score_of(&entries, 2);
        let s10 = score_of(&entries, 10);
        assert!(s1 > s10, "score(1)={} devrait être > score(10)={}", s1, s10);
        assert!(s2 > s10, "score(2)={} devrait être > score(10)={}", s2, s10);
        // 1 is the most frequent and the best connected, ties broken by number
        assert_eq!(entries[0].number, 1);
        assert!((entries[0].score - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_scenario_exact_scores() {
        let entries = score_rows(&scenario_rows(), 11, &params(3, 0.4, 0.4, 0.2));
        // freq 1/15 over max 2/15, co 4/3 over max 8/3
        assert!((score_of(&entries, 10) - 0.5).abs() < 1e-10);
        // 5: freq 1/15, co (1+1+1+1)/3 = 4/3
        assert!((score_of(&entries, 5) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_recent_n_beyond_table_is_full_table() {
        let rows = scenario_rows();
        let full = score_rows(&rows, 11, &params(3, 0.4, 0.4, 0.2));
        let clamped = score_rows(&rows, 11, &params(1000, 0.4, 0.4, 0.2));
        assert_eq!(full, clamped);
    }

    #[test]
    fn test_zero_weights_give_zero_scores() {
        let entries = score_rows(&scenario_rows(), 11, &params(3, 0.0, 0.0, 0.0));
        assert_eq!(entries.len(), 11);
        assert!(entries.iter().all(|e| e.score == 0.0));
    }

    #[test]
    fn test_weights_are_not_normalized() {
        let rows = scenario_rows();
        let unit = score_rows(&rows, 11, &params(3, 0.4, 0.4, 0.2));
        let doubled = score_rows(&rows, 11, &params(3, 0.8, 0.8, 0.4));
        assert!((score_of(&doubled, 1) - 2.0).abs() < 1e-10);
        for (a, b) in unit.iter().zip(&doubled) {
            assert_eq!(a.number, b.number);
            assert!((b.score - 2.0 * a.score).abs() < 2e-4);
        }
    }

    #[test]
    fn test_recent_window_shifts_scores() {
        let rows = scenario_rows();
        let entries = score_rows(&rows, 11, &params(1, 0.0, 1.0, 0.0));
        // only the last draw counts: 3,4,9,10,11 at 0.2 each
        assert!((score_of(&entries, 10) - 1.0).abs() < 1e-10);
        assert_eq!(score_of(&entries, 1), 0.0);
    }

    #[test]
    fn test_scores_sorted_descending() {
        let rows = vec![
            vec![5, 12, 23, 34, 45],
            vec![1, 12, 23, 40, 49],
            vec![7, 8, 23, 30, 31],
            vec![12, 14, 15, 16, 17],
        ];
        let entries = score_rows(&rows, 49, &ScoreParams::default());
        assert_eq!(entries.len(), 49);
        for w in entries.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    #[test]
    fn test_ties_keep_ascending_order() {
        let entries = score_rows(&scenario_rows(), 11, &params(3, 0.4, 0.4, 0.2));
        for w in entries.windows(2) {
            if w[0].score == w[1].score {
                assert!(w[0].number < w[1].number);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let rows = scenario_rows();
        let p = ScoreParams::default();
        assert_eq!(score_rows(&rows, 11, &p), score_rows(&rows, 11, &p));
    }

    #[test]
    fn test_candidates_from_frequencies_or_range() {
        let rows = vec![vec![1, 2], vec![2, 70]];
        let entries = score_rows(&rows, 5, &ScoreParams::default());
        let freq = frequency_distribution(&rows);
        for e in &entries {
            assert!((1..=5).contains(&e.number) || freq.contains_key(&e.number));
        }
        assert!(entries.iter().any(|e| e.number == 70));
        assert_eq!(entries.len(), 6);
    }

    #[test]
    fn test_empty_rows_give_zero_scores() {
        let rows: Vec<Vec<i64>> = vec![];
        let entries = score_rows(&rows, 10, &ScoreParams::default());
        assert_eq!(entries.len(), 10);
        assert!(entries.iter().all(|e| e.score == 0.0));
        let numbers: Vec<i64> = entries.iter().map(|e| e.number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_range_and_rows() {
        let rows: Vec<Vec<i64>> = vec![];
        assert!(score_rows(&rows, 0, &ScoreParams::default()).is_empty());
    }

    #[test]
    fn test_rounding_to_four_decimals() {
        let rows = vec![vec![1, 2, 3], vec![1, 4, 5], vec![1, 6, 7]];
        let entries = score_rows(&rows, 7, &params(3, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0));
        for e in &entries {
            let scaled = e.score * 10_000.0;
            assert!((scaled - scaled.round()).abs() < 1e-6, "{} non arrondi", e.score);
        }
    }

    #[test]
    fn test_round4_ties_to_even() {
        assert_eq!(round4(0.03125), 0.0312);
        assert_eq!(round4(0.96875), 0.9688);
        assert_eq!(round4(0.15625), 0.1562);
        assert_eq!(round4(0.5), 0.5);
        assert_eq!(round4(1.0 / 3.0), 0.3333);
        assert_eq!(round4(2.0 / 3.0), 0.6667);
    }

    #[test]
    fn test_half_way_score_rounds_to_even() {
        let mut rows = vec![vec![1, 2]];
        rows.extend(std::iter::repeat(vec![1, 3]).take(31));
        let entries = score_rows(&rows, 0, &params(100, 0.5, 0.5, 0.0));
        // 1/32 and 31/32 sit exactly between two 4-decimal values
        assert_eq!(score_of(&entries, 2), 0.0312);
        assert_eq!(score_of(&entries, 3), 0.9688);
        assert_eq!(score_of(&entries, 1), 1.0);
    }

    #[test]
    fn test_negative_values_are_scored() {
        let rows = vec![vec![-1, 2], vec![-1, 3]];
        let entries = score_rows(&rows, 3, &params(100, 1.0, 0.0, 0.0));
        assert_eq!(entries[0].number, -1);
        assert_eq!(entries[0].score, 1.0);
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_score_selects_columns() {
        let table = DrawTable::from_rows(
            ["Date", "N1", "N2", "E1"],
            vec![vec![20240101, 1, 2, 9], vec![20240105, 1, 3, 9]],
        )
        .unwrap();
        let entries = score(&table, &["N1", "N2"], 5, &ScoreParams::default()).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].number, 1);
        assert!(entries.iter().all(|e| e.number <= 5));
    }

    #[test]
    fn test_score_missing_column() {
        let table = DrawTable::new(["N1"]);
        assert!(score(&table, &["E1"], 12, &ScoreParams::default()).is_err());
    }
}
