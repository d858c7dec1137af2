use enginebench_common::BenchError;
use enginebench_runner::statistics::{drift_ratio, mean, median, summarize, trimmed_mean};

// --- median ---

#[test]
fn test_median_even_count_rounds_half_up() {
    // (2 + 3) / 2 = 2.5 → 3
    assert_eq!(median(&[1, 2, 3, 4]), Some(3));
    assert_eq!(median(&[4, 3, 2, 1]), Some(3));
    // (10 + 20) / 2 = 15 exactly
    assert_eq!(median(&[20, 10]), Some(15));
}

#[test]
fn test_median_odd_count_is_central_element() {
    assert_eq!(median(&[3]), Some(3));
    assert_eq!(median(&[5, 1, 3]), Some(3));
}

#[test]
fn test_median_is_order_independent() {
    let samples = vec![12, 7, 30, 7, 101, 4, 55, 18];
    // sorted: [4, 7, 7, 12, 18, 30, 55, 101] → (12 + 18) / 2 = 15
    let expected = Some(15);

    let mut reversed = samples.clone();
    reversed.reverse();
    assert_eq!(median(&samples), expected);
    assert_eq!(median(&reversed), expected);

    for shift in 0..samples.len() {
        let mut rotated = samples.clone();
        rotated.rotate_left(shift);
        assert_eq!(median(&rotated), expected, "rotation by {shift}");
    }
}

#[test]
fn test_median_of_nothing_is_none() {
    assert_eq!(median(&[]), None);
}

// --- mean ---

#[test]
fn test_mean_rounds_half_up() {
    assert_eq!(mean(&[5, 5, 5, 5]), Some(5));
    assert_eq!(mean(&[1, 2]), Some(2));
    // 5 / 3 = 1.67 → 2
    assert_eq!(mean(&[1, 2, 2]), Some(2));
    // 4 / 3 = 1.33 → 1
    assert_eq!(mean(&[1, 1, 2]), Some(1));
    assert_eq!(mean(&[]), None);
}

// --- trimmed mean ---

#[test]
fn test_trimmed_mean_below_four_samples_equals_median() {
    for samples in [vec![42], vec![2, 9], vec![10, 1, 7], vec![100, 1, 1]] {
        assert_eq!(trimmed_mean(&samples), median(&samples), "samples {samples:?}");
    }
}

#[test]
fn test_trimmed_mean_discards_outer_quartiles() {
    // n = 8: drop 2 lowest and 2 highest → [3, 4, 5, 6] → 4.5 → 5
    assert_eq!(trimmed_mean(&[1000, 1, 7, 2, 6, 3, 5, 4]), Some(5));
    // n = 4: drop 1 each side → [20, 30] → 25
    assert_eq!(trimmed_mean(&[10, 20, 30, 900]), Some(25));
}

#[test]
fn test_trimmed_mean_resists_outliers() {
    let mut samples = vec![50; 16];
    samples[3] = 5_000;
    samples[11] = 1;
    assert_eq!(trimmed_mean(&samples), Some(50));
}

// --- drift ratio ---

#[test]
fn test_drift_ratio_of_constant_samples_is_one() {
    assert_eq!(drift_ratio(&[100; 10]), Some(1.0));
}

#[test]
fn test_drift_ratio_of_single_sample_is_one() {
    assert_eq!(drift_ratio(&[37]), Some(1.0));
}

#[test]
fn test_drift_ratio_detects_slowdown_and_warmup() {
    let slowdown = [10, 10, 10, 10, 40, 40, 40, 40];
    assert_eq!(drift_ratio(&slowdown), Some(4.0));

    let mut warmup = slowdown;
    warmup.reverse();
    assert_eq!(drift_ratio(&warmup), Some(0.25));
}

#[test]
fn test_drift_ratio_rounds_to_hundredths() {
    // window = 1: 10 / 3 = 3.333… → 3.33
    assert_eq!(drift_ratio(&[3, 10]), Some(3.33));
}

#[test]
fn test_drift_ratio_window_is_capped_at_eight() {
    let mut samples = vec![100; 8];
    samples.extend(vec![1_000; 24]);
    samples.extend(vec![100; 8]);
    assert_eq!(drift_ratio(&samples), Some(1.0));
}

#[test]
fn test_drift_ratio_zero_early_slice_is_undefined() {
    assert_eq!(drift_ratio(&[0, 0, 5, 5]), None);
    assert_eq!(drift_ratio(&[0]), None);
    assert_eq!(drift_ratio(&[]), None);
}

// --- summarize ---

#[test]
fn test_summarize_empty_is_no_data() {
    assert_eq!(summarize(&[]), Err(BenchError::NoData));
}

#[test]
fn test_summarize_single_sample() {
    let s = summarize(&[42]).unwrap();
    assert_eq!(s.median, 42);
    assert_eq!(s.mean, 42);
    assert_eq!(s.max, 42);
    assert_eq!(s.trimmed_mean, 42);
    assert_eq!(s.top10, 42);
    assert_eq!(s.bottom10, 42);
    assert_eq!(s.drift_ratio, Some(1.0));
    assert_eq!(s.samples, 1);
}

#[test]
fn test_summarize_deciles() {
    // 1..=20 shuffled; decile = 2 samples
    let samples: Vec<u64> = (1..=20).rev().collect();
    let s = summarize(&samples).unwrap();
    assert_eq!(s.top10, 2); // [1, 2] → 1.5 → 2
    assert_eq!(s.bottom10, 20); // [19, 20] → 19.5 → 20
    assert_eq!(s.max, 20);
    assert_eq!(s.samples, 20);
    // [6..=15] → 10.5 → 11
    assert_eq!(s.trimmed_mean, 11);
}

#[test]
fn test_summarize_small_bucket_deciles_use_one_sample() {
    let s = summarize(&[4, 8, 6]).unwrap();
    assert_eq!(s.top10, 4);
    assert_eq!(s.bottom10, 8);
}

#[test]
fn test_summarize_uses_arrival_order_for_drift_only() {
    let arrival = [10, 10, 10, 10, 40, 40, 40, 40];
    let mut reversed = arrival;
    reversed.reverse();

    let a = summarize(&arrival).unwrap();
    let b = summarize(&reversed).unwrap();

    assert_eq!(a.drift_ratio, Some(4.0));
    assert_eq!(b.drift_ratio, Some(0.25));
    assert_eq!((a.median, a.mean, a.trimmed_mean, a.max), (b.median, b.mean, b.trimmed_mean, b.max));
}

#[test]
fn test_summarize_keeps_undefined_drift_without_failing() {
    let s = summarize(&[0, 0, 5, 5]).unwrap();
    assert_eq!(s.drift_ratio, None);
    assert_eq!(s.max, 5);
}
