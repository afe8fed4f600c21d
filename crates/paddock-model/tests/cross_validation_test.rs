//! End-to-end cross-validation over a score frame.

use paddock_model::{
    dataset_from_frame, evaluate_k_fold, evaluate_leave_one_race_out, k_fold, leave_one_race_out,
};
use polars::prelude::*;

const FACTORS: [&str; 4] = [
    "pace_score",
    "consistency_score",
    "qualifying_score",
    "racecraft_score",
];

fn factor_names() -> Vec<String> {
    FACTORS.iter().map(|s| s.to_string()).collect()
}

/// Two races, three drivers each, four factors. Finishing positions follow
/// a linear combination of the factors so a fit has signal to recover.
fn small_frame() -> DataFrame {
    let races: Vec<&str> = vec!["monaco", "monaco", "monaco", "monza", "monza", "monza"];
    let drivers: Vec<u32> = vec![1, 44, 16, 1, 44, 16];
    let pace = vec![90.0, 80.0, 70.0, 88.0, 78.0, 68.0];
    let consistency = vec![85.0, 75.0, 65.0, 83.0, 73.0, 63.0];
    let qualifying = vec![92.0, 70.0, 60.0, 90.0, 72.0, 62.0];
    let racecraft = vec![88.0, 77.0, 66.0, 86.0, 75.0, 64.0];
    let finish: Vec<f64> = vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0];

    DataFrame::new(vec![
        Series::new("driver_number".into(), drivers).into(),
        Series::new("race".into(), races).into(),
        Series::new("finish_position".into(), finish).into(),
        Series::new(FACTORS[0].into(), pace).into(),
        Series::new(FACTORS[1].into(), consistency).into(),
        Series::new(FACTORS[2].into(), qualifying).into(),
        Series::new(FACTORS[3].into(), racecraft).into(),
    ])
    .unwrap()
}

/// Same shape, eight drivers per race, enough records to fit four factors
/// inside every training partition.
fn large_frame() -> DataFrame {
    let n_drivers = 8usize;
    let mut races = Vec::new();
    let mut drivers = Vec::new();
    let mut pace = Vec::new();
    let mut consistency = Vec::new();
    let mut qualifying = Vec::new();
    let mut racecraft = Vec::new();
    let mut finish = Vec::new();

    for (race_idx, race) in ["monaco", "monza"].iter().enumerate() {
        for d in 0..n_drivers {
            let skill = 95.0 - 10.0 * d as f64 + 1.5 * race_idx as f64;
            let t = (race_idx * n_drivers + d) as f64;
            races.push(*race);
            drivers.push(d as u32 + 1);
            // Distinct perturbations keep the factor columns from being
            // linearly dependent on one another.
            pace.push(skill + 0.8 * (1.7 * t).sin());
            consistency.push(skill - 3.0 + 0.9 * (2.3 * t).cos());
            qualifying.push(skill + 2.0 + 0.7 * (3.1 * t).sin());
            racecraft.push(skill - 1.0 + 0.6 * (1.3 * t).cos());
            finish.push(d as f64 + 1.0);
        }
    }

    DataFrame::new(vec![
        Series::new("driver_number".into(), drivers).into(),
        Series::new("race".into(), races).into(),
        Series::new("finish_position".into(), finish).into(),
        Series::new(FACTORS[0].into(), pace).into(),
        Series::new(FACTORS[1].into(), consistency).into(),
        Series::new(FACTORS[2].into(), qualifying).into(),
        Series::new(FACTORS[3].into(), racecraft).into(),
    ])
    .unwrap()
}

#[test]
fn test_record_level_folds_mix_races() {
    let dataset = dataset_from_frame(&small_frame(), &factor_names()).unwrap();
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.dropped, 0);

    // Record-level folding ignores race boundaries, so for most seeds each
    // held-out partition draws from both races. Search for one such seed to
    // keep the demonstration deterministic.
    let mixing_seed = (0..100u64).find(|&seed| {
        let folds = k_fold(dataset.len(), 2, seed).unwrap();
        folds.iter().all(|fold| {
            let races: std::collections::HashSet<&str> =
                fold.test.iter().map(|&i| dataset.races[i].as_str()).collect();
            races.len() == 2
        })
    });
    let seed = mixing_seed.expect("some seed should mix races in both folds");

    let folds = k_fold(dataset.len(), 2, seed).unwrap();
    assert_eq!(folds.len(), 2);
    for fold in &folds {
        assert_eq!(fold.test.len(), 3);
        assert_eq!(fold.train.len(), 3);
    }

    // Exact partition: every record held out exactly once.
    let mut held_out: Vec<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
    held_out.sort_unstable();
    assert_eq!(held_out, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_leave_one_race_out_excludes_full_races() {
    let dataset = dataset_from_frame(&small_frame(), &factor_names()).unwrap();
    let folds = leave_one_race_out(&dataset.races).unwrap();

    assert_eq!(folds.len(), 2);
    for fold in &folds {
        assert_eq!(fold.test.len(), 3);
        assert_eq!(fold.train.len(), 3);
        // Held-out partition covers exactly one race, training the other.
        for &i in &fold.test {
            assert_eq!(dataset.races[i], fold.label);
        }
        for &i in &fold.train {
            assert_ne!(dataset.races[i], fold.label);
        }
    }
    assert_eq!(folds[0].label, "monaco");
    assert_eq!(folds[1].label, "monza");
}

#[test]
fn test_full_pipeline_k_fold_evaluation() {
    let dataset = dataset_from_frame(&large_frame(), &factor_names()).unwrap();
    assert_eq!(dataset.len(), 16);

    let summary = evaluate_k_fold(&dataset, 2, 42).unwrap();
    assert_eq!(summary.folds.len(), 2);
    assert!(summary.mean_train_r2 > 0.9);
    for fold in &summary.folds {
        assert!(fold.train_r2.is_finite());
        assert!(fold.test_r2.is_finite());
        assert!(fold.train_mae >= 0.0);
        assert!(fold.test_mae >= 0.0);
    }
}

#[test]
fn test_full_pipeline_race_grouped_evaluation() {
    let dataset = dataset_from_frame(&large_frame(), &factor_names()).unwrap();
    let summary = evaluate_leave_one_race_out(&dataset).unwrap();

    assert_eq!(summary.folds.len(), 2);
    // Finishing order is nearly identical across the two races, so a model
    // trained on one generalizes to the other.
    assert!(summary.mean_test_r2 > 0.8);
    assert!(summary.generalization_gap().is_finite());
}

#[test]
fn test_rows_without_finish_position_are_dropped() {
    let mut df = small_frame();
    let finish = Series::new(
        "finish_position".into(),
        vec![Some(1.0), Some(2.0), None, Some(1.0), Some(2.0), Some(3.0)],
    );
    df.with_column(finish).unwrap();

    let dataset = dataset_from_frame(&df, &factor_names()).unwrap();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.dropped, 1);
}
