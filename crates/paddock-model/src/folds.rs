//! Cross-validation fold construction.
//!
//! Two regimes: seeded random k-fold over records, and leave-one-group-out
//! keyed by race. Fold assignment is pure bookkeeping over indices; the
//! evaluator slices the design matrix with them afterwards.

use crate::error::ModelError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Default fold count for k-fold cross-validation.
pub const DEFAULT_K: usize = 5;

/// One held-out partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Label for report output ("fold 1", or the held-out race name).
    pub label: String,
    /// Record indices trained on.
    pub train: Vec<usize>,
    /// Record indices evaluated on.
    pub test: Vec<usize>,
}

/// Partition `n` record indices into `k` shuffled folds.
///
/// Deterministic for a given `seed`: the same seed and `n` always produce
/// the same assignment, keeping audits repeatable. Fold sizes differ by at
/// most one; the first `n mod k` folds take the extra record.
pub fn k_fold(n: usize, k: usize, seed: u64) -> Result<Vec<Fold>, ModelError> {
    if k < 2 {
        return Err(ModelError::InvalidFolds(format!(
            "k must be at least 2, got {k}"
        )));
    }
    if n < k {
        return Err(ModelError::InvalidFolds(format!(
            "cannot split {n} records into {k} folds"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let base = n / k;
    let extra = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut cursor = 0;
    for fold_index in 0..k {
        let size = base + usize::from(fold_index < extra);
        let test: Vec<usize> = indices[cursor..cursor + size].to_vec();
        cursor += size;

        let train: Vec<usize> = indices[..cursor - size]
            .iter()
            .chain(&indices[cursor..])
            .copied()
            .collect();

        folds.push(Fold {
            label: format!("fold {}", fold_index + 1),
            train,
            test,
        });
    }

    Ok(folds)
}

/// One fold per distinct race: train on every other race, hold the race out.
///
/// Races are held out in sorted order so fold numbering is reproducible.
pub fn leave_one_race_out(races: &[String]) -> Result<Vec<Fold>, ModelError> {
    let mut distinct: Vec<&String> = races.iter().collect();
    distinct.sort();
    distinct.dedup();

    if distinct.len() < 2 {
        return Err(ModelError::InvalidFolds(format!(
            "leave-one-race-out needs at least 2 races, got {}",
            distinct.len()
        )));
    }

    let folds = distinct
        .into_iter()
        .map(|held_out| {
            let (test, train) = (0..races.len()).partition(|&i| &races[i] == held_out);
            Fold {
                label: held_out.clone(),
                train,
                test,
            }
        })
        .collect();

    Ok(folds)
}
