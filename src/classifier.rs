//! KNN classifier over the iris dataset.
//!
//! Trained once at startup: the dataset is shuffled with a fixed seed,
//! split 70/30, and the training partition is kept in memory. Inference
//! is a k-nearest majority vote under L2 distance via a linfa-nn
//! BallTree. The model is never mutated after `fit` returns.

use anyhow::{anyhow, Result};
use linfa::prelude::*;
use linfa_nn::{distance::L2Dist, CommonNearestNeighbour, NearestNeighbour};
use ndarray::{aview1, Array1, Array2, ArrayView1};
use rand::{rngs::StdRng, SeedableRng};

/// Species names in the dataset's class-index order.
pub const SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Sepal length/width and petal length/width, in centimeters.
pub const FEATURE_COUNT: usize = 4;

const SPLIT_SEED: u64 = 42;
const TRAIN_RATIO: f32 = 0.7;

pub struct TrainedModel {
    train_records: Array2<f64>,
    train_labels: Array1<usize>,
    k: usize,
    accuracy: f64,
}

impl TrainedModel {
    /// Loads the iris dataset, fits a k-neighbor classifier on a seeded
    /// 70/30 split, and scores it on the held-out partition.
    pub fn fit(k: usize) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
        let (train, test) = linfa_datasets::iris()
            .shuffle(&mut rng)
            .split_with_ratio(TRAIN_RATIO);

        let model = TrainedModel {
            train_records: train.records().to_owned(),
            train_labels: train.targets().to_owned(),
            k,
            accuracy: 0.0,
        };

        let mut correct = 0usize;
        let mut total = 0usize;
        for (row, &label) in test.records().outer_iter().zip(test.targets().iter()) {
            if model.classify(row)? == label {
                correct += 1;
            }
            total += 1;
        }
        let accuracy = correct as f64 / total as f64;

        Ok(TrainedModel { accuracy, ..model })
    }

    /// Fraction of held-out samples classified correctly.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Predicts the species name for one sample of four measurements.
    /// Non-finite measurements are rejected up front: they have no
    /// meaningful distance to the training samples.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<&'static str> {
        if !features.iter().all(|v| v.is_finite()) {
            return Err(anyhow!("measurements must be finite numbers"));
        }
        let class = self.classify(aview1(features))?;
        SPECIES
            .get(class)
            .copied()
            .ok_or_else(|| anyhow!("classifier produced unknown class index {class}"))
    }

    /// Majority vote among the k nearest training samples. Ties resolve
    /// to the lowest class index, so predictions are deterministic.
    fn classify(&self, features: ArrayView1<f64>) -> Result<usize> {
        let index = CommonNearestNeighbour::BallTree
            .from_batch(&self.train_records, L2Dist)
            .map_err(|e| anyhow!("failed to build neighbour index: {e}"))?;
        let neighbours = index
            .k_nearest(features, self.k)
            .map_err(|e| anyhow!("nearest-neighbour lookup failed: {e}"))?;

        let mut votes = [0usize; SPECIES.len()];
        for (_, position) in neighbours {
            votes[self.train_labels[position]] += 1;
        }

        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL_SETOSA: [f64; 4] = [5.1, 3.5, 1.4, 0.2];

    #[test]
    fn held_out_accuracy_is_high() {
        let model = TrainedModel::fit(5).unwrap();
        assert!(
            model.accuracy() > 0.8,
            "accuracy unexpectedly low: {}",
            model.accuracy()
        );
    }

    #[test]
    fn refitting_is_deterministic() {
        let first = TrainedModel::fit(5).unwrap();
        let second = TrainedModel::fit(5).unwrap();
        assert_eq!(first.accuracy(), second.accuracy());
        assert_eq!(
            first.predict(&CANONICAL_SETOSA).unwrap(),
            second.predict(&CANONICAL_SETOSA).unwrap()
        );
    }

    #[test]
    fn canonical_sample_is_setosa() {
        let model = TrainedModel::fit(5).unwrap();
        assert_eq!(model.predict(&CANONICAL_SETOSA).unwrap(), "setosa");
    }

    #[test]
    fn predictions_are_known_species() {
        let model = TrainedModel::fit(5).unwrap();
        let samples = [
            [5.1, 3.5, 1.4, 0.2],
            [5.7, 2.8, 4.1, 1.3],
            [7.7, 3.8, 6.7, 2.2],
            [6.0, 3.0, 4.0, 1.5],
        ];
        for sample in &samples {
            let species = model.predict(sample).unwrap();
            assert!(SPECIES.contains(&species), "unexpected species {species}");
        }
    }

    #[test]
    fn non_finite_measurements_are_rejected() {
        let model = TrainedModel::fit(5).unwrap();
        assert!(model.predict(&[f64::INFINITY, 3.5, 1.4, 0.2]).is_err());
        assert!(model.predict(&[5.1, f64::NEG_INFINITY, 1.4, 0.2]).is_err());
        assert!(model.predict(&[5.1, 3.5, f64::NAN, 0.2]).is_err());
    }

    #[test]
    fn clear_cut_samples_get_their_species() {
        let model = TrainedModel::fit(5).unwrap();
        // Rows taken straight from the dataset, well inside their clusters.
        assert_eq!(model.predict(&[4.9, 3.0, 1.4, 0.2]).unwrap(), "setosa");
        assert_eq!(model.predict(&[7.7, 3.8, 6.7, 2.2]).unwrap(), "virginica");
    }
}
