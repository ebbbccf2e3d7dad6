//! Aggregate statistics over stored exam records.
//!
//! Backs the results listing: counts, mean scores, and mean pre-to-post gain.

use serde::{Deserialize, Serialize};

use crate::model::ExamRecord;

/// Summary of a collection of exam records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total examinees with a stored record.
    pub examinees: usize,
    /// Examinees with a nonzero post-test score. A score of 0 is
    /// indistinguishable from "not yet taken", so an all-wrong post-test
    /// counts as not completed here; that coarseness is inherent to the
    /// record shape.
    pub completed_posttest: usize,
    /// Mean pre-test score over all records.
    pub mean_pretest: f64,
    /// Mean post-test score over records with a nonzero post-test.
    pub mean_posttest: f64,
    /// Mean (post - pre) gain over records with a nonzero post-test.
    pub mean_gain: f64,
}

/// Compute summary statistics over a set of records.
pub fn summarize(records: &[ExamRecord]) -> Summary {
    let examinees = records.len();
    if examinees == 0 {
        return Summary {
            examinees: 0,
            completed_posttest: 0,
            mean_pretest: 0.0,
            mean_posttest: 0.0,
            mean_gain: 0.0,
        };
    }

    let mean_pretest =
        records.iter().map(|r| r.pretest_score as f64).sum::<f64>() / examinees as f64;

    let completed: Vec<&ExamRecord> =
        records.iter().filter(|r| r.posttest_score > 0).collect();
    let completed_posttest = completed.len();

    let (mean_posttest, mean_gain) = if completed.is_empty() {
        (0.0, 0.0)
    } else {
        let post_sum: f64 = completed.iter().map(|r| r.posttest_score as f64).sum();
        let gain_sum: f64 = completed
            .iter()
            .map(|r| r.posttest_score as f64 - r.pretest_score as f64)
            .sum();
        (
            post_sum / completed_posttest as f64,
            gain_sum / completed_posttest as f64,
        )
    };

    Summary {
        examinees,
        completed_posttest,
        mean_pretest,
        mean_posttest,
        mean_gain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, pre: u32, post: u32) -> ExamRecord {
        ExamRecord {
            name: name.into(),
            pretest_score: pre,
            posttest_score: post,
            timestamp: "2025-01-01 10:00:00".into(),
        }
    }

    #[test]
    fn empty_records() {
        let summary = summarize(&[]);
        assert_eq!(summary.examinees, 0);
        assert_eq!(summary.mean_pretest, 0.0);
        assert_eq!(summary.mean_gain, 0.0);
    }

    #[test]
    fn mixed_completion() {
        let records = vec![
            record("A", 40, 80),
            record("B", 60, 90),
            record("C", 50, 0), // abandoned before post-test
        ];
        let summary = summarize(&records);

        assert_eq!(summary.examinees, 3);
        assert_eq!(summary.completed_posttest, 2);
        assert!((summary.mean_pretest - 50.0).abs() < f64::EPSILON);
        assert!((summary.mean_posttest - 85.0).abs() < f64::EPSILON);
        assert!((summary.mean_gain - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_gain() {
        let records = vec![record("A", 90, 70)];
        let summary = summarize(&records);
        assert!((summary.mean_gain - (-20.0)).abs() < f64::EPSILON);
    }
}
