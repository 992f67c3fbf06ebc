//! Resume-vs-job relevance score on a 0–10 scale.

use crate::pipeline::lda::TopicDistribution;

/// Baseline the raw score is standardised against. These are fixed
/// compatibility constants, not fitted values.
// TODO: calibrate MEAN/SD against labelled resume/job pairs once available.
const BASELINE_MEAN: f64 = 0.5;
const BASELINE_SD: f64 = 0.1;
const MIDPOINT: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;

/// Expands a sparse topic distribution to a dense vector of `num_topics`.
/// Topic ids outside the range are ignored.
pub fn densify(dist: &TopicDistribution, num_topics: usize) -> Vec<f64> {
    let mut dense = vec![0.0; num_topics];
    for &(topic, prob) in dist {
        if let Some(slot) = dense.get_mut(topic) {
            *slot = prob;
        }
    }
    dense
}

/// Scores a resume against a job requirement.
///
/// `km` is the cosine similarity of the two topic vectors (the raw dot product
/// when either norm is zero), weighted by the resume's dominant topic
/// probability, then mapped through `5 + (x - 0.5) / 0.1` and clamped to [0, 10].
pub fn score(resume: &TopicDistribution, job: &TopicDistribution, num_topics: usize) -> f64 {
    let resume_vec = densify(resume, num_topics);
    let job_vec = densify(job, num_topics);

    let dot: f64 = resume_vec.iter().zip(&job_vec).map(|(r, j)| r * j).sum();
    let norm_product = norm(&resume_vec) * norm(&job_vec);
    let denominator = if norm_product != 0.0 { norm_product } else { 1.0 };
    let km = dot / denominator;

    let wm = resume_vec.iter().copied().fold(0.0_f64, f64::max);

    let z = (km * wm - BASELINE_MEAN) / BASELINE_SD;
    (MIDPOINT + z).clamp(0.0, MAX_SCORE)
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
