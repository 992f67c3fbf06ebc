//! Latent Dirichlet Allocation fitted with batch variational Bayes.
//!
//! Every pass runs the per-document E-step over the whole corpus, then
//! replaces the topic-word parameters (`lambda`) with `eta + sufficient stats`.
//! The only randomness is the initial `lambda`, drawn from Gamma(100, 1/100)
//! with an explicitly seeded RNG, so equal input and seed give equal output.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use crate::pipeline::corpus::{BowVector, TermId};

/// Sparse topic → probability mapping, sorted by topic.
pub type TopicDistribution = Vec<(usize, f64)>;

/// Topics below this probability are omitted from inferred distributions.
pub const MINIMUM_PROBABILITY: f64 = 0.01;

const MAX_ITERATIONS: usize = 50;
const GAMMA_THRESHOLD: f64 = 0.001;
const PHI_EPSILON: f64 = 1e-100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdaParams {
    pub num_topics: usize,
    pub passes: usize,
    pub seed: u64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            num_topics: 3,
            passes: 10,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicModel {
    num_topics: usize,
    num_terms: usize,
    alpha: f64,
    eta: f64,
    /// Variational topic-word parameters, `num_topics × num_terms`.
    lambda: Vec<Vec<f64>>,
    /// `exp(E[log beta])`, cached from `lambda`.
    exp_elog_beta: Vec<Vec<f64>>,
}

impl TopicModel {
    pub fn fit(corpus: &[BowVector], num_terms: usize, params: &LdaParams) -> Self {
        let num_topics = params.num_topics.max(1);
        let prior = 1.0 / num_topics as f64;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let init = Gamma::new(100.0, 1.0 / 100.0).expect("valid gamma parameters");
        let lambda = (0..num_topics)
            .map(|_| (0..num_terms).map(|_| init.sample(&mut rng)).collect())
            .collect();

        let mut model = Self {
            num_topics,
            num_terms,
            alpha: prior,
            eta: prior,
            lambda,
            exp_elog_beta: Vec::new(),
        };
        model.refresh_beta();

        for _ in 0..params.passes {
            let mut sstats = vec![vec![0.0; num_terms]; num_topics];
            for doc in corpus {
                model.e_step(doc, Some(&mut sstats));
            }
            model.m_step(sstats);
        }

        model
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Projects a bag-of-words vector (built from the same vocabulary the
    /// model was fitted on) into a sparse topic distribution.
    pub fn infer(&self, doc: &BowVector) -> TopicDistribution {
        let gamma = self.e_step(doc, None);
        let total: f64 = gamma.iter().sum();
        gamma
            .into_iter()
            .map(|g| g / total)
            .enumerate()
            .filter(|&(_, p)| p >= MINIMUM_PROBABILITY)
            .collect()
    }

    /// Highest-weight terms of one topic with their normalised weights.
    pub fn top_terms(&self, topic: usize, n: usize) -> Vec<(TermId, f64)> {
        let Some(row) = self.lambda.get(topic) else {
            return Vec::new();
        };
        let total: f64 = row.iter().sum();
        let mut weighted: Vec<(TermId, f64)> = row
            .iter()
            .enumerate()
            .map(|(id, w)| (id as TermId, w / total))
            .collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        weighted.truncate(n);
        weighted
    }

    /// Variational E-step for one document. Returns `gamma`; when `sstats` is
    /// given, accumulates this document's contribution to the topic-word
    /// statistics (before scaling by `exp_elog_beta`).
    fn e_step(&self, doc: &BowVector, sstats: Option<&mut Vec<Vec<f64>>>) -> Vec<f64> {
        let (ids, counts): (Vec<usize>, Vec<f64>) = doc
            .iter()
            .map(|&(id, count)| (id as usize, count as f64))
            .filter(|&(id, _)| id < self.num_terms)
            .unzip();

        if ids.is_empty() {
            return vec![self.alpha; self.num_topics];
        }

        let total: f64 = counts.iter().sum();
        let mut gamma = vec![self.alpha + total / self.num_topics as f64; self.num_topics];
        let mut exp_elog_theta = dirichlet_expectation_exp(&gamma);

        let beta_d: Vec<Vec<f64>> = self
            .exp_elog_beta
            .iter()
            .map(|row| ids.iter().map(|&id| row[id]).collect())
            .collect();
        let mut phinorm = self.phinorm(&exp_elog_theta, &beta_d);

        for _ in 0..MAX_ITERATIONS {
            let last = gamma.clone();
            for (k, g) in gamma.iter_mut().enumerate() {
                let weighted: f64 = counts
                    .iter()
                    .zip(&phinorm)
                    .zip(&beta_d[k])
                    .map(|((c, p), b)| c / p * b)
                    .sum();
                *g = self.alpha + exp_elog_theta[k] * weighted;
            }
            exp_elog_theta = dirichlet_expectation_exp(&gamma);
            phinorm = self.phinorm(&exp_elog_theta, &beta_d);

            let mean_change = gamma
                .iter()
                .zip(&last)
                .map(|(a, b)| (a - b).abs())
                .sum::<f64>()
                / self.num_topics as f64;
            if mean_change < GAMMA_THRESHOLD {
                break;
            }
        }

        if let Some(sstats) = sstats {
            for (k, row) in sstats.iter_mut().enumerate() {
                for (i, &id) in ids.iter().enumerate() {
                    row[id] += exp_elog_theta[k] * counts[i] / phinorm[i];
                }
            }
        }

        gamma
    }

    fn m_step(&mut self, mut sstats: Vec<Vec<f64>>) {
        for (row, beta_row) in sstats.iter_mut().zip(&self.exp_elog_beta) {
            for (s, b) in row.iter_mut().zip(beta_row) {
                *s = self.eta + *s * b;
            }
        }
        self.lambda = sstats;
        self.refresh_beta();
    }

    fn phinorm(&self, exp_elog_theta: &[f64], beta_d: &[Vec<f64>]) -> Vec<f64> {
        let words = beta_d.first().map_or(0, Vec::len);
        (0..words)
            .map(|i| {
                exp_elog_theta
                    .iter()
                    .zip(beta_d)
                    .map(|(t, row)| t * row[i])
                    .sum::<f64>()
                    + PHI_EPSILON
            })
            .collect()
    }

    fn refresh_beta(&mut self) {
        self.exp_elog_beta = self
            .lambda
            .iter()
            .map(|row| dirichlet_expectation_exp(row))
            .collect();
    }
}

/// `exp(E[log x])` for `x ~ Dirichlet(params)`.
fn dirichlet_expectation_exp(params: &[f64]) -> Vec<f64> {
    let psi_sum = digamma(params.iter().sum());
    params
        .iter()
        .map(|&a| (digamma(a) - psi_sum).exp())
        .collect()
}

/// Digamma via upward recurrence and the asymptotic series. Only defined for
/// positive arguments, which is all variational parameters ever are.
fn digamma(mut x: f64) -> f64 {
    if x <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let mut result = 0.0;
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln()
        - 0.5 * inv
        - inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::scorer::densify;

    /// Two clearly separated themes over a 10-term vocabulary.
    fn toy_corpus() -> Vec<BowVector> {
        vec![
            vec![(0, 3), (1, 2), (2, 1), (3, 2)],
            vec![(0, 1), (1, 3), (3, 1), (4, 2)],
            vec![(5, 2), (6, 3), (7, 1), (8, 2)],
            vec![(6, 1), (7, 2), (8, 1), (9, 3)],
            vec![(2, 1), (4, 1), (9, 1)],
        ]
    }

    fn assert_valid_distribution(dist: &TopicDistribution, num_topics: usize) {
        assert!(!dist.is_empty());
        assert!(dist.len() <= num_topics);
        let sum: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!(sum <= 1.0 + 1e-9, "sum {sum} exceeds 1");
        assert!(
            sum >= 1.0 - MINIMUM_PROBABILITY * num_topics as f64,
            "sum {sum} too small"
        );
        for &(topic, p) in dist {
            assert!(topic < num_topics);
            assert!(p >= MINIMUM_PROBABILITY && p <= 1.0);
        }
        let dense = densify(dist, num_topics);
        assert_eq!(dense.len(), num_topics);
        assert!(dense.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_digamma_known_values() {
        assert!((digamma(1.0) + 0.577_215_664_901_532_9).abs() < 1e-10);
        assert!((digamma(0.5) + 1.963_510_026_021_423_5).abs() < 1e-10);
        assert!((digamma(10.0) - 2.251_752_589_066_721).abs() < 1e-10);
    }

    #[test]
    fn test_inferred_distributions_are_valid() {
        let corpus = toy_corpus();
        let params = LdaParams::default();
        let model = TopicModel::fit(&corpus, 10, &params);
        assert_eq!(model.num_topics(), 3);
        for doc in &corpus {
            assert_valid_distribution(&model.infer(doc), params.num_topics);
        }
    }

    #[test]
    fn test_fit_is_deterministic_for_fixed_seed() {
        let corpus = toy_corpus();
        let params = LdaParams::default();
        let a = TopicModel::fit(&corpus, 10, &params);
        let b = TopicModel::fit(&corpus, 10, &params);
        for doc in &corpus {
            assert_eq!(a.infer(doc), b.infer(doc));
        }
    }

    #[test]
    fn test_empty_document_infers_uniform() {
        let model = TopicModel::fit(&toy_corpus(), 10, &LdaParams::default());
        let dist = model.infer(&vec![]);
        assert_eq!(dist.len(), 3);
        for (_, p) in dist {
            assert!((p - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_out_of_vocabulary_ids_are_ignored() {
        let model = TopicModel::fit(&toy_corpus(), 10, &LdaParams::default());
        assert_eq!(model.infer(&vec![(42, 5)]), model.infer(&vec![]));
    }

    #[test]
    fn test_respects_topic_count() {
        let params = LdaParams {
            num_topics: 5,
            passes: 3,
            seed: 7,
        };
        let model = TopicModel::fit(&toy_corpus(), 10, &params);
        for doc in &toy_corpus() {
            assert_valid_distribution(&model.infer(doc), 5);
        }
    }

    #[test]
    fn test_top_terms_sorted_and_truncated() {
        let model = TopicModel::fit(&toy_corpus(), 10, &LdaParams::default());
        let top = model.top_terms(0, 4);
        assert_eq!(top.len(), 4);
        for pair in top.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        assert!(model.top_terms(99, 4).is_empty());
    }

    #[test]
    fn test_single_document_corpus() {
        let corpus = vec![vec![(0, 2), (1, 1)]];
        let model = TopicModel::fit(&corpus, 2, &LdaParams::default());
        assert_valid_distribution(&model.infer(&corpus[0]), 3);
    }
}
