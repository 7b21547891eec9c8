//! Defines an importance-sampling `ConditionalInferenceEngine` for approximate inference using
//! particle-based approximations.
//!
//! Implementation of Importance Sampling via Normalized Likelihood Weighting, described in Koller &
//! Friedman 12.2.3.3

use super::ConditionalInferenceEngine;
use crate::config::SamplingConfig;
use crate::model::BayesNet;
use crate::samplers::{LikelihoodWeightedSampler, WeightedSample};
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// A `ConditionalInferenceEngine` for Bayesian Models using Importance Sampling
pub struct ImportanceSamplingEngine<'a> {

    /// The model over which to perform inference
    model: &'a BayesNet,

    /// The evidence on which to condition
    evidence: &'a Assignment,

    /// The number of samples to use and how to weight them
    config: SamplingConfig,

    /// The source of randomness, owned by this engine
    rng: StdRng
}

impl<'a> ImportanceSamplingEngine<'a> {

    /// Construct an engine with the default `SamplingConfig` and an entropy-seeded generator
    pub fn new(model: &'a BayesNet, evidence: &'a Assignment) -> Self {
        ImportanceSamplingEngine {
            model,
            evidence,
            config: SamplingConfig::default(),
            rng: StdRng::from_entropy()
        }
    }

    /// Use the given sampling configuration. A configured seed makes the engine reproducible.
    pub fn with_config(mut self, config: SamplingConfig) -> Self {
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.config = config;
        self
    }

}

impl<'a> ConditionalInferenceEngine for ImportanceSamplingEngine<'a> {

    fn infer(&mut self, query: &Variable) -> Result<Vec<f64>> {
        // check input arguments
        if !self.model.contains(query) {
            return Err(BnetError::UnknownVariable(String::from(query.name())));
        }

        let sampler = LikelihoodWeightedSampler::new(self.model, self.evidence, self.config.weighting)?;

        // one bucket per value of the query
        let mut buckets = vec![0.0; query.cardinality()];
        let mut total = 0.0;

        // sample away...
        for _ in 0..self.config.samples {
            let WeightedSample(a, w) = sampler.weighted_sample(&mut self.rng)?;
            if w == 0.0 {
                continue;
            }

            let idx = a.get(query).ok_or_else(|| BnetError::IncompleteAssignment {
                factor: String::from("likelihood weighted sample"),
                variable: String::from(query.name())
            })?;

            buckets[idx] += w;
            total += w;
        }

        debug!(query = query.name(), samples = self.config.samples, total_weight = total, "likelihood weighting");

        if total == 0.0 {
            warn!(query = query.name(), "every sample had zero weight");
            return Ok(vec![0.0; buckets.len()]);
        }

        Ok(buckets.into_iter().map(|b| b / total).collect())
    }

}
