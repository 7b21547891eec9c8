//! Probabilistic reasoning over discrete Bayesian networks.
//!
//! A `BayesNet` is a set of discrete `Variable`s and one conditional probability table (a `Factor`)
//! per `Variable`. Queries of the form `P(query | evidence)` are answered exactly by variable
//! elimination or approximately by likelihood weighted sampling, and the tables themselves can be
//! learned from data by maximum likelihood.

pub mod config;
pub mod estimators;
pub mod factor;
pub mod inference;
pub mod init;
pub mod model;
pub mod samplers;
pub mod util;
pub mod variable;

pub use crate::config::{InferenceConfig, SamplingConfig};
pub use crate::estimators::{Estimator, LocalMLEstimator, ModelMLEstimator};
pub use crate::factor::{multiply_factors, normalize, Factor};
pub use crate::inference::{
    sample_bn, variable_elimination, ConditionalInferenceEngine, EliminationStrategy, ImportanceSamplingEngine,
    VariableEliminationEngine,
};
pub use crate::init::Initialization;
pub use crate::model::{BayesNet, BayesNetBuilder};
pub use crate::samplers::{LikelihoodWeightedSampler, WeightedSample, Weighting};
pub use crate::util::{BnetError, Result};
pub use crate::variable::{all_assignments, Assignment, Variable};
