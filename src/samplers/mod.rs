//! Defines samplers that randomly draw full assignments from a `BayesNet`.

use crate::variable::Assignment;

use serde::{Deserialize, Serialize};

pub mod likelihood;

pub use self::likelihood::LikelihoodWeightedSampler;


/// A sample (a full assignment) and the associated weight.
/// Used for likelihood weighting.
#[derive(Clone, Debug)]
pub struct WeightedSample(pub Assignment, pub f64);


/// How the weight of a likelihood weighted sample accounts for the evidence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {

    /// Multiply the weight by the value, at the observed value, of every `Factor` whose scope is
    /// exactly one evidence `Variable`. Evidence `Variable`s with parents contribute nothing, so
    /// the estimate is exact only when every evidence `Variable` is a root of the network.
    PriorOnly,

    /// Multiply the weight by each evidence `Variable`'s CPT value given its sampled parents
    /// (Koller & Friedman Algorithm 12.2)
    Full

}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::PriorOnly
    }
}
