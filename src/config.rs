//! Configuration of the inference engines.
//!
//! Every field has a default, so a partially specified document deserializes into a complete
//! configuration:
//!
//! ```
//! # use bnet::config::InferenceConfig;
//! # use bnet::inference::EliminationStrategy;
//! let config: InferenceConfig = serde_json::from_str(r#"{ "elimination": "min_fill" }"#).unwrap();
//! assert_eq!(config.elimination, EliminationStrategy::MinFill);
//! assert_eq!(config.sampling.samples, 1000);
//! ```

use crate::inference::EliminationStrategy;
use crate::samplers::Weighting;

use serde::{Deserialize, Serialize};

/// The default number of likelihood weighted samples drawn per query
pub const DEFAULT_SAMPLES: usize = 1000;


#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {

    /// Heuristic used to order eliminations in exact inference
    pub elimination: EliminationStrategy,

    /// Settings for approximate inference
    pub sampling: SamplingConfig

}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {

    /// The number of samples to draw per query
    pub samples: usize,

    /// How evidence enters the sample weights
    pub weighting: Weighting,

    /// Seed of the random number generator. Without a seed, every engine draws fresh entropy and
    /// independent runs differ.
    pub seed: Option<u64>

}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            samples: DEFAULT_SAMPLES,
            weighting: Weighting::default(),
            seed: None
        }
    }
}
