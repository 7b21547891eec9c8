//! Defines the interface to inference engines

use crate::config::SamplingConfig;
use crate::model::BayesNet;
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

mod importance_sampling;
mod ordering;
mod variable_elimination;

pub use self::importance_sampling::ImportanceSamplingEngine;
pub use self::ordering::{elimination_order, EliminationStrategy};
pub use self::variable_elimination::VariableEliminationEngine;


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the form:
///     ```P(Q | E = e)```
///
/// `ConditionalInferenceEngine`s are stateful and must take the evidence `e` as an argument to whatever
/// construction mechanism they employ.
pub trait ConditionalInferenceEngine {

    /// Infer the distribution ```P(query | evidence)```.
    ///
    /// # Returns
    /// one probability per value of `query`, in the order of its domain. If the evidence is
    /// impossible, every entry is zero.
    fn infer(&mut self, query: &Variable) -> Result<Vec<f64>>;

}


/// Compute ```P(query | evidence)``` exactly, by variable elimination.
///
/// # Args
/// * `net`: the network to query
/// * `query`: the `Variable` whose distribution is computed
/// * `evidence_vars`: the evidence `Variable`s
/// * `observed`: the observed value of every evidence `Variable`; values of other `Variable`s are
///   ignored
///
/// # Errors
/// * `BnetError::MissingEvidence`, if an evidence `Variable` has no observed value
/// * any error of `VariableEliminationEngine`
pub fn variable_elimination(
    net: &BayesNet,
    query: &Variable,
    evidence_vars: &[Variable],
    observed: &Assignment,
) -> Result<Vec<f64>> {
    let evidence = collect_evidence(evidence_vars, observed)?;
    VariableEliminationEngine::new(net, &evidence)?.infer(query)
}


/// Estimate ```P(query | evidence)``` by likelihood weighting with `samples` samples.
///
/// Arguments and errors are as for `variable_elimination`. Each call draws fresh entropy, so two
/// calls generally return different estimates.
pub fn sample_bn(
    net: &BayesNet,
    query: &Variable,
    evidence_vars: &[Variable],
    observed: &Assignment,
    samples: usize,
) -> Result<Vec<f64>> {
    let evidence = collect_evidence(evidence_vars, observed)?;
    let config = SamplingConfig { samples, ..SamplingConfig::default() };

    ImportanceSamplingEngine::new(net, &evidence).with_config(config).infer(query)
}


/// The observed values of exactly the evidence `Variable`s
fn collect_evidence(evidence_vars: &[Variable], observed: &Assignment) -> Result<Assignment> {
    let mut evidence = Assignment::new();
    for v in evidence_vars.iter() {
        let idx = observed.get(v).ok_or_else(|| BnetError::MissingEvidence(String::from(v.name())))?;
        evidence.insert(v, idx);
    }

    Ok(evidence)
}
