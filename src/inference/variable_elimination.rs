//! Defines a `ConditionalInferenceEngine` that uses exact inference by variable elimination to
//! answer conditional inference queries.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE

use super::ordering::{elimination_order, EliminationStrategy};
use super::ConditionalInferenceEngine;
use crate::factor::{multiply_factors, normalize, Factor};
use crate::model::BayesNet;
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

use tracing::{debug, trace};

pub struct VariableEliminationEngine<'a> {

    /// The model over which to perform inference
    model: &'a BayesNet,

    /// the `Factor`s of the model (a 'bag of factors'), restricted by the provided evidence
    factors: Vec<Factor>,

    /// the heuristic used to order the eliminations
    strategy: EliminationStrategy

}


impl<'a> VariableEliminationEngine<'a> {

    /// Construct an engine answering queries about `model` given `evidence`.
    ///
    /// # Errors
    /// * `BnetError::UnknownVariable`, if an evidence `Variable` is not part of `model`
    pub fn new(model: &'a BayesNet, evidence: &Assignment) -> Result<Self> {
        if let Some(v) = evidence.variables().find(|v| !model.contains(v)) {
            return Err(BnetError::UnknownVariable(String::from(v.name())));
        }

        // reduce every factor with the evidence it mentions
        let mut factors = Vec::with_capacity(model.factors().len());
        for f in model.factors().iter() {
            let mut reduced = f.clone();
            for (var, idx) in evidence.iter().filter(|&(v, _)| f.contains(v)) {
                reduced = reduced.restrict(var, idx)?;
            }
            factors.push(reduced);
        }

        Ok(VariableEliminationEngine { model, factors, strategy: EliminationStrategy::default() })
    }

    /// Use the given elimination ordering heuristic
    pub fn with_strategy(mut self, strategy: EliminationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

}


impl<'a> ConditionalInferenceEngine for VariableEliminationEngine<'a> {

    fn infer(&mut self, query: &Variable) -> Result<Vec<f64>> {
        // check input arguments
        if !self.model.contains(query) {
            return Err(BnetError::UnknownVariable(String::from(query.name())));
        }

        let order = elimination_order(&self.factors, query, self.strategy);
        debug!(query = query.name(), strategy = ?self.strategy, order = ?order, "variable elimination");

        let mut phis = self.factors.clone();
        for var in order.iter() {
            // time to get rid of var
            let (phi_1prime, phi_2prime): (Vec<Factor>, Vec<Factor>) = phis
                                           .into_iter()
                                           .partition(|f| f.contains(var));

            phis = phi_2prime;
            if phi_1prime.is_empty() {
                continue;
            }

            // product step - multiply factors with var, then sum step - marginalize psi over var
            let psi = multiply_factors(&phi_1prime)?;
            let tau = psi.sum_out(var);
            trace!(variable = var.name(), combined = phi_1prime.len(), entries = tau.table().len(), "eliminated");

            phis.push(tau);
        }

        // multiply together remaining phis. What is left must be a table over the query alone.
        let phi_star = multiply_factors(&phis)?;
        if phi_star.scope() != std::slice::from_ref(query) {
            return Err(BnetError::StructuralInconsistency(
                format!("elimination for `{}` ended with a factor over {:?}", query.name(), phi_star.scope())
            ));
        }

        // now we have an unnormalized distribution
        let dist = normalize(&phi_star.values());
        debug!(query = query.name(), distribution = ?dist, "variable elimination result");

        Ok(dist)
    }

}
