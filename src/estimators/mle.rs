//! Defines `Estimator`s that use Maximum Likelihood Estimation to estimate the value of parameters
//! given a dataset.

use super::Estimator;
use crate::factor::{Factor, Table};
use crate::model::BayesNet;
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

use ndarray::prelude as nd;
use tracing::{debug, warn};

/// Defines the `LocalMLEstimator`, a Maximum Likelihood `Estimator` for the Conditional Probability
/// Distribution of a single variable in a Bayesian framework.
///
/// Implementation of the MLE Parameter Estimation scheme for conditional probability distributions
/// described in Koller & Friedman Section 17.2
pub struct LocalMLEstimator {

    /// The scope of the estimated `Factor`: the estimated `Variable`, then its parents
    scope: Vec<Variable>,

    /// The current counts for the estimated `Factor`
    table: Table

}


impl LocalMLEstimator {

    /// Construct an ML estimator for ```P(var | parents)```
    ///
    /// # Errors
    /// * `BnetError::DuplicateVariable`, if `var` is among `parents` or a parent is repeated
    pub fn new(var: &Variable, parents: &[Variable]) -> Result<Self> {
        let mut scope = vec![var.clone()];
        scope.extend(parents.iter().cloned());

        // validates the scope
        let counts = Factor::zeros("counts", scope.clone())?;

        Ok(LocalMLEstimator { scope, table: counts.table().clone() })
    }

    /// Construct an ML estimator with the same scope as an existing CPD, whose first `Variable`
    /// is the one being estimated
    ///
    /// # Errors
    /// * `BnetError::NotACpd`, if `factor` is not a conditional distribution of its first `Variable`
    pub fn for_cpd(factor: &Factor) -> Result<Self> {
        match factor.scope().split_first() {
            Some((var, parents)) if factor.is_conditional_of(var) => LocalMLEstimator::new(var, parents),
            _ => Err(BnetError::NotACpd(String::from(factor.name())))
        }
    }

    fn name(&self) -> String {
        let var = self.scope[0].name();
        if self.scope.len() == 1 {
            format!("P({})", var)
        } else {
            let parents: Vec<&str> = self.scope[1..].iter().map(|v| v.name()).collect();
            format!("P({}|{})", var, parents.join(","))
        }
    }

}


impl<'a> Estimator<'a, Factor> for LocalMLEstimator {

    /// Estimate the CPD by the relative frequency of each value of the `Variable` among the
    /// records sharing an assignment of its parents. Parent assignments that never occur in the
    /// dataset leave an all-zero column.
    ///
    /// # Errors
    /// * `BnetError::NotEnoughData`, if the dataset is empty
    /// * `BnetError::IncompleteAssignment`, if a record does not assign the whole scope
    fn estimate(&mut self, dataset: impl Iterator<Item = &'a Assignment>) -> Result<Factor> {
        // each call to estimate must be independent, so first let's zero the table.
        self.table.fill(0.0);
        let name = self.name();

        // count the number of instances of each configuration, using self.table as an accumulator
        let mut records = 0;
        for sample in dataset {
            let mut idx = Vec::with_capacity(self.scope.len());
            for v in self.scope.iter() {
                let i = sample.get(v).ok_or_else(|| BnetError::IncompleteAssignment {
                    factor: name.clone(),
                    variable: String::from(v.name())
                })?;
                idx.push(i);
            }

            self.table[nd::IxDyn(&idx)] += 1.0;
            records += 1;
        }

        if records == 0 {
            return Err(BnetError::NotEnoughData);
        }

        // now, we estimate each parameter by using the sufficient statistics (see K&F Eq. 17.5):
        //                  M[x, u]     <-- each value in the table
        //      theta x|u = -------
        //                   M[u]       <-- sum along the first axis of table
        // where x is an assignment to self.scope[0] and u is an assignment to self.scope[1..]
        let m_u = self.table.sum_axis(nd::Axis(0)).insert_axis(nd::Axis(0));
        let unseen = m_u.iter().filter(|&&ct| ct == 0.0).count();
        if unseen > 0 {
            warn!(cpd = name.as_str(), unseen, "parent configurations never observed; their columns are zero");
        }

        let divisor = m_u.mapv(|ct| if ct == 0.0 { 1.0 } else { ct });
        let new_table = &self.table / &divisor;

        debug!(cpd = name.as_str(), records, "estimated");
        Factor::new(&name, self.scope.clone(), new_table)
    }
}


/// A Maximium Likelihood estimator for a `BayesNet`
///
/// Based on the decomposability of the likelihood function, each CPD can be estimated separately
/// and therefore the `ModelMLEstimator` is really just a 'bag-o-`LocalMLEstimator`s'
pub struct ModelMLEstimator<'a> {

    /// The model for which to estimate the parameters
    model: &'a BayesNet,

    /// The `Estimator` for each local CPD
    estimators: Vec<LocalMLEstimator>

}


impl<'a> ModelMLEstimator<'a> {

    /// Construct an estimator re-estimating one CPD per `Variable` of `model`, over the `Variable`
    /// and its parents.
    ///
    /// # Errors
    /// * `BnetError::StructuralInconsistency`, if `model` has no topological order
    pub fn new(model: &'a BayesNet) -> Result<Self> {
        let mut estimators = Vec::with_capacity(model.num_variables());
        for v in model.topological_order()? {
            let parents = model.parents(&v).unwrap_or_default();
            estimators.push(LocalMLEstimator::new(&v, &parents)?);
        }

        Ok(ModelMLEstimator { model, estimators })
    }

}


impl<'a> Estimator<'a, BayesNet> for ModelMLEstimator<'a> {

    fn estimate(&mut self, dataset: impl Iterator<Item = &'a Assignment>) -> Result<BayesNet> {
        let data: Vec<&'a Assignment> = dataset.collect();

        let mut factors = Vec::with_capacity(self.estimators.len());
        for e in self.estimators.iter_mut() {
            factors.push(e.estimate(data.iter().cloned())?);
        }

        BayesNet::new(self.model.name(), self.model.variables().to_vec(), factors)
    }

}
