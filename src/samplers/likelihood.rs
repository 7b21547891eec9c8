//! Defines a sampler for likelihood weighted particle generation for a `BayesNet`.
//!
//! Koller & Friedman Algorithm 12.2 (pp 493)

use super::{WeightedSample, Weighting};
use crate::factor::normalize;
use crate::model::BayesNet;
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

use rand::Rng;
use tracing::trace;


/// A simple sampler for Bayesian Models that uses likelihood weighted sampling to draw full
/// assignments from the `BayesNet` given evidence.
pub struct LikelihoodWeightedSampler<'a> {

    /// The model from which to sample
    model: &'a BayesNet,

    /// The evidence on which to condition
    evidence: &'a Assignment,

    /// The ancestral order in which `Variable`s are sampled
    order: Vec<Variable>,

    /// How the evidence enters the weight of each sample
    weighting: Weighting,

    /// Weight contributed by the evidence under `Weighting::PriorOnly`; identical for every sample
    prior_weight: f64

}


impl<'a> LikelihoodWeightedSampler<'a> {

    /// Construct a sampler for `model` conditioned on `evidence`.
    ///
    /// # Errors
    /// * `BnetError::UnknownVariable`, if an evidence `Variable` is not part of `model`
    /// * `BnetError::StructuralInconsistency`, if `model` has no topological order
    pub fn new(model: &'a BayesNet, evidence: &'a Assignment, weighting: Weighting) -> Result<Self> {
        if let Some(v) = evidence.variables().find(|v| !model.contains(v)) {
            return Err(BnetError::UnknownVariable(String::from(v.name())));
        }

        let order = model.topological_order()?;

        let mut prior_weight = 1.0;
        if weighting == Weighting::PriorOnly {
            for ev in evidence.variables() {
                for f in model.factors().iter().filter(|f| f.scope() == std::slice::from_ref(ev)) {
                    prior_weight *= f.value(evidence)?;
                }
            }
        }

        Ok(LikelihoodWeightedSampler { model, evidence, order, weighting, prior_weight })
    }


    /// Draw one full assignment and its weight.
    ///
    /// The evidence `Variable`s keep their observed values; every other `Variable` is drawn, in
    /// topological order, from its CPT given the values already fixed. A draw from a CPT column that
    /// is entirely zero is impossible: the sample is abandoned with weight zero and may be missing
    /// some `Variable`s.
    pub fn weighted_sample<R: Rng>(&self, rng: &mut R) -> Result<WeightedSample> {
        let mut a = self.evidence.clone();
        let mut w = self.prior_weight;

        for var in self.order.iter() {
            let cpd = self.model.cpd(var).ok_or_else(|| BnetError::StructuralInconsistency(
                format!("variable `{}` has no conditional probability table", var.name())
            ))?;

            if self.evidence.contains(var) {
                if self.weighting == Weighting::Full {
                    // update the weight by P(var | Pa(var))
                    w *= cpd.value(&a)?;
                }
                continue;
            }

            // every parent precedes var in topological order, so the column is fully determined
            let column = normalize(&cpd.values_along(var, &a)?);

            match roulette(&column, rng.gen::<f64>()) {
                Some(i) => a.insert(var, i),
                None => {
                    trace!(variable = var.name(), "impossible sample");
                    return Ok(WeightedSample(a, 0.0));
                }
            }
        }

        Ok(WeightedSample(a, w))
    }

}


/// Select the first index whose cumulative probability reaches `draw`. Indices of probability
/// zero are never selected; if rounding leaves `draw` above the total, the last index of non-zero
/// probability is selected. An all-zero distribution selects nothing.
fn roulette(probabilities: &[f64], draw: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    for (i, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if p > 0.0 && draw <= cumulative {
            return Some(i);
        }
    }

    probabilities.iter().rposition(|&p| p > 0.0)
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::factor::Factor;
    use crate::init::Initialization;
    use crate::model::BayesNetBuilder;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Example taken from Koller & Friedman Figure 12.1 and Example 2.3
    fn student() -> (Vec<Variable>, BayesNet) {
        let d = Variable::discrete("D", 2).unwrap();
        let i = Variable::discrete("I", 2).unwrap();
        let g = Variable::discrete("G", 3).unwrap();
        let s = Variable::discrete("S", 2).unwrap();
        let l = Variable::discrete("L", 2).unwrap();

        let cpd_g = Factor::cpd(g.clone(), vec![i.clone(), d.clone()], array![[[0.3, 0.4, 0.3], [0.05, 0.25, 0.7]],
                                                                              [[0.9, 0.08, 0.02], [0.5, 0.3, 0.2]]].into_dyn()
        ).unwrap();

        let cpd_l = Factor::cpd(l.clone(), vec![g.clone()], array![[0.1, 0.9], [0.4, 0.6], [0.99, 0.01]].into_dyn()).unwrap();
        let cpd_s = Factor::cpd(s.clone(), vec![i.clone()], array![[0.95, 0.05], [0.2, 0.8]].into_dyn()).unwrap();

        let model = BayesNetBuilder::new("student")
                        .with_variable(&d, vec![], Initialization::Binomial(0.6))
                        .with_variable(&i, vec![], Initialization::Binomial(0.7))
                        .with_variable(&g, vec![i.clone(), d.clone()], Initialization::Table(cpd_g))
                        .with_variable(&s, vec![i.clone()], Initialization::Table(cpd_s))
                        .with_variable(&l, vec![g.clone()], Initialization::Table(cpd_l))
                        .build()
                        .unwrap();

        (vec![d, i, g, s, l], model)
    }

    #[test]
    fn sample() {
        let (vars, model) = student();
        let (d, i, g, s, l) = (&vars[0], &vars[1], &vars[2], &vars[3], &vars[4]);

        let mut evidence = Assignment::new();
        evidence.set(l, 0).unwrap();
        evidence.set(s, 1).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let sampler = LikelihoodWeightedSampler::new(&model, &evidence, Weighting::Full).unwrap();
        for _ in 0..100 {
            let WeightedSample(particle, weight) = sampler.weighted_sample(&mut rng).unwrap();

            assert!(particle.get(d).unwrap() < 2);
            assert!(particle.get(i).unwrap() < 2);
            assert!(particle.get(g).unwrap() < 3);
            assert_eq!(particle.get(s), Some(1));
            assert_eq!(particle.get(l), Some(0));

            assert!(weight >= 0.0);
            assert!(weight <= 1.0);
        }

        // verify the weight in example 12.3
        loop {
            let WeightedSample(particle, weight) = sampler.weighted_sample(&mut rng).unwrap();

            if particle.get(d) == Some(1) && particle.get(i) == Some(0) && particle.get(g) == Some(1) {
                assert_abs_diff_eq!(weight, 0.02, epsilon = 0.001);
                break;
            }
        }
    }

    #[test]
    fn prior_only_weights_root_evidence() {
        let (vars, model) = student();
        let (d, i, l) = (&vars[0], &vars[1], &vars[4]);

        let mut evidence = Assignment::new();
        evidence.set(i, 1).unwrap();
        evidence.set(l, 0).unwrap();

        // only P(I) has a scope of exactly one evidence variable
        let mut rng = StdRng::seed_from_u64(11);
        let sampler = LikelihoodWeightedSampler::new(&model, &evidence, Weighting::PriorOnly).unwrap();
        for _ in 0..20 {
            let WeightedSample(particle, weight) = sampler.weighted_sample(&mut rng).unwrap();
            assert_abs_diff_eq!(weight, 0.3, epsilon = 1e-12);
            assert!(particle.contains(d));
            assert_eq!(particle.len(), 5);
        }
    }

    #[test]
    fn unknown_evidence() {
        let (_, model) = student();
        let stranger = Variable::discrete("X", 2).unwrap();

        let mut evidence = Assignment::new();
        evidence.set(&stranger, 0).unwrap();

        match LikelihoodWeightedSampler::new(&model, &evidence, Weighting::PriorOnly) {
            Err(BnetError::UnknownVariable(name)) => assert_eq!(name, "X"),
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn impossible_sample_has_no_weight() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        // B has no distribution at all when A = 1
        let fa = Factor::cpd(a.clone(), vec![], array![0.0, 1.0].into_dyn()).unwrap();
        let fb = Factor::new("P(B|A)", vec![b.clone(), a.clone()], array![[1.0, 0.0], [0.0, 0.0]].into_dyn()).unwrap();
        let model = BayesNet::new("broken", vec![a.clone(), b.clone()], vec![fa, fb]).unwrap();

        let evidence = Assignment::new();
        let sampler = LikelihoodWeightedSampler::new(&model, &evidence, Weighting::PriorOnly).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let WeightedSample(particle, weight) = sampler.weighted_sample(&mut rng).unwrap();
        assert_eq!(weight, 0.0);
        assert_eq!(particle.get(&a), Some(1));
        assert!(!particle.contains(&b));
    }

    #[test]
    fn roulette_wheel() {
        assert_eq!(roulette(&[0.2, 0.3, 0.5], 0.0), Some(0));
        assert_eq!(roulette(&[0.2, 0.3, 0.5], 0.2), Some(0));
        assert_eq!(roulette(&[0.2, 0.3, 0.5], 0.21), Some(1));
        assert_eq!(roulette(&[0.2, 0.3, 0.5], 0.99), Some(2));

        // zero probability values are skipped, even for a draw of exactly zero
        assert_eq!(roulette(&[0.0, 1.0], 0.0), Some(1));
        assert_eq!(roulette(&[0.5, 0.5, 0.0], 1.5), Some(1));
        assert_eq!(roulette(&[0.0, 0.0], 0.5), None);
    }
}
