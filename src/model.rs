//! Defines a `BayesNet`, a directed graphical model representing the factorization of a
//! probability distribution P into one conditional probability table per `Variable`.

use crate::factor::Factor;
use crate::init::Initialization;
use crate::util::{BnetError, Result};
use crate::variable::{Assignment, Variable};

use indexmap::IndexMap;
use tracing::debug;


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// A traditional graph data structure is not used; instead, the conditional probability table
/// (CPT) of each `Variable` implicitly defines the edges of the graph. The CPT of ```X``` is its
/// *governing* `Factor`, the first match of:
///
/// 1. a `Factor` over ```X``` alone
/// 2. a `Factor` whose scope starts with ```X``` and that is a conditional distribution of ```X```
/// 3. any `Factor` that is a conditional distribution of ```X```, wherever ```X``` sits in its scope
/// 4. a `Factor` whose scope starts with ```X```
/// 5. any `Factor` that mentions ```X```
///
/// There are edges ```P -> X``` for every other ```P``` in the scope of the CPT of ```X```.
///
/// A `BayesNet` is immutable after construction. Evidence is never stored on the network; it is
/// passed to each query as an `Assignment`.
#[derive(Clone, Debug)]
pub struct BayesNet {

    /// Diagnostic name of the network
    name: String,

    /// The `Variable`s of the network, in the order they were given
    variables: Vec<Variable>,

    /// Every `Factor` of the network
    factors: Vec<Factor>,

    /// Position in `factors` of the governing `Factor` of each `Variable`
    governing: IndexMap<Variable, usize>

}

impl BayesNet {

    /// Construct a `BayesNet` from its `Variable`s and `Factor`s.
    ///
    /// The scope order of a `Factor` only fixes the layout of its table. The CPT of each
    /// `Variable` is found from the values: see `BayesNet` for the rule.
    ///
    /// # Errors
    /// * `BnetError::DuplicateVariable`, if a `Variable` is listed twice
    /// * `BnetError::StructuralInconsistency`, if some `Factor` mentions a `Variable` that is not
    ///   part of the network
    pub fn new(name: &str, variables: Vec<Variable>, factors: Vec<Factor>) -> Result<Self> {
        for (i, v) in variables.iter().enumerate() {
            if variables[..i].contains(v) {
                return Err(BnetError::DuplicateVariable(String::from(v.name())));
            }
        }

        for f in factors.iter() {
            if let Some(v) = f.scope().iter().find(|v| !variables.contains(v)) {
                return Err(BnetError::StructuralInconsistency(
                    format!("factor `{}` mentions variable `{}`, which is not in network `{}`",
                            f.name(), v.name(), name)
                ));
            }
        }

        let mut governing = IndexMap::new();
        for v in variables.iter() {
            if let Some(i) = governing_factor(v, &factors) {
                governing.insert(v.clone(), i);
            }
        }

        debug!(network = name, variables = variables.len(), factors = factors.len(), "built bayes net");

        Ok(BayesNet { name: String::from(name), variables, factors, governing })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all `Variable`s in the model.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Get all `Factor`s in the model.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Get the number of `Variable`s in the the `BayesNet`
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Check if `var` is part of the model
    pub fn contains(&self, var: &Variable) -> bool {
        self.variables.contains(var)
    }

    /// Lookup a `Variable` in the `BayesNet` based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    /// Get the governing `Factor` (the CPT) for the given variable in this model.
    pub fn cpd(&self, var: &Variable) -> Option<&Factor> {
        self.governing.get(var).map(|&i| &self.factors[i])
    }

    /// The parents of `var`: every other `Variable` in the scope of its CPT
    pub fn parents(&self, var: &Variable) -> Option<Vec<Variable>> {
        self.cpd(var).map(|f| f.scope().iter().filter(|&v| v != var).cloned().collect())
    }

    /// Get every `Factor` whose scope contains `var`
    pub fn factors_with(&self, var: &Variable) -> Vec<&Factor> {
        self.factors.iter().filter(|f| f.contains(var)).collect()
    }

    /// Get a topological order of the `BayesNet`: every `Variable` follows the other `Variable`s in
    /// the scope of its CPT. Ties are broken by the order of `variables()`.
    ///
    /// # Errors
    /// * `BnetError::StructuralInconsistency`, if a `Variable` has no CPT, or the CPTs form a
    ///   cycle
    pub fn topological_order(&self) -> Result<Vec<Variable>> {
        let mut parents = Vec::with_capacity(self.variables.len());
        for v in self.variables.iter() {
            let p = self.parents(v).ok_or_else(|| BnetError::StructuralInconsistency(
                format!("variable `{}` has no conditional probability table", v.name())
            ))?;
            parents.push(p);
        }

        let mut order: Vec<Variable> = Vec::with_capacity(self.variables.len());
        let mut placed = vec![false; self.variables.len()];

        while order.len() < self.variables.len() {
            let ready = self.variables
                            .iter()
                            .enumerate()
                            .position(|(i, _)| !placed[i] && parents[i].iter().all(|p| order.contains(p)));

            match ready {
                Some(i) => {
                    placed[i] = true;
                    order.push(self.variables[i].clone());
                },
                None => {
                    let stuck: Vec<&str> = self.variables
                                               .iter()
                                               .enumerate()
                                               .filter(|&(i, _)| !placed[i])
                                               .map(|(_, v)| v.name())
                                               .collect();
                    return Err(BnetError::StructuralInconsistency(
                        format!("the tables of network `{}` form a cycle through {:?}", self.name, stuck)
                    ));
                }
            }
        }

        Ok(order)
    }

    /// Determine the probability of a full `Assignment` to the `Variable`s in the `BayesNet`.
    pub fn probability(&self, assignment: &Assignment) -> Result<f64> {
        // chain rule: the product of every table's value at the assignment
        self.factors.iter().try_fold(1.0, |p, f| f.value(assignment).map(|v| p * v))
    }
}


/// Position in `factors` of the governing `Factor` of `var`
fn governing_factor(var: &Variable, factors: &[Factor]) -> Option<usize> {
    let leads = |f: &Factor| f.scope().first() == Some(var);

    factors.iter().position(|f| f.scope() == std::slice::from_ref(var))
        .or_else(|| factors.iter().position(|f| leads(f) && f.is_conditional_of(var)))
        .or_else(|| factors.iter().position(|f| f.contains(var) && f.is_conditional_of(var)))
        .or_else(|| factors.iter().position(|f| leads(f)))
        .or_else(|| factors.iter().position(|f| f.contains(var)))
}


/// An implementation of the [builder pattern] for creating a `BayesNet`.
///
/// Models must be assembled in topological order: the parents of a `Variable` must be added
/// before the `Variable` itself.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct BayesNetBuilder {

    /// The name of the network
    name: String,

    /// The `Variable`s and their associated CPDs
    factors: IndexMap<Variable, Factor>,

    /// The error state of the builder
    err: Option<BnetError>

}


impl BayesNetBuilder {

    /// Construct a new `BayesNetBuilder` representing an empty `BayesNet`
    pub fn new(name: &str) -> Self {
        BayesNetBuilder {
            name: String::from(name),
            factors: IndexMap::new(),
            err: None
        }
    }


    /// Add a `Variable` to the `BayesNet`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the ordered parent variables. The parents must already be in the model.
    /// * `init`: the initialization mechanism for the CPD of `var` in the model.
    pub fn with_variable(
        mut self,
        var: &Variable,
        parents: Vec<Variable>,
        init: Initialization,
    ) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if let Some(p) = parents.iter().find(|v| !self.factors.contains_key(*v)) {
            self.err = Some(BnetError::MissingParent {
                variable: String::from(var.name()),
                parent: String::from(p.name())
            });
            return self;
        }

        if self.factors.contains_key(var) {
            self.err = Some(BnetError::DuplicateVariable(String::from(var.name())));
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the factor based on the initialization
        match init.build_cpd(var.clone(), parents) {
            Ok(factor) => {
                self.factors.insert(var.clone(), factor);
            },
            Err(e) => {
                self.err = Some(e);
            }
        }

        self
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `BayesNet`, or the first error generated during the building process
    ///
    /// # Postcondition
    /// This call consumes the `BayesNetBuilder`
    pub fn build(self) -> Result<BayesNet> {
        if let Some(e) = self.err {
            return Err(e);
        }

        let (variables, factors) = self.factors.into_iter().unzip();
        BayesNet::new(&self.name, variables, factors)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::variable::all_assignments;

    use approx::assert_abs_diff_eq;
    use itertools::iproduct;
    use ndarray::array;

    #[test]
    fn build_empty() {
        let model = BayesNetBuilder::new("empty").build().unwrap();

        assert_eq!(model.num_variables(), 0);
        assert!(model.variables().is_empty());
        assert!(model.topological_order().unwrap().is_empty());
    }


    #[test]
    /// Tests building a model with a single binary variable
    fn build_simple() {
        let v = Variable::new("Coin", &["heads", "tails"]).unwrap();
        let model = BayesNetBuilder::new("coin").with_variable(&v, vec![], Initialization::Uniform).build().unwrap();

        assert_eq!(model.variables(), &[v.clone()][..]);
        assert_eq!(model.lookup_variable("Coin"), Some(&v));
        assert_eq!(model.lookup_variable("Die"), None);

        let f = model.cpd(&v).unwrap();
        assert!(f.is_conditional_of(&v));
        assert_eq!(f.scope(), &[v.clone()][..]);
        assert_eq!(f.values(), vec![0.5, 0.5]);
    }


    #[test]
    /// Example taken from Koller & Friedman Section 3.1.2
    fn intelligence() {
        let intelligence = Variable::new("I", &["low", "high"]).unwrap();
        let sat = Variable::new("S", &["low", "high"]).unwrap();

        let sfactor = Factor::cpd(sat.clone(), vec![intelligence.clone()], array![[0.95, 0.05], [0.2, 0.8]].into_dyn()).unwrap();

        ///////////////////////////////////////////////////////////////////////////////////////////
        // TEST BUILDING
        let model = BayesNetBuilder::new("student")
                        .with_variable(&intelligence, vec![], Initialization::Multinomial(&[0.7, 0.3]))
                        .with_variable(&sat, vec![intelligence.clone()], Initialization::Table(sfactor))
                        .build()
                        .unwrap();

        assert_eq!(&intelligence, model.lookup_variable("I").unwrap());
        assert_eq!(&sat, model.lookup_variable("S").unwrap());
        assert_eq!(2, model.num_variables());
        assert_eq!(model.parents(&sat).unwrap(), vec![intelligence.clone()]);
        assert_eq!(model.factors_with(&intelligence).len(), 2);

        ///////////////////////////////////////////////////////////////////////////////////////////
        // TEST GETTING PROBABILITY OF ASSIGNMENT
        let expected = [[0.7 * 0.95, 0.7 * 0.05], [0.3 * 0.2, 0.3 * 0.8]];
        for (i, s) in iproduct!(0..2, 0..2) {
            let mut a = Assignment::new();
            a.set(&intelligence, i).unwrap();
            a.set(&sat, s).unwrap();
            assert_abs_diff_eq!(model.probability(&a).unwrap(), expected[i][s], epsilon = 1e-12);
        }

        // test partial assignment
        let mut a = Assignment::new();
        a.set(&intelligence, 1).unwrap();
        assert!(model.probability(&a).is_err());
    }


    #[test]
    fn joint_sums_to_one() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 3).unwrap();
        let c = Variable::discrete("C", 2).unwrap();

        let model = BayesNetBuilder::new("random")
                        .with_variable(&a, vec![], Initialization::Random)
                        .with_variable(&b, vec![a.clone()], Initialization::Random)
                        .with_variable(&c, vec![a.clone(), b.clone()], Initialization::Random)
                        .build()
                        .unwrap();

        let total: f64 = all_assignments(model.variables()).map(|x| model.probability(&x).unwrap()).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
    }


    #[test]
    fn builder_errors() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        let missing = BayesNetBuilder::new("bad")
                          .with_variable(&b, vec![a.clone()], Initialization::Uniform)
                          .build();
        match missing {
            Err(BnetError::MissingParent { variable, parent }) => {
                assert_eq!(variable, "B");
                assert_eq!(parent, "A");
            },
            _ => panic!("wrong error type")
        };

        let duplicate = BayesNetBuilder::new("bad")
                            .with_variable(&a, vec![], Initialization::Uniform)
                            .with_variable(&a, vec![], Initialization::Uniform)
                            .build();
        match duplicate {
            Err(BnetError::DuplicateVariable(name)) => assert_eq!(name, "A"),
            _ => panic!("wrong error type")
        };

        // the first error is latched
        let latched = BayesNetBuilder::new("bad")
                          .with_variable(&a, vec![], Initialization::Binomial(2.0))
                          .with_variable(&b, vec![a.clone()], Initialization::Uniform)
                          .build();
        match latched {
            Err(BnetError::InvalidInitialization(_)) => (),
            _ => panic!("wrong error type")
        };
    }


    #[test]
    fn structural_errors() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        let fa = Factor::cpd(a.clone(), vec![], array![0.5, 0.5].into_dyn()).unwrap();
        let fb = Factor::cpd(b.clone(), vec![a.clone()], array![[0.5, 0.5], [0.1, 0.9]].into_dyn()).unwrap();

        match BayesNet::new("bad", vec![b.clone()], vec![fa.clone(), fb.clone()]) {
            Err(BnetError::StructuralInconsistency(msg)) => {
                assert!(msg.contains("P(A)"));
                assert!(msg.contains("`A`"));
            },
            _ => panic!("wrong error type")
        };

        match BayesNet::new("bad", vec![a.clone(), a.clone()], vec![]) {
            Err(BnetError::DuplicateVariable(name)) => assert_eq!(name, "A"),
            _ => panic!("wrong error type")
        };

        // no table governs B
        let net = BayesNet::new("partial", vec![a.clone(), b.clone()], vec![fa.clone()]).unwrap();
        assert!(net.cpd(&b).is_none());
        assert!(net.topological_order().is_err());
    }


    #[test]
    fn topological_order() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 2).unwrap();
        let c = Variable::discrete("C", 2).unwrap();

        let fa = Factor::cpd(a.clone(), vec![], array![0.5, 0.5].into_dyn()).unwrap();
        let fb = Factor::cpd(b.clone(), vec![a.clone()], array![[0.5, 0.5], [0.1, 0.9]].into_dyn()).unwrap();
        let fc = Factor::cpd(c.clone(), vec![b.clone()], array![[0.3, 0.7], [0.6, 0.4]].into_dyn()).unwrap();

        // variables and tables listed out of order
        let net = BayesNet::new("chain", vec![c.clone(), b.clone(), a.clone()], vec![fc.clone(), fb.clone(), fa.clone()]).unwrap();
        assert_eq!(net.cpd(&b).unwrap().name(), "P(B|A)");
        assert_eq!(net.topological_order().unwrap(), vec![a.clone(), b.clone(), c.clone()]);

        // A governed by a table over [A, C] closes a cycle A -> B -> C -> A
        let fac = Factor::cpd(a.clone(), vec![c.clone()], array![[0.5, 0.5], [0.5, 0.5]].into_dyn()).unwrap();
        let cyclic = BayesNet::new("cycle", vec![a.clone(), b.clone(), c.clone()], vec![fac, fb, fc]).unwrap();
        match cyclic.topological_order() {
            Err(BnetError::StructuralInconsistency(_)) => (),
            _ => panic!("wrong error type")
        };
    }


    #[test]
    fn governing_by_mention() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        // a single joint table over [B, A] governs both variables
        let joint = Factor::new("P(B,A)", vec![b.clone(), a.clone()], array![[0.1, 0.2], [0.3, 0.4]].into_dyn()).unwrap();
        let net = BayesNet::new("joint", vec![a.clone(), b.clone()], vec![joint]).unwrap();

        assert_eq!(net.cpd(&a).unwrap().name(), "P(B,A)");
        assert_eq!(net.cpd(&b).unwrap().name(), "P(B,A)");
        assert_eq!(net.parents(&a).unwrap(), vec![b.clone()]);
    }


    #[test]
    /// A CPT whose child is the last axis of its table, listed before the roots' tables
    fn governing_by_values() {
        let e = Variable::new("E", &["e", "-e"]).unwrap();
        let b = Variable::new("B", &["b", "-b"]).unwrap();
        let s = Variable::new("S", &["s", "-s"]).unwrap();

        let fs = Factor::new("P(S|E,B)", vec![e.clone(), b.clone(), s.clone()],
                             array![[[0.9, 0.1], [0.2, 0.8]], [[0.8, 0.2], [0.0, 1.0]]].into_dyn()).unwrap();
        let fe = Factor::cpd(e.clone(), vec![], array![0.1, 0.9].into_dyn()).unwrap();
        let fb = Factor::cpd(b.clone(), vec![], array![0.1, 0.9].into_dyn()).unwrap();

        let net = BayesNet::new("alarm", vec![s.clone(), e.clone(), b.clone()], vec![fs, fe, fb]).unwrap();

        assert_eq!(net.cpd(&s).unwrap().name(), "P(S|E,B)");
        assert_eq!(net.cpd(&e).unwrap().name(), "P(E)");
        assert_eq!(net.cpd(&b).unwrap().name(), "P(B)");
        assert_eq!(net.parents(&s).unwrap(), vec![e.clone(), b.clone()]);
        assert_eq!(net.topological_order().unwrap(), vec![e.clone(), b.clone(), s.clone()]);
    }
}
