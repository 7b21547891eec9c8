//! Module containing initialization routines for the conditional tables of a `BayesNet`.

use crate::factor::{Factor, Table};
use crate::util::{BnetError, Result};
use crate::variable::Variable;

use ndarray::array;
use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Defines possible ways to initialize a `Variable`s CPD.
pub enum Initialization<'a> {
    /// A uniform distribution over all possibilities
    Uniform,

    /// Randomly initialize the weights of the CPD.
    Random,

    /// Initialize the CPD as a Binomial distribution with parameter ```p```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Binomial(f64),

    /// Initialize the CPD as a Multinomial distribution with parameters ```p_0, p_1...```.
    /// Note that this `Initialization` is valid only to a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// User defined CPD
    Table(Factor)
}


impl<'a> Initialization<'a> {

    /// Construct a CPD, initialized based on ```self```
    ///
    /// # Args
    /// * `var`: the `Variable` the distribution is over
    /// * `parents`: the ordered parents of `var`
    ///
    /// # Returns
    /// a `Factor` with scope ```[var, parents...]```, initialized according to ```self```.
    ///
    /// # Errors
    /// * `BnetError::InvalidInitialization`, if the `Initialization` does not fit `var` and
    ///   `parents`
    /// * `BnetError::NotACpd`, if a user defined table is not a conditional distribution of `var`
    /// * `BnetError::InvalidScope`, if a user defined table is not over `var` and `parents`
    pub fn build_cpd(self, var: Variable, parents: Vec<Variable>) -> Result<Factor> {
        ///////////////////////////////////////////////////////////////////////////////
        // Trivial cases

        // if this is a user defined factor, it just needs to be verified and reordered
        if let Initialization::Table(f) = self {
            let s = f.scope();
            if !(parents.iter().all(|v| s.contains(v)) && s.len() == parents.len() + 1 && s.contains(&var)) {
                return Err(BnetError::InvalidScope(
                    format!("factor `{}` is not over `{}` and its parents", f.name(), var.name())
                ));
            }

            if !f.is_conditional_of(&var) {
                return Err(BnetError::NotACpd(String::from(f.name())));
            }

            let mut order = vec![var];
            order.extend(parents);
            return f.reorder(&order);
        }

        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if parents.is_empty() {

            match self {

                // A binomial distribution on a non-binary variable
                Initialization::Binomial(_) if var.cardinality() != 2 => {
                    return Err(BnetError::InvalidInitialization(
                        format!("binomial initialization of `{}`, which has {} values", var.name(), var.cardinality())
                    ));
                },

                Initialization::Binomial(p) if !(0.0..=1.0).contains(&p) => {
                    return Err(BnetError::InvalidInitialization(
                        format!("binomial parameter {} of `{}` is not a probability", p, var.name())
                    ));
                },

                // A multinomial distribution with an incorrect number of parameters
                Initialization::Multinomial(ps) if ps.len() != var.cardinality() => {
                    return Err(BnetError::InvalidInitialization(
                        format!("{} multinomial parameters for `{}`, which has {} values", ps.len(), var.name(), var.cardinality())
                    ));
                },

                _ => ()
            }
        } else {
            match self {

                // A binomial/multinomial on a non-unit scope
                Initialization::Binomial(_) | Initialization::Multinomial(_) => {
                    return Err(BnetError::InvalidInitialization(
                        format!("`{}` has parents and cannot take a binomial or multinomial", var.name())
                    ));
                },

                _ => ()
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build CPD. The raw table is laid out [parents..., var].
        let mut shape: Vec<usize> = parents.iter().map(|v| v.cardinality()).collect();
        shape.push(var.cardinality());

        let tbl: Table = match self {
            Initialization::Uniform => {
                // normalizing constant is just the number of elements
                let val = 1. / (var.cardinality() as f64);
                Table::from_elem(shape, val)
            },
            Initialization::Random => {
                let ax = nd::Axis(shape.len() - 1);
                let tbl = Table::random(shape, Uniform::new(1.0, 100.0));
                let z = tbl.sum_axis(ax).insert_axis(ax);
                &tbl / &z
            },
            Initialization::Binomial(p) => {
                array![p, (1.0 - p)].into_dyn()
            },
            Initialization::Multinomial(p) => {
                nd::Array::from_iter(p.iter().cloned()).into_dyn()
            },
            Initialization::Table(_) => {
                return Err(BnetError::InvalidInitialization(String::from("table initialization already handled")));
            }
        };

        Factor::cpd(var, parents, tbl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{all_assignments, Assignment};

    use approx::assert_abs_diff_eq;

    #[test]
    fn invalid_scope_subset() {
        let a = Variable::discrete("A", 3).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        let f = Factor::cpd(b.clone(), vec![a.clone()], array![[0.1, 0.9], [0.3, 0.7], [0.2, 0.8]].into_dyn()).unwrap();
        let init = Initialization::Table(f);

        match init.build_cpd(b, vec![]) {
            Err(BnetError::InvalidScope(_)) => (),
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn invalid_scope_superset() {
        let a = Variable::discrete("A", 3).unwrap();
        let b = Variable::discrete("B", 2).unwrap();
        let c = Variable::discrete("C", 2).unwrap();

        let f = Factor::cpd(b.clone(), vec![a.clone()], array![[0.1, 0.9], [0.3, 0.7], [0.2, 0.8]].into_dyn()).unwrap();
        let init = Initialization::Table(f);

        assert!(init.build_cpd(b, vec![a, c]).is_err());
    }

    #[test]
    fn table_not_a_cpd() {
        let a = Variable::discrete("A", 3).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        let f = Factor::new("f", vec![a.clone(), b.clone()], array![[0.1, 0.2], [0.3, 0.1], [0.2, 0.1]].into_dyn()).unwrap();
        match Initialization::Table(f).build_cpd(b, vec![a]) {
            Err(BnetError::NotACpd(name)) => assert_eq!(name, "f"),
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn random_init() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 10).unwrap();
        let c = Variable::discrete("C", 3).unwrap();

        let factor = Initialization::Random.build_cpd(c.clone(), vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(factor.scope(), &[c.clone(), a.clone(), b.clone()][..]);
        assert!(factor.is_conditional_of(&c));

        let sum: f64 = all_assignments(factor.scope()).map(|x| factor.value(&x).unwrap()).sum();
        assert_abs_diff_eq!(sum, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn uniform_init() {
        let a = Variable::discrete("A", 2).unwrap();
        let b = Variable::discrete("B", 10).unwrap();

        let factor = Initialization::Uniform.build_cpd(b.clone(), vec![a.clone()]).unwrap();
        assert_eq!(factor.scope(), &[b.clone(), a.clone()][..]);

        for assn in all_assignments(factor.scope()) {
            assert_abs_diff_eq!(factor.value(&assn).unwrap(), 0.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn binomial_init() {
        let a = Variable::discrete("A", 2).unwrap();

        let factor = Initialization::Binomial(0.25).build_cpd(a.clone(), vec![]).unwrap();

        let mut assn = Assignment::new();
        assn.set(&a, 0).unwrap();
        assert_abs_diff_eq!(factor.value(&assn).unwrap(), 0.25);

        assn.set(&a, 1).unwrap();
        assert_abs_diff_eq!(factor.value(&assn).unwrap(), 0.75);

        let c = Variable::discrete("C", 3).unwrap();
        assert!(Initialization::Binomial(0.25).build_cpd(c, vec![]).is_err());
        assert!(Initialization::Binomial(1.5).build_cpd(a, vec![]).is_err());
    }

    #[test]
    fn multinomial_init() {
        let a = Variable::discrete("A", 3).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        let factor = Initialization::Multinomial(&[0.1, 0.7, 0.2]).build_cpd(a.clone(), vec![]).unwrap();
        assert_eq!(factor.values(), vec![0.1, 0.7, 0.2]);

        assert!(Initialization::Multinomial(&[0.5, 0.5]).build_cpd(a.clone(), vec![]).is_err());
        assert!(Initialization::Multinomial(&[0.1, 0.7, 0.2]).build_cpd(a, vec![b]).is_err());
    }

    #[test]
    fn factor_init() {
        let a = Variable::discrete("A", 3).unwrap();
        let b = Variable::discrete("B", 2).unwrap();

        // given in [B, A] order, expected back in [B, A] order as well
        let f = Factor::new("P(B|A)", vec![b.clone(), a.clone()], array![[0.1, 0.3, 0.2], [0.9, 0.7, 0.8]].into_dyn()).unwrap();
        let factor = Initialization::Table(f.clone()).build_cpd(b.clone(), vec![a.clone()]).unwrap();

        assert_eq!(factor.scope(), &[b.clone(), a.clone()][..]);
        for assn in all_assignments(factor.scope()) {
            assert_eq!(factor.value(&assn).unwrap(), f.value(&assn).unwrap());
        }
    }
}
