//! Heuristics for choosing the order in which variable elimination sums `Variable`s out.
//!
//! The order only affects the cost of elimination, never its result.

use crate::factor::Factor;
use crate::variable::Variable;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// The heuristic used to order the `Variable`s to eliminate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationStrategy {

    /// Eliminate the `Variable`s mentioned by the fewest `Factor`s first
    MinAppearance,

    /// Greedily eliminate the `Variable` whose elimination adds the fewest edges to the
    /// interaction graph
    MinFill,

    /// Maximum cardinality search over the interaction graph (Koller & Friedman Algorithm 9.3),
    /// eliminating in reverse visit order
    MaxCardinality

}

impl Default for EliminationStrategy {
    fn default() -> Self {
        EliminationStrategy::MinAppearance
    }
}


/// Compute an elimination order for `factors`.
///
/// # Returns
/// every `Variable` mentioned by some `Factor` except `query`, each exactly once. Ties are broken
/// by the order in which the `Variable`s are first encountered in `factors`, so the result is
/// deterministic.
pub fn elimination_order(factors: &[Factor], query: &Variable, strategy: EliminationStrategy) -> Vec<Variable> {
    match strategy {
        EliminationStrategy::MinAppearance => min_appearance(factors, query),
        EliminationStrategy::MinFill => min_fill(factors, query),
        EliminationStrategy::MaxCardinality => max_cardinality(factors, query)
    }
}


/// The `Variable`s of `factors` in encounter order
fn encountered(factors: &[Factor]) -> IndexSet<Variable> {
    factors.iter().flat_map(|f| f.scope().iter().cloned()).collect()
}


/// The interaction graph of `factors`: two `Variable`s are neighbors if some `Factor` mentions both
fn interaction_graph(factors: &[Factor]) -> IndexMap<Variable, IndexSet<Variable>> {
    let mut neighbors: IndexMap<Variable, IndexSet<Variable>> = encountered(factors)
                                                                     .into_iter()
                                                                     .map(|v| (v, IndexSet::new()))
                                                                     .collect();

    for f in factors.iter() {
        let scope = f.scope();
        for (i, vi) in scope.iter().enumerate() {
            for vj in scope[i + 1..].iter() {
                if let Some(n) = neighbors.get_mut(vi) {
                    n.insert(vj.clone());
                }
                if let Some(n) = neighbors.get_mut(vj) {
                    n.insert(vi.clone());
                }
            }
        }
    }

    neighbors
}


fn min_appearance(factors: &[Factor], query: &Variable) -> Vec<Variable> {
    let mut counted: Vec<(Variable, usize)> = encountered(factors)
                                                  .into_iter()
                                                  .filter(|v| v != query)
                                                  .map(|v| {
                                                      let ct = factors.iter().filter(|f| f.contains(&v)).count();
                                                      (v, ct)
                                                  })
                                                  .collect();

    // stable, so ties keep their encounter order
    counted.sort_by_key(|&(_, ct)| ct);
    counted.into_iter().map(|(v, _)| v).collect()
}


fn min_fill(factors: &[Factor], query: &Variable) -> Vec<Variable> {
    let mut graph = interaction_graph(factors);
    let mut order = Vec::with_capacity(graph.len());

    loop {
        // the number of fill edges eliminating each candidate would introduce
        let best = graph.iter()
                        .filter(|&(v, _)| v != query)
                        .map(|(v, ns)| {
                            let ns: Vec<&Variable> = ns.iter().collect();
                            let mut fill = 0;
                            for (i, a) in ns.iter().enumerate() {
                                for b in ns[i + 1..].iter() {
                                    if !graph[*a].contains(*b) {
                                        fill += 1;
                                    }
                                }
                            }
                            (v.clone(), fill)
                        })
                        .fold(None, |best: Option<(Variable, usize)>, (v, fill)| match best {
                            Some((_, min)) if min <= fill => best,
                            _ => Some((v, fill))
                        });

        let var = match best {
            Some((var, _)) => var,
            None => break
        };

        // connect the neighbors of var to each other, then drop var from the graph
        let ns = graph.shift_remove(&var).unwrap_or_default();
        for a in ns.iter() {
            if let Some(adj) = graph.get_mut(a) {
                adj.shift_remove(&var);
                adj.extend(ns.iter().filter(|&b| b != a).cloned());
            }
        }

        order.push(var);
    }

    order
}


fn max_cardinality(factors: &[Factor], query: &Variable) -> Vec<Variable> {
    let neighbors = interaction_graph(factors);
    let vars: Vec<&Variable> = neighbors.keys().collect();

    // set of marked variables
    let mut marked: IndexSet<Variable> = IndexSet::new();

    for _ in 0..vars.len() {
        // the unmarked variable with the most marked neighbors; the first one on ties
        let mut idx: Option<(usize, usize)> = None;
        for (vidx, &v) in vars.iter().enumerate() {
            if marked.contains(v) {
                continue;
            }

            let ct = neighbors[v].iter().filter(|&n| marked.contains(n)).count();
            match idx {
                Some((_, max)) if ct <= max => (),
                _ => idx = Some((vidx, ct))
            }
        }

        if let Some((i, _)) = idx {
            marked.insert(vars[i].clone());
        }
    }

    // eliminate in reverse visit order
    marked.into_iter().rev().filter(|v| v != query).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn binary(name: &str) -> Variable {
        Variable::discrete(name, 2).unwrap()
    }

    fn over(scope: &[&Variable]) -> Factor {
        Factor::zeros("f", scope.iter().map(|&v| v.clone()).collect()).unwrap()
    }

    #[test]
    fn min_appearance_counts_factors() {
        let (e, b, s, g, w) = (binary("E"), binary("B"), binary("S"), binary("G"), binary("W"));
        let factors = vec![
            over(&[&e]),
            over(&[&b]),
            over(&[&s, &e, &b]),
            over(&[&g, &s]),
            over(&[&w, &s]),
        ];

        // E: 2, B: 2, S: 3, W: 1; G is the query
        let order = elimination_order(&factors, &g, EliminationStrategy::MinAppearance);
        assert_eq!(order, vec![w.clone(), e.clone(), b.clone(), s.clone()]);
    }

    #[test]
    fn query_never_eliminated() {
        let (a, b, c) = (binary("A"), binary("B"), binary("C"));
        let factors = vec![over(&[&a, &b]), over(&[&b, &c])];

        for &strategy in &[EliminationStrategy::MinAppearance, EliminationStrategy::MinFill, EliminationStrategy::MaxCardinality] {
            let order = elimination_order(&factors, &b, strategy);
            assert_eq!(order.len(), 2);
            assert!(order.contains(&a));
            assert!(order.contains(&c));
            assert!(!order.contains(&b));

            // an unmentioned query changes nothing
            let other = binary("Z");
            assert_eq!(elimination_order(&factors, &other, strategy).len(), 3);
        }

        assert!(elimination_order(&[], &a, EliminationStrategy::MinFill).is_empty());
    }

    #[test]
    fn min_fill_prefers_leaves() {
        // a star around H: eliminating H first would connect every leaf
        let (h, x, y, z, q) = (binary("H"), binary("X"), binary("Y"), binary("Z"), binary("Q"));
        let factors = vec![over(&[&h, &x]), over(&[&h, &y]), over(&[&h, &z]), over(&[&q, &x])];

        let order = elimination_order(&factors, &q, EliminationStrategy::MinFill);
        assert_eq!(order, vec![y.clone(), z.clone(), h.clone(), x.clone()]);
    }

    #[test]
    /// Example taken from Koller & Friedman Example 9.3 and Figure 9.11: the student network
    fn max_cardinality_is_a_permutation() {
        let names = ["C", "D", "I", "G", "S", "L", "J", "H"];
        let vars: Vec<Variable> = names.iter().map(|n| binary(n)).collect();
        let (c, d, i, g, s, l, j, h) = (&vars[0], &vars[1], &vars[2], &vars[3], &vars[4], &vars[5], &vars[6], &vars[7]);

        let factors = vec![
            over(&[c]),
            over(&[d, c]),
            over(&[i]),
            over(&[g, d, i]),
            over(&[s, i]),
            over(&[l, g]),
            over(&[j, l, s]),
            over(&[h, g, j]),
        ];

        let order = elimination_order(&factors, j, EliminationStrategy::MaxCardinality);
        assert_eq!(order.len(), 7);
        for v in vars.iter().filter(|&v| v != j) {
            assert!(order.contains(v));
        }

        // the first variable visited is eliminated last
        assert_eq!(order.last(), Some(c));
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&EliminationStrategy::MinFill).unwrap();
        assert_eq!(json, "\"min_fill\"");

        let s: EliminationStrategy = serde_json::from_str("\"max_cardinality\"").unwrap();
        assert_eq!(s, EliminationStrategy::MaxCardinality);
        assert_eq!(EliminationStrategy::default(), EliminationStrategy::MinAppearance);
    }
}
