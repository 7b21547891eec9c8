//! Provides an example of how to use bnet to represent Bayesian Networks.
//!
//! This example is taken from Koller & Friedman Exercise 3.4

use bnet as b;
use ndarray::array;

fn main() -> b::Result<()> {

    ///////////////////////////////////////////////////
    // Step 1: Define variables

    let difficulty = b::Variable::new("D", &["easy", "hard"])?;
    let intelligence = b::Variable::new("I", &["low", "high"])?;
    let grade = b::Variable::new("G", &["A", "B", "C"])?;
    let sat = b::Variable::new("S", &["low", "high"])?;
    let letter = b::Variable::new("L", &["weak", "strong"])?;

    ///////////////////////////////////////////////////
    // Step 2: Build CPTs for variables with parents
    let cpt_g = b::Factor::cpd(
        grade.clone(),
        vec![intelligence.clone(), difficulty.clone()],
        array![
            [[0.3, 0.4, 0.3], [0.05, 0.25, 0.7]],
            [[0.9, 0.08, 0.02], [0.5, 0.3, 0.2]]
        ].into_dyn()
    )?;

    let cpt_s = b::Factor::cpd(
        sat.clone(),
        vec![intelligence.clone()],
        array![
            [0.95, 0.05],
            [0.2, 0.8]
        ].into_dyn()
    )?;

    let cpt_l = b::Factor::cpd(
        letter.clone(),
        vec![grade.clone()],
        array![
            [0.1, 0.9],
            [0.4, 0.6],
            [0.99, 0.01]
        ].into_dyn()
    )?;

    ///////////////////////////////////////////////////
    // Step 3: Build the Model
    let model = b::BayesNetBuilder::new("student")
        .with_variable(&difficulty, vec![], b::Initialization::Binomial(0.6))
        .with_variable(&intelligence, vec![], b::Initialization::Binomial(0.7))
        .with_variable(&grade, vec![intelligence.clone(), difficulty.clone()], b::Initialization::Table(cpt_g))
        .with_variable(&sat, vec![intelligence.clone()], b::Initialization::Table(cpt_s))
        .with_variable(&letter, vec![grade.clone()], b::Initialization::Table(cpt_l))
        .build()?;

    for f in model.factors() {
        println!("{}", f);
    }

    ///////////////////////////////////////////////////
    // Step 4: Determine Probability of Assignments
    let scope = vec![intelligence.clone(), difficulty.clone(), grade.clone(), sat.clone(), letter.clone()];

    let mut acc = 0.0;
    for assignment in b::all_assignments(&scope) {
        let p = model.probability(&assignment)?;

        let values: Vec<String> = scope
            .iter()
            .map(|v| format!("{} = {}", v, assignment.value_of(v).unwrap_or("?")))
            .collect();
        println!("P({}) = {:.4}", values.join(", "), p);

        acc += p;
    }

    println!("---------------------------------------------");
    println!("TOTAL: {:.4}", acc);

    Ok(())
}
