//! Provides an example of how to use bnet to estimate the parameters of a Bayesian Network.
//!
//! Case records over Country, Age and Fatality are fitted to two structures: a mediator
//! (Country -> Age -> Fatality) and a confounder (Country <- Age -> Fatality). Every CPT of the
//! target networks starts out uniform.

use bnet as b;
use b::{ConditionalInferenceEngine, Estimator};
use tracing_subscriber::EnvFilter;

const AGES: [&str; 9] = ["0-9", "10-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80+"];

fn main() -> b::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let country = b::Variable::new("Country", &["Italy", "China"])?;
    let age = b::Variable::new("Age", &AGES)?;
    let fatality = b::Variable::new("Fatality", &["YES", "NO"])?;

    ////////////////////////////////////////////////////////////////////////////
    // Step 1:  Compile the dataset, one record per case
    let dataset = case_records(&country, &age, &fatality)?;
    println!("{} case records", dataset.len());

    ////////////////////////////////////////////////////////////////////////////
    // Step 2:  Build the target structures
    let mediator = b::BayesNetBuilder::new("mediator")
        .with_variable(&country, vec![], b::Initialization::Uniform)
        .with_variable(&age, vec![country.clone()], b::Initialization::Uniform)
        .with_variable(&fatality, vec![age.clone()], b::Initialization::Uniform)
        .build()?;

    let confounder = b::BayesNetBuilder::new("confounder")
        .with_variable(&age, vec![], b::Initialization::Uniform)
        .with_variable(&country, vec![age.clone()], b::Initialization::Uniform)
        .with_variable(&fatality, vec![age.clone()], b::Initialization::Uniform)
        .build()?;

    ////////////////////////////////////////////////////////////////////////////
    // Step 3:  Estimate the parameters of both
    for target in [&mediator, &confounder].iter() {
        let estimated = b::ModelMLEstimator::new(target)?.estimate(dataset.iter())?;

        println!("=== {} ===", estimated.name());
        for f in estimated.factors() {
            println!("{}", f);
        }

        ////////////////////////////////////////////////////////////////////////
        // Step 4:  Ask the estimated model a question
        let mut fatal = Vec::with_capacity(country.cardinality());
        for c in country.domain() {
            let mut evidence = b::Assignment::new();
            evidence.observe(&country, c)?;

            let p = b::VariableEliminationEngine::new(&estimated, &evidence)?.infer(&fatality)?;
            println!("P(Fatality = YES | Country = {}) = {:.4}", c, p[0]);
            fatal.push(p[0]);
        }

        // how strongly Country moves Fatality under this structure
        println!("|P(Fatality = YES | Italy) - P(Fatality = YES | China)| = {:.4}", (fatal[0] - fatal[1]).abs());
    }

    // A single CPT can also be estimated on its own
    let mut local = b::LocalMLEstimator::new(&fatality, &[age.clone()])?;
    println!("{}", local.estimate(dataset.iter())?);

    Ok(())
}

/// Synthetic case counts per age bracket, with a fatality rate rising with age
fn case_records(country: &b::Variable, age: &b::Variable, fatality: &b::Variable) -> b::Result<Vec<b::Assignment>> {
    let italy = [10, 20, 40, 60, 90, 140, 160, 140, 100];
    let china = [10, 20, 120, 170, 190, 200, 160, 90, 40];
    let fatal_per_thousand = [0, 2, 2, 4, 8, 20, 60, 120, 200];

    let vars = [country.clone(), age.clone(), fatality.clone()];
    let mut dataset = Vec::new();
    for (c, counts) in [("Italy", italy), ("China", china)].iter() {
        for (i, &ct) in counts.iter().enumerate() {
            let fatal = ct * fatal_per_thousand[i] / 1000 + 1;

            let yes = b::Assignment::from_record(&vars, &[*c, AGES[i], "YES"])?;
            let no = b::Assignment::from_record(&vars, &[*c, AGES[i], "NO"])?;
            dataset.extend(std::iter::repeat(yes).take(fatal));
            dataset.extend(std::iter::repeat(no).take(ct - fatal));
        }
    }

    Ok(dataset)
}
