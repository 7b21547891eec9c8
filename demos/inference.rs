//! Provides an example of how to use bnet to perform inference on a Bayesian Network.
//!
//! The network is the burglary alarm: an Earthquake or a Burglary sets off the Alarm, which makes
//! the neighbour Gossip and the alarm company Warn.
//!
//! Set `BNET_CONFIG` to a JSON `InferenceConfig` to change the elimination heuristic or the sampler,
//! and `RUST_LOG=bnet=debug` to watch the engines work. Without a configuration the sampler uses
//! full likelihood weighting, since the evidence here sits on non-root variables.

use bnet as b;
use b::ConditionalInferenceEngine;
use tracing_subscriber::EnvFilter;

fn main() -> b::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = match std::env::var("BNET_CONFIG") {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            eprintln!("ignoring malformed BNET_CONFIG: {}", e);
            b::InferenceConfig::default()
        }),
        Err(_) => {
            let mut config = b::InferenceConfig::default();
            config.sampling.weighting = b::Weighting::Full;
            config
        }
    };

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let alarm = build_model()?;
    let model = &alarm.model;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut evidence = b::Assignment::new();
    evidence.observe(&alarm.gossip, "yes")?;
    evidence.observe(&alarm.warn, "yes")?;

    /////////////////////////////////////////////////////
    // Step 3: Build the inference engines
    let mut exact = b::VariableEliminationEngine::new(model, &evidence)?.with_strategy(config.elimination);
    let mut approx = b::ImportanceSamplingEngine::new(model, &evidence).with_config(config.sampling.clone());

    /////////////////////////////////////////////////////
    // Step 4: Run some Conditional Queries
    for query in [&alarm.burglary, &alarm.earthquake, &alarm.alarm].iter() {
        let p_exact = exact.infer(query)?;
        let p_approx = approx.infer(query)?;

        for (i, value) in query.domain().iter().enumerate() {
            println!(
                "P({} = {} | G = yes, W = yes)\texact {:.4}\tsampled {:.4}",
                query, value, p_exact[i], p_approx[i]
            );
        }
    }

    /////////////////////////////////////////////////////
    // Step 5: The same queries through the one-shot functions
    let observed = evidence.clone();
    let evidence_vars = vec![alarm.gossip.clone(), alarm.warn.clone()];
    let p = b::variable_elimination(model, &alarm.burglary, &evidence_vars, &observed)?;
    // sample_bn always uses prior-only weighting
    let q = b::sample_bn(model, &alarm.burglary, &evidence_vars, &observed, config.sampling.samples)?;
    println!("P(B | G = yes, W = yes) = {:?} (exact), {:?} (sampled)", p, q);

    Ok(())
}

struct Alarm {
    earthquake: b::Variable,
    burglary: b::Variable,
    alarm: b::Variable,
    gossip: b::Variable,
    warn: b::Variable,
    model: b::BayesNet
}

fn build_model() -> b::Result<Alarm> {
    let yes_no = ["yes", "no"];
    let earthquake = b::Variable::new("E", &yes_no)?;
    let burglary = b::Variable::new("B", &yes_no)?;
    let alarm = b::Variable::new("S", &yes_no)?;
    let gossip = b::Variable::new("G", &yes_no)?;
    let warn = b::Variable::new("W", &yes_no)?;

    ///////////////////////////////////////////////////
    // Step 1: Fill the CPTs row by row
    let mut p_e = b::Factor::zeros("P(E)", vec![earthquake.clone()])?;
    p_e.add_values(&[(vec!["yes"], 0.1), (vec!["no"], 0.9)])?;

    let mut p_b = b::Factor::zeros("P(B)", vec![burglary.clone()])?;
    p_b.add_values(&[(vec!["yes"], 0.1), (vec!["no"], 0.9)])?;

    let mut p_s = b::Factor::zeros("P(S|E,B)", vec![alarm.clone(), earthquake.clone(), burglary.clone()])?;
    p_s.add_values(&[
        (vec!["yes", "yes", "yes"], 0.9),
        (vec!["yes", "yes", "no"], 0.2),
        (vec!["yes", "no", "yes"], 0.8),
        (vec!["yes", "no", "no"], 0.0),
        (vec!["no", "yes", "yes"], 0.1),
        (vec!["no", "yes", "no"], 0.8),
        (vec!["no", "no", "yes"], 0.2),
        (vec!["no", "no", "no"], 1.0),
    ])?;

    let mut p_g = b::Factor::zeros("P(G|S)", vec![gossip.clone(), alarm.clone()])?;
    p_g.add_values(&[
        (vec!["yes", "yes"], 0.5),
        (vec!["yes", "no"], 0.0),
        (vec!["no", "yes"], 0.5),
        (vec!["no", "no"], 1.0),
    ])?;

    let mut p_w = b::Factor::zeros("P(W|S)", vec![warn.clone(), alarm.clone()])?;
    p_w.add_values(&[
        (vec!["yes", "yes"], 0.8),
        (vec!["yes", "no"], 0.2),
        (vec!["no", "yes"], 0.2),
        (vec!["no", "no"], 0.8),
    ])?;

    ///////////////////////////////////////////////////
    // Step 2: Build the Model
    let model = b::BayesNet::new(
        "alarm",
        vec![earthquake.clone(), burglary.clone(), alarm.clone(), gossip.clone(), warn.clone()],
        vec![p_e, p_b, p_s, p_g, p_w]
    )?;

    Ok(Alarm { earthquake, burglary, alarm, gossip, warn, model })
}
