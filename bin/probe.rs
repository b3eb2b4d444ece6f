use std::error::Error;
use std::process::ExitCode;

use dotenv::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use products_loadtest::config::ProbeConfig;
use products_loadtest::logger::init_logging;
use products_loadtest::transport::HyperTransport;
use products_loadtest::{run_iteration, IterationOutcome, Workload};

#[derive(Serialize)]
struct ProbeLine<'a> {
    url: String,
    #[serde(flatten)]
    outcome: &'a IterationOutcome,
}

#[derive(Serialize)]
struct Summary {
    iterations: usize,
    passed: usize,
    failed: usize,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    dotenv().ok();
    init_logging();

    let config = ProbeConfig::from_env()?;
    info!(base_url = %config.base_url, iterations = config.iterations, "probing product listing");

    let workload = Workload::default();
    let mut transport = HyperTransport::new(&config.base_url, config.timeout);
    let mut rng = StdRng::from_entropy();
    let mut passed = 0;

    for _ in 0..config.iterations {
        let outcome = run_iteration(&workload, &mut rng, &mut transport).await;
        if outcome.check.passed {
            passed += 1;
        } else {
            warn!(status = ?outcome.status, error = ?outcome.error, "check failed");
        }

        let line = ProbeLine {
            url: outcome.request.url(&config.base_url),
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    let summary = Summary {
        iterations: config.iterations,
        passed,
        failed: config.iterations - passed,
    };
    println!("{}", serde_json::to_string(&summary)?);

    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
