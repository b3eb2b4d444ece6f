//! Wires the browse workload into a goose attack.
//!
//! Goose has no arrival-rate executor, so the run configuration is mapped
//! onto the closest goose knobs:
//!
//! * `Users` is the worker ceiling (`K6_MAX_VUS`).
//! * `HatchRate` launches the preallocated pool (`K6_VUS`) every second.
//! * `ThrottleRequests` caps the aggregate request rate (`K6_REQ_RATE`).
//! * `RunTime` is the duration in whole seconds.
//!
//! Command-line flags passed to the binary still override every default.

use std::sync::Arc;
use std::time::Duration;

use goose::prelude::*;
use tracing::warn;

use crate::config::BrowseConfig;
use crate::transport::GooseTransport;
use crate::workload::{execute, Workload};

pub const SCENARIO_NAME: &str = "Browse";
pub const TRANSACTION_NAME: &str = "browse products";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackPlan {
    pub host: String,
    pub users: usize,
    pub hatch_rate: String,
    pub throttle_requests: usize,
    pub run_time: usize,
    pub report_file: String,
}

impl AttackPlan {
    pub fn from_config(config: &BrowseConfig) -> Self {
        Self {
            host: config.base_url.clone(),
            users: config.max_vus,
            hatch_rate: config.pre_allocated_vus.to_string(),
            throttle_requests: config.req_rate as usize,
            run_time: run_time_secs(config.duration),
            report_file: format!(
                "{}-{}.html",
                config.cloud.name.to_lowercase(),
                config.cloud.project_id
            ),
        }
    }
}

/// Whole seconds, rounded up so a sub-second duration still runs.
pub fn run_time_secs(duration: Duration) -> usize {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1) as usize
}

/// One goose iteration: sample, request, and flag the request as failed
/// when the status check does not hold.
pub async fn browse(user: &mut GooseUser, workload: &Workload) -> TransactionResult {
    let request = workload.sample(&mut rand::thread_rng());

    let mut transport = GooseTransport::new(user);
    let outcome = execute(request, &mut transport).await;
    if outcome.check.passed {
        return Ok(());
    }

    match transport.into_request() {
        Some(mut metric) => user.set_failure(outcome.check.name, &mut metric, None, None),
        None => {
            warn!(
                path = %request.target(),
                error = ?outcome.error,
                "request was not sent"
            );
            Ok(())
        }
    }
}

pub fn browse_scenario(workload: Arc<Workload>) -> Scenario {
    let closure: TransactionFunction = Arc::new(move |user| {
        let workload = Arc::clone(&workload);
        Box::pin(async move { browse(user, &workload).await })
    });

    Scenario::new(SCENARIO_NAME)
        .register_transaction(Transaction::new(closure).set_name(TRANSACTION_NAME))
}

pub fn build_attack(
    plan: &AttackPlan,
    workload: Arc<Workload>,
) -> Result<Box<GooseAttack>, GooseError> {
    GooseAttack::initialize()?
        .register_scenario(browse_scenario(workload))
        .set_default(GooseDefault::Host, plan.host.as_str())?
        .set_default(GooseDefault::Users, plan.users)?
        .set_default(GooseDefault::HatchRate, plan.hatch_rate.as_str())?
        .set_default(GooseDefault::ThrottleRequests, plan.throttle_requests)?
        .set_default(GooseDefault::RunTime, plan.run_time)?
        .set_default(GooseDefault::ReportFile, plan.report_file.as_str())
}
