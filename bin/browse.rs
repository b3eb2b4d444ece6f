use std::error::Error;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;

use products_loadtest::attack::{build_attack, AttackPlan};
use products_loadtest::logger::init_logging;
use products_loadtest::{BrowseConfig, Workload};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    init_logging();

    let config = BrowseConfig::from_env()?;
    let plan = AttackPlan::from_config(&config);
    info!(
        host = %plan.host,
        rate = config.req_rate,
        pre_allocated_vus = config.pre_allocated_vus,
        max_vus = config.max_vus,
        run_time = plan.run_time,
        project_id = config.cloud.project_id,
        name = %config.cloud.name,
        "starting browse load test"
    );

    let metrics = build_attack(&plan, Arc::new(Workload::default()))?
        .execute()
        .await?;

    info!(duration = metrics.duration, "browse load test finished");

    Ok(())
}
