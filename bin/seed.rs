use std::error::Error;

use dotenv::dotenv;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::postgres::PgPoolOptions;

use products_loadtest::logger::init_logging;
use products_loadtest::seed::{ProductSeeder, SeedConfig};
use products_loadtest::Catalog;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    init_logging();

    let config = SeedConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let seeder = ProductSeeder::new(&Catalog::default(), config.count, config.batch_size);
    let mut rng = StdRng::from_entropy();
    seeder.run(&pool, &mut rng).await?;

    Ok(())
}
