//! Synthetic catalog for load runs.
//!
//! Products are generated from the same category and keyword lists the
//! browse workload filters on, so filtered listings return rows.

use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::{env_lookup, number};
use crate::error::SeedError;

pub const TITLE_PREFIX: &str = "LoadTest-Product-";
pub const DEFAULT_SEED_COUNT: usize = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub database_url: String,
    pub count: usize,
    pub batch_size: usize,
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, SeedError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(SeedError::MissingDatabaseUrl)?;
        Ok(Self {
            database_url,
            count: number(&lookup, "LOADTEST_SEED_COUNT", DEFAULT_SEED_COUNT)?,
            batch_size: number(&lookup, "LOADTEST_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
}

pub struct ProductSeeder {
    categories: Vec<&'static str>,
    keywords: Vec<&'static str>,
    count: usize,
    batch_size: usize,
}

impl ProductSeeder {
    pub fn new(catalog: &Catalog, count: usize, batch_size: usize) -> Self {
        Self {
            categories: catalog.real_categories().collect(),
            keywords: catalog.real_keywords().collect(),
            count,
            batch_size: batch_size.max(1),
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> NewProduct {
        let keyword = self.keywords.choose(rng).copied().unwrap_or("item");
        let category = self.categories.choose(rng).copied().unwrap_or("misc");

        NewProduct {
            title: format!("{}{}-{}", TITLE_PREFIX, keyword, index),
            description: format!("Synthetic {} item {}", keyword, index),
            category: category.trim().to_lowercase(),
            price: random_price(rng),
            stock: rng.gen_range(10..100),
        }
    }

    /// Sizes of the insert batches for `count` products.
    pub fn batches(&self) -> Vec<usize> {
        let mut sizes = vec![self.batch_size; self.count / self.batch_size];
        if self.count % self.batch_size != 0 {
            sizes.push(self.count % self.batch_size);
        }
        sizes
    }

    /// Replaces any previous synthetic rows and returns how many were inserted.
    pub async fn run<R: Rng + ?Sized>(&self, pool: &PgPool, rng: &mut R) -> Result<u64, SeedError> {
        info!(count = self.count, prefix = TITLE_PREFIX, "seeding synthetic products");

        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM products WHERE title LIKE $1")
            .bind(format!("{}%", TITLE_PREFIX))
            .execute(&mut tx)
            .await?
            .rows_affected();
        info!(removed, "removed previous synthetic products");

        let mut inserted = 0;
        let mut index = 0;
        for size in self.batches() {
            let batch: Vec<NewProduct> = (index..index + size)
                .map(|i| self.generate(i, rng))
                .collect();
            index += size;

            inserted += insert_batch(&mut tx, &batch).await?;
        }

        tx.commit().await?;
        info!(inserted, "seed completed");

        Ok(inserted)
    }
}

async fn insert_batch(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    batch: &[NewProduct],
) -> Result<u64, SeedError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO products (title, description, category, price, stock, created_at, updated_at, version) ",
    );
    builder.push_values(batch, |mut row, product| {
        row.push_bind(product.title.as_str())
            .push_bind(product.description.as_str())
            .push_bind(product.category.as_str())
            .push_bind(product.price)
            .push_bind(product.stock)
            .push("now()")
            .push("now()")
            .push("0");
    });

    let result = builder.build().execute(&mut *tx).await?;
    Ok(result.rows_affected())
}

fn random_price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let value: f64 = rng.gen_range(5.0..200.0);
    (value * 100.0).round() / 100.0
}
