pub mod attack;
pub mod catalog;
pub mod check;
pub mod config;
pub mod error;
pub mod logger;
pub mod seed;
pub mod transport;
pub mod workload;

pub use catalog::Catalog;
pub use check::{CheckResult, STATUS_IS_200};
pub use config::BrowseConfig;
pub use error::{ConfigError, SeedError, TransportError};
pub use transport::Transport;
pub use workload::{execute, run_iteration, BrowseRequest, IterationOutcome, Workload};
