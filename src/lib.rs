pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::firestore::FirestoreStore;
pub use config::{AppConfig, FirebaseConfig};
pub use crate::core::{matching::compute_matches, results::ResultsService, statistics::summarize};
pub use domain::model::{DrawRecord, DrawStatistics, NumberSet, TicketMatchResult};
pub use utils::error::{Result, ResultsError};
