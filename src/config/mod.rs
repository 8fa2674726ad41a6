pub mod toml_config;

pub use toml_config::{AppConfig, FirebaseConfig};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_required_field, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "megasena-results", version)]
#[command(about = "Read Mega-Sena draw history from Firestore and check tickets")]
pub struct CliConfig {
    /// Path to a TOML configuration file with a [firebase] section
    #[arg(short, long, env = "MEGASENA_CONFIG")]
    pub config: Option<String>,

    /// Firebase project id
    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Web API key sent as the `key` query parameter
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Firestore REST root [default: https://firestore.googleapis.com/v1]
    #[arg(long, env = "FIRESTORE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Firestore database id [default: (default)]
    #[arg(long, env = "FIRESTORE_DATABASE")]
    pub database: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the most recent draws, newest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Show a single draw by document id or contest number
    Draw {
        #[arg(required_unless_present = "contest", conflicts_with = "contest")]
        id: Option<String>,
        #[arg(long)]
        contest: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Compare tickets against a drawn set
    Check {
        /// Drawn numbers, comma separated
        #[arg(
            long,
            conflicts_with_all = ["latest", "contest"],
            required_unless_present_any = ["latest", "contest"]
        )]
        drawn: Option<String>,

        /// Use the numbers of the most recent draw
        #[arg(long, conflicts_with = "contest")]
        latest: bool,

        /// Use the numbers of the given contest
        #[arg(long)]
        contest: Option<u64>,

        /// Ticket numbers, comma separated; repeat for several tickets
        #[arg(long = "ticket", required = true)]
        tickets: Vec<String>,
    },
    /// Most and least drawn numbers across the recent draws
    Stats {
        #[arg(long, default_value = "10")]
        top: usize,
        /// Only count the newest N draws
        #[arg(long)]
        last: Option<usize>,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 先讀設定檔（沒有就用預設值），再以有給的命令列參數或環境變數覆蓋
    pub fn firebase_config(&self) -> Result<FirebaseConfig> {
        let mut firebase = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AppConfig::from_file(path)?.firebase
            }
            None => FirebaseConfig {
                project_id: validate_required_field("project_id", &self.project_id)?.clone(),
                ..FirebaseConfig::default()
            },
        };

        if let Some(project_id) = &self.project_id {
            firebase.project_id = project_id.clone();
        }
        if let Some(api_key) = &self.api_key {
            firebase.api_key = Some(api_key.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            firebase.endpoint = endpoint.clone();
        }
        if let Some(database) = &self.database {
            firebase.database = database.clone();
        }

        firebase.validate()?;
        Ok(firebase)
    }
}
