//! Configuration for the lodgings service
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Lodgings API server
#[derive(Parser, Debug, Clone)]
#[command(name = "lodgings")]
#[command(about = "HTTP API for lodging listings backed by MongoDB")]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// MongoDB configuration
    #[command(flatten)]
    pub mongo: MongoArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// Run against an in-memory lodging store instead of MongoDB
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Drop fields the lodging schema does not declare before inserting
    #[arg(long, env = "STRIP_UNKNOWN", default_value = "false")]
    pub strip_unknown: bool,

    /// JSON file seeding the legacy /lodgings/{id} store (bundled seed if unset)
    #[arg(long, env = "LEGACY_SEED_PATH")]
    pub legacy_seed: Option<PathBuf>,
}

/// MongoDB connection configuration
#[derive(Parser, Debug, Clone)]
pub struct MongoArgs {
    /// Full connection URI; overrides the individual MONGO_* settings
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// MongoDB host
    #[arg(long, env = "MONGO_HOST", default_value = "localhost")]
    pub mongo_host: String,

    /// MongoDB port
    #[arg(long, env = "MONGO_PORT", default_value = "27017")]
    pub mongo_port: u16,

    /// MongoDB username (optional)
    #[arg(long, env = "MONGO_USER")]
    pub mongo_user: Option<String>,

    /// MongoDB password (optional)
    #[arg(long, env = "MONGO_PASSWORD")]
    pub mongo_password: Option<String>,

    /// Database holding the lodgings collection
    #[arg(long, env = "MONGO_DB_NAME", default_value = "lodgings")]
    pub mongo_db_name: String,
}

impl MongoArgs {
    /// Connection URI assembled from the individual settings
    pub fn uri(&self) -> String {
        if let Some(ref uri) = self.mongodb_uri {
            return uri.clone();
        }

        let credentials = match (&self.mongo_user, &self.mongo_password) {
            (Some(user), Some(password)) => format!("{}:{}@", user, password),
            (Some(user), None) => format!("{}@", user),
            _ => String::new(),
        };

        format!(
            "mongodb://{}{}:{}/{}",
            credentials, self.mongo_host, self.mongo_port, self.mongo_db_name
        )
    }

    /// Connection target safe to log (no credentials)
    pub fn display_target(&self) -> String {
        match self.mongodb_uri {
            Some(ref uri) => match uri.split_once('@') {
                Some((scheme_and_creds, rest)) => {
                    let scheme = scheme_and_creds
                        .split_once("://")
                        .map(|(scheme, _)| scheme)
                        .unwrap_or("mongodb");
                    format!("{}://***@{}", scheme, rest)
                }
                None => uri.clone(),
            },
            None => format!(
                "mongodb://{}:{}/{}",
                self.mongo_host, self.mongo_port, self.mongo_db_name
            ),
        }
    }
}

impl Args {
    /// Socket address the listener binds
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.mongo.mongo_db_name.trim().is_empty() {
            return Err("MONGO_DB_NAME must not be empty".to_string());
        }

        if self.mongo.mongo_password.is_some() && self.mongo.mongo_user.is_none() {
            return Err("MONGO_PASSWORD requires MONGO_USER".to_string());
        }

        Ok(())
    }
}
