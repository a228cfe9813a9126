//! Lodgings API server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use lodgings::{
    config::Args,
    db::{schemas::lodging_schema, LodgingStore, MemoryLodgingStore, MongoClient},
    legacy::LegacyStore,
    logging, server,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_json);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("Listen: {}", args.listen_addr());
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("Strip unknown fields: {}", args.strip_unknown);

    let legacy = LegacyStore::load(args.legacy_seed.as_deref())?;

    // The listener is only bound once the store is usable
    let store: Arc<dyn LodgingStore> = if args.dev_mode {
        warn!("Development mode: lodgings are kept in memory and lost on exit");
        Arc::new(MemoryLodgingStore::new())
    } else {
        info!("MongoDB: {}", args.mongo.display_target());
        match MongoClient::new(&args.mongo.uri(), &args.mongo.mongo_db_name).await {
            Ok(client) => Arc::new(client.lodgings()),
            Err(e) => {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    let state = Arc::new(server::AppState::new(
        store,
        legacy,
        lodging_schema(args.strip_unknown),
    ));

    if let Err(e) = server::run(state, args.listen_addr()).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
