use std::process;

use clap::{Arg, Command};
use tokio::net::TcpListener;
use tracing::{error, info};

use pawcare::api::{self, auth::UserDirectory};
use pawcare::config::Config;
use pawcare::store::DogStore;
use pawcare::{NAME, VERSION};

fn main() {
    println!("Starting {NAME} version {VERSION}");

    // Setup CLI
    let matches = Command::new(NAME)
        .version(VERSION)
        .about("PawCare API server")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .default_value("pawcare.toml"),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map_or("pawcare.toml", String::as_str);
    let cfg = Config::new(config_path).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {e}");
        process::exit(1);
    });

    // Setup logging
    let _guard = cfg.init_logger().unwrap_or_else(|e| {
        eprintln!("Error initializing logging: {e}");
        process::exit(1);
    });

    let users = match UserDirectory::new(&cfg.users) {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to load users: {e}");
            process::exit(1);
        }
    };

    let store = match seed_store(&cfg, &users) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to seed store: {e}");
            process::exit(1);
        }
    };

    let app = match api::create_router(store, users) {
        Ok(app) => app,
        Err(e) => {
            error!("Invalid request bindings: {e}");
            process::exit(1);
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(server(app, &cfg.server.listen)) {
        error!("Server error: {e}");
    }
    process::exit(1);
}

fn seed_store(cfg: &Config, users: &UserDirectory) -> Result<DogStore, String> {
    let mut store = DogStore::new();
    for user in users.users() {
        store.register_user(user.clone());
    }
    for seed in &cfg.categories {
        let category = seed
            .to_category()
            .map_err(|e| format!("category {}: {e}", seed.code))?;
        store.add_category(category).map_err(|e| e.to_string())?;
    }
    info!(
        users = cfg.users.len(),
        categories = cfg.categories.len(),
        "store seeded"
    );
    Ok(store)
}

async fn server(app: axum::Router, listen: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!(listen = %listen, "listening");
    axum::serve(listener, app).await
}
