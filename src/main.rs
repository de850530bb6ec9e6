use std::net::TcpListener;

use dotenv::dotenv;
use log::info;

use filedesk::config::ServerConfig;
use filedesk::state::AppState;
use filedesk::{db, server, utils};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env();

    let users = db::create_repository(config.database_url.as_deref())
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;
    let storage = utils::storage::create_storage(&config).await;
    let state = AppState::new(users, storage, &config);

    let listener = TcpListener::bind(("0.0.0.0", config.port))?;
    info!("Starting server at {}", listener.local_addr()?);

    server::serve(state, listener, None)?.await
}
