use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use shared_chess::{server::serve_game, Game};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "One chess game, shared by every client", author, version)]
struct ServerArgs {
    /// Address to listen on
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:8000")]
    listen: SocketAddr,

    /// Log filter, in the same syntax as RUST_LOG
    #[arg(long, value_name = "FILTER", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    let filter = EnvFilter::try_new(&args.log).context("invalid --log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = serve_game(Game::new()).await;
    info!(addr = %args.listen, "serving chess game");
    axum::Server::bind(&args.listen)
        .serve(app.into_make_service())
        .await
        .context("server stopped")?;
    info!("exiting");
    Ok(())
}
