use clap::Parser;
use log::{error, info};
use server::corpus::PhraseList;
use server::credentials::CredentialStore;
use server::leaderboard::Leaderboard;
use server::{Server, ServerConfig, ServerContext};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-client hangman server", long_about = None)]
struct Args {
    /// TOML configuration file; flags below override its values
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of worker tasks (concurrent sessions)
    #[arg(short = 'w', long)]
    pool_size: Option<usize>,

    /// Credential file
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Phrase file
    #[arg(long)]
    phrases: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, server::ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(pool_size) = self.pool_size {
            config.pool_size = pool_size;
        }
        if let Some(credentials) = self.credentials {
            config.credentials_path = credentials;
        }
        if let Some(phrases) = self.phrases {
            config.phrases_path = phrases;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    let credentials = CredentialStore::from_file(&config.credentials_path)?;
    info!(
        "Loaded {} accounts from {}",
        credentials.len(),
        config.credentials_path.display()
    );
    let corpus = PhraseList::from_file(&config.phrases_path)?;
    info!(
        "Loaded {} phrases from {}",
        corpus.len(),
        config.phrases_path.display()
    );

    let context = ServerContext {
        credentials: Arc::new(credentials),
        corpus: Arc::new(corpus),
        leaderboard: Arc::new(Leaderboard::new()),
    };

    let server = Server::bind(&config, context).await?;
    info!("Serving with {} workers", config.pool_size);

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received");
                shutdown.trigger();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    });

    server.run().await?;
    info!("Server stopped");
    Ok(())
}
