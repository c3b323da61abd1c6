use clap::Parser;
use client::{Client, ClientError};
use log::info;
use shared::DEFAULT_PORT;
use tokio::io::BufReader;
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hangman terminal client", long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let stream = TcpStream::connect(&args.server).await?;
    println!("Connected to server {}", stream.peer_addr()?);

    let mut client = Client::new(stream, BufReader::new(tokio::io::stdin()), std::io::stdout());
    match client.run().await {
        Ok(()) => Ok(()),
        Err(ClientError::Rejected) => {
            eprintln!("\nYou entered an incorrect username or password - disconnecting");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\nError occurred whilst playing Hangman: {}. Exiting...", e);
            std::process::exit(1);
        }
    }
}
