//! Makhzan CLI - Database migrations and QR tooling.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! makhzan-cli migrate
//!
//! # Write the QR PNG for a payload
//! makhzan-cli qr encode 0b8e9c52-6d6f-4a0e-9f3a-1c2d3e4f5a6b -o product.png
//!
//! # Decode a QR image back to its payload
//! makhzan-cli qr decode product.png
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `qr encode` / `qr decode` - Codec round-trips from the command line

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "makhzan-cli")]
#[command(author, version, about = "Makhzan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// QR codec round-trips
    Qr {
        #[command(subcommand)]
        action: QrAction,
    },
}

#[derive(Subcommand)]
enum QrAction {
    /// Encode a payload into a QR PNG
    Encode {
        /// The payload string to encode
        payload: String,

        /// Output file path
        #[arg(short, long, default_value = "qr.png")]
        out: PathBuf,
    },
    /// Decode the QR code in an image and print its payload
    Decode {
        /// Path to the image file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "makhzan_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await.map_err(|e| e.to_string()),
        Commands::Qr { action } => match action {
            QrAction::Encode { payload, out } => {
                commands::qr::encode(&payload, &out).map_err(|e| e.to_string())
            }
            QrAction::Decode { path } => commands::qr::decode(&path).map_err(|e| e.to_string()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
