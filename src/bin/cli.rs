//! TycoonKV CLI Client
//!
//! Command-line interface for running operations against a running server.

use std::collections::HashMap;
use std::io::Write;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use tycoonkv::{Config, Conn, TycoonError};

/// TycoonKV CLI
#[derive(Parser, Debug)]
#[command(name = "tycoonkv-cli")]
#[command(about = "CLI for Kyoto Tycoon-compatible key-value stores")]
#[command(version)]
struct Args {
    /// Server hostname
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "1978")]
    port: u16,

    /// Pooled connections to keep
    #[arg(long, default_value = "4")]
    pool_size: usize,

    /// Per-call deadline in milliseconds
    #[arg(long, default_value = "2000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Count the records in the store
    Count,

    /// List keys matching a prefix
    Match {
        /// The key prefix to match
        prefix: String,

        /// Maximum number of keys to return (-1 for no limit)
        #[arg(short, long, default_value = "-1")]
        max: i64,
    },

    /// Get several keys at once
    GetBulk {
        /// The keys to get
        keys: Vec<String>,
    },

    /// Set several key=value pairs at once
    SetBulk {
        /// Pairs in key=value form
        pairs: Vec<String>,
    },

    /// Delete several keys at once
    DelBulk {
        /// The keys to delete
        keys: Vec<String>,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tycoonkv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .pool_size(args.pool_size)
        .timeout_ms(args.timeout_ms)
        .build();

    let conn = match Conn::with_config(config) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to connect to {}:{}: {}", args.host, args.port, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&conn, args.command) {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Execute one subcommand and print its result
fn run(conn: &Conn, command: Commands) -> tycoonkv::Result<()> {
    match command {
        Commands::Get { key } => {
            let value = conn.get(&key)?;
            // Values are arbitrary bytes; write them through unmodified.
            if let Err(e) = std::io::stdout().write_all(&value) {
                tracing::error!("Failed to write value: {}", e);
                std::process::exit(1);
            }
            println!();
        }
        Commands::Set { key, value } => {
            conn.set(&key, value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            conn.remove(&key)?;
            println!("OK");
        }
        Commands::Count => {
            println!("{}", conn.count()?);
        }
        Commands::Match { prefix, max } => match conn.match_prefix(&prefix, max) {
            Ok(keys) => {
                for key in keys {
                    println!("{}", key);
                }
            }
            Err(TycoonError::Success) => {
                // The legacy empty-match sentinel; nothing to print.
            }
            Err(e) => return Err(e),
        },
        Commands::GetBulk { keys } => {
            let found = conn.get_bulk(&keys)?;
            for (key, value) in found {
                println!("{}\t{}", key, String::from_utf8_lossy(&value));
            }
        }
        Commands::SetBulk { pairs } => {
            let mut entries = HashMap::new();
            for pair in pairs {
                match pair.split_once('=') {
                    Some((k, v)) => {
                        entries.insert(k.to_string(), v.as_bytes().to_vec());
                    }
                    None => {
                        tracing::error!("Malformed pair (expected key=value): {}", pair);
                        std::process::exit(2);
                    }
                }
            }
            println!("{}", conn.set_bulk(&entries)?);
        }
        Commands::DelBulk { keys } => {
            println!("{}", conn.remove_bulk(&keys)?);
        }
    }
    Ok(())
}
