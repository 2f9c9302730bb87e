//! SSDB CLI Client
//!
//! Command-line interface for issuing single commands to an SSDB server.

use clap::{Parser, Subcommand};
use ssdb_client::{Client, Config, SsdbError};
use tracing_subscriber::{fmt, EnvFilter};

/// SSDB CLI
#[derive(Parser, Debug)]
#[command(name = "ssdb-cli")]
#[command(about = "CLI for SSDB key-value servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8888")]
    port: u16,

    /// Read/write deadline in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
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

    /// Increment a counter
    Incr {
        key: String,

        #[arg(default_value = "1", allow_hyphen_values = true)]
        by: i64,
    },

    /// List keys in (start, end]
    Keys {
        #[arg(default_value = "")]
        start: String,

        #[arg(default_value = "")]
        end: String,

        #[arg(short, long, default_value = "100")]
        limit: u64,
    },

    /// List key/value pairs in (start, end]
    Scan {
        #[arg(default_value = "")]
        start: String,

        #[arg(default_value = "")]
        end: String,

        #[arg(short, long, default_value = "100")]
        limit: u64,
    },

    /// List members of a sorted set by ascending score
    Zscan {
        name: String,

        #[arg(long)]
        min: Option<i64>,

        #[arg(long)]
        max: Option<i64>,

        #[arg(short, long, default_value = "100")]
        limit: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ssdb_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<(), SsdbError> {
    let mut client = Client::connect(config)?;

    match command {
        Commands::Get { key } => match client.get(&key) {
            Ok(value) => println!("{}", String::from_utf8_lossy(&value)),
            Err(e) if e.is_not_found() => println!("(not found)"),
            Err(e) => return Err(e),
        },
        Commands::Set { key, value } => {
            client.set(&key, &value)?;
            println!("ok");
        }
        Commands::Del { key } => {
            client.del(&key)?;
            println!("ok");
        }
        Commands::Incr { key, by } => {
            client.incr(&key, by)?;
            println!("ok");
        }
        Commands::Keys { start, end, limit } => {
            for key in client.keys(&start, &end, limit)? {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Scan { start, end, limit } => {
            for (key, value) in client.scan(&start, &end, limit)? {
                println!("{}\t{}", String::from_utf8_lossy(&key), String::from_utf8_lossy(&value));
            }
        }
        Commands::Zscan { name, min, max, limit } => {
            for (member, score) in client.zscan(&name, "", min, max, limit)? {
                println!("{}\t{}", String::from_utf8_lossy(&member), score);
            }
        }
    }

    client.close()
}
