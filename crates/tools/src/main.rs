use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dshare_tools::{connect, logging, Config, Connection, EnvSecrets, ResolvedConnection};

#[derive(Parser)]
#[command(name = "dshare")]
#[command(about = "Dshare toolchain configuration: networks, compiler and test runner")]
struct Cli {
    /// Config file to use instead of ./dshare.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration
    Config {
        /// Print as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// List network profiles
    Networks,
    /// Show contract source and build directories resolved against the working directory
    Paths,
    /// Describe a network profile without reading secrets
    Describe {
        /// Network name (e.g. sepolia, development)
        network: String,
    },
    /// Resolve a network's connection, checking its secrets are set
    Connect {
        /// Network name (e.g. sepolia, development)
        network: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let config = match &cli.config {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => dshare_tools::load_config().context("failed to load configuration")?,
    };

    match cli.command {
        Commands::Config { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                config.print_summary();
            }
        }
        Commands::Networks => {
            for name in config.network_names() {
                println!("{}", name);
            }
        }
        Commands::Paths => {
            let layout = config.paths.resolve(&std::env::current_dir()?);
            println!("Contracts:    {}", layout.contracts_directory.display());
            println!("Build output: {}", layout.contracts_build_directory.display());
        }
        Commands::Describe { network } => {
            let descriptor = config.describe(&network)?;
            println!("Network:  {}", descriptor.name);
            println!("Chain ID: {}", descriptor.chain_id);
            match &descriptor.connection {
                Connection::Host { host, port } => println!("Host:     {}:{}", host, port),
                Connection::Provider(factory) => {
                    println!("Provider: key from {}, endpoint from {}", factory.key_var, factory.url_var)
                }
            }
        }
        Commands::Connect { network } => {
            let descriptor = config.describe(&network)?;
            let secrets = EnvSecrets::with_dotenv();
            let connection = match connect(&descriptor, &secrets) {
                Ok(connection) => connection,
                Err(err) => {
                    if let Some(var) = err.missing_var() {
                        eprintln!("hint: add {}=... to .env or export it before running", var);
                    }
                    return Err(err).with_context(|| format!("cannot connect to network '{}'", network));
                }
            };
            match connection {
                ResolvedConnection::Direct { url } => println!("{} -> {} (no signer)", network, url),
                ResolvedConnection::Wallet(wallet) => println!(
                    "{} -> {} ({} signing address(es))",
                    network,
                    wallet.endpoint(),
                    wallet.number_of_addresses
                ),
            }
        }
    }

    Ok(())
}
