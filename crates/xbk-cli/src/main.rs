mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xbk")]
#[command(about = "Exchange broker core CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> venue -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replay a JSON-lines script of commands and gateway events against a
    /// paper venue, printing every broker event as a JSON line.
    Replay {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// JSON-lines script; "-" reads stdin
        #[arg(long)]
        input: String,

        /// Refuse configs carrying keys nothing reads (default: warn)
        #[arg(long, default_value_t = false)]
        fail_on_unused_keys: bool,
    },
}

fn main() -> Result<()> {
    // Missing file is fine.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            commands::init_tracing("info");
            let loaded = xbk_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Replay {
            config_paths,
            input,
            fail_on_unused_keys,
        } => commands::replay::run(&config_paths, &input, fail_on_unused_keys)?,
    }

    Ok(())
}
