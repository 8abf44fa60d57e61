use clap::{Parser, Subcommand};

mod commands;
mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "jsonpad")]
#[command(about = "Find and replace in plain-text and JSON documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// List every match of a pattern
    Find(commands::find::FindArgs),

    /// Replace the first match, or every match with --all
    Replace(commands::replace::ReplaceArgs),

    /// Step through matches interactively, reading commands from stdin
    Navigate(commands::navigate::NavigateArgs),

    /// Display current configuration
    ShowConfig,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_create();

    let result = match &cli.action {
        Action::Find(args) => commands::find::run(args, &config),
        Action::Replace(args) => commands::replace::run(args, &config),
        Action::Navigate(args) => commands::navigate::run(args, &config),
        Action::ShowConfig => {
            commands::show_config::run(&config);
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
