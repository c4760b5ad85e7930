use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imgw-collector")]
#[command(about = "Current and historical IMGW synop weather data collector")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Worker threads [default: number of CPUs]")]
    pub max_workers: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch current observations from the station API
    Current {
        #[arg(short, long = "location", required = true, num_args = 1..)]
        locations: Vec<String>,
    },

    /// Fetch historical observations from the yearly archives
    Historical {
        #[arg(short, long = "location", required = true, num_args = 1..)]
        locations: Vec<String>,

        #[arg(short, long = "year", num_args = 1.., help = "Years to search [default: from configuration]")]
        years: Vec<i32>,

        #[arg(long, help = "Merge every matching archive instead of stopping at the first")]
        collect_all: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Historical {
            locations: vec!["Szczecin".to_string()],
            years: Vec::new(),
            collect_all: false,
        }
    }
}
