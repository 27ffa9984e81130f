use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "farmops", version, about = "Farm decision-rule engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered farm types
    FarmTypes,
    /// List the stored scenarios for a farm type
    Scenarios {
        farm_type: String,

        /// Root directory of the scenario store
        #[arg(long, default_value = "scenarios")]
        scenarios_dir: PathBuf,
    },
    /// Evaluate the decision rules and print localized recommendations
    Recommend {
        farm_type: String,

        /// Stored scenario id to evaluate
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        scenario: Option<u32>,

        /// JSON file with decision inputs to evaluate instead of a scenario
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output language for reasons and labels
        #[arg(long, default_value = "az")]
        language: String,

        /// Root directory of the scenario store
        #[arg(long, default_value = "scenarios")]
        scenarios_dir: PathBuf,
    },
}
