// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tourbox_driver")]
#[command(author, version, about = "TourBox Elite Linux Driver")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the driver against the attached device
    #[command(visible_alias = "r")]
    Run {
        /// Settings file with per-application mappings
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,
    },

    /// Compile a settings file and report problems, without a device
    #[command(visible_aliases = ["lint", "c"])]
    Check {
        /// Settings file to compile
        #[arg(value_name = "SETTINGS")]
        settings: PathBuf,
    },

    /// Write a settings file that exercises every modifier+control combination
    #[command(visible_alias = "gen")]
    GenTest {
        /// Where to write the generated file
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },

    /// List the bindable control names
    #[command(visible_alias = "ctl")]
    Controls,

    /// List the supported KEY_* names
    #[command(visible_alias = "k")]
    Keys,
}
