use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sysrules",
    version,
    about = "Run a command with its standard output and error intercepted, muted or replayed only on failure."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command with its output intercepted
    #[command(visible_aliases = ["exec"])]
    Run {
        /// Do not write the command's output
        #[arg(short, long)]
        mute: bool,

        /// Only write the command's output if it exits with a non-zero code
        #[arg(short = 's', long)]
        mute_for_successful_runs: bool,

        /// Log the command's output and report how much was captured
        #[arg(short, long)]
        log: bool,

        /// The command to run, followed by its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Print the platform properties used to decode captured output
    Info,
}
