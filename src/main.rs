use anyhow::{Result, anyhow};
use clap::Parser;
use std::process::ExitCode;
use sysrules::cli::{Cli, Commands};
use sysrules::config::CaptureConfig;
use sysrules::console;
use sysrules::encoding::TextEncoding;
use sysrules::properties::{FILE_ENCODING, LINE_SEPARATOR, OS_NAME};
use sysrules::runner::CommandRunner;
use tracing::error;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run {
            mute,
            mute_for_successful_runs,
            log,
            command,
        } => {
            let config = CaptureConfig {
                mute,
                mute_for_successful_tests: mute_for_successful_runs,
                enable_log: log,
            };

            let (program, args) = command
                .split_first()
                .ok_or_else(|| anyhow!("No command given"))?;
            let outcome = CommandRunner::new(config).run(program, args)?;

            Ok(ExitCode::from(exit_code_byte(outcome.exit_code)))
        }
        Commands::Info => {
            let properties = console::properties();
            let encoding = TextEncoding::from_properties(&properties)?;

            println!("Property,Value");
            for key in [FILE_ENCODING, OS_NAME, LINE_SEPARATOR] {
                let value = properties.get(key).unwrap_or_default();
                println!("{},{}", key, value.escape_default());
            }
            println!("resolved.encoding,{}", encoding.name());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Exit codes that do not fit a byte still report failure.
fn exit_code_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
