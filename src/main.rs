// ripple-rs: Git commit propagation and branch refresh
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> config --> Logging --> Command Dispatch
//!   Propagate | Refresh | Branches | Log | Fetch | Pull | Repos | Config
//! ```

use std::process::ExitCode;

use ripple_rs::cli::{self, Command};
use ripple_rs::cmd::config::{build_config_loader, run_inis_command, run_options_command};
use ripple_rs::cmd::propagate::run_propagate_command;
use ripple_rs::cmd::refresh::run_refresh_command;
use ripple_rs::cmd::repo::{
    run_branches_command, run_fetch_command, run_log_command, run_pull_command,
};
use ripple_rs::cmd::repos::run_repos_command;
use ripple_rs::config::Config;
use ripple_rs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    if let Some(Command::Version) = cli.command {
        handle_version_command();
        return ExitCode::SUCCESS;
    }

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(Command::Inis) = cli.command {
        run_inis_command(&loader.format_loaded_files());
        return ExitCode::SUCCESS;
    }
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&build_log_config(&config)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(config.global.log_file.clone())
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version | Command::Inis) => Ok(()),
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Branches(args)) => run_branches_command(args, config),
        Some(Command::Log(args)) => run_log_command(args, config),
        Some(Command::Propagate(args)) => run_propagate_command(args, config).await,
        Some(Command::Refresh(args)) => run_refresh_command(args, config).await,
        Some(Command::Fetch(args)) => run_fetch_command(args, config),
        Some(Command::Pull(args)) => run_pull_command(args, config),
        Some(Command::Repos(args)) => run_repos_command(args, config),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
