// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use gestor_api::Client;
use gestor_app::AppState;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `gestor --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let mut state = AppState {
        active_section: config.start_section(),
        ..AppState::default()
    };

    if options.demo {
        if options.check_only {
            return Ok(());
        }
        let mut runtime = DemoRuntime::seeded(42, downloads_dir());
        return gestor_tui::run_app(&mut state, &mut runtime);
    }

    let client = Client::new(
        &config.api_base_url(),
        config.api_token().as_deref(),
        config.api_tenant(),
        config.api_timeout()?,
    )
    .with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/token/timeout values",
            options.config_path.display()
        )
    })?;

    let cache_dir = config.cache_dir()?;
    let _removed = gestor_api::files::evict_stale_cache(&cache_dir, config.cache_ttl_days())?;

    if options.check_only {
        client.ping().with_context(|| {
            format!(
                "API check against {} failed -- is the backend running?",
                client.base_url()
            )
        })?;
        return Ok(());
    }

    let mut runtime = ApiRuntime::new(
        client,
        cache_dir,
        downloads_dir(),
        config.recent_cotizaciones(),
    );
    gestor_tui::run_app(&mut state, &mut runtime)
}

fn downloads_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(env::temp_dir)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("gestor");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with seeded demo data (no network)");
    println!("  --check                  Validate config + API connectivity");
    println!("  --help                   Show this help");
}
