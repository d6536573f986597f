// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use chequebook_app::{AppState, ChequeBackend, UserId};
use chequebook_db::Store;
use chequebook_remote::Client;
use chequebook_testkit::ChequeFaker;
use config::{BackendKind, Config};
use log::info;
use runtime::LedgerRuntime;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;

const DEMO_USER: &str = "demo";
const DEMO_SEED: u64 = 2026;
const DEMO_CHEQUES: usize = 24;

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
            "load config {}; run `chequebook --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let kind = if options.demo {
        BackendKind::Sqlite
    } else {
        config.backend_kind()
    };

    if options.print_db_path {
        match kind {
            BackendKind::Sqlite => println!("{}", sqlite_path(&config, options.demo)?.display()),
            BackendKind::Rest => println!("{}", config.rest_url()),
        }
        return Ok(());
    }

    init_logging(&config)?;
    let date_display = config.date_display()?;

    let (backend, user): (Box<dyn ChequeBackend>, Option<UserId>) = match kind {
        BackendKind::Sqlite => {
            let store = open_store(&config, options.demo)?;
            let user = if options.demo {
                let user = config.user_id().unwrap_or_else(|| UserId::new(DEMO_USER));
                seed_demo_cheques(&store, &user)?;
                Some(user)
            } else {
                config.user_id()
            };
            (Box::new(store) as Box<dyn ChequeBackend>, user)
        }
        BackendKind::Rest => {
            let client = Client::new(
                config.rest_url(),
                config.api_key(),
                config.access_token(),
                config.timeout()?,
            )
            .with_context(|| {
                format!(
                    "invalid [backend] config in {}; fix url/api_key/timeout values",
                    options.config_path.display()
                )
            })?;
            if options.check_only {
                client.ping()?;
            }
            (Box::new(client) as Box<dyn ChequeBackend>, config.user_id())
        }
    };

    if options.check_only {
        return Ok(());
    }

    match &user {
        Some(user) => info!("starting session for {user}"),
        None => info!("starting without a user; set [session].user_id to load cheques"),
    }

    let mut state = AppState {
        active_tab: config.start_tab(),
        ..AppState::default()
    };
    let mut runtime = LedgerRuntime::new(backend, user);
    chequebook_tui::run_app(&mut state, &mut runtime, &date_display)
}

fn sqlite_path(config: &Config, demo: bool) -> Result<PathBuf> {
    if demo {
        Ok(PathBuf::from(":memory:"))
    } else {
        config.db_path()
    }
}

fn open_store(config: &Config, demo: bool) -> Result<Store> {
    let db_path = sqlite_path(config, demo)?;
    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [backend].db_path or {}",
            db_path.display(),
            chequebook_db::DB_PATH_ENV
        )
    })?;
    store.bootstrap()?;
    Ok(store)
}

fn seed_demo_cheques(store: &Store, user: &UserId) -> Result<()> {
    let mut faker = ChequeFaker::new(DEMO_SEED);
    for cheque in faker.batch(DEMO_CHEQUES) {
        store
            .insert_cheque(user, &cheque)
            .context("seed demo cheques")?;
    }
    info!("seeded {DEMO_CHEQUES} demo cheques for {user}");
    Ok(())
}

/// Logs go to `[log].path` only; the terminal belongs to the TUI.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {} -- check [log].path", path.display()))?;

    env_logger::Builder::new()
        .parse_filters(config.log_level())
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("initialize logger")?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
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
        print_db_path: false,
        demo: false,
        print_example: false,
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
            "--print-path" => {
                options.print_db_path = true;
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
    println!("chequebook");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path (or REST url)");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with generated cheques (in-memory)");
    println!("  --check                  Validate config and reach the backend, then exit");
    println!("  --help                   Show this help");
}
