//! Command-line interface for texier
//! Converts texier markup files to HTML.
//!
//! Usage:
//!   texier convert `<path>` [--config `<file>`]  - Convert a file
//!   texier productions [--config `<file>`]       - List grammar productions
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use clap::{Arg, ArgMatches, Command};
use texier::texier::{Loader, Processor, TexierConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML file layered over the built-in defaults");

    let matches = Command::new("texier")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts texier markup to HTML")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the markup file")
                        .required(true)
                        .index(1),
                )
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("productions")
                .about("List grammar productions and whether they are enabled")
                .arg(config_arg),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("convert", convert_matches)) => {
            let path = convert_matches.get_one::<String>("path").unwrap();
            handle_convert_command(path, load_config(convert_matches));
        }
        Some(("productions", productions_matches)) => {
            handle_productions_command(load_config(productions_matches));
        }
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> TexierConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn build_processor(config: &TexierConfig) -> Processor {
    Processor::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(path: &str, config: TexierConfig) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let processor = build_processor(&config);
    println!("{}", processor.to_html(&source));
}

/// Handle the productions command
fn handle_productions_command(config: TexierConfig) {
    let processor = build_processor(&config);
    for production in processor.registry().productions() {
        let state = if production.is_enabled() { "on" } else { "off" };
        println!(
            "{:<7} {:<4} {}",
            production.namespace(),
            state,
            production.name()
        );
    }
}
