//! GG-VERIFY entry point.
//!
//! ## CLI Subcommands
//!
//! - `gg-verify` or `gg-verify run` - Run the check battery (default)
//! - `gg-verify config show` - Print effective configuration
//! - `gg-verify profile defaults` - Print the built-in profile

use std::path::Path;
use std::process::ExitCode;

use gg_verify::cli::{self, config_cmd, profile_cmd};
use gg_verify::config;
use gg_verify::telemetry::init_logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("run");

    match command {
        "run" | "" => {
            let cfg = config::load();
            if let Err(e) = init_logging(&cfg.log) {
                eprintln!("Logging setup failed: {e}");
                return ExitCode::from(cli::EXIT_CONFIG);
            }
            ExitCode::from(cli::run(&cfg))
        }
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show();
                    ExitCode::SUCCESS
                }
                "validate" => ExitCode::from(config_cmd::run_validate()),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    ExitCode::from(cli::EXIT_CONFIG)
                }
            }
        }
        "profile" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("defaults");
            match (subcommand, args.get(3)) {
                ("defaults", _) => ExitCode::from(profile_cmd::run_defaults()),
                ("check", Some(path)) => ExitCode::from(profile_cmd::run_check(Path::new(path))),
                _ => {
                    eprintln!("Unknown profile subcommand: {}", subcommand);
                    print_command_help("profile");
                    ExitCode::from(cli::EXIT_CONFIG)
                }
            }
        }
        "help" | "--help" | "-h" => {
            if let Some(subcommand) = args.get(2) {
                print_command_help(subcommand);
            } else {
                print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("gg-verify {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::from(cli::EXIT_CONFIG)
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "gg-verify - Security control verification harness v{}

USAGE:
    gg-verify [COMMAND]

COMMANDS:
    run          Run the check battery (default when no command given)
    config       Inspect configuration (show, validate)
    profile      Inspect profiles (defaults, check PATH)
    version      Show version information
    help         Show this help message

EXIT CODES:
    0  all checks passed
    1  a check failed or no checks ran
    2  configuration or profile error
    3  report could not be written

ENVIRONMENT:
    GG_VERIFY_REPORT_PATH   JSON report path (default: encryption_test_report.json)
    GG_VERIFY_PROFILE       TOML profile path (default: built-in)
    GG_VERIFY_STORE         memory | sqlite::memory: | none | PATH (default: memory)
    GG_VERIFY_KEEP_STORE    Keep seeded credentials after the run (default: false)
    GG_VERIFY_LOG_FORMAT    pretty | json (default: pretty)
    GG_VERIFY_LOG_LEVEL     tracing filter (default: warn)
    GG_VERIFY_LOG_FILE      Write logs to this file (default: stderr)",
        version
    );
}

fn print_command_help(command: &str) {
    match command {
        "config" => eprintln!(
            "gg-verify config [SUBCOMMAND]

SUBCOMMANDS:
    show       Print effective configuration (default)
    validate   Check paths, log filter and profile; exit 2 on problems"
        ),
        "profile" => eprintln!(
            "gg-verify profile [SUBCOMMAND]

SUBCOMMANDS:
    defaults     Print the built-in profile as TOML (default)
    check PATH   Parse a profile file and summarize it"
        ),
        "run" => eprintln!(
            "gg-verify run

Runs self-tests and every check group, prints progress and the report,
and writes the JSON report to GG_VERIFY_REPORT_PATH."
        ),
        _ => print_usage(),
    }
}
