//! update-gate - Blocking update notice for terminal applications

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use update_gate::bridge::SimulatedBridge;
use update_gate::{Config, UpdateLifecycleController};

fn main() -> Result<()> {
    // Parse CLI arguments
    let command = parse_args()?;
    init_logging(&command)?;

    match command {
        Command::Run => update_gate::app::run(load_config()?),
        Command::Check => check_cli(),
        Command::ConfigPath => {
            println!("{}", Config::default_path()?.display());
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    Check,
    ConfigPath,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    let Some(first) = args.get(1) else {
        return Ok(Command::Run);
    };

    match first.as_str() {
        "run" => Ok(Command::Run),
        "check" => Ok(Command::Check),
        "config" => Ok(Command::ConfigPath),
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'update-gate --help' for usage"
        )),
    }
}

/// Logging goes to a file while the TUI owns the terminal, to stderr otherwise
/// (`RUST_LOG=debug` for verbose output)
fn init_logging(command: &Command) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if matches!(command, Command::Run) {
        let path = update_gate::paths::log_path()?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

/// Load the config, writing the defaults on first launch
fn load_config() -> Result<Config> {
    let path = Config::default_path()?;
    let config = Config::load_from(&path)?;
    if !path.exists() {
        config.save_to(&path)?;
    }
    Ok(config)
}

/// One on-demand check through the controller, printed as JSON
fn check_cli() -> Result<()> {
    let config = load_config()?;
    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let bridge = SimulatedBridge::from_config(&config);
    let mut controller = UpdateLifecycleController::new();
    controller.init(&bridge);

    let response = rt.block_on(controller.check_for_updates_on_demand(&bridge));
    controller.teardown();

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("Failed to serialize response")?
    );
    Ok(())
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
update-gate - Blocking update notice for terminal applications

USAGE:
    update-gate                        Launch TUI
    update-gate [COMMAND]

COMMANDS:
    run                                Launch TUI
    check                              Check for updates once and print JSON
    config                             Print the config file path

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    j/↓ k/↑       Move selection
    u             Check for updates
    t             Change theme
    ?             Help
    q             Quit

    While the update notice is shown the rest of the window is blocked.
    Tab moves between its controls, Enter/Space activates
    "Manually Download", and both controls accept mouse clicks.

CONFIG:
    {}
"#,
        update_gate::LOGO,
        config_path
    );
}

fn print_version() {
    println!("update-gate {}", update_gate::VERSION);
}
