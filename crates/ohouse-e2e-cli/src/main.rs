//! Ohouse E2E CLI - runs the login scenarios against a device
//!
//! Usage:
//!     ohouse-e2e [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     UDID: ADB device ID (default: the only attached device)
//!     RESET_APP: Clear app data before the run unless set to `false` (default: true)
//!     OH_EMAIL / OH_PASSWORD: Credentials for the login-pass scenario
//!     FAIL_EMAIL / FAIL_PASSWORD: Credentials for the login-fail scenario
//!     APPIUM_HOST / APPIUM_PORT: Appium server (default: 127.0.0.1:4723)
//!     ADB_PATH: adb binary (default: adb)
//!
//! Variables are also read from a `.env` file in the working directory or
//! any parent. Values already set in the environment take precedence.

mod logging;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ohouse_e2e::config::{DEFAULT_APPIUM_HOST, DEFAULT_APPIUM_PORT};
use ohouse_e2e::{
    parse_reset_flag, AdbCommand, AdbDevice, AppConfig, AppiumConnector, Credentials, RunConfig,
    Scenario, ScenarioOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

/// Ohouse E2E - login end-to-end tests over Appium and ADB
#[derive(Parser, Debug)]
#[command(name = "ohouse-e2e", version)]
#[command(about = "Ohouse E2E - login end-to-end tests over Appium and ADB")]
#[command(after_help = r#"Examples:
    # Happy-path login
    OH_EMAIL=qa@example.com OH_PASSWORD=secret ohouse-e2e login-pass

    # Rate-limit tooltip after a failed login, without resetting app data
    RESET_APP=false ohouse-e2e login-fail --fail-email qa@example.com --fail-password wrong

    # Target a specific device
    ohouse-e2e --udid emulator-5554 login-pass

    # Check adb, device and Appium before a run
    ohouse-e2e check
"#)]
struct Cli {
    // Device options
    /// ADB device ID
    #[arg(long, env = "UDID", default_value = "")]
    udid: String,

    /// Clear app data before the run; only `false` disables it
    #[arg(long, env = "RESET_APP", default_value = "true")]
    reset_app: String,

    /// Path to the adb binary
    #[arg(long, env = "ADB_PATH", default_value = "adb")]
    adb_path: String,

    // Appium options
    /// Appium server host
    #[arg(long, env = "APPIUM_HOST", default_value = DEFAULT_APPIUM_HOST)]
    appium_host: String,

    /// Appium server port
    #[arg(long, env = "APPIUM_PORT", default_value_t = DEFAULT_APPIUM_PORT)]
    appium_port: u16,

    // Credentials
    /// Email for the login-pass scenario
    #[arg(long, env = "OH_EMAIL", default_value = "")]
    email: String,

    /// Password for the login-pass scenario
    #[arg(long, env = "OH_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Email for the login-fail scenario
    #[arg(long, env = "FAIL_EMAIL", default_value = "")]
    fail_email: String,

    /// Password for the login-fail scenario
    #[arg(long, env = "FAIL_PASSWORD", default_value = "", hide_env_values = true)]
    fail_password: String,

    // Other options
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Log in with valid credentials and confirm the home screen
    LoginPass,
    /// Log in with failing credentials and confirm the rate-limit tooltip
    LoginFail,
    /// Print the installed app version
    Version,
    /// Check adb, the target device and the Appium server
    Check,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            device_id: self.udid.clone(),
            reset_app: parse_reset_flag(&self.reset_app),
            pass_credentials: Credentials::new(&self.email, &self.password),
            fail_credentials: Credentials::new(&self.fail_email, &self.fail_password),
            appium_host: self.appium_host.clone(),
            appium_port: self.appium_port,
            adb_path: self.adb_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScenarioKind {
    LoginPass,
    LoginFail,
}

fn device(config: &RunConfig) -> AdbDevice<AdbCommand> {
    AdbDevice::new(
        AdbCommand::with_path(&config.adb_path),
        &config.device_id,
        AppConfig::default(),
    )
}

async fn run_scenario(kind: ScenarioKind, config: &RunConfig) -> Result<ScenarioOutcome> {
    let device = device(config);
    let connector = AppiumConnector::new(config.appium_url(), AppConfig::default())
        .context("Failed to build the Appium client")?;
    let scenario = Scenario::new(&device, &connector, config);

    info!(
        "Running {:?} on device '{}' via {}",
        kind,
        config.device_id,
        connector.base_url()
    );

    let outcome = match kind {
        ScenarioKind::LoginPass => scenario.login_pass().await,
        ScenarioKind::LoginFail => scenario.login_fail().await,
    };
    outcome.with_context(|| format!("{:?} scenario failed", kind))
}

async fn print_version(config: &RunConfig) {
    let device = device(config);
    let info = device.log_version_info().await;

    println!(
        "{} versionName: {}",
        device.app().package,
        info.version_name.as_deref().unwrap_or("-")
    );
    println!(
        "{} versionCode: {}",
        device.app().package,
        info.version_code.as_deref().unwrap_or("-")
    );
}

/// Check system requirements before running a scenario
async fn check_system_requirements(config: &RunConfig) -> bool {
    println!("\u{1F50D} Checking system requirements...");
    println!("{}", "-".repeat(50));

    // Check 1: adb installed
    match which::which(&config.adb_path) {
        Ok(path) => println!("1. adb installation... \u{2705} OK ({})", path.display()),
        Err(_) => {
            println!("1. adb installation... \u{274C} FAILED");
            println!("   Error: '{}' is not installed or not in PATH.", config.adb_path);
            println!("   Solution: install Android platform-tools or set ADB_PATH");
            return false;
        }
    }

    // Check 2: target device attached
    let adb = AdbCommand::with_path(&config.adb_path);
    match adb.list_devices().await {
        Ok(devices) => {
            let ready: Vec<&str> = devices
                .iter()
                .filter(|d| d.status == "device")
                .map(|d| d.device_id.as_str())
                .collect();

            let found = if config.device_id.is_empty() {
                !ready.is_empty()
            } else {
                ready.contains(&config.device_id.as_str())
            };

            if found {
                println!("2. Connected devices... \u{2705} OK ({})", ready.join(", "));
            } else {
                println!("2. Connected devices... \u{274C} FAILED");
                if config.device_id.is_empty() {
                    println!("   Error: No devices connected.");
                } else {
                    println!("   Error: Device '{}' is not connected.", config.device_id);
                }
                println!("   Solution: enable USB debugging and authorize this host");
                return false;
            }
        }
        Err(e) => {
            println!("2. Connected devices... \u{274C} FAILED");
            println!("   Error: {}", e);
            return false;
        }
    }

    // Check 3: Appium server
    let url = config.appium_url();
    let ready = match AppiumConnector::new(&url, AppConfig::default()) {
        Ok(connector) => connector.is_ready().await,
        Err(e) => {
            error!("Failed to build the Appium client: {}", e);
            false
        }
    };
    if ready {
        println!("3. Appium server ({})... \u{2705} OK", url);
    } else {
        println!("3. Appium server ({})... \u{274C} FAILED", url);
        println!("   Error: Appium is not running or not ready.");
        println!("   Solution: start it with `appium` and install the uiautomator2 driver");
        return false;
    }

    println!("{}", "-".repeat(50));
    println!("\u{2705} All system checks passed!");
    true
}

/// Load `.env` into the process environment before clap reads it.
/// Variables that are already set are not overridden.
fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.run_config();

    match cli.command {
        Commands::LoginPass => {
            let outcome = run_scenario(ScenarioKind::LoginPass, &config).await?;
            info!("Outcome: {:?}", outcome);
        }
        Commands::LoginFail => {
            let outcome = run_scenario(ScenarioKind::LoginFail, &config).await?;
            info!("Outcome: {:?}", outcome);
        }
        Commands::Version => print_version(&config).await,
        Commands::Check => {
            if !check_system_requirements(&config).await {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = load_dotenv();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
