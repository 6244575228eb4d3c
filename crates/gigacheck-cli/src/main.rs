use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use gigacheck_client::Session;
use gigacheck_config::{Config, ConfigLoader};
use gigacheck_observability::{LogManager, LoggingConfig};
use gigacheck_suite::{filter_catalog, Expectation, Outcome, Scenario, SuiteReport, SuiteRunner};

#[derive(Parser)]
#[command(name = "gigacheck")]
#[command(about = "Contract tests for the GigaChat chat/completions API")]
#[command(version)]
struct Cli {
    /// JSON config file; environment variables override its values
    #[arg(long, env = "GIGACHECK_CONFIG")]
    config: Option<String>,

    /// tracing filter directive
    #[arg(long, env = "GIGACHECK_LOG", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, default_value = "false")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scenario catalog
    List,
    /// Run the catalog against the configured API
    Run {
        /// Only run cases whose id starts with this prefix (repeatable)
        #[arg(long = "scenario", short = 's')]
        scenarios: Vec<String>,
        /// Write the JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Acquire a credential and print its expiry
    Token,
    /// Print the effective configuration with secrets redacted
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::List => {
            list_catalog();
            Ok(())
        }
        Commands::Run { ref scenarios, ref report } => {
            let config = load_config(cli.config.as_deref()).await?;
            let success = run(config, scenarios, report.clone()).await?;
            if !success {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Token => check_token(load_config(cli.config.as_deref()).await?).await,
        Commands::Config => {
            let config = load_config(cli.config.as_deref()).await?;
            println!("{}", "📋 Effective configuration:".cyan().bold());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        let path = gigacheck_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path));
        loader = loader.with_file(path);
    }
    let config = loader.load().await?;
    tracing::debug!(base_url = %config.api.base_url, model = %config.api.model, "Configuration loaded");
    Ok(config)
}

fn init_logging(cli: &Cli) {
    let logging = LoggingConfig::default()
        .with_level(cli.log_level.clone())
        .with_json_format(cli.json_logs)
        .with_module_level("hyper_util", "warn")
        .with_module_level("rustls", "warn");

    if let Err(e) = LogManager::init(&logging) {
        eprintln!("{}", format!("⚠️  Logging disabled: {}", e).yellow());
    }
}

fn list_catalog() {
    let catalog = Scenario::catalog();
    println!("{}", format!("📋 {} scenarios:", catalog.len()).cyan().bold());
    for case in &catalog {
        let flaky = match case.expectation() {
            Expectation::KnownFlaky(_) => " [flaky]".yellow().to_string(),
            Expectation::Strict => String::new(),
        };
        println!(
            "  {:<32} {:<8} {}{}",
            case.id(),
            case.severity().to_string().dimmed(),
            case.title(),
            flaky
        );
    }
}

async fn run(config: Config, prefixes: &[String], report_path: Option<PathBuf>) -> anyhow::Result<bool> {
    let cases = filter_catalog(Scenario::catalog(), prefixes);
    if cases.is_empty() {
        anyhow::bail!("no scenario matches {:?}", prefixes);
    }

    println!(
        "{}",
        format!("🚀 Running {} scenarios against {}", cases.len(), config.api.base_url)
            .cyan()
            .bold()
    );

    let session = Session::new(config)?;
    let report = SuiteRunner::new(&session).run(&cases).await;

    print_report(&report);

    if let Some(path) = report_path {
        tokio::fs::write(&path, report.to_json_pretty()?).await?;
        tracing::info!(path = %path.display(), cases = report.cases.len(), "Report written");
        println!("{}", format!("📝 Report written to {:?}", path).dimmed());
    }

    Ok(report.is_success())
}

fn print_report(report: &SuiteReport) {
    for case in &report.cases {
        let label = match &case.outcome {
            Outcome::Passed => case.outcome.label().green(),
            Outcome::Failed { .. } | Outcome::SetupError { .. } => case.outcome.label().red(),
            Outcome::ExpectedFailure { .. } | Outcome::UnexpectedPass { .. } => {
                case.outcome.label().yellow()
            }
        };
        println!("  {:<6} {:<32} {}", label, case.id, format!("{}ms", case.duration_ms).dimmed());

        match &case.outcome {
            Outcome::Failed { message } | Outcome::SetupError { message } => {
                println!("         {}", message.red());
            }
            Outcome::ExpectedFailure { reason, .. } | Outcome::UnexpectedPass { reason } => {
                println!("         {}", reason.dimmed());
            }
            Outcome::Passed => {}
        }
    }

    let s = &report.summary;
    let line = format!(
        "{} total, {} passed, {} failed, {} xfail, {} xpass, {} errors",
        s.total, s.passed, s.failed, s.expected_failures, s.unexpected_passes, s.setup_errors
    );
    println!();
    if report.is_success() {
        println!("{}", format!("✅ {}", line).green().bold());
    } else {
        println!("{}", format!("❌ {}", line).red().bold());
    }
}

async fn check_token(config: Config) -> anyhow::Result<()> {
    let session = Session::new(config)?;
    let credential = session.credential().await?;

    let expiry = credential
        .expires_at()
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    println!("{}", "✅ Token acquired".green());
    println!("   expires at: {}", expiry);
    Ok(())
}
