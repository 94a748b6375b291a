use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use common::config::Settings;
use common::export::{Branding, ExportFormat};
use common::models::ExecutionId;
use common::telemetry::init_logging;
use console::{messages, ConsoleController, ConsoleState, ReportClient, UserDirectory};

/// Query historical report executions and export them
#[derive(Parser, Debug)]
#[command(name = "report-console", version, about, long_about = None)]
struct Args {
    /// Base URL of the report query service
    #[arg(long, env = "REPORT_API_URL")]
    api_url: Option<String>,

    /// JSON user list
    #[arg(long, env = "REPORT_USERS_FILE")]
    users: Option<PathBuf>,

    /// Act as this user (defaults to the first listed user)
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the service and print the database time
    Ping,
    /// List the available users
    Users,
    /// List the reports the active user may request
    Reports,
    /// List execution dates for a report and environment
    Dates {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch one execution and render or export it
    Generate {
        #[command(flatten)]
        filter: FilterArgs,

        /// Execution id or date label as listed by `dates`, e.g. `7` or `"007 2024-05-01"`
        #[arg(short = 'x', long)]
        execution: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Directory for exported files
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Report name; ignored for collaborators
    #[arg(short, long)]
    report: Option<String>,

    /// Environment, e.g. PROD
    #[arg(short, long = "env")]
    environment: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Print the HTML result card
    Html,
    Csv,
    Xlsx,
    Pdf,
}

impl OutputFormat {
    fn export_format(self) -> Option<ExportFormat> {
        match self {
            OutputFormat::Html => None,
            OutputFormat::Csv => Some(ExportFormat::Csv),
            OutputFormat::Xlsx => Some(ExportFormat::Xlsx),
            OutputFormat::Pdf => Some(ExportFormat::Pdf),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.console.log_level, settings.observability.json_logs)?;

    let users_file = args
        .users
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.console.users_file));
    let directory = UserDirectory::load(&users_file)
        .with_context(|| format!("Failed to load users from {}", users_file.display()))?;

    let mut controller = ConsoleController::new(directory);
    if let Some(username) = &args.user {
        controller.switch_user(username)?;
    }

    let api_url = args.api_url.as_deref().unwrap_or(&settings.console.api_base_url);
    let client = ReportClient::new(api_url)?;

    match args.command {
        Command::Ping => {
            let now = client.current_time().await?;
            let now = now.first().context("Empty time response")?;
            println!("{}", now.current_time.to_rfc3339());
        }
        Command::Users => {
            for user in controller.users() {
                let role = user.role.map(|r| r.to_string()).unwrap_or_default();
                println!("{}\t{}\t{}", user.username, role, user.organization);
            }
        }
        Command::Reports => {
            println!("{}", controller.description());
            for report in controller.available_reports() {
                println!("  {}", report);
            }
        }
        Command::Dates { filter } => {
            apply_filter(&mut controller, &filter)?;
            let dates = controller.lookup_dates(&client).await?;
            for date in dates {
                println!("{}\t{}", date.id, date.label);
            }
            if let Some(message) = controller.status_message() {
                println!("{}", message);
            }
        }
        Command::Generate {
            filter,
            execution,
            format,
            out,
        } => {
            apply_filter(&mut controller, &filter)?;
            controller.lookup_dates(&client).await?;
            if let Some(message) = controller.status_message() {
                anyhow::bail!("{}", message);
            }
            let execution_id = ExecutionId::parse_leading(&execution)?;
            controller.select_date(execution_id.0)?;

            generate(&mut controller, &client).await?;

            match format.export_format() {
                None => {
                    if let Some(html) = controller.render_html()? {
                        println!("{}", html);
                    }
                }
                Some(export_format) => {
                    let branding = Branding::load(
                        &settings.console.logo_text,
                        settings.console.logo_path.as_deref().map(Path::new),
                    );
                    let path = controller.export(export_format, &out, Local::now().date_naive(), &branding)?;
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn apply_filter(controller: &mut ConsoleController, filter: &FilterArgs) -> Result<()> {
    if !controller.current_user().is_collaborator() {
        let report = filter
            .report
            .as_deref()
            .with_context(|| messages::SELECT_REPORT.to_string())?;
        controller.select_report(report)?;
    }
    controller.select_environment(&filter.environment)?;
    Ok(())
}

/// Run the generation; Ctrl+C aborts the request
async fn generate(controller: &mut ConsoleController, client: &ReportClient) -> Result<()> {
    let ticket = controller.begin_generation()?;

    let abort = ticket.abort_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            abort.abort();
        }
    });

    let outcome = client.fetch_rows(&ticket.execution_id, ticket.registration).await;
    watcher.abort();
    controller.complete_generation(ticket.id, outcome);

    match controller.state() {
        ConsoleState::Rendered => Ok(()),
        ConsoleState::Canceled => anyhow::bail!("{}", messages::GENERATION_CANCELED),
        _ => anyhow::bail!(
            "{}",
            controller.status_message().unwrap_or(messages::GENERATION_FAILED)
        ),
    }
}
