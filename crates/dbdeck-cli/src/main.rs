//! `dbdeck` CLI — terminal client for the dbdeck database service.
//!
//! Signs users up and in against the REST backend, keeps the session in a
//! local state directory, and offers an interactive dashboard for creating
//! and opening Neo4j databases.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod dashboard;
mod input;
mod landing;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;

use dbdeck_client::{ClientConfig, HttpApi};
use dbdeck_core::api::{AuthApi, ProvisioningApi};
use dbdeck_core::auth::AuthGateway;
use dbdeck_core::registry::InstanceRegistry;
use dbdeck_core::routing::View;
use dbdeck_core::session::SessionStore;
use dbdeck_storage::{FileBackend, MemoryBackend, StorageBackend};

use input::Input;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BANNER: &str = r"
  ██████╗ ██████╗ ██████╗ ███████╗ ██████╗██╗  ██╗
  ██╔══██╗██╔══██╗██╔══██╗██╔════╝██╔════╝██║ ██╔╝
  ██║  ██║██████╔╝██║  ██║█████╗  ██║     █████╔╝
  ██║  ██║██╔══██╗██║  ██║██╔══╝  ██║     ██╔═██╗
  ██████╔╝██████╔╝██████╔╝███████╗╚██████╗██║  ██╗
  ╚═════╝ ╚═════╝ ╚═════╝ ╚══════╝ ╚═════╝╚═╝  ╚═╝
";

fn print_banner() {
    println!("{CYAN}{BOLD}{BANNER}{RESET}");
    println!("  {DIM}Graph databases on demand.{RESET}");
    println!();
}

// ── CLI structure ────────────────────────────────────────────────────

/// dbdeck — graph databases on demand.
#[derive(Parser)]
#[command(
    name = "dbdeck",
    version,
    about = "dbdeck CLI — sign up, sign in, and manage your Neo4j databases",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         DBDECK_API_URL       Backend address (default: http://localhost:5000)\n  \
         DBDECK_HOME          Session directory (default: ~/.dbdeck)\n  \
         DBDECK_BROWSER_HOST  Host for Neo4j Browser links (default: localhost)\n  \
         DBDECK_TIMEOUT_SECS  Request timeout in seconds (default: none)\n  \
         DBDECK_LOG_LEVEL     Log filter (default: warn)\n  \
         DBDECK_LOG_FORMAT    `json` or `text` (default: text)\n\n\
         {DIM}Examples:{RESET}\n  \
         dbdeck start '/?auth=login'\n  \
         dbdeck login --email ada@example.com\n  \
         dbdeck dashboard\n  \
         dbdeck db create --password s3cret"
    ),
)]
struct Cli {
    /// Backend address.
    #[arg(long, env = "DBDECK_API_URL")]
    api_url: Option<String>,

    /// Session directory.
    #[arg(long, env = "DBDECK_HOME")]
    home: Option<PathBuf>,

    /// Keep the session in memory only; nothing is written to disk.
    #[arg(long, default_value = "false")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the app at a location, e.g. "/?auth=login" or "/dashboard".
    Start {
        /// Location to open.
        #[arg(default_value = "/")]
        location: String,
    },
    /// Create an account.
    Register {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password (read from stdin when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password (read from stdin when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Interactive dashboard for managing databases.
    Dashboard,
    /// One-shot database operations.
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Show your database's connection info.
    Info,
    /// Provision a new database.
    Create {
        /// Password for the Neo4j `neo4j` user.
        #[arg(long)]
        password: String,
    },
    /// Open the Neo4j Browser for your database.
    Open {
        /// Print the URL without launching a browser.
        #[arg(long, default_value = "false")]
        print_only: bool,
    },
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn failure(msg: &str) {
    println!("{RED}{BOLD}✗{RESET} {RED}{msg}{RESET}");
}

fn port_or_dash(port: Option<u16>) -> String {
    port.map_or_else(|| "—".to_owned(), |p| p.to_string())
}

/// Launch the system browser on `url`. Failures are ignored; the URL has
/// already been printed.
fn open_in_browser(url: &str) {
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(url).spawn();
    }
    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("xdg-open").arg(url).spawn();
    }
    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn();
    }
}

// ── Wiring ───────────────────────────────────────────────────────────

/// Everything a command needs, built once from config.
struct App {
    config: ClientConfig,
    api: Arc<HttpApi>,
    session: SessionStore,
}

impl App {
    async fn build(config: ClientConfig, ephemeral: bool) -> Result<Self> {
        let backend: Arc<dyn StorageBackend> = if ephemeral {
            Arc::new(MemoryBackend::new())
        } else {
            Arc::new(
                FileBackend::open(&config.home)
                    .await
                    .with_context(|| format!("failed to open {}", config.home.display()))?,
            )
        };
        let api = Arc::new(HttpApi::new(&config).context("failed to set up HTTP client")?);
        debug!(api_url = %config.api_url, home = %config.home.display(), ephemeral, "client ready");
        Ok(Self {
            config,
            api,
            session: SessionStore::new(backend),
        })
    }

    fn auth(&self) -> AuthGateway {
        AuthGateway::new(Arc::clone(&self.api) as Arc<dyn AuthApi>, self.session.clone())
    }

    fn registry(&self) -> InstanceRegistry {
        let api = Arc::clone(&self.api) as Arc<dyn ProvisioningApi>;
        InstanceRegistry::new(api, self.session.clone())
            .with_browser_host(self.config.browser_host.clone())
    }
}

fn init_tracing(config: &ClientConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.filter(|u| !u.trim().is_empty()) {
        config.api_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(home) = cli.home.filter(|h| !h.as_os_str().is_empty()) {
        config.home = home;
    }
    init_tracing(&config);

    match run(config, cli.ephemeral, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ClientConfig, ephemeral: bool, cmd: Commands) -> Result<()> {
    let app = App::build(config, ephemeral).await?;
    let mut input = Input::stdin();

    match cmd {
        Commands::Start { location } => cmd_start(&app, &mut input, &location).await,
        Commands::Register { email, password } => {
            let password = password_or_prompt(&mut input, password).await?;
            cmd_register(&app, &email, &password).await
        }
        Commands::Login { email, password } => {
            let password = password_or_prompt(&mut input, password).await?;
            cmd_login(&app, &email, &password).await
        }
        Commands::Logout => {
            let msg = app.auth().logout().await;
            success(&msg);
            Ok(())
        }
        Commands::Whoami => cmd_whoami(&app).await,
        Commands::Dashboard => cmd_dashboard(&app, &mut input).await,
        Commands::Db { action } => cmd_db(&app, action).await,
    }
}

async fn password_or_prompt(input: &mut Input, password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    Ok(input.prompt("Password: ").await?.unwrap_or_default())
}

// ── Account commands ─────────────────────────────────────────────────

async fn cmd_start(app: &App, input: &mut Input, location: &str) -> Result<()> {
    let has_session = app.session.load().await.is_some();
    match View::resolve(location, has_session) {
        View::Dashboard => dashboard::run(app, input).await,
        View::Landing { tab } => {
            print_banner();
            if landing::run(app, input, tab).await? {
                dashboard::run(app, input).await
            } else {
                Ok(())
            }
        }
    }
}

async fn cmd_register(app: &App, email: &str, password: &str) -> Result<()> {
    let outcome = app.auth().register(email, password).await?;
    success(&outcome.message);
    println!(
        "  {DIM}Sign in with{RESET} {CYAN}dbdeck login --email {email}{RESET}"
    );
    Ok(())
}

async fn cmd_login(app: &App, email: &str, password: &str) -> Result<()> {
    let outcome = app.auth().login(email, password).await?;
    success(&outcome.message);
    if outcome.token.is_none() {
        warning("the server returned no token; authenticated calls will be sent without one");
    }
    Ok(())
}

async fn cmd_whoami(app: &App) -> Result<()> {
    match app.session.load().await {
        Some(session) => {
            header("👤", "Session");
            kv_line("Email", &session.email);
            kv_line(
                "Token",
                if session.token.is_some() { "stored" } else { "none" },
            );
            kv_line("State dir", &app.config.home.display().to_string());
        }
        None => warning("Not logged in — run `dbdeck start '/?auth=login'`"),
    }
    Ok(())
}

async fn cmd_dashboard(app: &App, input: &mut Input) -> Result<()> {
    if app.session.load().await.is_none() {
        bail!("not logged in — run `dbdeck login --email <email>` first");
    }
    dashboard::run(app, input).await
}

// ── Database commands ────────────────────────────────────────────────

async fn cmd_db(app: &App, action: DbCommands) -> Result<()> {
    let mut registry = app.registry();
    match action {
        DbCommands::Info => {
            let info = registry.my_database().await?;
            dashboard::print_database_info(&info);
            Ok(())
        }
        DbCommands::Create { password } => {
            let outcome = registry.create(&password).await?;
            success(&outcome.message);
            dashboard::print_instance(&registry, &outcome.instance);
            Ok(())
        }
        DbCommands::Open { print_only } => {
            let info = registry.my_database().await?;
            let Some(port) = info.http_port else {
                bail!("No database found to open");
            };
            let url = registry.browser_url(port);
            println!("  {CYAN}{url}{RESET}");
            if !print_only {
                open_in_browser(&url);
            }
            Ok(())
        }
    }
}
