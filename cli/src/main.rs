mod repl;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use cg_dashboard_core::api::ApiClient;
use cg_dashboard_core::catalog::BundleQuery;
use cg_dashboard_core::commands::Command;
use cg_dashboard_core::config::ApiConfig;
use cg_dashboard_core::dashboard::Dashboard;
use cg_dashboard_core::service::DashboardService;
use cg_dashboard_core::session::SessionStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "cg-dashboard", about = "CG bundle dashboard REPL", version)]
pub(crate) struct Cli {
    /// Base URL of the dashboard API
    #[arg(long, env = "CG_API_URL")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "CG_API_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    /// Username to sign in with (prompted if missing)
    #[arg(long)]
    user: Option<String>,

    /// Read password from stdin (for scripting)
    #[arg(long)]
    password_stdin: bool,

    /// Keep the session after exit
    #[arg(long)]
    remember: bool,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,

    /// Allow connecting to non-HTTPS API URLs
    #[arg(long)]
    insecure: bool,

    /// Initial network filter for the bundle list
    #[arg(long)]
    network: Option<String>,

    /// Initial type filter for the bundle list (e.g. data, airtime)
    #[arg(long = "type")]
    kind: Option<String>,
}

impl Cli {
    fn api_client(&self) -> Result<ApiClient> {
        if self.timeout == 0 {
            bail!("--timeout must be at least 1 second.");
        }
        let config = ApiConfig::new(&self.api_url, self.insecure)?
            .with_timeout(Duration::from_secs(self.timeout));
        Ok(ApiClient::new(config)?)
    }

    fn initial_query(&self) -> BundleQuery {
        BundleQuery::new(self.network.as_deref(), self.kind.as_deref())
    }
}

fn read_password_stdin() -> Result<Zeroizing<String>> {
    let mut password = String::new();
    std::io::stdin()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let trimmed = password
        .trim_end_matches('\n')
        .trim_end_matches('\r')
        .to_string();
    use zeroize::Zeroize;
    password.zeroize();
    Ok(Zeroizing::new(trimmed))
}

pub(crate) fn read_password(cli: &Cli) -> Result<Zeroizing<String>> {
    if cli.password_stdin {
        read_password_stdin()
    } else {
        Ok(Zeroizing::new(
            rpassword::prompt_password("Password: ").context("Failed to read password")?,
        ))
    }
}

pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Sign in with the given (or prompted) username. The session is saved when
/// `remember` is set; otherwise any remembered one is forgotten.
pub(crate) async fn sign_in(
    cli: &Cli,
    api: ApiClient,
    user_name: Option<&str>,
    remember: bool,
) -> Result<DashboardService> {
    let user_name = match user_name {
        Some(name) => name.to_string(),
        None => prompt_line("Username: ")?,
    };
    let password = read_password(cli)?;
    let (service, message) = DashboardService::login(api, &user_name, &password).await?;
    if let Some(message) = message {
        println!("{message}");
    }
    let store = SessionStore::open()?;
    store.remember(service.session(), remember)?;
    if remember {
        tracing::info!(path = %store.path().display(), "session remembered");
    }
    Ok(service)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(cmd_str) = &cli.cmd {
        run_oneshot(&cli, cmd_str).await
    } else {
        repl::run_repl(&cli).await
    }
}

async fn run_oneshot(cli: &Cli, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }
    if let Command::Help { command } = &command {
        println!("{}", cg_dashboard_core::commands::help_text(command.as_deref()));
        return Ok(());
    }

    if matches!(
        command,
        Command::Buy { .. }
            | Command::Tab { .. }
            | Command::Set { .. }
            | Command::Dialog
            | Command::Pay
            | Command::Close
    ) {
        bail!("'{cmd_str}' only works in the interactive shell, where the purchase dialog stays open.");
    }

    let api = cli.api_client()?;
    let store = SessionStore::open()?;

    match &command {
        Command::Logout => {
            store.clear()?;
            println!("Signed out.");
            return Ok(());
        }
        Command::Login {
            user_name,
            remember,
        } => {
            let name = user_name.as_deref().or(cli.user.as_deref());
            let service = sign_in(cli, api, name, *remember || cli.remember).await?;
            println!("Signed in as {}.", service.session().user_name());
            return Ok(());
        }
        _ => {}
    }

    let resumed = match cli.user {
        None => DashboardService::resume(api.clone(), &store).await?,
        Some(_) => None,
    };
    let service = match resumed {
        Some(service) => service,
        None => sign_in(cli, api, cli.user.as_deref(), cli.remember).await?,
    };
    let mut dashboard = Dashboard::new(service);

    let command = match command {
        Command::Bundles { query } => Command::Bundles {
            query: query.or(cli.initial_query()),
        },
        other => other,
    };
    let output = command.execute(&mut dashboard, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
