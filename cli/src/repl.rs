use crate::{prompt_line, sign_in, Cli};
/// REPL shell: Reedline-based interactive dashboard session.
use anyhow::Result;
use cg_dashboard_core::api::ApiClient;
use cg_dashboard_core::commands::Command;
use cg_dashboard_core::dashboard::Dashboard;
use cg_dashboard_core::display;
use cg_dashboard_core::selection::CloseReason;
use cg_dashboard_core::service::DashboardService;
use cg_dashboard_core::session::SessionStore;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

pub async fn run_repl(cli: &Cli) -> Result<()> {
    println!("CG Dashboard v{}", env!("CARGO_PKG_VERSION"));
    let api = cli.api_client()?;
    println!("API: {}", api.base_url());
    println!();

    let store = SessionStore::open()?;
    let resumed = match cli.user {
        None => DashboardService::resume(api.clone(), &store).await?,
        Some(_) => None,
    };
    let service = match resumed {
        Some(service) => {
            println!("Resuming session for {}.", service.session().user_name());
            service
        }
        None => {
            let Some(service) = sign_in_loop(cli, &api).await? else {
                println!("Goodbye.");
                return Ok(());
            };
            service
        }
    };
    let mut dashboard = Dashboard::new(service);

    println!(
        "Signed in as {}. Wallet balance: {}",
        dashboard.session().user_name(),
        display::format_naira(dashboard.wallet_balance())
    );
    println!("Type 'help' for a list of commands.");
    println!();

    match dashboard.load_bundles(cli.initial_query()).await {
        Ok(bundles) => println!("{}", display::format_bundles(bundles)),
        Err(e) => eprintln!("Error loading bundles: {e}"),
    }

    let mut prompt = user_prompt(&dashboard);

    let commands: Vec<String> = vec![
        "login".into(),
        "signin".into(),
        "logout".into(),
        "signout".into(),
        "balance".into(),
        "bal".into(),
        "whoami".into(),
        "bundles".into(),
        "ls".into(),
        "catalog".into(),
        "buy".into(),
        "tab".into(),
        "method".into(),
        "set".into(),
        "dialog".into(),
        "show".into(),
        "pay".into(),
        "submit".into(),
        "close".into(),
        "cancel".into(),
        "history".into(),
        "transactions".into(),
        "txs".into(),
        "reload".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(Command::Logout) => {
                        if let Err(e) = store.clear() {
                            eprintln!("Error: {e}");
                        }
                        println!("Signed out.");
                        break;
                    }
                    Ok(Command::Login {
                        user_name,
                        remember,
                    }) => match sign_in(cli, api.clone(), user_name.as_deref(), remember || cli.remember).await {
                        Ok(service) => {
                            dashboard = Dashboard::new(service);
                            prompt = user_prompt(&dashboard);
                            println!("Signed in as {}.", dashboard.session().user_name());
                            match dashboard.load_bundles(cli.initial_query()).await {
                                Ok(bundles) => println!("{}", display::format_bundles(bundles)),
                                Err(e) => eprintln!("Error loading bundles: {e}"),
                            }
                        }
                        Err(e) => eprintln!("Error: {e}"),
                    },
                    Ok(cmd) => {
                        if let Some(prompt_msg) = cmd.confirmation_prompt(&dashboard) {
                            if !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        match cmd.execute(&mut dashboard, false).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                // Ctrl-C closes an open dialog first.
                if dashboard.purchase().selection().is_open() {
                    dashboard.purchase_mut().close(CloseReason::Escape);
                    println!("Purchase dialog closed.");
                    continue;
                }
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    Ok(())
}

/// Prompt for credentials until sign-in succeeds. `None` if the user gives up.
async fn sign_in_loop(cli: &Cli, api: &ApiClient) -> Result<Option<DashboardService>> {
    loop {
        match sign_in(cli, api.clone(), cli.user.as_deref(), cli.remember).await {
            Ok(service) => return Ok(Some(service)),
            Err(e) => {
                eprintln!("Error: {e}");
                if cli.password_stdin {
                    return Err(e);
                }
                let again = prompt_line("Try again? [Y/n]: ")?;
                if again.eq_ignore_ascii_case("n") || again.eq_ignore_ascii_case("q") {
                    return Ok(None);
                }
            }
        }
    }
}

fn user_prompt(dashboard: &Dashboard) -> DefaultPrompt {
    DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!("[cg {}]", dashboard.session().user_name())),
        DefaultPromptSegment::Empty,
    )
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
