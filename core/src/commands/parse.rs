use anyhow::{anyhow, bail, Result};

use super::Command;
use crate::catalog::BundleQuery;
use crate::purchase::{PaymentTab, TransferField};

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let (cmd, rest) = next_word(input);
        let cmd = cmd.unwrap_or_default().to_lowercase();
        let (arg1, rest) = next_word(rest);
        let arg2 = Some(rest.trim()).filter(|s| !s.is_empty());

        match cmd.as_str() {
            "login" | "signin" => {
                let mut user_name = None;
                let mut remember = false;
                for word in [arg1, arg2].into_iter().flatten().flat_map(str::split_whitespace) {
                    match word {
                        "--remember" | "-r" => remember = true,
                        w if user_name.is_none() => user_name = Some(w.to_string()),
                        w => bail!("Unexpected argument '{w}'. Usage: login [user_name] [--remember]"),
                    }
                }
                Ok(Command::Login {
                    user_name,
                    remember,
                })
            }

            "logout" | "signout" => Ok(Command::Logout),

            "balance" | "bal" | "whoami" => Ok(Command::Balance),

            "bundles" | "ls" | "catalog" => {
                let words: Vec<&str> = [arg1, arg2]
                    .into_iter()
                    .flatten()
                    .flat_map(str::split_whitespace)
                    .collect();
                Ok(Command::Bundles {
                    query: parse_query(&words)?,
                })
            }

            "buy" => {
                let bundle_id = arg1
                    .ok_or_else(|| anyhow!("Missing bundle ID. Usage: buy <bundle_id>"))?;
                if arg2.is_some() {
                    bail!("Too many arguments. Usage: buy <bundle_id>");
                }
                Ok(Command::Buy {
                    bundle_id: bundle_id.to_string(),
                })
            }

            "tab" | "method" => {
                let name = arg1
                    .ok_or_else(|| anyhow!("Missing payment method. Usage: tab <wallet|transfer>"))?;
                let tab = name.parse::<PaymentTab>().map_err(|e| anyhow!(e))?;
                Ok(Command::Tab { tab })
            }

            "set" => {
                let field_str = arg1.ok_or_else(|| {
                    anyhow!("Missing field. Usage: set <user_name|amount|cgwallet_id> <value>")
                })?;
                let field = field_str.parse::<TransferField>().map_err(|e| anyhow!(e))?;
                let value = arg2.ok_or_else(|| {
                    anyhow!("Missing value. Usage: set {field_str} <value>")
                })?;
                Ok(Command::Set {
                    field,
                    value: value.to_string(),
                })
            }

            "dialog" | "show" => Ok(Command::Dialog),

            "pay" | "submit" => Ok(Command::Pay),

            "close" | "cancel" | "esc" => Ok(Command::Close),

            "history" | "transactions" | "txs" | "reload" => Ok(Command::History),

            "help" | "?" => Ok(Command::Help {
                command: arg1.map(|s| s.to_lowercase()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

/// Split off the first word, skipping any run of whitespace before and after it.
fn next_word(input: &str) -> (Option<&str>, &str) {
    let input = input.trim_start();
    if input.is_empty() {
        return (None, input);
    }
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (Some(word), rest.trim_start()),
        None => (Some(input), ""),
    }
}

/// Accept `network=MTN type=data` pairs or up to two positional values
/// (network, then type). `-` leaves a position unset.
fn parse_query(words: &[&str]) -> Result<BundleQuery> {
    let mut network: Option<&str> = None;
    let mut kind: Option<&str> = None;
    let mut positional = 0;

    for word in words {
        if let Some((key, value)) = word.split_once('=') {
            match key.to_lowercase().as_str() {
                "network" => network = Some(value),
                "type" => kind = Some(value),
                other => bail!("Unknown filter '{other}'. Use 'network' or 'type'."),
            }
            continue;
        }
        let value = if *word == "-" { None } else { Some(*word) };
        match positional {
            0 => network = value,
            1 => kind = value,
            _ => bail!("Too many arguments. Usage: bundles [network] [type]"),
        }
        positional += 1;
    }

    Ok(BundleQuery::new(network, kind))
}
