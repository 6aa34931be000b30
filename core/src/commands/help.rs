#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("login") | Some("signin") => {
            "login [user_name] [--remember]\n  Sign in with your username and password.\n  --remember keeps you signed in between sessions.\n  Alias: signin".to_string()
        }
        Some("logout") | Some("signout") => {
            "logout\n  Sign out and forget any remembered session.\n  Alias: signout".to_string()
        }
        Some("balance") | Some("bal") | Some("whoami") => {
            "balance\n  Refresh and show your username and wallet balance.\n  Aliases: bal, whoami".to_string()
        }
        Some("bundles") | Some("ls") | Some("catalog") => {
            "bundles [network] [type]\n  List CG bundles. With a type, only bundles matching both\n  network and type are shown; if none match, all are shown.\n  Use '-' to skip the network, or name=value pairs.\n  Examples: bundles MTN data\n           bundles network=GLO type=airtime\n  Aliases: ls, catalog".to_string()
        }
        Some("buy") => {
            "buy <bundle_id>\n  Open the purchase dialog for a bundle listed by 'bundles'.".to_string()
        }
        Some("tab") | Some("method") => {
            "tab <wallet|transfer>\n  Choose how to pay in the purchase dialog.\n  Default: wallet.\n  Alias: method".to_string()
        }
        Some("set") => {
            "set <user_name|amount|cgwallet_id> <value>\n  Fill in a field of the transfer payment form.\n  Example: set amount 1500".to_string()
        }
        Some("dialog") | Some("show") => {
            "dialog\n  Show the open purchase dialog.\n  Alias: show".to_string()
        }
        Some("pay") | Some("submit") => {
            "pay\n  Submit the purchase with the selected payment method.\n  The dialog closes once the server answers.\n  Alias: submit".to_string()
        }
        Some("close") | Some("cancel") | Some("esc") => {
            "close\n  Close the purchase dialog without paying.\n  Aliases: cancel, esc".to_string()
        }
        Some("history") | Some("transactions") | Some("txs") | Some("reload") => {
            "history\n  Show your transaction history.\n  Use --json with --cmd to export it.\n  Aliases: transactions, txs, reload".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the dashboard.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 login            Sign in\n\
             \x20 logout           Sign out\n\
             \x20 balance          Show wallet balance\n\
             \x20 bundles          List CG bundles\n\
             \x20 buy              Open the purchase dialog for a bundle\n\
             \x20 tab              Choose wallet or transfer payment\n\
             \x20 set              Fill in the transfer form\n\
             \x20 dialog           Show the purchase dialog\n\
             \x20 pay              Submit the purchase\n\
             \x20 close            Close the purchase dialog\n\
             \x20 history          Show transaction history\n\
             \x20 help [cmd]       Show help for a command\n\
             \x20 exit             Exit the dashboard\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_text_general() {
        let text = help_text(None);
        assert!(text.contains("bundles"));
        assert!(text.contains("pay"));
        assert!(text.contains("history"));
    }

    #[test]
    fn help_text_specific() {
        let text = help_text(Some("set"));
        assert!(text.contains("<user_name|amount|cgwallet_id>"));
        assert!(help_text(Some("ls")).contains("bundles [network] [type]"));
    }

    #[test]
    fn help_text_unknown() {
        let text = help_text(Some("nonexistent"));
        assert!(text.contains("Unknown command"));
    }
}
