//! Interactive dashboard.
//!
//! One shell session owns one [`InstanceRegistry`]: instances created here
//! are listed, opened and deleted here, and forgotten when the shell exits.

use anyhow::Result;

use dbdeck_core::instance::{DatabaseInfo, DatabaseInstance, InstanceId};
use dbdeck_core::registry::InstanceRegistry;

use crate::input::Input;
use crate::{
    App, BOLD, CYAN, DIM, GREEN, RESET, YELLOW, failure, header, kv_line, open_in_browser,
    port_or_dash, success, warning,
};

/// A parsed dashboard command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Create { password: String },
    List,
    Delete { id: InstanceId },
    Open { id: InstanceId },
    Info,
    Logout,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for `{verb}`"));
    }

    let cmd = match (verb, arg) {
        ("create" | "new", Some(password)) => Command::Create {
            password: password.to_owned(),
        },
        ("create" | "new", None) => Command::Create {
            password: String::new(),
        },
        ("list" | "ls", None) => Command::List,
        ("delete" | "rm", Some(id)) => Command::Delete { id: id.into() },
        ("open", Some(id)) => Command::Open { id: id.into() },
        ("info", None) => Command::Info,
        ("logout", None) => Command::Logout,
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        ("delete" | "rm" | "open", None) => return Err(format!("usage: {verb} <id>")),
        (_, Some(_)) if is_known(verb) => return Err(format!("`{verb}` takes no arguments")),
        _ => return Err(format!("unknown command `{verb}` — type `help`")),
    };
    Ok(Some(cmd))
}

fn is_known(verb: &str) -> bool {
    matches!(
        verb,
        "list" | "ls" | "info" | "logout" | "help" | "?" | "quit" | "exit"
    )
}

/// Run the dashboard until `quit`, `logout`, or end of input.
pub async fn run(app: &App, input: &mut Input) -> Result<()> {
    let mut registry = app.registry();
    let who = app
        .session
        .load()
        .await
        .map_or_else(|| "unknown user".to_owned(), |s| s.email);

    println!();
    header("🗄", "Your Databases");
    println!("  {DIM}Signed in as{RESET} {who}");
    println!("  {DIM}Type `help` for commands.{RESET}");
    println!();

    loop {
        let Some(line) = input.prompt(&format!("{CYAN}dbdeck>{RESET} ")).await? else {
            println!();
            return Ok(());
        };
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                failure(&msg);
                continue;
            }
        };

        match cmd {
            Command::Create { password } => create(&mut registry, &password).await,
            Command::List => print_instances(registry.list()),
            Command::Delete { id } => delete(&mut registry, input, &id).await?,
            Command::Open { id } => open(&registry, &id).await,
            Command::Info => match registry.my_database().await {
                Ok(info) => print_database_info(&info),
                Err(e) => failure(&e.to_string()),
            },
            Command::Logout => {
                if input.confirm("Log out of dbdeck?").await? {
                    let msg = app.auth().logout().await;
                    success(&msg);
                    return Ok(());
                }
            }
            Command::Help => print_help(),
            Command::Quit => return Ok(()),
        }
    }
}

async fn create(registry: &mut InstanceRegistry, password: &str) {
    println!("  {DIM}Creating database...{RESET}");
    match registry.create(password).await {
        Ok(outcome) => {
            success(&outcome.message);
            print_instance(registry, &outcome.instance);
        }
        Err(e) => failure(&e.to_string()),
    }
}

async fn delete(registry: &mut InstanceRegistry, input: &mut Input, id: &InstanceId) -> Result<()> {
    let Some(name) = registry.get(id).map(|i| i.name.clone()) else {
        warning(&format!("No database with id {id}"));
        return Ok(());
    };
    println!("  {YELLOW}This removes \"{name}\" from your dashboard.{RESET}");
    if input.confirm("Delete database?").await? {
        if let Some(removed) = registry.delete(id) {
            success(&format!("Database \"{}\" deleted.", removed.name));
        }
    }
    Ok(())
}

async fn open(registry: &InstanceRegistry, id: &InstanceId) {
    match registry.resolve_browser_target(id).await {
        Some(port) => {
            let url = registry.browser_url(port);
            println!("  {DIM}Opening{RESET} {CYAN}{url}{RESET}");
            open_in_browser(&url);
        }
        None => failure("No database found to open"),
    }
}

fn print_help() {
    println!("  {BOLD}create <password>{RESET}   provision a new database");
    println!("  {BOLD}list{RESET}                show databases created in this session");
    println!("  {BOLD}open <id>{RESET}           open the Neo4j Browser");
    println!("  {BOLD}delete <id>{RESET}         remove a database from the dashboard");
    println!("  {BOLD}info{RESET}                show your database's connection info");
    println!("  {BOLD}logout{RESET}              sign out and leave the dashboard");
    println!("  {BOLD}quit{RESET}                leave the dashboard");
}

fn print_instances(instances: &[DatabaseInstance]) {
    if instances.is_empty() {
        println!("  {DIM}No databases yet — create one with `create <password>`.{RESET}");
        return;
    }
    println!(
        "  {DIM}{:<9} {:<24} {:<10} {:<6} {:<6}{RESET}",
        "ID", "NAME", "STATUS", "BOLT", "HTTP"
    );
    for inst in instances {
        println!(
            "  {:<9} {:<24} {GREEN}{:<10}{RESET} {:<6} {:<6}",
            inst.id,
            inst.name,
            inst.status,
            inst.bolt_port,
            port_or_dash(inst.http_port)
        );
    }
}

pub fn print_instance(registry: &InstanceRegistry, inst: &DatabaseInstance) {
    kv_line("ID", inst.id.as_str());
    kv_line("Name", &inst.name);
    kv_line("Status", &inst.status.to_string());
    kv_line("Bolt", &registry.bolt_url(inst.bolt_port));
    kv_line("HTTP port", &port_or_dash(inst.http_port));
}

pub fn print_database_info(info: &DatabaseInfo) {
    header("🗄", &info.message);
    kv_line("Container", info.container_name.as_deref().unwrap_or("—"));
    kv_line("Bolt port", &port_or_dash(info.bolt_port));
    kv_line("HTTP port", &port_or_dash(info.http_port));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(
            parse_command("create s3cret"),
            Ok(Some(Command::Create {
                password: "s3cret".to_owned()
            }))
        );
        assert_eq!(parse_command("  ls "), Ok(Some(Command::List)));
        assert_eq!(
            parse_command("rm k3j9x0q"),
            Ok(Some(Command::Delete {
                id: InstanceId::from("k3j9x0q")
            }))
        );
        assert_eq!(
            parse_command("open k3j9x0q"),
            Ok(Some(Command::Open {
                id: InstanceId::from("k3j9x0q")
            }))
        );
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn create_without_password_is_left_to_the_registry() {
        assert_eq!(
            parse_command("create"),
            Ok(Some(Command::Create {
                password: String::new()
            }))
        );
    }

    #[test]
    fn rejects_bad_arity_and_unknown_verbs() {
        assert!(parse_command("delete").is_err());
        assert!(parse_command("list extra").is_err());
        assert!(parse_command("create a b").is_err());
        assert!(parse_command("drop table").is_err());
    }
}
