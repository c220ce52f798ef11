//! Terminal command parsing.

use alloy::primitives::U256;

use crate::store::types::ProductForm;
use crate::view::reducer::Intent;

pub const HELP: &str = "\
Commands:
  connect                                                  connect your wallet
  add <name> | <description> | <price> | <quantity> | <category>
                                                           list a new product
  buy <id>                                                 purchase a product
  refresh                                                  reload balances and products
  help                                                     show this text
  quit                                                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "connect" => Ok(Command::Intent(Intent::Connect)),
        "add" => rest
            .parse::<ProductForm>()
            .map(|form| Command::Intent(Intent::AddProduct(form))),
        "buy" | "purchase" => {
            if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("expected a product id, got '{rest}'"));
            }
            U256::from_str_radix(rest, 10)
                .map(|id| Command::Intent(Intent::Purchase(id)))
                .map_err(|e| format!("invalid product id '{rest}': {e}"))
        }
        "refresh" => Ok(Command::Intent(Intent::Refresh)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}', type `help`")),
    }
}
