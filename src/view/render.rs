//! Plain-text rendering of a view snapshot.

use std::fmt::Write;

use crate::blockchain::units::Amount;
use crate::view::reducer::INSTALL_WALLET_MESSAGE;
use crate::view::state::{Fetch, NoticeLevel, Phase, ViewState};

pub const TITLE: &str = "Welcome to the Local Store!";

fn balance_line(fetch: &Fetch<Amount>) -> String {
    match fetch {
        Fetch::Idle => "loading...".to_string(),
        Fetch::Ready(amount) => format!("{amount} ETH"),
        Fetch::Failed {
            stale: Some(amount),
            ..
        } => format!("{amount} ETH (stale)"),
        Fetch::Failed { reason, stale: None } => format!("unavailable ({reason})"),
    }
}

/// Render the whole screen for `state`.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    if state.hovered {
        let _ = writeln!(out, "> {TITLE} <");
    } else {
        let _ = writeln!(out, "{TITLE}");
    }
    out.push('\n');

    match state.phase {
        Phase::Uninitialized => out.push_str("Looking for a wallet...\n"),
        Phase::WalletMissing => {
            let _ = writeln!(out, "{INSTALL_WALLET_MESSAGE}");
        }
        Phase::Disconnected => {
            if state.connecting {
                out.push_str("Waiting for approval in your wallet...\n");
            } else {
                out.push_str("Wallet not connected. Type `connect` to connect your wallet.\n");
            }
        }
        Phase::Connected => render_connected(state, &mut out),
    }

    if let Some(notice) = &state.notice {
        let label = match notice.level {
            NoticeLevel::Alert => "ALERT",
            NoticeLevel::Error => "Error",
            NoticeLevel::Info => "Note",
        };
        let _ = writeln!(out, "\n{label}: {}", notice.message);
    }

    out
}

fn render_connected(state: &ViewState, out: &mut String) {
    if let Some(account) = state.account {
        let _ = writeln!(out, "Account: {account}");
    }
    let _ = writeln!(out, "Balance: {}", balance_line(&state.account_balance));
    let _ = writeln!(out, "Store balance: {}", balance_line(&state.store_balance));

    if state.adds_in_flight > 0 {
        let _ = writeln!(out, "Adding {} product(s)...", state.adds_in_flight);
    }

    out.push_str("\nProducts\n");
    let (products, stale) = match &state.products {
        Fetch::Idle => {
            out.push_str("  loading...\n");
            return;
        }
        Fetch::Ready(products) => (products, false),
        Fetch::Failed {
            stale: Some(products),
            reason,
        } => {
            let _ = writeln!(out, "  (could not refresh: {reason})");
            (products, true)
        }
        Fetch::Failed { reason, stale: None } => {
            let _ = writeln!(out, "  Could not load products: {reason}");
            return;
        }
    };

    if products.is_empty() {
        out.push_str("  No products available\n");
        return;
    }

    for product in products {
        let pending = if state.pending_purchases.contains(&product.id) {
            " [purchase pending]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  #{} {} - {} ({}) - {} ETH, {} left - buy {}{}",
            product.id,
            product.name,
            product.description,
            product.category,
            product.price,
            product.quantity,
            product.id,
            pending
        );
    }
    if stale {
        out.push_str("  (showing last known list)\n");
    }
}
