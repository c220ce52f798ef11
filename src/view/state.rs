//! Immutable view snapshot.

use std::collections::BTreeSet;

use alloy::primitives::{Address, U256};

use crate::blockchain::units::Amount;
use crate::store::types::Product;

/// Connection lifecycle of the front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Uninitialized,
    WalletMissing,
    Disconnected,
    Connected,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::WalletMissing => "wallet_missing",
            Phase::Disconnected => "disconnected",
            Phase::Connected => "connected",
        }
    }
}

/// Result of the most recent fetch of a value.
///
/// `Failed` keeps the last good value as `stale` so a failed refresh never
/// erases data, and an empty list stays distinguishable from a failed read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Fetch<T> {
    #[default]
    Idle,
    Ready(T),
    Failed { reason: String, stale: Option<T> },
}

impl<T: Clone> Fetch<T> {
    /// Latest known value, fresh or stale.
    pub fn value(&self) -> Option<&T> {
        match self {
            Fetch::Idle => None,
            Fetch::Ready(value) => Some(value),
            Fetch::Failed { stale, .. } => stale.as_ref(),
        }
    }

    /// Record a failed refresh, carrying the last good value along.
    pub fn fail(&self, reason: impl Into<String>) -> Self {
        Fetch::Failed {
            reason: reason.into(),
            stale: self.value().cloned(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetch::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Session-blocking; stays until the situation changes.
    Alert,
    Error,
    Info,
}

/// Message shown under the main view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Everything the renderer needs, owned by the view controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub phase: Phase,
    pub account: Option<Address>,
    pub account_balance: Fetch<Amount>,
    pub store_balance: Fetch<Amount>,
    pub products: Fetch<Vec<Product>>,
    pub notice: Option<Notice>,
    pub hovered: bool,
    /// A connect prompt is open.
    pub connecting: bool,
    pub adds_in_flight: usize,
    pub pending_purchases: BTreeSet<U256>,
    /// Source of notice ids; lets an expiry timer recognise its own notice.
    pub notice_seq: u64,
}

impl ViewState {
    pub fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_keeps_stale_value() {
        let fetched: Fetch<u32> = Fetch::Ready(7);
        let failed = fetched.fail("timeout");
        assert_eq!(
            failed,
            Fetch::Failed {
                reason: "timeout".to_string(),
                stale: Some(7)
            }
        );
        assert_eq!(failed.value(), Some(&7));

        // A second failure still remembers the original value.
        assert_eq!(failed.fail("again").value(), Some(&7));
    }

    #[test]
    fn test_empty_list_is_not_a_failure() {
        let empty: Fetch<Vec<u8>> = Fetch::Ready(Vec::new());
        assert!(!empty.is_failed());
        assert!(Fetch::<Vec<u8>>::Idle.fail("down").is_failed());
    }
}
