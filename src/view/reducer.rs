//! Pure state transitions.
//!
//! `reduce` maps the current snapshot and one event to the next snapshot plus
//! the side effects the controller must run. It performs no I/O, so every
//! transition is testable without a runtime.

use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::blockchain::types::TxReceipt;
use crate::blockchain::units::{Amount, AmountError};
use crate::config::StoreConfig;
use crate::store::types::{Product, ProductForm, StoreError};
use crate::view::state::{Fetch, Notice, NoticeLevel, Phase, ViewState};

pub const INSTALL_WALLET_MESSAGE: &str = "Please install a wallet to use this store.";

/// Controller behaviour derived from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// How long a transient error stays visible.
    pub error_display: Duration,
    /// Refuse a repeat purchase of a product while one is pending.
    pub dedupe_purchases: bool,
    /// Payment attached to every purchase.
    pub purchase_amount: Amount,
    /// Poll interval of the account watcher.
    pub account_poll: Duration,
}

impl ViewSettings {
    pub fn from_config(config: &StoreConfig) -> Result<Self, AmountError> {
        Ok(Self {
            error_display: Duration::from_secs(config.ui.error_display_secs),
            dedupe_purchases: config.purchase.dedupe_in_flight,
            purchase_amount: Amount::from_decimal(&config.purchase.fixed_amount)?,
            account_poll: Duration::from_millis(config.wallet.account_poll_ms),
        })
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            error_display: Duration::from_secs(5),
            dedupe_purchases: true,
            purchase_amount: Amount::from_wei(U256::from(10u64).pow(U256::from(18u64))),
            account_poll: Duration::from_secs(2),
        }
    }
}

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Connect,
    AddProduct(ProductForm),
    Purchase(U256),
    Refresh,
    PointerEntered,
    PointerLeft,
}

/// Inputs to the reducer: user intents and completions of earlier effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProviderMissing,
    AccountResolved(Option<Address>),
    User(Intent),
    ConnectFinished(Result<Address, StoreError>),
    AccountChanged(Option<Address>),
    ProductsLoaded(Result<Vec<Product>, StoreError>),
    AccountBalanceLoaded {
        account: Address,
        result: Result<Amount, StoreError>,
    },
    StoreBalanceLoaded(Result<Amount, StoreError>),
    ProductAdded(Result<TxReceipt, StoreError>),
    PurchaseFinished {
        id: U256,
        result: Result<TxReceipt, StoreError>,
    },
    NoticeExpired(u64),
}

/// Work the controller performs on the reducer's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Blocking, session-level message.
    Alert(String),
    RequestAccount,
    /// Rebuild the contract handle for this account.
    Bind(Address),
    Unbind,
    FetchProducts,
    /// Read the account balance for this account and the store balance.
    FetchBalances(Address),
    SubmitProduct(ProductForm),
    SubmitPurchase(U256),
    ExpireNotice { id: u64, after: Duration },
}

struct Transition<'a> {
    state: ViewState,
    effects: Vec<Effect>,
    settings: &'a ViewSettings,
}

impl Transition<'_> {
    fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.notice_seq += 1;
        let id = self.state.notice_seq;
        self.state.notice = Some(Notice {
            id,
            level,
            message: message.into(),
        });
        if level != NoticeLevel::Alert {
            self.effects.push(Effect::ExpireNotice {
                id,
                after: self.settings.error_display,
            });
        }
    }

    fn refresh(&mut self) {
        if let Some(account) = self.state.account {
            self.effects.push(Effect::FetchBalances(account));
            self.effects.push(Effect::FetchProducts);
        }
    }

    fn enter_connected(&mut self, account: Address) {
        if self.state.account != Some(account) {
            self.state.account_balance = Fetch::Idle;
            self.state.store_balance = Fetch::Idle;
        }
        self.state.phase = Phase::Connected;
        self.state.account = Some(account);
        self.state.connecting = false;
        self.effects.push(Effect::Bind(account));
        self.refresh();
    }

    fn enter_disconnected(&mut self) {
        let was_bound = self.state.account.is_some();
        self.state.phase = Phase::Disconnected;
        self.state.account = None;
        self.state.connecting = false;
        self.state.account_balance = Fetch::Idle;
        self.state.store_balance = Fetch::Idle;
        self.state.products = Fetch::Idle;
        if was_bound {
            self.effects.push(Effect::Unbind);
        }
    }

    fn on_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Connect => match self.state.phase {
                Phase::WalletMissing => {
                    let message = "A wallet is required to connect.";
                    self.notice(NoticeLevel::Alert, message);
                    self.effects.push(Effect::Alert(message.to_string()));
                }
                Phase::Disconnected if !self.state.connecting => {
                    self.state.connecting = true;
                    self.effects.push(Effect::RequestAccount);
                }
                _ => {}
            },
            Intent::AddProduct(form) => {
                if !self.state.is_connected() {
                    self.notice(NoticeLevel::Error, "Connect a wallet before adding products.");
                    return;
                }
                self.state.adds_in_flight += 1;
                self.effects.push(Effect::SubmitProduct(form));
            }
            Intent::Purchase(id) => {
                if !self.state.is_connected() {
                    self.notice(NoticeLevel::Error, "Connect a wallet before purchasing.");
                    return;
                }
                if self.settings.dedupe_purchases && self.state.pending_purchases.contains(&id) {
                    self.notice(
                        NoticeLevel::Info,
                        format!("A purchase of product {id} is already pending."),
                    );
                    return;
                }
                self.state.pending_purchases.insert(id);
                self.effects.push(Effect::SubmitPurchase(id));
            }
            Intent::Refresh => {
                if self.state.is_connected() {
                    self.refresh();
                }
            }
            Intent::PointerEntered => self.state.hovered = true,
            Intent::PointerLeft => self.state.hovered = false,
        }
    }

    fn apply(&mut self, event: Event) {
        match event {
            Event::ProviderMissing => {
                self.state.phase = Phase::WalletMissing;
                self.notice(NoticeLevel::Alert, INSTALL_WALLET_MESSAGE);
                self.effects.push(Effect::Alert(INSTALL_WALLET_MESSAGE.to_string()));
            }
            Event::AccountResolved(Some(account)) => self.enter_connected(account),
            Event::AccountResolved(None) => self.state.phase = Phase::Disconnected,
            Event::User(intent) => self.on_intent(intent),
            // The watcher may have reported the granted account first.
            Event::ConnectFinished(Ok(account))
                if self.state.is_connected() && self.state.account == Some(account) =>
            {
                self.state.connecting = false;
            }
            Event::ConnectFinished(Ok(account)) => self.enter_connected(account),
            Event::ConnectFinished(Err(err)) => {
                self.state.connecting = false;
                match err {
                    err if !err.is_recoverable() => {
                        self.state.phase = Phase::WalletMissing;
                        self.notice(NoticeLevel::Alert, INSTALL_WALLET_MESSAGE);
                        self.effects.push(Effect::Alert(INSTALL_WALLET_MESSAGE.to_string()));
                    }
                    StoreError::UserRejected => {
                        self.notice(NoticeLevel::Error, "Wallet connection was rejected.")
                    }
                    other => self.notice(NoticeLevel::Error, other.to_string()),
                }
            }
            Event::AccountChanged(Some(account)) => match self.state.phase {
                Phase::Connected if self.state.account == Some(account) => {}
                Phase::Connected | Phase::Disconnected => self.enter_connected(account),
                Phase::Uninitialized | Phase::WalletMissing => {}
            },
            Event::AccountChanged(None) => {
                if self.state.is_connected() {
                    self.enter_disconnected();
                }
            }
            Event::ProductsLoaded(result) => {
                if !self.state.is_connected() {
                    return;
                }
                self.state.products = match result {
                    Ok(products) => Fetch::Ready(products),
                    Err(e) => self.state.products.fail(e.to_string()),
                };
            }
            Event::AccountBalanceLoaded { account, result } => {
                // Results for an account that is no longer active are dropped.
                if self.state.account != Some(account) {
                    return;
                }
                self.state.account_balance = match result {
                    Ok(amount) => Fetch::Ready(amount),
                    Err(e) => self.state.account_balance.fail(e.to_string()),
                };
            }
            Event::StoreBalanceLoaded(result) => {
                if !self.state.is_connected() {
                    return;
                }
                self.state.store_balance = match result {
                    Ok(amount) => Fetch::Ready(amount),
                    Err(e) => self.state.store_balance.fail(e.to_string()),
                };
            }
            Event::ProductAdded(result) => {
                self.state.adds_in_flight = self.state.adds_in_flight.saturating_sub(1);
                match result {
                    Ok(_) => self.refresh(),
                    Err(e) => self.notice(NoticeLevel::Error, format!("Failed to add product: {e}")),
                }
            }
            Event::PurchaseFinished { id, result } => {
                self.state.pending_purchases.remove(&id);
                match result {
                    Ok(_) => self.refresh(),
                    Err(e) => self.notice(
                        NoticeLevel::Error,
                        format!("Failed to purchase product {id}: {e}"),
                    ),
                }
            }
            Event::NoticeExpired(id) => {
                if self.state.notice.as_ref().is_some_and(|n| n.id == id) {
                    self.state.notice = None;
                }
            }
        }
    }
}

/// Compute the next snapshot and the effects to run.
pub fn reduce(state: &ViewState, event: Event, settings: &ViewSettings) -> (ViewState, Vec<Effect>) {
    let mut transition = Transition {
        state: state.clone(),
        effects: Vec::new(),
        settings,
    };
    transition.apply(event);
    (transition.state, transition.effects)
}
