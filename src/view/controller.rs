//! The view controller task.
//!
//! Owns the current `ViewState`, feeds every intent and effect completion
//! through `reduce`, runs the resulting effects as background tasks and
//! publishes each new snapshot on a watch channel.

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::sync::{broadcast, mpsc, watch};

use crate::blockchain::binder::ContractBinder;
use crate::blockchain::wallet::{get_authorized_account, request_account, AccountWatcher, WalletProvider};
use crate::observability::metrics;
use crate::store::client::StoreClient;
use crate::store::types::StoreError;
use crate::view::reducer::{reduce, Effect, Event, Intent, ViewSettings};
use crate::view::state::ViewState;

const INTENT_BUFFER: usize = 32;

/// Wallet and contract access for a session that found a provider.
#[derive(Clone)]
pub struct Gateway {
    pub wallet: Arc<dyn WalletProvider>,
    pub binder: Arc<dyn ContractBinder>,
}

/// Front-end side of the controller: submit intents, observe snapshots.
#[derive(Clone)]
pub struct ViewHandle {
    intents: mpsc::Sender<Intent>,
    snapshots: watch::Receiver<Arc<ViewState>>,
}

impl ViewHandle {
    /// Queue an intent. Returns false once the controller has stopped.
    pub async fn send(&self, intent: Intent) -> bool {
        self.intents.send(intent).await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewState>> {
        self.snapshots.clone()
    }

    pub fn snapshot(&self) -> Arc<ViewState> {
        self.snapshots.borrow().clone()
    }

    /// Wait for the first snapshot satisfying `predicate`.
    ///
    /// Returns `None` if the controller stops first.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&ViewState) -> bool,
    ) -> Option<Arc<ViewState>> {
        let mut rx = self.snapshots.clone();
        let state = rx.wait_for(|state| predicate(state)).await.ok()?;
        Some(state.clone())
    }
}

pub struct ViewController {
    gateway: Option<Gateway>,
    settings: ViewSettings,
    state: Arc<ViewState>,
    /// Present while an account is bound.
    store: Option<StoreClient>,
    intents: mpsc::Receiver<Intent>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<Arc<ViewState>>,
}

impl ViewController {
    /// `gateway` is `None` when no wallet provider was detected.
    pub fn new(gateway: Option<Gateway>, settings: ViewSettings) -> (Self, ViewHandle) {
        let state = Arc::new(ViewState::default());
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.clone());

        let controller = Self {
            gateway,
            settings,
            state,
            store: None,
            intents: intent_rx,
            events_tx,
            events_rx,
            snapshots: snapshot_tx,
        };
        let handle = ViewHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
        };
        (controller, handle)
    }

    /// Run until shutdown fires or every handle is dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let mut accounts = self.initialize().await;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("View controller shutting down");
                    break;
                }
                intent = self.intents.recv() => match intent {
                    Some(intent) => {
                        tracing::debug!(?intent, "Intent received");
                        self.apply(Event::User(intent));
                    }
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.apply(event),
                change = next_account(&mut accounts) => match change {
                    Some(account) => self.apply(Event::AccountChanged(account)),
                    None => accounts = None,
                },
            }
        }

        tracing::debug!("View controller stopped");
    }

    /// Detect the provider and silently resolve an authorized account.
    async fn initialize(&mut self) -> Option<watch::Receiver<Option<Address>>> {
        let Some(gateway) = self.gateway.clone() else {
            tracing::warn!("No wallet provider detected");
            self.apply(Event::ProviderMissing);
            return None;
        };

        let account = get_authorized_account(gateway.wallet.as_ref()).await;
        tracing::info!(account = ?account, "Initial account resolved");
        self.apply(Event::AccountResolved(account));

        Some(AccountWatcher::spawn(
            gateway.wallet,
            self.settings.account_poll,
            account,
        ))
    }

    fn apply(&mut self, event: Event) {
        let (next, effects) = reduce(&self.state, event, &self.settings);

        if next.phase != self.state.phase {
            tracing::info!(
                from = self.state.phase.as_str(),
                to = next.phase.as_str(),
                "View phase changed"
            );
            metrics::record_view_transition(next.phase.as_str());
        }
        if next != *self.state {
            self.state = Arc::new(next);
            self.snapshots.send_replace(self.state.clone());
        }

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn emit_later<F>(&self, fut: F)
    where
        F: std::future::Future<Output = Event> + Send + 'static,
    {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = events.send(fut.await);
        });
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Alert(message) => tracing::error!(%message, "Alert raised"),
            Effect::RequestAccount => {
                let wallet = self.gateway.as_ref().map(|g| g.wallet.clone());
                self.emit_later(async move {
                    let result = request_account(wallet.as_deref())
                        .await
                        .map_err(StoreError::from_connect);
                    Event::ConnectFinished(result)
                });
            }
            Effect::Bind(account) => {
                if let Some(gateway) = &self.gateway {
                    let ledger = gateway.binder.bind(account);
                    self.store = Some(StoreClient::new(ledger, self.settings.purchase_amount));
                    tracing::info!(account = %account, "Store client bound");
                }
            }
            Effect::Unbind => {
                self.store = None;
                tracing::info!("Store client unbound");
            }
            Effect::FetchProducts => {
                if let Some(store) = self.store.clone() {
                    self.emit_later(async move { Event::ProductsLoaded(store.list_products().await) });
                }
            }
            Effect::FetchBalances(account) => {
                if let Some(store) = self.store.clone() {
                    let events = self.events_tx.clone();
                    tokio::spawn(async move {
                        let (account_balance, store_balance) =
                            tokio::join!(store.account_balance(account), store.store_balance());
                        let _ = events.send(Event::AccountBalanceLoaded {
                            account,
                            result: account_balance,
                        });
                        let _ = events.send(Event::StoreBalanceLoaded(store_balance));
                    });
                }
            }
            Effect::SubmitProduct(form) => {
                let store = self.store.clone();
                self.emit_later(async move {
                    let result = match store {
                        Some(store) => store.add_product(&form).await,
                        None => Err(StoreError::NoProvider),
                    };
                    Event::ProductAdded(result)
                });
            }
            Effect::SubmitPurchase(id) => {
                let store = self.store.clone();
                self.emit_later(async move {
                    let result = match store {
                        Some(store) => store.purchase_product(id).await,
                        None => Err(StoreError::NoProvider),
                    };
                    Event::PurchaseFinished { id, result }
                });
            }
            Effect::ExpireNotice { id, after } => {
                self.emit_later(async move {
                    tokio::time::sleep(after).await;
                    Event::NoticeExpired(id)
                });
            }
        }
    }
}

/// Next account reported by the watcher; `None` once the watcher is gone.
async fn next_account(
    accounts: &mut Option<watch::Receiver<Option<Address>>>,
) -> Option<Option<Address>> {
    match accounts {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(*rx.borrow_and_update()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}
