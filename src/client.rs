//! High-level client — `ClobClient` wiring the contracts, the store, the feeds
//! and the actions of one trading page.
//!
//! Building a client does no I/O. [`ClobClient::mount`] starts the
//! event-driven refreshes and returns a [`Session`]; dropping the session
//! stops them.

use crate::contract::{ClobContract, TokenContract};
use crate::domain::approval::ApprovalGate;
use crate::domain::form::OrderForm;
use crate::domain::orderbook::{OrderBookFeed, OrderBookRefresher};
use crate::domain::token::{MintAction, TokenBalances, DEFAULT_MINT_AMOUNT};
use crate::domain::trade::{TradeHistoryFeed, TradeHistoryHandle};
use crate::error::ClientError;
use crate::events::{spawn_refresh, EventHub, RefreshHandle};
use crate::shared::Token;
use crate::store::AppState;
use crate::view::Page;

#[cfg(feature = "http")]
use crate::config::Deployment;
#[cfg(feature = "http")]
use crate::contract::rpc::{RpcClob, RpcToken};
#[cfg(feature = "http")]
use crate::events::poller::{LogPoller, PollerConfig};
#[cfg(feature = "http")]
use crate::rpc::RpcHttp;

use alloy_primitives::Address;
use futures_util::future::{join, join_all};
use std::sync::Arc;

/// The primary entry point: one trading page over one CLOB deployment.
pub struct ClobClient {
    state: Arc<AppState>,
    hub: Arc<EventHub>,
    clob: Arc<dyn ClobContract>,
    token_addresses: Vec<Address>,
    order_book: Arc<OrderBookFeed>,
    trades: Arc<TradeHistoryFeed>,
    balances: Arc<TokenBalances>,
    gates: Vec<Arc<ApprovalGate>>,
    form: Arc<OrderForm>,
    mints: Vec<Arc<MintAction>>,
    #[cfg(feature = "http")]
    rpc: Option<RpcSetup>,
}

#[cfg(feature = "http")]
struct RpcSetup {
    rpc: Arc<RpcHttp>,
    chain_id: u64,
    poller: PollerConfig,
}

impl ClobClient {
    pub fn builder() -> ClobClientBuilder {
        ClobClientBuilder::default()
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    pub fn clob_address(&self) -> Address {
        self.clob.address()
    }

    pub fn order_book(&self) -> &Arc<OrderBookFeed> {
        &self.order_book
    }

    pub fn trade_history(&self) -> &Arc<TradeHistoryFeed> {
        &self.trades
    }

    pub fn balances(&self) -> &Arc<TokenBalances> {
        &self.balances
    }

    pub fn form(&self) -> &Arc<OrderForm> {
        &self.form
    }

    pub fn approval(&self, token: Token) -> Option<&Arc<ApprovalGate>> {
        self.gates.iter().find(|g| g.token() == token)
    }

    pub fn mint(&self, token: Token) -> Option<&Arc<MintAction>> {
        self.mints.iter().find(|m| m.token() == token)
    }

    pub fn mints(&self) -> &[Arc<MintAction>] {
        &self.mints
    }

    // ── Account ──────────────────────────────────────────────────────────

    /// Switch the connected wallet account (or disconnect with `None`) and
    /// re-read its balances and allowances.
    pub async fn connect(&self, account: Option<Address>) {
        self.state.set_account(account);
        self.refresh_account().await;
    }

    /// Re-read balances and allowances of the connected account.
    /// Failures are logged and leave cached values in place.
    pub async fn refresh_account(&self) {
        refresh_account_reads(&self.balances, &self.gates).await;
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Start the event-driven feeds: the book and the account reads are
    /// refreshed now and on every relevant event, and matches are recorded
    /// into the trade history. With an RPC transport, a log poller feeds the
    /// hub.
    ///
    /// Must be called inside a tokio runtime.
    pub fn mount(&self) -> Session {
        let order_book = OrderBookRefresher::spawn(Arc::clone(&self.order_book), Arc::clone(&self.hub));
        let trades = Arc::clone(&self.trades).attach(Arc::clone(&self.hub));

        let watched: Vec<Address> = std::iter::once(self.clob_address())
            .chain(self.token_addresses.iter().copied())
            .collect();
        let account = {
            let balances = Arc::clone(&self.balances);
            let gates = self.gates.clone();
            spawn_refresh(
                Arc::clone(&self.hub),
                move |event| watched.contains(&event.address()),
                move || {
                    let balances = Arc::clone(&balances);
                    let gates = gates.clone();
                    async move { refresh_account_reads(&balances, &gates).await }
                },
            )
        };

        #[cfg(feature = "http")]
        let poller = self.rpc.as_ref().map(|setup| {
            let addresses = std::iter::once(self.clob_address())
                .chain(self.token_addresses.iter().copied())
                .collect();
            LogPoller::start(
                Arc::clone(&setup.rpc),
                Arc::clone(&self.hub),
                addresses,
                setup.poller.clone(),
            )
        });

        tracing::info!("Trading page mounted for CLOB {}", self.clob_address());
        Session {
            order_book,
            account,
            trades,
            #[cfg(feature = "http")]
            poller,
        }
    }

    /// Snapshot of the whole page.
    pub fn render_page(&self) -> Page {
        Page::build(&self.state, &self.form, &self.mints)
    }

    /// Compare the node's chain id with the deployment's.
    #[cfg(feature = "http")]
    pub async fn check_chain(&self) -> Result<(), ClientError> {
        let Some(setup) = &self.rpc else {
            return Ok(());
        };
        let actual = setup.rpc.chain_id().await?;
        if actual != setup.chain_id {
            return Err(ClientError::Validation(format!(
                "Node is on chain {}, deployment is for chain {}",
                actual, setup.chain_id
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ClobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClobClient")
            .field("clob", &self.clob_address())
            .field("tokens", &self.token_addresses)
            .field("account", &self.state.account.get())
            .finish()
    }
}

async fn refresh_account_reads(balances: &TokenBalances, gates: &[Arc<ApprovalGate>]) {
    let allowances = join_all(gates.iter().map(|g| g.refresh_allowance()));
    join(balances.refresh_all(), allowances).await;
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Running feeds of a mounted page. Dropping it stops them all.
pub struct Session {
    order_book: RefreshHandle,
    account: RefreshHandle,
    trades: TradeHistoryHandle,
    #[cfg(feature = "http")]
    poller: Option<LogPoller>,
}

impl Session {
    pub fn is_running(&self) -> bool {
        self.order_book.is_running() && self.account.is_running()
    }

    /// Stop the log poller gracefully, then drop the feeds.
    pub async fn unmount(self) {
        #[cfg(feature = "http")]
        {
            let mut session = self;
            if let Some(poller) = session.poller.as_mut() {
                poller.stop().await;
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("order_book", &self.order_book)
            .field("account", &self.account)
            .field("trades", &self.trades)
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct ClobClientBuilder {
    clob: Option<Arc<dyn ClobContract>>,
    tokens: Vec<Arc<dyn TokenContract>>,
    hub: Option<Arc<EventHub>>,
    account: Option<Address>,
    mint_amount: String,
    trade_history_limit: Option<usize>,
    #[cfg(feature = "http")]
    rpc: Option<RpcSetup>,
}

impl Default for ClobClientBuilder {
    fn default() -> Self {
        Self {
            clob: None,
            tokens: Vec::new(),
            hub: None,
            account: None,
            mint_amount: DEFAULT_MINT_AMOUNT.to_string(),
            trade_history_limit: None,
            #[cfg(feature = "http")]
            rpc: None,
        }
    }
}

impl ClobClientBuilder {
    pub fn clob(mut self, clob: Arc<dyn ClobContract>) -> Self {
        self.clob = Some(clob);
        self
    }

    /// Add a token contract. Each token may be added once.
    pub fn token(mut self, token: Arc<dyn TokenContract>) -> Self {
        self.tokens.push(token);
        self
    }

    /// Share an existing event hub instead of creating one.
    pub fn event_hub(mut self, hub: Arc<EventHub>) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Amount minted by each mint button, in whole tokens.
    pub fn mint_amount(mut self, amount: &str) -> Self {
        self.mint_amount = amount.to_string();
        self
    }

    /// Keep at most `limit` trades (oldest evicted). Unbounded by default.
    pub fn trade_history_limit(mut self, limit: usize) -> Self {
        self.trade_history_limit = Some(limit);
        self
    }

    /// Use a JSON-RPC node for the CLOB and both tokens, at the addresses of
    /// `deployment`. Mounting the client then also starts a log poller.
    #[cfg(feature = "http")]
    pub fn rpc(mut self, rpc: Arc<RpcHttp>, deployment: &Deployment) -> Result<Self, ClientError> {
        self.clob = Some(Arc::new(RpcClob::new(Arc::clone(&rpc), deployment.clob_address()?)));
        self.tokens.clear();
        for token in Token::ALL {
            let address = deployment.token_address(token)?;
            self.tokens
                .push(Arc::new(RpcToken::new(Arc::clone(&rpc), token, address)));
        }
        self.rpc = Some(RpcSetup {
            rpc,
            chain_id: deployment.chain_id,
            poller: PollerConfig {
                start_block: deployment.first_block(),
                ..PollerConfig::default()
            },
        });
        Ok(self)
    }

    /// Override the log poller settings used with [`rpc`](Self::rpc).
    #[cfg(feature = "http")]
    pub fn poller_config(mut self, config: PollerConfig) -> Self {
        if let Some(setup) = self.rpc.as_mut() {
            setup.poller = config;
        }
        self
    }

    pub fn build(self) -> Result<ClobClient, ClientError> {
        let clob = self
            .clob
            .ok_or_else(|| ClientError::Validation("CLOB contract not configured".to_string()))?;

        for (i, token) in self.tokens.iter().enumerate() {
            if self.tokens[..i].iter().any(|t| t.token() == token.token()) {
                return Err(ClientError::Validation(format!(
                    "Token {} configured twice",
                    token.token()
                )));
            }
        }

        let state = Arc::new(AppState::with_trade_history_limit(self.trade_history_limit));
        state.set_account(self.account);
        let hub = self.hub.unwrap_or_default();

        let gates: Vec<Arc<ApprovalGate>> = self
            .tokens
            .iter()
            .map(|t| Arc::new(ApprovalGate::new(Arc::clone(t), clob.address(), Arc::clone(&state))))
            .collect();
        let mints = self
            .tokens
            .iter()
            .map(|t| {
                Arc::new(MintAction::with_amount(
                    Arc::clone(t),
                    Arc::clone(&state),
                    self.mint_amount.clone(),
                ))
            })
            .collect();

        Ok(ClobClient {
            token_addresses: self.tokens.iter().map(|t| t.address()).collect(),
            order_book: Arc::new(OrderBookFeed::new(Arc::clone(&clob), Arc::clone(&state))),
            trades: Arc::new(TradeHistoryFeed::new(Arc::clone(&state), clob.address())),
            balances: Arc::new(TokenBalances::new(self.tokens, Arc::clone(&state))),
            form: Arc::new(OrderForm::new(Arc::clone(&clob), Arc::clone(&state), gates.clone())),
            gates,
            mints,
            state,
            hub,
            clob,
            #[cfg(feature = "http")]
            rpc: self.rpc,
        })
    }
}
