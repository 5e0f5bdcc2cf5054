//! # Account Query
//!
//! Read-only view of an account as the network sees it. The client owns
//! none of this state: existence and root status come from the bootstrap
//! node through the [`RequestBridge`], and balance/tx-count come from an
//! optional [`AccountStateSource`] that replays cached block headers.
//!
//! The replay algorithm itself is not part of this crate. Plug one in with
//! [`AccountService::with_state_source`]; without it the node's own
//! numbers are reported.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::keys::Address;
use crate::error::{ClientError, ClientResult};
use crate::network::bridge::RequestBridge;
use crate::resolver::args::CheckAccountArgs;
use crate::resolver::resolve_public_key;
use crate::transaction::TxHash;

/// An account record as the node reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub balance: u64,
    pub tx_count: u32,
    pub is_created: bool,
    pub is_root: bool,
    pub is_staking: bool,
}

/// Output of a state replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: u64,
    pub tx_count: u32,
    /// Most recent transactions touching the account, newest first.
    pub recent_txs: Vec<TxHash>,
}

/// `GetAccountState(address) -> (balance, txCount, recentTxs)`.
pub trait AccountStateSource: Send + Sync {
    fn get_account_state(&self, address: &Address) -> ClientResult<AccountState>;
}

/// What `account check` and `GET /account/:address` return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub account: Account,
    pub recent_txs: Vec<TxHash>,
}

#[derive(Clone)]
pub struct AccountService {
    bridge: RequestBridge,
    state: Option<Arc<dyn AccountStateSource>>,
}

impl AccountService {
    pub fn new(bridge: RequestBridge) -> Self {
        Self {
            bridge,
            state: None,
        }
    }

    pub fn with_state_source(mut self, source: Arc<dyn AccountStateSource>) -> Self {
        self.state = Some(source);
        self
    }

    /// `Ok(None)` when the network does not know the address.
    pub async fn get_account(&self, address: &Address) -> ClientResult<Option<AccountView>> {
        let address_hash = address.hash();

        let Some(found) = self.bridge.request_account(false, address_hash).await? else {
            debug!(address = %address, "account does not exist");
            return Ok(None);
        };

        let is_root = self
            .bridge
            .request_account(true, address_hash)
            .await?
            .is_some();

        let mut account = Account {
            address: *address,
            balance: found.balance,
            tx_count: found.tx_count,
            is_created: true,
            is_root,
            is_staking: found.is_staking,
        };
        let mut recent_txs = Vec::new();

        if let Some(source) = &self.state {
            let state = source.get_account_state(address)?;
            account.balance = state.balance;
            account.tx_count = state.tx_count;
            recent_txs = state.recent_txs;
        }

        Ok(Some(AccountView {
            account,
            recent_txs,
        }))
    }

    /// `account check`: the address comes from `address`, or from the
    /// public key in `wallet` when one is given.
    pub async fn check(&self, args: &CheckAccountArgs) -> ClientResult<Option<AccountView>> {
        args.validate()?;
        let address = if args.wallet.is_empty() {
            Address::from_hex(&args.address)?
        } else {
            resolve_public_key(&args.wallet)?
                .ok_or_else(|| ClientError::missing("wallet"))?
                .address()
        };
        self.get_account(&address).await
    }
}
