//! # Transaction Preparer
//!
//! First phase of the prepare → sign → submit protocol. For every kind the
//! preparer:
//!
//! 1. validates the request arguments,
//! 2. resolves keys and chameleon parameters,
//! 3. builds the unsigned transaction,
//! 4. computes its identifier (chameleon hash or content hash),
//! 5. stages it in the store under that identifier,
//!
//! and hands back `(hash, transaction)`. The caller signs the hash wherever
//! its private key lives and comes back through the signature coordinator.
//!
//! The preparer takes the fee it is given. Coercing a zero fee is the
//! request layer's job; here zero is a validation error like any other.

use tracing::{debug, info};

use crate::crypto::chameleon::{new_check_string, ChParams};
use crate::crypto::keys::{Address, PublicKey};
use crate::error::{ClientError, ClientResult};
use crate::resolver::args::{
    AddAccountArgs, ConfigOption, CreateAccountArgs, DeleteArgs, FundsArgs, NetworkArgs,
    StakingArgs, UpdateArgs,
};
use crate::resolver::{resolve_ch_params, resolve_commitment, resolve_public_key};
use crate::storage::db::TxStore;
use crate::transaction::{Transaction, TxHash};

use super::redaction::RedactionEngine;

/// A freshly staged, unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub hash: TxHash,
    pub tx: Transaction,
}

/// Builds and stages unsigned transactions.
#[derive(Debug, Clone)]
pub struct TxPreparer {
    store: TxStore,
    redaction: RedactionEngine,
}

fn required<T>(value: Option<T>, name: &str) -> ClientResult<T> {
    value.ok_or_else(|| ClientError::missing(name))
}

impl TxPreparer {
    /// `redaction` must share `store`; update preparation redacts the
    /// target in place before staging the update itself.
    pub fn new(store: TxStore, redaction: RedactionEngine) -> Self {
        Self { store, redaction }
    }

    fn stage(&self, tx: Transaction, params: Option<&ChParams>) -> ClientResult<Prepared> {
        let hash = tx.id(params)?;
        self.store.put(&hash, &tx)?;
        info!(hash = %hash, kind = %tx.kind(), fee = tx.fee, "transaction prepared");
        Ok(Prepared { hash, tx })
    }

    /// Account creation for a key pair held in (or generated into)
    /// `args.wallet`.
    pub fn prepare_account(&self, args: &CreateAccountArgs) -> ClientResult<Prepared> {
        args.validate()?;
        let new_key = required(resolve_public_key(&args.wallet)?, "wallet")?;
        self.account_tx(
            args.header,
            args.fee,
            &args.root_wallet,
            new_key.address(),
            &args.chparams,
            &args.data,
        )
    }

    /// Account creation for an address given directly.
    pub fn prepare_add_account(&self, args: &AddAccountArgs) -> ClientResult<Prepared> {
        args.validate()?;
        let address = Address::from_hex(&args.address)?;
        self.account_tx(
            args.header,
            args.fee,
            &args.root_wallet,
            address,
            &args.chparams,
            &args.data,
        )
    }

    fn account_tx(
        &self,
        header: u8,
        fee: u64,
        root_wallet: &str,
        new_address: Address,
        chparams: &str,
        data: &str,
    ) -> ClientResult<Prepared> {
        let issuer = required(resolve_public_key(root_wallet)?, "rootwallet")?;
        let params = required(resolve_ch_params(chparams)?, "chparams")?.sanitized();
        let check_string = new_check_string(&params)?;

        let tx = Transaction::account_creation(
            header,
            fee,
            issuer.address().hash(),
            new_address,
            &params,
            check_string,
            data.as_bytes().to_vec(),
        )?;
        self.stage(tx, Some(&params))
    }

    pub fn prepare_funds(&self, args: &FundsArgs) -> ClientResult<Prepared> {
        args.validate()?;
        let from = required(resolve_public_key(&args.from)?, "from")?;
        let to = if args.to.is_empty() {
            Address::from_hex(&args.to_address)?
        } else {
            required(resolve_public_key(&args.to)?, "to")?.address()
        };
        let params = required(resolve_ch_params(&args.chparams)?, "chparams")?;
        let check_string = new_check_string(&params)?;

        let tx = Transaction::funds_transfer(
            args.header,
            args.amount,
            args.fee,
            args.tx_count,
            from.address().hash(),
            to.hash(),
            check_string,
            args.data.as_bytes().to_vec(),
        )?;
        self.stage(tx, Some(&params))
    }

    pub fn prepare_config(&self, args: &NetworkArgs) -> ClientResult<Prepared> {
        args.validate()?;
        // Only checked for presence and well-formedness; the network
        // verifies the root signature.
        required(resolve_public_key(&args.root_wallet)?, "rootwallet")?;
        if let Some(option) = ConfigOption::from_id(args.option_id) {
            debug!(option = option.name(), value = args.payload, "network option change");
        }

        let tx = Transaction::config(
            args.header,
            args.option_id,
            args.payload,
            args.fee,
            args.tx_count,
        )?;
        self.stage(tx, None)
    }

    pub fn prepare_stake(&self, args: &StakingArgs) -> ClientResult<Prepared> {
        args.validate()?;
        let account = required(resolve_public_key(&args.wallet)?, "wallet")?;
        let commitment = if args.staking {
            required(resolve_commitment(&args.commitment)?, "Commitment")?
        } else {
            Vec::new()
        };

        let tx = Transaction::stake(
            args.header,
            args.fee,
            args.staking,
            account.address().hash(),
            commitment,
        )?;
        self.stage(tx, None)
    }

    /// Redact the target to `update_data`, then stage the update
    /// transaction carrying the target's new check string.
    pub fn prepare_update(&self, args: &UpdateArgs) -> ClientResult<Prepared> {
        args.validate()?;
        let target = TxHash::from_hex(args.tx_hash.trim())?;
        let issuer: PublicKey = required(resolve_public_key(&args.tx_issuer)?, "txIssuer")?;
        let params = required(resolve_ch_params(&args.chparams)?, "ch_params")?;

        let new_data = args.update_data.as_bytes().to_vec();
        let target_check_string = self.redaction.redact(&target, new_data.clone(), &params)?;
        debug!(target = %target, "target redacted, staging update transaction");

        let tx = Transaction::update(
            args.header,
            args.fee,
            target,
            target_check_string,
            new_data,
            issuer.address().hash(),
            new_check_string(&params)?,
            args.data.as_bytes().to_vec(),
        )?;
        self.stage(tx, Some(&params))
    }

    pub fn prepare_delete(&self, args: &DeleteArgs) -> ClientResult<Prepared> {
        self.prepare_update(&args.as_update())
    }
}
