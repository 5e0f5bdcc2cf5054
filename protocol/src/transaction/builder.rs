//! Transaction construction and canonical hashing.
//!
//! A [`Transaction`] is a small common envelope (header, fee, data, check
//! string, two signature slots) around a kind-specific [`TxBody`]. The
//! constructors here are the only way the preparer builds one, so the
//! structural rules (positive fee, positive amount, trapdoor stripped from
//! embedded parameters) hold for every staged record.
//!
//! # Content hash
//!
//! [`Transaction::signable_bytes`] is a deterministic concatenation of every
//! field *except* the check string and the two signature slots. Its SHA3 is
//! the content hash: the message the chameleon hash commits to. Leaving the
//! check string out is what lets redaction swap it without feedback; leaving
//! the signatures out lets a transaction be signed over its own identifier.

use serde::{Deserialize, Serialize};

use super::types::{TxHash, TxKind};
use crate::crypto::chameleon::{chameleon_hash, ChParams, CheckString};
use crate::crypto::hash::sha3_256;
use crate::crypto::keys::Address;
use crate::crypto::signatures::Signature;
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A staged transaction of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// One-byte header flag, passed through to the network untouched.
    pub header: u8,
    /// Fee paid to the network. Always > 0.
    pub fee: u64,
    /// Opaque payload. The only field redaction changes.
    pub data: Vec<u8>,
    /// Chameleon randomness. `Some` exactly for redactable kinds.
    pub check_string: Option<CheckString>,
    /// Primary signature slot.
    pub sig1: Signature,
    /// Co-signer slot. Only meaningful for funds transfers; zero otherwise.
    pub sig2: Signature,
    /// Kind-specific fields.
    pub body: TxBody,
}

/// Kind-specific transaction fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxBody {
    AccountCreation {
        /// Address hash of the root account vouching for the new one.
        issuer: [u8; 32],
        new_address: Address,
        /// The new account's chameleon parameters, trapdoor stripped.
        params: ChParams,
    },
    FundsTransfer {
        amount: u64,
        tx_count: u32,
        from: [u8; 32],
        to: [u8; 32],
    },
    Config {
        option_id: u8,
        payload: u64,
        tx_count: u32,
    },
    Stake {
        is_staking: bool,
        account: [u8; 32],
        /// Commitment public key bytes. Empty when disabling.
        commitment: Vec<u8>,
    },
    Update {
        /// Identifier of the transaction being redacted.
        target: TxHash,
        /// Check string that reproduces `target` over the new content.
        target_check_string: CheckString,
        /// Data the target carries after redaction. Empty for deletes.
        new_data: Vec<u8>,
        issuer: [u8; 32],
    },
}

fn require_fee(fee: u64) -> ClientResult<()> {
    if fee == 0 {
        return Err(ClientError::invalid("Fee must be > 0"));
    }
    Ok(())
}

impl Transaction {
    fn envelope(
        header: u8,
        fee: u64,
        data: Vec<u8>,
        check_string: Option<CheckString>,
        body: TxBody,
    ) -> Self {
        Self {
            header,
            fee,
            data,
            check_string,
            sig1: Signature::EMPTY,
            sig2: Signature::EMPTY,
            body,
        }
    }

    /// Account creation. `params` are sanitized here regardless of what the
    /// caller passed, so a trapdoor can never be staged for broadcast.
    pub fn account_creation(
        header: u8,
        fee: u64,
        issuer: [u8; 32],
        new_address: Address,
        params: &ChParams,
        check_string: CheckString,
        data: Vec<u8>,
    ) -> ClientResult<Self> {
        require_fee(fee)?;
        Ok(Self::envelope(
            header,
            fee,
            data,
            Some(check_string),
            TxBody::AccountCreation {
                issuer,
                new_address,
                params: params.sanitized(),
            },
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn funds_transfer(
        header: u8,
        amount: u64,
        fee: u64,
        tx_count: u32,
        from: [u8; 32],
        to: [u8; 32],
        check_string: CheckString,
        data: Vec<u8>,
    ) -> ClientResult<Self> {
        require_fee(fee)?;
        if amount == 0 {
            return Err(ClientError::invalid("Amount must be > 0"));
        }
        Ok(Self::envelope(
            header,
            fee,
            data,
            Some(check_string),
            TxBody::FundsTransfer {
                amount,
                tx_count,
                from,
                to,
            },
        ))
    }

    pub fn config(
        header: u8,
        option_id: u8,
        payload: u64,
        fee: u64,
        tx_count: u32,
    ) -> ClientResult<Self> {
        require_fee(fee)?;
        Ok(Self::envelope(
            header,
            fee,
            Vec::new(),
            None,
            TxBody::Config {
                option_id,
                payload,
                tx_count,
            },
        ))
    }

    pub fn stake(
        header: u8,
        fee: u64,
        is_staking: bool,
        account: [u8; 32],
        commitment: Vec<u8>,
    ) -> ClientResult<Self> {
        require_fee(fee)?;
        if is_staking && commitment.is_empty() {
            return Err(ClientError::missing("Commitment"));
        }
        Ok(Self::envelope(
            header,
            fee,
            Vec::new(),
            None,
            TxBody::Stake {
                is_staking,
                account,
                commitment,
            },
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        header: u8,
        fee: u64,
        target: TxHash,
        target_check_string: CheckString,
        new_data: Vec<u8>,
        issuer: [u8; 32],
        check_string: CheckString,
        data: Vec<u8>,
    ) -> ClientResult<Self> {
        require_fee(fee)?;
        Ok(Self::envelope(
            header,
            fee,
            data,
            Some(check_string),
            TxBody::Update {
                target,
                target_check_string,
                new_data,
                issuer,
            },
        ))
    }

    pub fn kind(&self) -> TxKind {
        match self.body {
            TxBody::AccountCreation { .. } => TxKind::AccountCreation,
            TxBody::FundsTransfer { .. } => TxKind::FundsTransfer,
            TxBody::Config { .. } => TxKind::Config,
            TxBody::Stake { .. } => TxKind::Stake,
            TxBody::Update { .. } => TxKind::Update,
        }
    }

    /// Canonical bytes for the content hash. Excludes `check_string`,
    /// `sig1` and `sig2`.
    pub fn signable_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256 + self.data.len());

        buf.push(self.kind().as_byte());
        buf.push(self.header);
        buf.extend_from_slice(&self.fee.to_le_bytes());

        match &self.body {
            TxBody::AccountCreation {
                issuer,
                new_address,
                params,
            } => {
                buf.extend_from_slice(issuer);
                buf.extend_from_slice(&new_address.0);
                buf.extend_from_slice(&params.public_bytes());
            }
            TxBody::FundsTransfer {
                amount,
                tx_count,
                from,
                to,
            } => {
                buf.extend_from_slice(&amount.to_le_bytes());
                buf.extend_from_slice(&tx_count.to_le_bytes());
                buf.extend_from_slice(from);
                buf.extend_from_slice(to);
            }
            TxBody::Config {
                option_id,
                payload,
                tx_count,
            } => {
                buf.push(*option_id);
                buf.extend_from_slice(&payload.to_le_bytes());
                buf.extend_from_slice(&tx_count.to_le_bytes());
            }
            TxBody::Stake {
                is_staking,
                account,
                commitment,
            } => {
                buf.push(u8::from(*is_staking));
                buf.extend_from_slice(account);
                push_prefixed(&mut buf, commitment);
            }
            TxBody::Update {
                target,
                target_check_string,
                new_data,
                issuer,
            } => {
                buf.extend_from_slice(target.as_bytes());
                buf.extend_from_slice(&target_check_string.r);
                push_prefixed(&mut buf, new_data);
                buf.extend_from_slice(issuer);
            }
        }

        push_prefixed(&mut buf, &self.data);
        buf
    }

    /// SHA3-256 of [`Self::signable_bytes`].
    pub fn content_hash(&self) -> [u8; 32] {
        sha3_256(&self.signable_bytes())
    }

    /// The transaction's identifier.
    ///
    /// Redactable kinds hash through the chameleon hash and need `params`;
    /// the others are identified by their content hash and ignore it.
    pub fn id(&self, params: Option<&ChParams>) -> ClientResult<TxHash> {
        match (&self.check_string, params) {
            (Some(cs), Some(params)) => {
                Ok(TxHash(chameleon_hash(params, cs, &self.content_hash())?))
            }
            (Some(_), None) => Err(ClientError::missing("ch_params")),
            (None, _) => Ok(TxHash(self.content_hash())),
        }
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    pub fn set_check_string(&mut self, check_string: CheckString) {
        self.check_string = Some(check_string);
    }

    /// Whether the primary slot has been filled.
    pub fn is_signed(&self) -> bool {
        !self.sig1.is_empty()
    }
}

fn push_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::PrivateKey;
    use ark_std::test_rng;

    fn params() -> ChParams {
        ChParams::generate(&mut test_rng()).unwrap()
    }

    fn cs() -> CheckString {
        CheckString::random(&mut test_rng()).unwrap()
    }

    fn funds(data: &[u8]) -> Transaction {
        Transaction::funds_transfer(0, 100, 1, 0, [1; 32], [2; 32], cs(), data.to_vec()).unwrap()
    }

    #[test]
    fn zero_fee_is_rejected_by_every_constructor() {
        let p = params();
        let addr = PrivateKey::generate().address();
        let msg = "invalid argument: Fee must be > 0";
        assert_eq!(
            Transaction::account_creation(0, 0, [0; 32], addr, &p, cs(), vec![])
                .unwrap_err()
                .to_string(),
            msg
        );
        assert_eq!(
            Transaction::funds_transfer(0, 1, 0, 0, [0; 32], [0; 32], cs(), vec![])
                .unwrap_err()
                .to_string(),
            msg
        );
        assert_eq!(Transaction::config(0, 1, 1, 0, 0).unwrap_err().to_string(), msg);
        assert_eq!(
            Transaction::stake(0, 0, false, [0; 32], vec![])
                .unwrap_err()
                .to_string(),
            msg
        );
        assert_eq!(
            Transaction::update(0, 0, TxHash([0; 32]), cs(), vec![], [0; 32], cs(), vec![])
                .unwrap_err()
                .to_string(),
            msg
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = Transaction::funds_transfer(0, 0, 1, 0, [1; 32], [2; 32], cs(), vec![]).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument: Amount must be > 0");
    }

    #[test]
    fn staking_requires_commitment() {
        let err = Transaction::stake(0, 1, true, [0; 32], vec![]).unwrap_err();
        assert_eq!(err.to_string(), "argument missing: Commitment");
        assert!(Transaction::stake(0, 1, false, [0; 32], vec![]).is_ok());
    }

    #[test]
    fn account_creation_strips_trapdoor() {
        let p = params();
        assert!(p.has_trapdoor());
        let tx = Transaction::account_creation(
            0,
            1,
            [0; 32],
            PrivateKey::generate().address(),
            &p,
            cs(),
            vec![],
        )
        .unwrap();
        match tx.body {
            TxBody::AccountCreation { params, .. } => assert!(!params.has_trapdoor()),
            _ => panic!("wrong body"),
        }
    }

    #[test]
    fn content_hash_ignores_signatures_and_check_string() {
        let mut tx = funds(b"memo");
        let before = tx.content_hash();
        tx.sig1 = Signature([9; 64]);
        tx.sig2 = Signature([8; 64]);
        tx.set_check_string(CheckString { r: [3; 32] });
        assert_eq!(tx.content_hash(), before);
    }

    #[test]
    fn content_hash_tracks_data() {
        let mut tx = funds(b"memo");
        let before = tx.content_hash();
        tx.set_data(Vec::new());
        assert_ne!(tx.content_hash(), before);
    }

    #[test]
    fn content_hash_separates_kinds() {
        let config = Transaction::config(0, 1, 5, 1, 0).unwrap();
        let stake = Transaction::stake(0, 1, false, [0; 32], vec![]).unwrap();
        assert_ne!(config.content_hash(), stake.content_hash());
    }

    #[test]
    fn redactable_id_needs_params() {
        let tx = funds(b"");
        assert_eq!(
            tx.id(None).unwrap_err().to_string(),
            "argument missing: ch_params"
        );
        assert!(tx.id(Some(&params())).is_ok());
    }

    #[test]
    fn non_redactable_id_is_content_hash() {
        let tx = Transaction::config(0, 2, 77, 1, 3).unwrap();
        assert_eq!(tx.id(None).unwrap(), TxHash(tx.content_hash()));
        assert_eq!(tx.id(Some(&params())).unwrap(), TxHash(tx.content_hash()));
    }

    #[test]
    fn kind_matches_body() {
        assert_eq!(funds(b"").kind(), TxKind::FundsTransfer);
        assert_eq!(Transaction::config(0, 1, 1, 1, 0).unwrap().kind(), TxKind::Config);
    }

    #[test]
    fn bincode_roundtrip_preserves_everything() {
        let mut tx = funds(b"payload");
        tx.sig1 = Signature([4; 64]);
        let bytes = bincode::serialize(&tx).unwrap();
        let back: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn fresh_transactions_are_unsigned() {
        let tx = funds(b"");
        assert!(!tx.is_signed());
        assert!(tx.sig2.is_empty());
    }
}
