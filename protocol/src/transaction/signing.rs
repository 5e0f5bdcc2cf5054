//! Signature slot handling.
//!
//! The client core never holds a private key on the normal path: the
//! caller signs the transaction hash elsewhere and hands back 64 bytes.
//! [`attach_signatures`] is where those bytes land. [`sign_transaction`]
//! is the local convenience for the CLI, producing the same bytes with a
//! key it was given and then attaching them the same way.
//!
//! ## Co-signer slot
//!
//! Only funds transfers have a meaningful second slot. When no co-signer
//! signature is supplied, that slot is left all-zero. The primary key is
//! never used to fill it.

use super::builder::Transaction;
use super::types::TxHash;
use crate::crypto::keys::PrivateKey;
use crate::crypto::signatures::{sign_hash, Signature};
use crate::error::{ClientError, ClientResult};

/// Write `primary` into slot 1 and `cosigner` (or zero) into slot 2.
///
/// Rejects a co-signer signature for kinds that have no second slot.
pub fn attach_signatures(
    tx: &mut Transaction,
    primary: Signature,
    cosigner: Option<Signature>,
) -> ClientResult<()> {
    let kind = tx.kind();
    if cosigner.is_some() && !kind.supports_cosigner() {
        return Err(ClientError::invalid(&format!(
            "{kind} does not take a co-signature"
        )));
    }

    tx.sig1 = primary;
    if kind.supports_cosigner() {
        tx.sig2 = cosigner.unwrap_or(Signature::EMPTY);
    }
    Ok(())
}

/// Sign `hash` with `key` (and `cosigner_key` if given) and attach the
/// result to `tx`.
pub fn sign_transaction(
    hash: &TxHash,
    tx: &mut Transaction,
    key: &PrivateKey,
    cosigner_key: Option<&PrivateKey>,
) -> ClientResult<()> {
    let primary = sign_hash(key, hash.as_bytes())?;
    let cosigner = match cosigner_key {
        Some(k) => Some(sign_hash(k, hash.as_bytes())?),
        None => None,
    };
    attach_signatures(tx, primary, cosigner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::chameleon::CheckString;
    use crate::crypto::signatures::verify_hash;

    fn funds() -> Transaction {
        Transaction::funds_transfer(0, 10, 1, 0, [1; 32], [2; 32], CheckString { r: [0; 32] }, vec![])
            .unwrap()
    }

    #[test]
    fn primary_only_leaves_second_slot_zero() {
        let mut tx = funds();
        tx.sig2 = Signature([0xee; 64]);
        attach_signatures(&mut tx, Signature([1; 64]), None).unwrap();
        assert_eq!(tx.sig1, Signature([1; 64]));
        assert!(tx.sig2.is_empty());
    }

    #[test]
    fn cosigner_fills_both_slots() {
        let mut tx = funds();
        attach_signatures(&mut tx, Signature([1; 64]), Some(Signature([2; 64]))).unwrap();
        assert_eq!(tx.sig1, Signature([1; 64]));
        assert_eq!(tx.sig2, Signature([2; 64]));
    }

    #[test]
    fn cosigner_on_single_slot_kind_is_rejected() {
        let mut tx = Transaction::config(0, 1, 1, 1, 0).unwrap();
        let err = attach_signatures(&mut tx, Signature([1; 64]), Some(Signature([2; 64])))
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(!tx.is_signed());
    }

    #[test]
    fn local_signing_produces_verifiable_slots() {
        let mut tx = funds();
        let hash = TxHash([0x42; 32]);
        let key = PrivateKey::generate();
        let cosigner = PrivateKey::generate();
        sign_transaction(&hash, &mut tx, &key, Some(&cosigner)).unwrap();
        assert!(verify_hash(&key.public_key(), hash.as_bytes(), &tx.sig1));
        assert!(verify_hash(&cosigner.public_key(), hash.as_bytes(), &tx.sig2));
    }

    #[test]
    fn local_signing_without_cosigner_does_not_duplicate_primary() {
        let mut tx = funds();
        let key = PrivateKey::generate();
        sign_transaction(&TxHash([1; 32]), &mut tx, &key, None).unwrap();
        assert!(tx.is_signed());
        assert!(tx.sig2.is_empty());
    }
}
