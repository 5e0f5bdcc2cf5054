//! # TxStore — Pending Transaction Store
//!
//! Content-addressed, typed persistence for staged transactions, built on
//! sled's embedded key-value store. Opened once per process and shared by
//! every lifecycle component.
//!
//! ## Tree Layout
//!
//! | Tree                   | Key              | Value                  |
//! |------------------------|------------------|------------------------|
//! | `account_transactions` | tx hash (32B)    | `bincode(Transaction)` |
//! | `fund_transactions`    | tx hash (32B)    | `bincode(Transaction)` |
//! | `config_transactions`  | tx hash (32B)    | `bincode(Transaction)` |
//! | `staking_transactions` | tx hash (32B)    | `bincode(Transaction)` |
//! | `update_transactions`  | tx hash (32B)    | `bincode(Transaction)` |
//! | `tx_kinds`             | tx hash (32B)    | kind tag (1B)          |
//! | `block_headers`        | block hash (32B) | `bincode(BlockHeader)` |
//! | `last_block_header`    | block hash (32B) | `bincode(BlockHeader)` |
//!
//! One tree per kind keeps the layout compatible with the network's own
//! client databases. The `tx_kinds` index lets [`TxStore::get`] go straight
//! to the right tree; records without an index entry are found by probing
//! the kind trees in [`TxKind::ALL`] order.
//!
//! ## Durability
//!
//! Every write is followed by a flush. When a put returns, the record is on
//! disk.
//!
//! ## Lifecycle
//!
//! Entries are never removed. A deleted transaction is one whose data was
//! redacted to empty; it still lives under its original hash.

use sled::{Db, Tree};
use std::path::Path;

use super::block::BlockHeader;
use super::locks::TxLocks;
use crate::transaction::{Transaction, TxHash, TxKind};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt kind index entry for {0}")]
    CorruptIndex(TxHash),
}

pub type DbResult<T> = Result<T, DbError>;

// ---------------------------------------------------------------------------
// TxStore
// ---------------------------------------------------------------------------

const KIND_INDEX_TREE: &str = "tx_kinds";
const BLOCK_HEADER_TREE: &str = "block_headers";
const LAST_BLOCK_HEADER_TREE: &str = "last_block_header";

/// Persistent store for staged transactions and cached block headers.
///
/// Cheap to clone; clones share the same sled handle and the same
/// [`TxLocks`] table. sled serializes individual reads and writes.
/// Read-modify-write sequences run inside [`TxStore::locks`].
#[derive(Debug, Clone)]
pub struct TxStore {
    db: Db,
    /// One tree per kind, indexed by `TxKind::ALL` position.
    kinds: [Tree; 5],
    kind_index: Tree,
    block_headers: Tree,
    last_block_header: Tree,
    locks: TxLocks,
}

impl TxStore {
    /// Open or create a store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// In-memory store, discarded on drop. For tests.
    pub fn open_temporary() -> DbResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> DbResult<Self> {
        let kinds = [
            db.open_tree(TxKind::AccountCreation.bucket())?,
            db.open_tree(TxKind::FundsTransfer.bucket())?,
            db.open_tree(TxKind::Config.bucket())?,
            db.open_tree(TxKind::Stake.bucket())?,
            db.open_tree(TxKind::Update.bucket())?,
        ];
        let kind_index = db.open_tree(KIND_INDEX_TREE)?;
        let block_headers = db.open_tree(BLOCK_HEADER_TREE)?;
        let last_block_header = db.open_tree(LAST_BLOCK_HEADER_TREE)?;

        Ok(Self {
            db,
            kinds,
            kind_index,
            block_headers,
            last_block_header,
            locks: TxLocks::new(),
        })
    }

    fn tree(&self, kind: TxKind) -> &Tree {
        match kind {
            TxKind::AccountCreation => &self.kinds[0],
            TxKind::FundsTransfer => &self.kinds[1],
            TxKind::Config => &self.kinds[2],
            TxKind::Stake => &self.kinds[3],
            TxKind::Update => &self.kinds[4],
        }
    }

    /// Per-hash locks shared by every component that rewrites a record.
    pub fn locks(&self) -> &TxLocks {
        &self.locks
    }

    // -- Transactions -------------------------------------------------------

    /// `Put(hash, tx)`: write `tx` into its kind's tree and index it.
    /// Overwrites any previous record under `hash`.
    pub fn put(&self, hash: &TxHash, tx: &Transaction) -> DbResult<()> {
        let kind = tx.kind();
        let bytes = bincode::serialize(tx).map_err(|e| DbError::Serialization(e.to_string()))?;

        self.tree(kind).insert(hash.as_bytes(), bytes)?;
        self.kind_index.insert(hash.as_bytes(), &[kind.as_byte()])?;
        self.db.flush()?;

        tracing::trace!(hash = %hash, kind = %kind, "transaction stored");
        Ok(())
    }

    /// `Get(hash)`: the staged transaction under `hash`, if any.
    pub fn get(&self, hash: &TxHash) -> DbResult<Option<Transaction>> {
        if let Some(kind) = self.kind_of(hash)? {
            return self.get_kind(hash, kind);
        }
        for kind in TxKind::ALL {
            if let Some(tx) = self.get_kind(hash, kind)? {
                return Ok(Some(tx));
            }
        }
        Ok(None)
    }

    /// Look `hash` up in one kind's tree only.
    pub fn get_kind(&self, hash: &TxHash, kind: TxKind) -> DbResult<Option<Transaction>> {
        match self.tree(kind).get(hash.as_bytes())? {
            Some(bytes) => {
                let tx: Transaction = bincode::deserialize(&bytes)
                    .map_err(|e| DbError::Serialization(e.to_string()))?;
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    /// The indexed kind of `hash`, if the index knows it.
    pub fn kind_of(&self, hash: &TxHash) -> DbResult<Option<TxKind>> {
        match self.kind_index.get(hash.as_bytes())? {
            Some(tag) => match tag.first().copied().and_then(TxKind::from_byte) {
                Some(kind) => Ok(Some(kind)),
                None => Err(DbError::CorruptIndex(*hash)),
            },
            None => Ok(None),
        }
    }

    pub fn contains(&self, hash: &TxHash) -> DbResult<bool> {
        Ok(self.get(hash)?.is_some())
    }

    /// Number of staged transactions across all kinds.
    pub fn transaction_count(&self) -> usize {
        self.kinds.iter().map(Tree::len).sum()
    }

    // -- Block headers ------------------------------------------------------

    pub fn put_block_header(&self, header: &BlockHeader) -> DbResult<()> {
        let bytes =
            bincode::serialize(header).map_err(|e| DbError::Serialization(e.to_string()))?;
        self.block_headers.insert(header.hash, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn get_block_header(&self, hash: &[u8; 32]) -> DbResult<Option<BlockHeader>> {
        match self.block_headers.get(hash)? {
            Some(bytes) => {
                let header: BlockHeader = bincode::deserialize(&bytes)
                    .map_err(|e| DbError::Serialization(e.to_string()))?;
                Ok(Some(header))
            }
            None => Ok(None),
        }
    }

    /// Replace the last-block-header pointer. The tree holds at most one
    /// entry: everything in it is cleared before the new header goes in.
    pub fn put_last_block_header(&self, header: &BlockHeader) -> DbResult<()> {
        let bytes =
            bincode::serialize(header).map_err(|e| DbError::Serialization(e.to_string()))?;
        self.last_block_header.clear()?;
        self.last_block_header.insert(header.hash, bytes)?;
        self.db.flush()?;
        Ok(())
    }

    pub fn get_last_block_header(&self) -> DbResult<Option<BlockHeader>> {
        match self.last_block_header.first()? {
            Some((_, bytes)) => {
                let header: BlockHeader = bincode::deserialize(&bytes)
                    .map_err(|e| DbError::Serialization(e.to_string()))?;
                Ok(Some(header))
            }
            None => Ok(None),
        }
    }

    pub fn block_header_count(&self) -> usize {
        self.block_headers.len()
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> DbResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::chameleon::CheckString;
    use std::sync::Arc;
    use std::thread;

    fn funds(amount: u64) -> Transaction {
        Transaction::funds_transfer(
            0,
            amount,
            1,
            0,
            [1; 32],
            [2; 32],
            CheckString { r: [0; 32] },
            b"memo".to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn get_missing_returns_none() {
        let store = TxStore::open_temporary().unwrap();
        assert!(store.get(&TxHash([9; 32])).unwrap().is_none());
        assert!(!store.contains(&TxHash([9; 32])).unwrap());
    }

    #[test]
    fn put_then_get() {
        let store = TxStore::open_temporary().unwrap();
        let tx = funds(100);
        let hash = TxHash([1; 32]);
        store.put(&hash, &tx).unwrap();
        assert_eq!(store.get(&hash).unwrap(), Some(tx));
        assert_eq!(store.kind_of(&hash).unwrap(), Some(TxKind::FundsTransfer));
    }

    #[test]
    fn records_land_in_their_kind_tree() {
        let store = TxStore::open_temporary().unwrap();
        let funds_hash = TxHash([1; 32]);
        let config_hash = TxHash([2; 32]);
        store.put(&funds_hash, &funds(5)).unwrap();
        store
            .put(&config_hash, &Transaction::config(0, 1, 2, 1, 0).unwrap())
            .unwrap();

        assert!(store.get_kind(&funds_hash, TxKind::FundsTransfer).unwrap().is_some());
        assert!(store.get_kind(&funds_hash, TxKind::Config).unwrap().is_none());
        assert!(store.get_kind(&config_hash, TxKind::Config).unwrap().is_some());
        assert_eq!(store.transaction_count(), 2);
    }

    #[test]
    fn put_overwrites_in_place() {
        let store = TxStore::open_temporary().unwrap();
        let hash = TxHash([3; 32]);
        store.put(&hash, &funds(1)).unwrap();
        let mut tx = funds(1);
        tx.set_data(Vec::new());
        store.put(&hash, &tx).unwrap();
        assert_eq!(store.get(&hash).unwrap().unwrap().data, Vec::<u8>::new());
        assert_eq!(store.transaction_count(), 1);
    }

    #[test]
    fn get_probes_when_index_is_missing() {
        let store = TxStore::open_temporary().unwrap();
        let hash = TxHash([4; 32]);
        store.put(&hash, &funds(7)).unwrap();
        store.kind_index.remove(hash.as_bytes()).unwrap();

        assert_eq!(store.kind_of(&hash).unwrap(), None);
        assert_eq!(store.get(&hash).unwrap(), Some(funds(7)));
    }

    #[test]
    fn corrupt_index_is_reported() {
        let store = TxStore::open_temporary().unwrap();
        let hash = TxHash([5; 32]);
        store.kind_index.insert(hash.as_bytes(), &[0xff]).unwrap();
        assert!(matches!(store.get(&hash), Err(DbError::CorruptIndex(_))));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.db");
        let hash = TxHash([6; 32]);
        {
            let store = TxStore::open(&path).unwrap();
            store.put(&hash, &funds(42)).unwrap();
        }
        let store = TxStore::open(&path).unwrap();
        assert_eq!(store.get(&hash).unwrap(), Some(funds(42)));
    }

    #[test]
    fn block_headers_roundtrip() {
        let store = TxStore::open_temporary().unwrap();
        let header = BlockHeader::new(1, [0; 32], 100, [1; 32], 2);
        store.put_block_header(&header).unwrap();
        assert_eq!(store.get_block_header(&header.hash).unwrap(), Some(header));
        assert_eq!(store.block_header_count(), 1);
    }

    #[test]
    fn last_block_header_keeps_one_entry() {
        let store = TxStore::open_temporary().unwrap();
        assert!(store.get_last_block_header().unwrap().is_none());

        let first = BlockHeader::new(1, [0; 32], 100, [0; 32], 0);
        let second = BlockHeader::new(2, first.hash, 200, [0; 32], 0);
        store.put_last_block_header(&first).unwrap();
        store.put_last_block_header(&second).unwrap();

        assert_eq!(store.get_last_block_header().unwrap(), Some(second));
        assert_eq!(store.last_block_header.len(), 1);
    }

    #[test]
    fn concurrent_writers_on_distinct_keys() {
        let store = Arc::new(TxStore::open_temporary().unwrap());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.put(&TxHash([i; 32]), &funds(u64::from(i) + 1)).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.transaction_count(), 8);
        for i in 0..8u8 {
            assert_eq!(
                store.get(&TxHash([i; 32])).unwrap().unwrap().body,
                funds(u64::from(i) + 1).body
            );
        }
    }
}
