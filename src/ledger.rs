//! The key-value ledger collaborator.
//!
//! The workflow only ever needs `get` and `put` of raw bytes; consensus,
//! isolation and durability are the backing store's concern. Key scheme:
//! a contract id maps to its CBOR record, a user id to that user's CBOR
//! contract-id list, and contract id + attachment name to an attachment
//! record.

use std::path::Path;
use std::sync::Arc;

use crate::error::Error;

pub trait Ledger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Error>;
}

/// Key for an attachment blob belonging to a contract.
pub fn attachment_key(contract_id: &str, attachment_name: &str) -> String {
    format!("{contract_id}{attachment_name}")
}

/// Sled-backed ledger.
pub struct SledLedger {
    db: Arc<sled::Db>,
}

impl SledLedger {
    pub fn new(db: Arc<sled::Db>) -> Self {
        Self { db }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let db = sled::open(path)?;
        Ok(Self::new(Arc::new(db)))
    }
}

impl Ledger for SledLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let value = self.db.get(key.as_bytes())?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Error> {
        self.db.insert(key.as_bytes(), value)?;
        Ok(())
    }
}
