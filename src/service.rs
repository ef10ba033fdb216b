//! Service layer: one synchronous load → compute → store cycle per
//! operation, over whatever [`Ledger`] implementation it is handed.

use chrono::Utc;
use tracing::{info, warn};

use crate::contract::{Contract, ContractDraft};
use crate::dates::TimeStamp;
use crate::engine::{self, TransitionOutcome};
use crate::error::Error;
use crate::ledger::{Ledger, attachment_key};
use crate::report::{self, CountStatus, StaticData};
use crate::status::{Category, Role};

/// Result of a transition call: the record as persisted, plus what the
/// call actually did. A no-op still returns (and re-persists) the record,
/// so callers who need to know must look at the outcome.
#[derive(Debug, Clone)]
pub struct TransitionReceipt {
    pub contract: Contract,
    pub outcome: TransitionOutcome,
}

impl TransitionReceipt {
    pub fn was_applied(&self) -> bool {
        self.outcome.was_applied()
    }
}

/// A document stored against a contract. The digest is recomputed and
/// compared when the blob is read back.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Attachment {
    #[n(0)]
    pub name: String,
    #[n(1)]
    pub digest: String,
    #[n(2)]
    #[cbor(with = "minicbor::bytes")]
    pub blob: Vec<u8>,
}

pub struct ContractService<L: Ledger> {
    ledger: L,
}

impl<L: Ledger> ContractService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    // Record plumbing.

    fn load_contract(&self, contract_id: &str) -> Result<Contract, Error> {
        let bytes = self
            .ledger
            .get(contract_id)?
            .ok_or_else(|| Error::NotFound(format!("contract {contract_id}")))?;
        Ok(minicbor::decode(&bytes)?)
    }

    fn store_contract(&self, contract: &Contract) -> Result<(), Error> {
        self.ledger
            .put(&contract.contract_id, to_cbor(contract)?)
    }

    fn load_user_contract_ids(&self, user_id: &str) -> Result<Vec<String>, Error> {
        let bytes = self
            .ledger
            .get(user_id)?
            .ok_or_else(|| Error::NotFound(format!("user {user_id}")))?;
        Ok(minicbor::decode(&bytes)?)
    }

    fn store_user_contract_ids(&self, user_id: &str, ids: &Vec<String>) -> Result<(), Error> {
        self.ledger.put(user_id, to_cbor(ids)?)
    }

    /// All contracts on a user's list. A dangling id is skipped rather
    /// than failing the whole report.
    fn load_user_contracts(&self, user_id: &str) -> Result<Vec<Contract>, Error> {
        let mut contracts = Vec::new();
        for contract_id in self.load_user_contract_ids(user_id)? {
            match self.load_contract(&contract_id) {
                Ok(contract) => contracts.push(contract),
                Err(Error::NotFound(_)) => {
                    warn!(user_id, %contract_id, "contract listed for user but absent from ledger");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(contracts)
    }

    // Registration and creation.

    /// Seed an empty contract list for a new user. Idempotent: an existing
    /// list is left alone.
    pub fn register_user(&self, user_id: &str) -> Result<(), Error> {
        if self.ledger.get(user_id)?.is_some() {
            return Ok(());
        }
        self.store_user_contract_ids(user_id, &Vec::new())?;
        info!(user_id, "user registered");
        Ok(())
    }

    pub fn create_contract(&self, draft: ContractDraft) -> Result<Contract, Error> {
        self.create_contract_at(draft, TimeStamp::now())
    }

    /// Validate the draft, build the record, persist it and append its id
    /// to every counterparty's contract list. All five parties must be
    /// registered beforehand.
    pub fn create_contract_at(
        &self,
        draft: ContractDraft,
        created_at: TimeStamp<Utc>,
    ) -> Result<Contract, Error> {
        let contract = draft.into_contract(created_at)?;

        let party_ids: Vec<String> = [
            &contract.seller,
            &contract.seller_bank,
            &contract.buyer,
            &contract.buyer_bank,
            &contract.transporter,
        ]
        .into_iter()
        .map(|party| party.user_id.clone())
        .collect();

        // Check every list exists before the first write lands.
        for user_id in &party_ids {
            self.load_user_contract_ids(user_id)?;
        }

        self.store_contract(&contract)?;

        for user_id in &party_ids {
            let mut ids = self.load_user_contract_ids(user_id)?;
            // One user holding several roles still lists the contract once.
            if !ids.contains(&contract.contract_id) {
                ids.push(contract.contract_id.clone());
                self.store_user_contract_ids(user_id, &ids)?;
            }
        }

        info!(contract_id = %contract.contract_id, "contract created");
        Ok(contract)
    }

    pub fn contract_by_id(&self, contract_id: &str) -> Result<Contract, Error> {
        self.load_contract(contract_id)
    }

    // Transitions.

    pub fn apply_transition(
        &self,
        acting_user_id: &str,
        contract_id: &str,
    ) -> Result<TransitionReceipt, Error> {
        self.apply_transition_at(acting_user_id, contract_id, Utc::now().into())
    }

    pub fn apply_transition_at(
        &self,
        acting_user_id: &str,
        contract_id: &str,
        now: TimeStamp<Utc>,
    ) -> Result<TransitionReceipt, Error> {
        let mut contract = self.load_contract(contract_id)?;
        let outcome = engine::apply_transition(&mut contract, acting_user_id, now.to_datetime_utc());
        self.store_contract(&contract)?;
        Ok(TransitionReceipt { contract, outcome })
    }

    // Reporting.

    pub fn contracts_by_user(&self, user_id: &str) -> Result<Vec<Contract>, Error> {
        let mut contracts = self.load_user_contracts(user_id)?;
        report::sort_by_recency(&mut contracts);
        Ok(contracts)
    }

    pub fn contracts_by_user_in_category(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Vec<Contract>, Error> {
        let contracts = self.load_user_contracts(user_id)?;
        Ok(report::filter_by_category(contracts, category))
    }

    pub fn category_counts(&self, user_id: &str) -> Result<CountStatus, Error> {
        let contracts = self.load_user_contracts(user_id)?;
        Ok(report::count_by_category(&contracts))
    }

    pub fn dashboard(&self, user_id: &str, role: Role) -> Result<StaticData, Error> {
        self.dashboard_at(user_id, role, TimeStamp::now())
    }

    pub fn dashboard_at(
        &self,
        user_id: &str,
        role: Role,
        now: TimeStamp<Utc>,
    ) -> Result<StaticData, Error> {
        let contracts = self.load_user_contracts(user_id)?;
        Ok(report::dashboard(contracts, role, now.to_datetime_utc()))
    }

    pub fn notifications(&self, user_id: &str, role: Role) -> Result<Vec<Contract>, Error> {
        let contracts = self.load_user_contracts(user_id)?;
        Ok(report::notification_list(contracts, role))
    }

    pub fn notification_counts(&self, user_id: &str, role: Role) -> Result<CountStatus, Error> {
        let contracts = self.load_user_contracts(user_id)?;
        Ok(report::count_by_category_pending_on(&contracts, role))
    }

    // Attachments.

    pub fn attach_document(
        &self,
        contract_id: &str,
        attachment_name: &str,
        blob: Vec<u8>,
    ) -> Result<(), Error> {
        // The contract must exist before anything hangs off it.
        self.load_contract(contract_id)?;

        let attachment = Attachment {
            name: attachment_name.to_string(),
            digest: sha256::digest(&blob),
            blob,
        };
        self.ledger.put(
            &attachment_key(contract_id, attachment_name),
            to_cbor(&attachment)?,
        )?;
        info!(contract_id, attachment_name, "attachment stored");
        Ok(())
    }

    pub fn attachment(&self, contract_id: &str, attachment_name: &str) -> Result<Vec<u8>, Error> {
        let key = attachment_key(contract_id, attachment_name);
        let bytes = self
            .ledger
            .get(&key)?
            .ok_or_else(|| Error::NotFound(format!("attachment {key}")))?;
        let attachment: Attachment = minicbor::decode(&bytes)?;

        if sha256::digest(&attachment.blob) != attachment.digest {
            return Err(Error::Malformed(format!(
                "attachment {key} failed its digest check"
            )));
        }
        Ok(attachment.blob)
    }
}

fn to_cbor<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>, Error> {
    minicbor::to_vec(value).map_err(|err| Error::Malformed(err.to_string()))
}
