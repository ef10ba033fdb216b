//! Dashboard aggregation over a user's contracts: category tallies,
//! notification lists and the one-pass statistics record.
//!
//! Everything here is derived and ephemeral, recomputed per call from the
//! current records, never persisted.

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::dates::in_time_span;
use crate::status::{ActionPending, Category, ContractStatus, Role};

/// How many contracts the dashboard's most-recent list carries.
pub const RECENT_CONTRACTS: usize = 5;

/// Per-category contract tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountStatus {
    pub contract_count: usize,
    pub lc_count: usize,
    pub shipment_count: usize,
    pub payment_count: usize,
    pub completed_count: usize,
}

impl CountStatus {
    fn bump(&mut self, category: Category) {
        match category {
            Category::Contract => self.contract_count += 1,
            Category::Lc => self.lc_count += 1,
            Category::Shipment => self.shipment_count += 1,
            Category::Payment => self.payment_count += 1,
            Category::Completed => self.completed_count += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.contract_count
            + self.lc_count
            + self.shipment_count
            + self.payment_count
            + self.completed_count
    }
}

/// On-time/delayed split against the expected delivery date (creation
/// plus payment duration).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatus {
    pub ontime: usize,
    pub delayed: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStatus {
    pub pending: usize,
    pub in_progress: usize,
    pub delivered: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub pending_seller_bank: usize,
    pub pending_buyer_bank: usize,
    pub pending_buyer: usize,
    pub completed_buyer: usize,
}

/// Delivery progress keyed off the shipment states, plus a lateness count
/// against the literal promised delivery date, a separate signal from
/// [`ProgressStatus`]'s expected-date arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub need_to_start: usize,
    pub on_time_delivery: usize,
    pub delayed: usize,
}

/// The dashboard record: everything a user's landing page shows, computed
/// in a single pass over their contracts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticData {
    pub total_contracts: usize,
    pub current_month_contracts: usize,
    pub last_month_contracts: usize,
    pub notification_count: usize,
    pub count_status: CountStatus,
    pub progress_status: ProgressStatus,
    pub shipment_status: ShipmentStatus,
    pub payment_status: PaymentStatus,
    pub delivery_status: DeliveryStatus,
    pub contract_list: Vec<Contract>,
}

/// Stable descending sort on the creation timestamp; contracts created at
/// the same instant keep their list (insertion) order.
pub fn sort_by_recency(contracts: &mut [Contract]) {
    contracts.sort_by(|a, b| b.contract_create_date.cmp(&a.contract_create_date));
}

pub fn count_by_category(contracts: &[Contract]) -> CountStatus {
    let mut counts = CountStatus::default();
    for contract in contracts {
        counts.bump(contract.contract_status.category());
    }
    counts
}

/// Same tally restricted to contracts waiting on the given role.
pub fn count_by_category_pending_on(contracts: &[Contract], role: Role) -> CountStatus {
    let pending = ActionPending::from(role);
    let mut counts = CountStatus::default();
    for contract in contracts {
        if contract.action_pending_on == pending {
            counts.bump(contract.contract_status.category());
        }
    }
    counts
}

/// The contracts waiting on the given role, most recent first.
pub fn notification_list(contracts: Vec<Contract>, role: Role) -> Vec<Contract> {
    let pending = ActionPending::from(role);
    let mut matching: Vec<Contract> = contracts
        .into_iter()
        .filter(|contract| contract.action_pending_on == pending)
        .collect();
    sort_by_recency(&mut matching);
    matching
}

/// The contracts whose status falls in the given category, most recent
/// first.
pub fn filter_by_category(contracts: Vec<Contract>, category: Category) -> Vec<Contract> {
    let mut matching: Vec<Contract> = contracts
        .into_iter()
        .filter(|contract| contract.contract_status.category() == category)
        .collect();
    sort_by_recency(&mut matching);
    matching
}

/// Compute the dashboard for one user and role at the given instant. An
/// empty contract list yields an all-zero record with an empty recent
/// list.
pub fn dashboard(contracts: Vec<Contract>, role: Role, now: DateTime<Utc>) -> StaticData {
    let mut data = StaticData {
        total_contracts: contracts.len(),
        ..StaticData::default()
    };
    if contracts.is_empty() {
        return data;
    }

    let pending = ActionPending::from(role);
    let last_month = now.checked_sub_months(Months::new(1));
    let today = now.date_naive();

    for contract in &contracts {
        let created = contract.contract_create_date.to_datetime_utc();

        if created.month() == now.month() && created.year() == now.year() {
            data.current_month_contracts += 1;
        }
        let created_last_month = last_month
            .as_ref()
            .is_some_and(|anchor| created.month() == anchor.month() && created.year() == anchor.year());
        if created_last_month {
            data.last_month_contracts += 1;
        }

        if contract.action_pending_on == pending {
            data.notification_count += 1;
        }

        data.count_status.bump(contract.contract_status.category());

        let expected = contract.expected_delivery_date();
        if contract.contract_status != ContractStatus::ContractCompleted
            && (in_time_span(created, expected, now) || now == expected || now == created)
        {
            data.progress_status.ontime += 1;
        }
        // Lateness is judged regardless of completion, so a contract can
        // finish and still count as delayed.
        if now > expected {
            data.progress_status.delayed += 1;
        }

        match contract.contract_status {
            ContractStatus::InvoiceCreated => data.payment_status.pending_seller_bank += 1,
            ContractStatus::PaymentCompletedToSeller => data.payment_status.pending_buyer_bank += 1,
            ContractStatus::PaymentCompletedToSellerBank => data.payment_status.pending_buyer += 1,
            ContractStatus::ContractCompleted => data.payment_status.completed_buyer += 1,
            _ => {}
        }

        match contract.contract_status {
            ContractStatus::ReadyForShipment => data.shipment_status.pending += 1,
            ContractStatus::ShipmentInProgress => data.shipment_status.in_progress += 1,
            ContractStatus::ShipmentDelivered => data.shipment_status.delivered += 1,
            _ => {}
        }

        if today > contract.delivery_details.delivery_date.as_naive() {
            data.delivery_status.delayed += 1;
        }
    }

    data.progress_status.completed = data.count_status.completed_count;
    data.delivery_status.need_to_start = data.shipment_status.pending;
    data.delivery_status.on_time_delivery = data.shipment_status.in_progress;

    let mut recent = contracts;
    sort_by_recency(&mut recent);
    recent.truncate(RECENT_CONTRACTS);
    data.contract_list = recent;

    data
}
