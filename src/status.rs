//! Workflow states, coarse reporting categories, counterparty roles and the
//! transition table that wires them together.
//!
//! The wire labels (serde renames) are load-bearing: persisted records and
//! dashboard consumers expect the exact historical strings, including the
//! `Shipment Inprogress` spelling.

use serde::{Deserialize, Serialize};

/// The eleven workflow states, in workflow order. `Ord` follows declaration
/// order, so a legal transition always moves strictly upward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
)]
pub enum ContractStatus {
    #[n(0)]
    #[serde(rename = "Contract Created")]
    ContractCreated,
    #[n(1)]
    #[serde(rename = "Contract Accepted")]
    ContractAccepted,
    #[n(2)]
    #[serde(rename = "LC Created")]
    LcCreated,
    #[n(3)]
    #[serde(rename = "LC Approved")]
    LcApproved,
    #[n(4)]
    #[serde(rename = "Ready For Shipment")]
    ReadyForShipment,
    #[n(5)]
    #[serde(rename = "Shipment Inprogress")]
    ShipmentInProgress,
    #[n(6)]
    #[serde(rename = "Shipment Delivered")]
    ShipmentDelivered,
    #[n(7)]
    #[serde(rename = "Invoice Created")]
    InvoiceCreated,
    #[n(8)]
    #[serde(rename = "Payment Completed to Seller")]
    PaymentCompletedToSeller,
    #[n(9)]
    #[serde(rename = "Payment Completed to Seller Bank")]
    PaymentCompletedToSellerBank,
    #[n(10)]
    #[serde(rename = "Contract Completed")]
    ContractCompleted,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 11] = [
        ContractStatus::ContractCreated,
        ContractStatus::ContractAccepted,
        ContractStatus::LcCreated,
        ContractStatus::LcApproved,
        ContractStatus::ReadyForShipment,
        ContractStatus::ShipmentInProgress,
        ContractStatus::ShipmentDelivered,
        ContractStatus::InvoiceCreated,
        ContractStatus::PaymentCompletedToSeller,
        ContractStatus::PaymentCompletedToSellerBank,
        ContractStatus::ContractCompleted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::ContractCreated => "Contract Created",
            ContractStatus::ContractAccepted => "Contract Accepted",
            ContractStatus::LcCreated => "LC Created",
            ContractStatus::LcApproved => "LC Approved",
            ContractStatus::ReadyForShipment => "Ready For Shipment",
            ContractStatus::ShipmentInProgress => "Shipment Inprogress",
            ContractStatus::ShipmentDelivered => "Shipment Delivered",
            ContractStatus::InvoiceCreated => "Invoice Created",
            ContractStatus::PaymentCompletedToSeller => "Payment Completed to Seller",
            ContractStatus::PaymentCompletedToSellerBank => "Payment Completed to Seller Bank",
            ContractStatus::ContractCompleted => "Contract Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }

    /// The coarse reporting category. Total over every status.
    pub fn category(&self) -> Category {
        match self {
            ContractStatus::ContractCreated | ContractStatus::ContractAccepted => {
                Category::Contract
            }
            ContractStatus::LcCreated | ContractStatus::LcApproved => Category::Lc,
            ContractStatus::ReadyForShipment
            | ContractStatus::ShipmentInProgress
            | ContractStatus::ShipmentDelivered => Category::Shipment,
            ContractStatus::InvoiceCreated
            | ContractStatus::PaymentCompletedToSeller
            | ContractStatus::PaymentCompletedToSellerBank => Category::Payment,
            ContractStatus::ContractCompleted => Category::Completed,
        }
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Five coarse groupings of the workflow states, used by every dashboard
/// tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Contract,
    #[serde(rename = "LC")]
    Lc,
    Shipment,
    Payment,
    Completed,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Contract => "Contract",
            Category::Lc => "LC",
            Category::Shipment => "Shipment",
            Category::Payment => "Payment",
            Category::Completed => "Completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Contract" => Some(Category::Contract),
            "LC" => Some(Category::Lc),
            "Shipment" => Some(Category::Shipment),
            "Payment" => Some(Category::Payment),
            "Completed" => Some(Category::Completed),
            _ => None,
        }
    }

    /// Category for a raw status label, `None` when the label is not one of
    /// the eleven states. String-keyed counterpart of
    /// [`ContractStatus::category`] for the invocation boundary.
    pub fn of_status_label(status_label: &str) -> Option<Self> {
        ContractStatus::from_label(status_label).map(|status| status.category())
    }
}

/// The five counterparties that can act on a contract. Role resolution
/// tests parties in this declaration order, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Buyer,
    SellerBank,
    BuyerBank,
    Transporter,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Seller,
        Role::Buyer,
        Role::SellerBank,
        Role::BuyerBank,
        Role::Transporter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Seller => "seller",
            Role::Buyer => "buyer",
            Role::SellerBank => "sellerbank",
            Role::BuyerBank => "buyerbank",
            Role::Transporter => "transporter",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == label)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whose action the workflow is blocked on. Every non-terminal state names
/// a role; the terminal state carries the completed marker instead.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
)]
pub enum ActionPending {
    #[n(0)]
    #[serde(rename = "seller")]
    Seller,
    #[n(1)]
    #[serde(rename = "buyer")]
    Buyer,
    #[n(2)]
    #[serde(rename = "sellerbank")]
    SellerBank,
    #[n(3)]
    #[serde(rename = "buyerbank")]
    BuyerBank,
    #[n(4)]
    #[serde(rename = "transporter")]
    Transporter,
    #[n(5)]
    #[serde(rename = "Contract Completed")]
    Completed,
}

impl From<Role> for ActionPending {
    fn from(role: Role) -> Self {
        match role {
            Role::Seller => ActionPending::Seller,
            Role::Buyer => ActionPending::Buyer,
            Role::SellerBank => ActionPending::SellerBank,
            Role::BuyerBank => ActionPending::BuyerBank,
            Role::Transporter => ActionPending::Transporter,
        }
    }
}

/// The single legal transition for a role acting on a contract in `from`,
/// if any: the next status and who the workflow waits on afterwards.
pub fn next_transition(role: Role, from: ContractStatus) -> Option<(ContractStatus, ActionPending)> {
    use ContractStatus::*;

    match (role, from) {
        (Role::Buyer, ContractCreated) => Some((ContractAccepted, ActionPending::BuyerBank)),
        (Role::BuyerBank, ContractAccepted) => Some((LcCreated, ActionPending::SellerBank)),
        (Role::SellerBank, LcCreated) => Some((LcApproved, ActionPending::Seller)),
        (Role::Seller, LcApproved) => Some((ReadyForShipment, ActionPending::Transporter)),
        (Role::Transporter, ReadyForShipment) => Some((ShipmentInProgress, ActionPending::Buyer)),
        (Role::Buyer, ShipmentInProgress) => Some((ShipmentDelivered, ActionPending::Seller)),
        (Role::Seller, ShipmentDelivered) => Some((InvoiceCreated, ActionPending::SellerBank)),
        (Role::SellerBank, InvoiceCreated) => {
            Some((PaymentCompletedToSeller, ActionPending::BuyerBank))
        }
        (Role::BuyerBank, PaymentCompletedToSeller) => {
            Some((PaymentCompletedToSellerBank, ActionPending::Buyer))
        }
        (Role::Buyer, PaymentCompletedToSellerBank) => {
            Some((ContractCompleted, ActionPending::Completed))
        }
        _ => None,
    }
}
