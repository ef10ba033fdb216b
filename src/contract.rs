//! The contract record, its constituent parts, and the draft it is built
//! from.
//!
//! A [`Contract`] is persisted in the ledger as CBOR and crosses the
//! invocation boundary as JSON under the historical wire field names. The
//! inbound [`ContractDraft`] carries only what a client may decide; every
//! system-owned field (id, status, timestamps, derived totals) is assigned
//! here at creation and afterwards mutated exclusively by the transition
//! engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::{CalendarDate, TimeStamp, diff_days};
use crate::error::{Error, ValidationError};
use crate::status::{ActionPending, ContractStatus, Role};
use crate::utils::new_contract_id;

// Duration windows a draft must fit, in days.
pub const MIN_PAYMENT_DURATION_DAYS: u32 = 15;
pub const MAX_PAYMENT_DURATION_DAYS: u32 = 30;
pub const MIN_TRANSPORT_DURATION_DAYS: u32 = 10;
pub const MAX_TRANSPORT_DURATION_DAYS: u32 = 20;
pub const MIN_DELIVERY_DURATION_DAYS: i64 = 15;
pub const MAX_DELIVERY_DURATION_DAYS: i64 = 30;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    minicbor::Encode,
    minicbor::Decode,
    Serialize,
    Deserialize,
)]
pub enum Currency {
    #[default]
    #[n(0)]
    USD,
    #[n(1)]
    GBP,
    #[n(2)]
    EUR,
}

/// One counterparty on a contract. The user id is what role resolution
/// matches against; the rest is directory data.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, minicbor::Encode, minicbor::Decode, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[n(0)]
    pub user_id: String,
    #[n(1)]
    pub user_name: String,
    #[n(2)]
    pub contact_no: String,
    #[n(3)]
    pub address: String,
}

impl Party {
    pub fn new(user_id: &str, user_name: &str, contact_no: &str, address: &str) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            contact_no: contact_no.into(),
            address: address.into(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Default, minicbor::Encode, minicbor::Decode, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TradeConditions {
    /// Days the buyer side has to settle; also drives the expected
    /// delivery date used by the dashboard's on-time/delayed split.
    #[n(0)]
    #[serde(rename = "paymentDuration")]
    pub payment_duration_days: u32,
    #[n(1)]
    #[serde(rename = "transportDuration")]
    pub transport_duration_days: u32,
    #[n(2)]
    pub currency: Currency,
    #[n(3)]
    pub payment_terms: String,
}

#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    #[n(0)]
    pub pickup_address: String,
    #[n(1)]
    pub delivery_address: String,
    /// The contractually promised delivery date. Shipping readiness after
    /// this date triggers the late-shipment discount.
    #[n(2)]
    pub delivery_date: CalendarDate,
    #[n(3)]
    pub incoterm: String,
}

impl DeliveryDetails {
    pub fn new(
        pickup_address: &str,
        delivery_address: &str,
        delivery_date: CalendarDate,
        incoterm: &str,
    ) -> Self {
        Self {
            pickup_address: pickup_address.into(),
            delivery_address: delivery_address.into(),
            delivery_date,
            incoterm: incoterm.into(),
        }
    }
}

/// One product line on the contract.
#[derive(
    Debug, Clone, PartialEq, Default, minicbor::Encode, minicbor::Decode, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct TradeLine {
    #[n(0)]
    pub product_name: String,
    #[n(1)]
    pub product_desc: String,
    #[n(2)]
    pub product_price: f64,
    #[n(3)]
    pub product_quantity: u32,
    #[n(4)]
    pub total_amount: f64,
}

impl TradeLine {
    pub fn new(product_name: &str, product_desc: &str, product_price: f64, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            product_desc: product_desc.into(),
            product_price,
            product_quantity: quantity,
            total_amount: product_price * f64::from(quantity),
        }
    }
}

/// The trade-finance workflow record. Keyed in the ledger by
/// `contract_id`; one record per contract, mutated in place as the
/// workflow advances.
#[derive(Debug, Clone, PartialEq, minicbor::Encode, minicbor::Decode, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[n(0)]
    pub contract_id: String,
    #[n(1)]
    pub contract_status: ContractStatus,
    #[n(2)]
    pub action_pending_on: ActionPending,
    #[n(3)]
    pub seller: Party,
    #[n(4)]
    pub seller_bank: Party,
    #[n(5)]
    pub buyer: Party,
    #[n(6)]
    pub buyer_bank: Party,
    #[n(7)]
    pub transporter: Party,
    #[n(8)]
    pub trade_conditions: TradeConditions,
    #[n(9)]
    pub delivery_details: DeliveryDetails,
    #[n(10)]
    #[serde(rename = "tradeDetails")]
    pub trade_lines: Vec<TradeLine>,
    #[n(11)]
    pub total_trade_amount: f64,
    #[n(12)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[n(13)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_amount: Option<f64>,
    #[n(14)]
    #[serde(rename = "isPOAttached")]
    pub is_po_attached: bool,
    #[n(15)]
    #[serde(rename = "isLCAttached")]
    pub is_lc_attached: bool,
    #[n(16)]
    pub is_bill_of_lading_attached: bool,
    #[n(17)]
    pub is_invoice_list_attached: bool,
    #[n(18)]
    pub contract_create_date: TimeStamp<Utc>,
    #[n(19)]
    pub last_updated_date: CalendarDate,
    // One stamp per transition edge, written the moment the edge fires and
    // never rewritten afterwards.
    #[n(20)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_by_buyer_date: Option<CalendarDate>,
    #[n(21)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lc_created_by_buyer_bank_date: Option<CalendarDate>,
    #[n(22)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lc_approved_by_seller_bank_date: Option<CalendarDate>,
    #[n(23)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_for_shipment_by_seller_date: Option<CalendarDate>,
    #[n(24)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_in_progress_by_transporter_date: Option<CalendarDate>,
    #[n(25)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_delivered_by_buyer_date: Option<CalendarDate>,
    #[n(26)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_created_by_seller_date: Option<CalendarDate>,
    #[n(27)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_to_seller_by_seller_bank_date: Option<CalendarDate>,
    #[n(28)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_to_seller_bank_by_buyer_bank_date: Option<CalendarDate>,
    #[n(29)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by_buyer_date: Option<CalendarDate>,
}

impl Contract {
    /// Every role the given user holds on this contract, in resolution
    /// order. More than one entry means the same user id was assigned to
    /// several counterparties.
    pub fn roles_of(&self, user_id: &str) -> Vec<Role> {
        let mut roles = Vec::new();
        if self.seller.user_id == user_id {
            roles.push(Role::Seller);
        }
        if self.buyer.user_id == user_id {
            roles.push(Role::Buyer);
        }
        if self.seller_bank.user_id == user_id {
            roles.push(Role::SellerBank);
        }
        if self.buyer_bank.user_id == user_id {
            roles.push(Role::BuyerBank);
        }
        if self.transporter.user_id == user_id {
            roles.push(Role::Transporter);
        }
        roles
    }

    pub fn party(&self, role: Role) -> &Party {
        match role {
            Role::Seller => &self.seller,
            Role::Buyer => &self.buyer,
            Role::SellerBank => &self.seller_bank,
            Role::BuyerBank => &self.buyer_bank,
            Role::Transporter => &self.transporter,
        }
    }

    /// Record the date an edge fired, keyed by the state it entered.
    pub fn stamp_transition(&mut self, entered: ContractStatus, date: CalendarDate) {
        use ContractStatus::*;

        let slot = match entered {
            ContractCreated => return,
            ContractAccepted => &mut self.accepted_by_buyer_date,
            LcCreated => &mut self.lc_created_by_buyer_bank_date,
            LcApproved => &mut self.lc_approved_by_seller_bank_date,
            ReadyForShipment => &mut self.ready_for_shipment_by_seller_date,
            ShipmentInProgress => &mut self.shipment_in_progress_by_transporter_date,
            ShipmentDelivered => &mut self.shipment_delivered_by_buyer_date,
            InvoiceCreated => &mut self.invoice_created_by_seller_date,
            PaymentCompletedToSeller => &mut self.payment_to_seller_by_seller_bank_date,
            PaymentCompletedToSellerBank => &mut self.payment_to_seller_bank_by_buyer_bank_date,
            ContractCompleted => &mut self.completed_by_buyer_date,
        };
        *slot = Some(date);
    }

    /// The stamp recorded when the given state was entered, if it fired.
    pub fn transition_stamp(&self, entered: ContractStatus) -> Option<CalendarDate> {
        use ContractStatus::*;

        match entered {
            ContractCreated => None,
            ContractAccepted => self.accepted_by_buyer_date,
            LcCreated => self.lc_created_by_buyer_bank_date,
            LcApproved => self.lc_approved_by_seller_bank_date,
            ReadyForShipment => self.ready_for_shipment_by_seller_date,
            ShipmentInProgress => self.shipment_in_progress_by_transporter_date,
            ShipmentDelivered => self.shipment_delivered_by_buyer_date,
            InvoiceCreated => self.invoice_created_by_seller_date,
            PaymentCompletedToSeller => self.payment_to_seller_by_seller_bank_date,
            PaymentCompletedToSellerBank => self.payment_to_seller_bank_by_buyer_bank_date,
            ContractCompleted => self.completed_by_buyer_date,
        }
    }

    /// Creation instant plus the payment duration; the dashboard's
    /// on-time/delayed split pivots on this instant.
    pub fn expected_delivery_date(&self) -> DateTime<Utc> {
        self.contract_create_date.to_datetime_utc()
            + Duration::days(i64::from(self.trade_conditions.payment_duration_days))
    }
}

/// The client-supplied half of a contract: counterparties, conditions,
/// delivery plan and product lines. Everything else is assigned at
/// creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDraft {
    pub seller: Party,
    pub seller_bank: Party,
    pub buyer: Party,
    pub buyer_bank: Party,
    pub transporter: Party,
    pub trade_conditions: TradeConditions,
    #[serde(default)]
    pub delivery_details: Option<DeliveryDetails>,
    #[serde(rename = "tradeDetails", default)]
    pub trade_lines: Vec<TradeLine>,
}

impl ContractDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seller(mut self, party: Party) -> Self {
        self.seller = party;
        self
    }

    pub fn seller_bank(mut self, party: Party) -> Self {
        self.seller_bank = party;
        self
    }

    pub fn buyer(mut self, party: Party) -> Self {
        self.buyer = party;
        self
    }

    pub fn buyer_bank(mut self, party: Party) -> Self {
        self.buyer_bank = party;
        self
    }

    pub fn transporter(mut self, party: Party) -> Self {
        self.transporter = party;
        self
    }

    pub fn trade_conditions(mut self, conditions: TradeConditions) -> Self {
        self.trade_conditions = conditions;
        self
    }

    pub fn delivery_details(mut self, details: DeliveryDetails) -> Self {
        self.delivery_details = Some(details);
        self
    }

    pub fn trade_line(mut self, line: TradeLine) -> Self {
        self.trade_lines.push(line);
        self
    }

    /// Check the draft against the mandatory-field and duration-window
    /// rules, relative to the creation date.
    pub fn validate(&self, created_on: CalendarDate) -> Result<(), ValidationError> {
        for (label, party) in [
            ("seller", &self.seller),
            ("sellerBank", &self.seller_bank),
            ("buyer", &self.buyer),
            ("buyerBank", &self.buyer_bank),
            ("transporter", &self.transporter),
        ] {
            if party.user_id.is_empty() {
                return Err(ValidationError::MissingPartyId(label));
            }
        }

        if self.trade_lines.is_empty() {
            return Err(ValidationError::NoTradeLines);
        }
        for line in &self.trade_lines {
            if line.total_amount <= 0.0 {
                return Err(ValidationError::NonPositiveAmount(line.product_name.clone()));
            }
        }

        let payment = self.trade_conditions.payment_duration_days;
        if !(MIN_PAYMENT_DURATION_DAYS..=MAX_PAYMENT_DURATION_DAYS).contains(&payment) {
            return Err(ValidationError::PaymentDurationOutOfRange {
                min: MIN_PAYMENT_DURATION_DAYS,
                max: MAX_PAYMENT_DURATION_DAYS,
                got: payment,
            });
        }
        let transport = self.trade_conditions.transport_duration_days;
        if !(MIN_TRANSPORT_DURATION_DAYS..=MAX_TRANSPORT_DURATION_DAYS).contains(&transport) {
            return Err(ValidationError::TransportDurationOutOfRange {
                min: MIN_TRANSPORT_DURATION_DAYS,
                max: MAX_TRANSPORT_DURATION_DAYS,
                got: transport,
            });
        }

        let delivery = self
            .delivery_details
            .as_ref()
            .ok_or(ValidationError::MissingDeliveryDetails)?;
        let lead_days = diff_days(delivery.delivery_date.as_naive(), created_on.as_naive());
        if !(MIN_DELIVERY_DURATION_DAYS..=MAX_DELIVERY_DURATION_DAYS).contains(&lead_days) {
            return Err(ValidationError::DeliveryDateOutOfRange {
                min: MIN_DELIVERY_DURATION_DAYS,
                max: MAX_DELIVERY_DURATION_DAYS,
                got: lead_days,
            });
        }

        Ok(())
    }

    /// Validate and build the persistent record: mint the id, set the
    /// initial status and pending party, stamp the creation instant and
    /// derive the total trade amount.
    pub fn into_contract(self, created_at: TimeStamp<Utc>) -> Result<Contract, Error> {
        self.validate(created_at.date())?;

        let delivery_details = self
            .delivery_details
            .ok_or(ValidationError::MissingDeliveryDetails)?;
        let total_trade_amount = self.trade_lines.iter().map(|line| line.total_amount).sum();
        let last_updated_date = created_at.date();

        Ok(Contract {
            contract_id: new_contract_id()?,
            contract_status: ContractStatus::ContractCreated,
            action_pending_on: ActionPending::Buyer,
            seller: self.seller,
            seller_bank: self.seller_bank,
            buyer: self.buyer,
            buyer_bank: self.buyer_bank,
            transporter: self.transporter,
            trade_conditions: self.trade_conditions,
            delivery_details,
            trade_lines: self.trade_lines,
            total_trade_amount,
            discount_percentage: None,
            discounted_amount: None,
            is_po_attached: true,
            is_lc_attached: false,
            is_bill_of_lading_attached: false,
            is_invoice_list_attached: false,
            contract_create_date: created_at,
            last_updated_date,
            accepted_by_buyer_date: None,
            lc_created_by_buyer_bank_date: None,
            lc_approved_by_seller_bank_date: None,
            ready_for_shipment_by_seller_date: None,
            shipment_in_progress_by_transporter_date: None,
            shipment_delivered_by_buyer_date: None,
            invoice_created_by_seller_date: None,
            payment_to_seller_by_seller_bank_date: None,
            payment_to_seller_bank_by_buyer_bank_date: None,
            completed_by_buyer_date: None,
        })
    }
}
