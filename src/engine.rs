//! The status transition engine: resolves the calling party's role against
//! the contract's current state and applies the single legal transition,
//! including the late-shipment discount side-calculation.
//!
//! The engine is pure over an in-memory [`Contract`] and an injected
//! trigger instant; loading and persisting the record is the service
//! layer's job.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::contract::Contract;
use crate::dates::{CalendarDate, diff_days};
use crate::status::{ContractStatus, Role, next_transition};

/// The edge a call actually traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedEdge {
    pub role: Role,
    pub from: ContractStatus,
    pub to: ContractStatus,
}

/// What a transition call did. `applied` is `None` for the silent no-op
/// cases (caller holds no role, or the role's status guard failed); the
/// call still succeeds and the record is still written back either way.
/// `also_matched` lists any further roles the same user id holds on this
/// contract; those never act.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub applied: Option<AppliedEdge>,
    pub also_matched: Vec<Role>,
}

impl TransitionOutcome {
    pub fn was_applied(&self) -> bool {
        self.applied.is_some()
    }
}

/// Advance `contract` by the one transition `acting_user_id` is entitled
/// to trigger at `now`, if any. Role dispatch is deterministic: parties
/// are tested in the fixed order seller, buyer, sellerBank, buyerBank,
/// transporter, and only the first match acts.
pub fn apply_transition(
    contract: &mut Contract,
    acting_user_id: &str,
    now: DateTime<Utc>,
) -> TransitionOutcome {
    let mut matched = contract.roles_of(acting_user_id);
    if matched.is_empty() {
        debug!(
            contract_id = %contract.contract_id,
            user_id = %acting_user_id,
            "caller holds no role on contract, leaving record unchanged"
        );
        return TransitionOutcome::default();
    }

    let role = matched.remove(0);
    if !matched.is_empty() {
        warn!(
            contract_id = %contract.contract_id,
            user_id = %acting_user_id,
            acting = %role,
            ambiguous = ?matched,
            "user id assigned to multiple counterparties, acting as first match"
        );
    }

    let from = contract.contract_status;
    let Some((to, pending)) = next_transition(role, from) else {
        debug!(
            contract_id = %contract.contract_id,
            %role,
            status = %from,
            "no transition for role at current status, leaving record unchanged"
        );
        return TransitionOutcome {
            applied: None,
            also_matched: matched,
        };
    };

    let trigger_date = CalendarDate::from(now.date_naive());
    contract.contract_status = to;
    contract.action_pending_on = pending;
    contract.stamp_transition(to, trigger_date);

    if role == Role::Seller && from == ContractStatus::LcApproved {
        late_shipment_discount(contract, trigger_date);
    }

    contract.last_updated_date = trigger_date;

    info!(
        contract_id = %contract.contract_id,
        %role,
        from = %from,
        to = %to,
        "transition applied"
    );

    TransitionOutcome {
        applied: Some(AppliedEdge { role, from, to }),
        also_matched: matched,
    }
}

/// When the seller marks the goods ready for shipment after the promised
/// delivery date, the trade amount is discounted by how late they are.
fn late_shipment_discount(contract: &mut Contract, trigger_date: CalendarDate) {
    let promised = contract.delivery_details.delivery_date;
    if trigger_date <= promised {
        return;
    }

    let late_days = diff_days(trigger_date.as_naive(), promised.as_naive());
    let total = contract.total_trade_amount;
    // TODO: confirm the first bucket with the business owners; the label
    // reads 5 percent but the booked haircut is half the trade amount.
    let (percentage, haircut) = match late_days {
        ..=0 => return,
        1..=5 => (5.0, 0.5),
        6..=15 => (10.0, 0.10),
        _ => (20.0, 0.20),
    };

    contract.discount_percentage = Some(percentage);
    contract.discounted_amount = Some(total - total * haircut);
    info!(
        contract_id = %contract.contract_id,
        late_days,
        percentage,
        "late shipment discount booked"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContractDraft, DeliveryDetails, Party, TradeConditions, TradeLine};
    use crate::dates::TimeStamp;
    use crate::status::ActionPending;

    fn contract() -> Contract {
        let created = TimeStamp::new_with(2025, 6, 1, 9, 0, 0);

        ContractDraft::new()
            .seller(Party::new("seller-1", "Seller", "1", "a"))
            .seller_bank(Party::new("sellerbank-1", "Seller Bank", "2", "b"))
            .buyer(Party::new("buyer-1", "Buyer", "3", "c"))
            .buyer_bank(Party::new("buyerbank-1", "Buyer Bank", "4", "d"))
            .transporter(Party::new("transporter-1", "Transporter", "5", "e"))
            .trade_conditions(TradeConditions {
                payment_duration_days: 20,
                transport_duration_days: 12,
                currency: Default::default(),
                payment_terms: "net 20".into(),
            })
            .delivery_details(DeliveryDetails::new(
                "pickup",
                "dropoff",
                CalendarDate::from_ymd(2025, 6, 21).unwrap(),
                "FOB",
            ))
            .trade_line(TradeLine::new("widgets", "metal widgets", 10.0, 100))
            .into_contract(created)
            .unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        TimeStamp::new_with(y, m, d, 12, 0, 0).to_datetime_utc()
    }

    #[test]
    fn buyer_accepts_a_new_contract() {
        let mut c = contract();
        let outcome = apply_transition(&mut c, "buyer-1", at(2025, 6, 2));

        assert!(outcome.was_applied());
        assert_eq!(c.contract_status, ContractStatus::ContractAccepted);
        assert_eq!(c.action_pending_on, ActionPending::BuyerBank);
        assert_eq!(
            c.accepted_by_buyer_date,
            Some(CalendarDate::from_ymd(2025, 6, 2).unwrap())
        );
        assert_eq!(c.last_updated_date, CalendarDate::from_ymd(2025, 6, 2).unwrap());
    }

    #[test]
    fn stranger_is_a_silent_no_op() {
        let mut c = contract();
        let before = c.clone();

        let outcome = apply_transition(&mut c, "someone-else", at(2025, 6, 2));

        assert!(!outcome.was_applied());
        assert_eq!(c, before);
    }

    #[test]
    fn wrong_turn_is_a_silent_no_op() {
        // The seller has nothing to do until the LC is approved.
        let mut c = contract();
        let before = c.clone();

        let outcome = apply_transition(&mut c, "seller-1", at(2025, 6, 2));

        assert!(!outcome.was_applied());
        assert_eq!(c, before);
    }

    #[test]
    fn multi_role_user_acts_once_as_first_match() {
        let mut c = contract();
        c.buyer.user_id = "dual".into();
        c.buyer_bank.user_id = "dual".into();

        // Buyer comes before buyerBank in resolution order, so the accept
        // edge fires and the LC-creation edge does not cascade.
        let outcome = apply_transition(&mut c, "dual", at(2025, 6, 2));

        assert_eq!(
            outcome.applied.map(|edge| edge.to),
            Some(ContractStatus::ContractAccepted)
        );
        assert_eq!(outcome.also_matched, vec![Role::BuyerBank]);
        assert_eq!(c.contract_status, ContractStatus::ContractAccepted);
    }

    fn advance_to_lc_approved(c: &mut Contract, now: DateTime<Utc>) {
        assert!(apply_transition(c, "buyer-1", now).was_applied());
        assert!(apply_transition(c, "buyerbank-1", now).was_applied());
        assert!(apply_transition(c, "sellerbank-1", now).was_applied());
        assert_eq!(c.contract_status, ContractStatus::LcApproved);
    }

    #[test]
    fn on_time_shipment_readiness_books_no_discount() {
        let mut c = contract();
        advance_to_lc_approved(&mut c, at(2025, 6, 2));

        // Promised delivery is June 21; the seller is ready on the day.
        assert!(apply_transition(&mut c, "seller-1", at(2025, 6, 21)).was_applied());

        assert_eq!(c.contract_status, ContractStatus::ReadyForShipment);
        assert_eq!(c.discount_percentage, None);
        assert_eq!(c.discounted_amount, None);
    }

    #[test]
    fn late_shipment_readiness_books_bucketed_discounts() {
        // (late days, percentage label, remaining amount of a 1000 total)
        let cases = [
            (1, 5.0, 500.0),
            (5, 5.0, 500.0),
            (6, 10.0, 900.0),
            (15, 10.0, 900.0),
            (16, 20.0, 800.0),
        ];

        for (late, percentage, expected) in cases {
            let mut c = contract();
            advance_to_lc_approved(&mut c, at(2025, 6, 2));

            let trigger = at(2025, 6, 21) + chrono::Duration::days(late);
            assert!(apply_transition(&mut c, "seller-1", trigger).was_applied());

            assert_eq!(c.discount_percentage, Some(percentage), "late {late}");
            assert_eq!(c.discounted_amount, Some(expected), "late {late}");
        }
    }

    #[test]
    fn completed_contract_accepts_no_further_transitions() {
        let mut c = contract();
        let now = at(2025, 6, 2);
        for user in [
            "buyer-1",
            "buyerbank-1",
            "sellerbank-1",
            "seller-1",
            "transporter-1",
            "buyer-1",
            "seller-1",
            "sellerbank-1",
            "buyerbank-1",
            "buyer-1",
        ] {
            assert!(apply_transition(&mut c, user, now).was_applied());
        }
        assert_eq!(c.contract_status, ContractStatus::ContractCompleted);
        assert_eq!(c.action_pending_on, ActionPending::Completed);

        let before = c.clone();
        for user in ["buyer-1", "seller-1", "transporter-1"] {
            assert!(!apply_transition(&mut c, user, now).was_applied());
        }
        assert_eq!(c, before);
    }
}
