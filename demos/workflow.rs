//! End-to-end walk through a contract's life: registration, creation,
//! every counterparty transition, and the resulting dashboard.
//!
//! Run with `RUST_LOG=trade_finance=debug` to watch the engine's
//! transition log.

use trade_finance::contract::{ContractDraft, Currency, DeliveryDetails, Party, TradeConditions, TradeLine};
use trade_finance::dates::{CalendarDate, TimeStamp};
use trade_finance::dispatch::invoke;
use trade_finance::ledger::SledLedger;
use trade_finance::service::ContractService;
use trade_finance::status::Role;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = tempfile::tempdir()?;
    let service = ContractService::new(SledLedger::open(dir.path().join("workflow.db"))?);

    for user in ["acme", "first-bank", "globex", "second-bank", "roadways"] {
        service.register_user(user)?;
    }

    let today = TimeStamp::now().date().as_naive();
    let delivery = CalendarDate::from(today + chrono::Duration::days(20));

    let draft = ContractDraft::new()
        .seller(Party::new("acme", "Acme Industrial", "+1-555-0100", "12 Foundry Way"))
        .seller_bank(Party::new("first-bank", "First Bank", "+1-555-0101", "1 Bank St"))
        .buyer(Party::new("globex", "Globex Trading", "+44-555-0102", "8 Wharf Rd"))
        .buyer_bank(Party::new("second-bank", "Second Bank", "+44-555-0103", "2 Bank St"))
        .transporter(Party::new("roadways", "Roadways Ltd", "+1-555-0104", "Depot 4"))
        .trade_conditions(TradeConditions {
            payment_duration_days: 25,
            transport_duration_days: 14,
            currency: Currency::USD,
            payment_terms: "net 25".into(),
        })
        .delivery_details(DeliveryDetails::new(
            "12 Foundry Way",
            "8 Wharf Rd",
            delivery,
            "FOB",
        ))
        .trade_line(TradeLine::new("ball bearings", "grade 5 steel", 1.20, 50_000))
        .trade_line(TradeLine::new("axle rods", "forged", 18.00, 2_000));

    let contract = service.create_contract(draft)?;
    println!("created {}", contract.contract_id);

    // Each counterparty acts in turn until the contract completes.
    for user in [
        "globex",      // accept
        "second-bank", // open the letter of credit
        "first-bank",  // approve it
        "acme",        // ready for shipment
        "roadways",    // pick up
        "globex",      // confirm delivery
        "acme",        // invoice
        "first-bank",  // pay the seller
        "second-bank", // settle between banks
        "globex",      // close out
    ] {
        let receipt = service.apply_transition(user, &contract.contract_id)?;
        println!(
            "{user:>12} -> {} (pending on {:?})",
            receipt.contract.contract_status, receipt.contract.action_pending_on
        );
    }

    service.attach_document(&contract.contract_id, "invoice.pdf", b"%PDF-1.4 ...".to_vec())?;

    let dashboard = invoke(
        &service,
        "getDashboard",
        &["acme".to_string(), Role::Seller.label().to_string()],
    )?;
    println!("seller dashboard: {}", String::from_utf8_lossy(&dashboard));

    Ok(())
}
