//! Multi-party trade finance contract workflow over a key-value ledger.
//!
//! A contract advances through eleven business states, each transition
//! gated on the counterparty whose action it represents. The transition
//! engine and the dashboard aggregation live here; persistence goes
//! through the [`ledger::Ledger`] collaborator (sled-backed by default),
//! and the [`dispatch`] module exposes the named-operation surface.

pub mod contract;
pub mod dates;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod report;
pub mod service;
pub mod status;
pub mod utils;
