//! # Parcel Ledger
//!
//! The ledger reconciliation engine for a parcel logistics and accounting
//! system: trial balance aggregation over a hierarchical chart of accounts,
//! and unified per-currency wallet ledgers for customers and drivers.
//!
//! ## Features
//!
//! - **Trial balance aggregation**: double-entry journal totals rolled up
//!   through header accounts, tolerant of partial or malformed data
//! - **Wallet reconciliation**: explicit transactions merged with entries
//!   derived from booking state (COD collection, prorated delivery fees,
//!   prorated driver commission), recomputed on every read
//! - **Multi-currency proration**: two-bucket currency splits with a fixed,
//!   configurable conversion rate
//! - **Settlement calculation**: per-currency balances and the payout cap
//!   that validates withdrawal requests
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   store
//!
//! ## Quick Start
//!
//! ```rust
//! use parcel_ledger::{
//!     ActorRef, BookingEvent, BookingItem, Currency, FinanceEngine, MemoryStore,
//! };
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! store.add_booking(
//!     BookingEvent::new(
//!         "bk1",
//!         "cust1",
//!         NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(9, 0, 0).unwrap(),
//!         BigDecimal::from(10),
//!     )
//!     .currency(Currency::Usd)
//!     .item(BookingItem::new("a", BigDecimal::from(50), Currency::Usd).delivered()),
//! );
//!
//! let engine = FinanceEngine::new(store);
//! let balance = engine.wallet_balance(&ActorRef::customer("cust1")).await.unwrap();
//! assert_eq!(balance.usd, BigDecimal::from(40));
//! # }
//! ```

pub mod chart;
pub mod engine;
pub mod journal;
pub mod traits;
pub mod trial_balance;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export commonly used types
pub use chart::*;
pub use engine::*;
pub use journal::*;
pub use traits::*;
pub use trial_balance::*;
pub use types::*;
pub use utils::MemoryStore;
pub use wallet::*;
