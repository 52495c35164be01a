//! Custodial accounting core for the Coffer ledger.
//!
//! This crate is the heart of Coffer. It provides:
//! - Per-account balance records with linear interest accrual
//! - `LedgerWrite` / `LedgerRead` trait boundaries
//! - `CofferLedger`, the serialized in-memory engine
//! - Collaborator seams: clock source, value custody, event sink
//! - Serde snapshots for embedding behind a durable store
//!
//! Interest is realized into principal before every balance mutation;
//! global aggregates (`total_users`, `total_supply`) are maintained
//! incrementally, never recomputed by scans.

pub mod account;
pub mod clock;
pub mod config;
pub mod custody;
pub mod engine;
pub mod error;
pub mod events;
pub mod interest;
pub mod snapshot;
pub mod traits;

pub use account::{AccountRecord, DepositInfo, InterestRate, LedgerStats};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use custody::{Custodian, CustodyError, InMemoryVault};
pub use engine::CofferLedger;
pub use error::LedgerError;
pub use events::{EventSink, JsonlSink, LedgerEvent, MemorySink};
pub use interest::SECONDS_PER_YEAR;
pub use snapshot::LedgerSnapshot;
pub use traits::{LedgerRead, LedgerWrite};
