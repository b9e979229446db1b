//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where the pipeline hands its outputs to external
//! collaborators. The core never depends on a concrete backend.
//!
//! ```text
//!     ┌─────────────────────────┐
//!     │      Application        │
//!     │  Domain + Port          │
//!     └───────────┬─────────────┘
//!                 │ BetLedger
//!        ┌────────┴────────┐
//!        ▼                 ▼
//!   ┌─────────┐      ┌───────────┐
//!   │ Memory  │      │   JSONL   │
//!   │ Ledger  │      │   Ledger  │
//!   └─────────┘      └───────────┘
//! ```

pub mod outbound;

pub use outbound::ledger::{BetLedger, LedgerEntry};
