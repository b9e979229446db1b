//! Implementations of ports (hexagonal adapters).

pub mod outbound;

pub use outbound::jsonl::JsonlLedger;
pub use outbound::memory::MemoryLedger;
