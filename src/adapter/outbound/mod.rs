//! Outbound adapters implementing the persistence port.

pub mod jsonl;
pub mod memory;
