//! Guestbook persistence: an append-only ordered list in a local file.
//!
//! # Invariants
//! - Entries load in insertion order.
//! - Append is last-writer-wins per store; there is no merging.
//! - A torn trailing line is skipped on load, never an error.

pub mod store;

pub use store::{GuestbookEntry, GuestbookStore, StoreError};

pub fn crate_info() -> &'static str {
    "mascot-guestbook v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("guestbook"));
    }
}
