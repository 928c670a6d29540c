//! Escrow driver tests against an in-memory chain.
#![allow(missing_docs, unreachable_pub)]

mod commitment;
mod mock;

pub use mock::*;
