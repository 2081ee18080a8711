//! Store Module - test-run state
//!
//! Single-threaded, in-memory mapping from string keys to typed values.
//!
//! Key types:
//! - `State`: the state bag (set/get/remove, typed accessors, dump)

mod state;

pub use state::State;
