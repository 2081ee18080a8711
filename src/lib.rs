//! Titubate - state bag for test runs
//!
//! A `State` carries typed values between the steps of a test run and renders
//! them as a one-line dump for logs.

pub mod dump;
pub mod error;
pub mod seed;
pub mod store;
pub mod value;

pub use dump::{dump, render};
pub use error::{FixSuggestion, StateError};
pub use store::State;
pub use value::{StateObject, StateValue};
