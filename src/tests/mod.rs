//! integrated tests
pub mod toolkit;


#[cfg(feature = "serde")]
mod serde;
