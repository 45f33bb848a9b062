//! Fuel prices library entry points.
//!
//! This crate exposes the JSON-shaped [`Value`] tree returned by the upstream
//! fuel price provider, the lenient decoder used to read provider bodies, the
//! float sanitizer that makes a tree safe for strict JSON, and the
//! [`FuelPriceProvider`] seam with its HTTP implementation. Higher-level
//! consumers (the gateway service) should only depend on the items exported
//! here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod client;
pub mod decode;
pub mod error;
pub mod provider;
pub mod sanitize;
pub mod value;

pub use client::{HttpProvider, ProviderConfig};
pub use error::{Error, Result};
pub use provider::{FuelPriceProvider, Operation};
pub use sanitize::{count_non_finite, sanitize};
pub use value::{Map, Value};
