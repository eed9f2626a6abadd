//! # lumen-push
//!
//! HTTP push delivery gateway. Translates domain payloads into the push
//! service's wire format and posts them to per-account broadcast topics.

pub mod client;
pub mod wire;

pub use client::HttpPushGateway;
