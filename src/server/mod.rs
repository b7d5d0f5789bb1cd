//! HTTP surface of the relay

pub mod api;
pub mod cors;
