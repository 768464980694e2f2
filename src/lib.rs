//! Partyline — relays SMS votes into per-tenant realtime channels.

pub mod channel;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod publisher;
pub mod registry;
pub mod synthetic;
pub mod webhook;
