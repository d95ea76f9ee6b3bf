//! kako core library — KakaoTalk messaging connector for workflow hosts.
//!
//! Token refresh, payload building, and batched message dispatch live here;
//! the CLI is a thin wrapper. The host platform plugs in through
//! [`connection::ConnectionSource`] and the `log` facade.

pub mod auth;
pub mod channels;
pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod provider;
