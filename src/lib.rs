//! # Init Data Mock
//!
//! Generates signed "init data" payloads, the query string a messaging-platform
//! web app hands to its backend, so backend validators can be tested against
//! known-good fixtures. See [`init_data::generate`] for the full pipeline.

pub mod action;
pub mod config;
pub mod consts;
pub mod errors;
pub mod init_data;
pub mod logger;
