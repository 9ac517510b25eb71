//! La Ruche d'Or back-office library.
//!
//! This crate provides the back-office functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod editor;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
pub mod tablestore;
pub mod upload;
