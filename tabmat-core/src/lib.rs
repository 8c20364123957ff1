#![no_std]

//! Tabmat Core - Delimited Text Layout Rules
//!
//! This crate provides the pure scanning rules shared by the tabmat
//! tooling: the separator set, line classification, field counting, and
//! numeric token extraction. It performs no I/O.

pub mod line;
pub mod separators;
pub mod token;

pub use line::*;
pub use separators::*;
pub use token::*;
