//! Core types for Local Notebook

pub mod api;
pub mod chat;
pub mod knowledge;

pub use api::*;
pub use chat::*;
pub use knowledge::*;
