//! Prequelbot - pattern-rule reply engine for a prequel-quoting chat bot

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod footer;
pub mod message;
pub mod picker;
pub mod reply;
pub mod rule;
pub mod telemetry;
pub mod template;

pub use catalog::{Catalog, CatalogDef, Category};
pub use footer::Links;
pub use message::{Author, Message};
pub use picker::{IndexPicker, RngPicker};
pub use reply::{Responder, Settings};
