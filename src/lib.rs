//! Weapon attack-power calculator: library entry point.
//!
//! Exposes the regulation decoder, scaling curves, calculator, filter/sort query
//! layer, weapon codec, and version registry for use by the CLI and tests.

pub mod calc;
pub mod codec;
pub mod config;
pub mod curve;
pub mod filter;
pub mod model;
pub mod query;
pub mod registry;
pub mod regulation;
pub mod report;
#[cfg(feature = "serve")]
pub mod server;
pub mod sort;
pub mod source;
pub mod util;
