//! Feedlab Library
//!
//! Poultry feed recipe analysis: nutrient blending with enzyme uplift,
//! Ross 308 recommendation checks, unit conversion and premix sizing.

pub mod build_info;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
