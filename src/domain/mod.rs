//! Core domain types and logic.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod indicator;
pub mod strategy;
pub mod simulator;
pub mod comparison;
pub mod screen;
pub mod universe;
pub mod symbol_data;
pub mod config_validation;
pub mod error;
