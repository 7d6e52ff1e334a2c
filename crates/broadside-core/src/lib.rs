//! Core types and definitions for the BROADSIDE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshot state, effect events, tuning and
//! constants. It contains no simulation logic.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
