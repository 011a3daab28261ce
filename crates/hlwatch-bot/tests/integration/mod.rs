//! Integration tests for hlwatch-bot.
//!
//! These tests verify the interaction between components:
//! - Poll cycle through diff to notification fan-out
//! - Command handling against a live registry

pub mod common;
