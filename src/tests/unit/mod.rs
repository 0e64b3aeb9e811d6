//! Unit tests for the combat core and the monster gateway helpers.

mod action_tests;
mod roster_tests;
mod store_tests;
