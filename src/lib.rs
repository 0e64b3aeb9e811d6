/// ttcombat - Tabletop Combat Tracker (TUI)
///
/// Initiative order, turn tracking, monster hit points and stat-block
/// actions for game masters, with monsters pulled from the D&D 5e SRD API.

pub mod config;
pub mod core;
pub mod tui;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
