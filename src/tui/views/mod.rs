pub mod combat;
pub mod stat_block;
