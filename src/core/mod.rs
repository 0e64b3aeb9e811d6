pub mod bestiary;
pub mod combat;
pub mod dice;
pub mod logging;
