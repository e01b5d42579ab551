//! Process-wide setup shared by didbtc binaries.

pub mod logging;
