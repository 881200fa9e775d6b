pub mod config;
pub mod data_core;
pub mod node;
pub mod normalize;
pub mod offset_map;
pub mod performance;
