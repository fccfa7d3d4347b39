pub mod config;
pub mod driver;
pub mod machine;
pub mod reveal;
pub mod sampler;
pub mod stats;
pub mod timer;
