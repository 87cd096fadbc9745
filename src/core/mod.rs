pub mod builder;
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod region;
