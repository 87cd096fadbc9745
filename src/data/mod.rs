pub mod category;
pub mod demo;
pub mod event;
pub mod filter;
pub mod loader;
pub mod store;
