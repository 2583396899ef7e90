pub mod compute;
pub mod config;
pub mod entities;
pub mod minigame;
pub mod scheduler;
pub mod session;
pub mod store;
