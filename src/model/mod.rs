pub mod activity;
pub mod config;
pub mod item;

pub use activity::*;
pub use config::*;
pub use item::*;
