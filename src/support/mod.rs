#[macro_use]
mod logging;

mod tick;
pub use tick::{s_to_tick, tick_to_s};
