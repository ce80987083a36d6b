#![cfg_attr(not(test), no_std)]

#[macro_use]
mod support;

pub mod config;
pub mod error;
pub mod gtm;
pub mod hw;
pub mod pwm;

pub use error::{Error, Result};
pub use hw::{ChannelMask, DeadtimeBank, DtmClock, DtmOutput, DtmSlot, TimerChannel};
pub use pwm::{ActiveState, ChannelPair, DtmPwmHl, Mode, PwmHlConfig, PwmHlInterface};

pub mod prelude {
    pub use crate::hw::{DeadtimeBank as _, TimerChannel as _};
    pub use crate::pwm::PwmHlInterface as _;
}
