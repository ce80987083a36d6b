//! Driver error types

use core::fmt;

use crate::pwm::Mode;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Channel count outside `1..=MAX_CHANNELS`
    ChannelCount(usize),
    /// Timer channel index the hardware does not have
    InvalidChannel(u8),
    /// Top/bottom pair has no common deadtime unit
    DeadtimeBinding { channel: usize },
    /// Deadtime does not fit the DTM relative value fields (ticks)
    DeadtimeOutOfRange(u32),
    /// Minimum pulse leaves no room for a maximum pulse (ticks)
    MinPulseOutOfRange(u32),
    /// Mode has no update strategy, driver was forced to `Off`
    InvalidMode(Mode),
    /// Raw mode value outside the mode table, driver was forced to `Off`
    UnknownMode(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ChannelCount(n) => write!(f, "unsupported channel count: {}", n),
            Error::InvalidChannel(ch) => write!(f, "no timer channel {}", ch),
            Error::DeadtimeBinding { channel } => {
                write!(f, "channel {} cannot be bound to a deadtime unit", channel)
            }
            Error::DeadtimeOutOfRange(ticks) => {
                write!(f, "deadtime of {} ticks exceeds the hardware maximum", ticks)
            }
            Error::MinPulseOutOfRange(ticks) => {
                write!(f, "minimum pulse of {} ticks exceeds half the period", ticks)
            }
            Error::InvalidMode(mode) => write!(f, "invalid mode {:?}, forced off", mode),
            Error::UnknownMode(raw) => write!(f, "unknown mode {}, forced off", raw),
        }
    }
}
