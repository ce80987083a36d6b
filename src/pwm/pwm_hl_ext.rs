use crate::hw::TimerChannel;
use crate::{Error, Result};

use super::Mode;

/// Hardware independent high/low side PWM interface.
///
/// On-time slices hold one entry per configured channel. Nothing written
/// here reaches the outputs before the caller performs the shadow transfer
/// on the timer, so channels that must switch together are updated in one
/// call.
pub trait PwmHlInterface {
    type Timer: TimerChannel;

    /// Commits the same rising/falling deadtime to every channel.
    /// Rejected values leave the previous deadtime in place.
    ///
    /// The minimum pulse is not recomputed, call
    /// [`set_min_pulse`](Self::set_min_pulse) afterwards.
    fn set_deadtime(&mut self, deadtime: f32) -> Result<()>;
    fn deadtime(&self) -> f32;
    fn deadtime_ticks(&self) -> u32;

    /// Minimum pulse in seconds, the deadtime is added on top.
    fn set_min_pulse(&mut self, min_pulse: f32) -> Result<()>;
    fn min_pulse(&self) -> f32;

    fn channel_count(&self) -> usize;

    /// Set by the inverted modes, kept while `Off`.
    fn inverted(&self) -> bool;

    fn mode(&self) -> Mode;

    /// Invalid modes force `Off` and report [`Error::InvalidMode`].
    fn set_mode(&mut self, mode: Mode) -> Result<()>;

    /// Mode from its raw value. Values outside the mode table force `Off`
    /// like an invalid mode and report [`Error::UnknownMode`].
    fn set_mode_raw(&mut self, raw: u8) -> Result<()> {
        match Mode::try_from(raw) {
            Ok(mode) => self.set_mode(mode),
            Err(raw) => {
                // Init has no strategy, this always lands on Off
                let _ = self.set_mode(Mode::Init);
                Err(Error::UnknownMode(raw))
            }
        }
    }

    /// On-times in timer ticks
    fn set_on_time(&mut self, t_on: &[u32]);

    /// On-times and signed shifts in timer ticks
    fn set_on_time_and_shift(&mut self, t_on: &[u32], shift: &[i32]);

    /// On-times and start offsets in seconds
    fn set_pulse(&mut self, t_on: &[f32], offset: &[f32]);

    fn timer(&self) -> &Self::Timer;
    fn timer_mut(&mut self) -> &mut Self::Timer;
}
