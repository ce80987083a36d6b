use super::{ActiveState, ChannelPair};
use crate::hw::DtmClock;

#[derive(Debug, Clone, Copy)]
pub struct PwmHlConfig<'a> {
    /// One entry per channel, the channel count is `pairs.len()`
    pub pairs: &'a [ChannelPair],
    /// Seconds
    pub deadtime: f32,
    /// Seconds, deadtime excluded
    pub min_pulse: f32,
    pub ccx_active_state: ActiveState,
    pub coutx_active_state: ActiveState,
    pub deadtime_clock: DtmClock,
}

impl Default for PwmHlConfig<'_> {
    fn default() -> Self {
        Self {
            pairs: &[],
            deadtime: 0.0,
            min_pulse: 0.0,
            ccx_active_state: ActiveState::High,
            coutx_active_state: ActiveState::Low,
            deadtime_clock: DtmClock::SystemClock,
        }
    }
}
