//! Recording timer and deadtime bank for unit tests

use fugit_timer::HertzU32;

use super::{ChannelMask, DeadtimeBank, DtmClock, DtmOutput, DtmSlot, TimerChannel};
use crate::pwm::ActiveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    ConfigurePwm(u8, ActiveState),
    EnableOutputs(ChannelMask),
    EnableChannels(ChannelMask),
    ForceTransfer(ChannelMask),
    ReleaseTransfer(ChannelMask),
    Trigger,
    Attach(u8),
}

#[derive(Debug)]
pub struct MockTimer {
    pub period: u32,
    pub clock: HertzU32,
    /// Latest shadow compare pair per channel
    pub shadow: [Option<(u32, u32)>; 16],
    pub ops: Vec<TimerOp>,
    pub shadow_writes: usize,
}

impl MockTimer {
    pub fn new(period: u32, clock: HertzU32) -> Self {
        Self {
            period,
            clock,
            shadow: [None; 16],
            ops: Vec::new(),
            shadow_writes: 0,
        }
    }

    pub fn compare(&self, channel: u8) -> (u32, u32) {
        self.shadow[channel as usize].unwrap_or_else(|| panic!("channel {} never written", channel))
    }
}

impl TimerChannel for MockTimer {
    fn period(&self) -> u32 {
        self.period
    }

    fn clock_frequency(&self) -> HertzU32 {
        self.clock
    }

    fn configure_pwm(&mut self, channel: u8, active: ActiveState) {
        self.ops.push(TimerOp::ConfigurePwm(channel, active));
    }

    fn set_compare_shadow(&mut self, channel: u8, cm0: u32, cm1: u32) {
        self.shadow[channel as usize] = Some((cm0, cm1));
        self.shadow_writes += 1;
    }

    fn enable_outputs(&mut self, mask: ChannelMask) {
        self.ops.push(TimerOp::EnableOutputs(mask));
    }

    fn enable_channels(&mut self, mask: ChannelMask) {
        self.ops.push(TimerOp::EnableChannels(mask));
    }

    fn force_shadow_transfer(&mut self, mask: ChannelMask) {
        self.ops.push(TimerOp::ForceTransfer(mask));
    }

    fn release_shadow_transfer(&mut self, mask: ChannelMask) {
        self.ops.push(TimerOp::ReleaseTransfer(mask));
    }

    fn trigger_transfer(&mut self) {
        self.ops.push(TimerOp::Trigger);
    }

    fn attach_channel(&mut self, channel: u8) {
        self.ops.push(TimerOp::Attach(channel));
    }
}

#[derive(Debug)]
pub struct MockDeadtime {
    pub clock: HertzU32,
    /// Top channels that refuse to bind
    pub reject: ChannelMask,
    pub source: Vec<(DtmSlot, DtmClock)>,
    pub deadtime: Vec<(DtmSlot, u32, u32)>,
    pub paths: Vec<(DtmSlot, DtmOutput)>,
}

impl MockDeadtime {
    pub fn new(clock: HertzU32) -> Self {
        Self {
            clock,
            reject: ChannelMask::empty(),
            source: Vec::new(),
            deadtime: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Last deadtime written to `slot`
    pub fn ticks(&self, slot: DtmSlot) -> Option<(u32, u32)> {
        self.deadtime
            .iter()
            .rev()
            .find(|(s, _, _)| *s == slot)
            .map(|&(_, r, f)| (r, f))
    }
}

impl DeadtimeBank for MockDeadtime {
    fn bind(&mut self, top: u8, _bottom: u8) -> Option<DtmSlot> {
        if self.reject.contains(top) {
            None
        } else {
            Some(DtmSlot {
                unit: 0,
                channel: top,
            })
        }
    }

    fn clock_frequency(&self, _slot: DtmSlot) -> HertzU32 {
        self.clock
    }

    fn source_frequency(&self, _clock: DtmClock) -> HertzU32 {
        self.clock
    }

    fn set_clock_source(&mut self, slot: DtmSlot, clock: DtmClock) {
        self.source.push((slot, clock));
    }

    fn set_deadtime_ticks(&mut self, slot: DtmSlot, rising: u32, falling: u32) {
        self.deadtime.push((slot, rising, falling));
    }

    fn enable_path(&mut self, slot: DtmSlot, output: DtmOutput) {
        self.paths.push((slot, output));
    }
}
