//! Hardware seams
//!
//! The PWM driver never touches registers itself: it talks to a timer
//! (free running counter + shadow compare registers) and to a bank of
//! deadtime insertion units through these traits.

use fugit_timer::HertzU32;

use crate::pwm::ActiveState;

#[cfg(test)]
pub(crate) mod mock;

/// Set of timer channels, bit `n` = channel `n`. Channels past
/// [`CAPACITY`](Self::CAPACITY) are never members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMask(pub u16);

impl ChannelMask {
    pub const CAPACITY: u8 = u16::BITS as u8;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn of(channel: u8) -> Self {
        Self(Self::bit(channel))
    }

    /// Out of range channels are ignored.
    pub fn insert(&mut self, channel: u8) {
        self.0 |= Self::bit(channel);
    }

    pub const fn contains(&self, channel: u8) -> bool {
        self.0 & Self::bit(channel) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (0..Self::CAPACITY).filter(move |&ch| bits & Self::bit(ch) != 0)
    }

    const fn bit(channel: u8) -> u16 {
        match 1u16.checked_shl(channel as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }
}

/// Deadtime unit + channel inside it a top/bottom pair was bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DtmSlot {
    pub unit: u8,
    pub channel: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtmClock {
    SystemClock = 0,
    CmuClk0 = 1,
    CmuClk1 = 2,
    CmuClk2 = 3,
}

/// Output 0 drives the top switch, output 1 the complementary bottom one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtmOutput {
    Output0,
    Output1,
}

pub trait TimerChannel {
    /// Period in timer clock ticks
    fn period(&self) -> u32;
    fn clock_frequency(&self) -> HertzU32;

    /// Put `channel` into PWM generation mode, reset by the timer trigger.
    fn configure_pwm(&mut self, channel: u8, active: ActiveState);

    /// Write the shadow compare registers, latched on the next transfer.
    fn set_compare_shadow(&mut self, channel: u8, cm0: u32, cm1: u32);

    fn enable_outputs(&mut self, mask: ChannelMask);
    fn enable_channels(&mut self, mask: ChannelMask);

    /// Arm a forced shadow->active update for `mask` on the next trigger.
    fn force_shadow_transfer(&mut self, mask: ChannelMask);
    /// Disarm the forced update, back to normal reload on period end.
    fn release_shadow_transfer(&mut self, mask: ChannelMask);
    fn trigger_transfer(&mut self);

    /// Add `channel` to the set updated together with the timer.
    fn attach_channel(&mut self, channel: u8);
}

pub trait DeadtimeBank {
    /// `None` if top and bottom have no common deadtime channel.
    fn bind(&mut self, top: u8, bottom: u8) -> Option<DtmSlot>;

    /// Frequency currently selected by the unit behind `slot`.
    fn clock_frequency(&self, slot: DtmSlot) -> HertzU32;
    /// Frequency `clock` runs at, whether selected or not.
    fn source_frequency(&self, clock: DtmClock) -> HertzU32;
    fn set_clock_source(&mut self, slot: DtmSlot, clock: DtmClock);
    fn set_deadtime_ticks(&mut self, slot: DtmSlot, rising: u32, falling: u32);
    fn enable_path(&mut self, slot: DtmSlot, output: DtmOutput);
}

impl<T: TimerChannel + ?Sized> TimerChannel for &mut T {
    fn period(&self) -> u32 {
        (**self).period()
    }

    fn clock_frequency(&self) -> HertzU32 {
        (**self).clock_frequency()
    }

    fn configure_pwm(&mut self, channel: u8, active: ActiveState) {
        (**self).configure_pwm(channel, active)
    }

    fn set_compare_shadow(&mut self, channel: u8, cm0: u32, cm1: u32) {
        (**self).set_compare_shadow(channel, cm0, cm1)
    }

    fn enable_outputs(&mut self, mask: ChannelMask) {
        (**self).enable_outputs(mask)
    }

    fn enable_channels(&mut self, mask: ChannelMask) {
        (**self).enable_channels(mask)
    }

    fn force_shadow_transfer(&mut self, mask: ChannelMask) {
        (**self).force_shadow_transfer(mask)
    }

    fn release_shadow_transfer(&mut self, mask: ChannelMask) {
        (**self).release_shadow_transfer(mask)
    }

    fn trigger_transfer(&mut self) {
        (**self).trigger_transfer()
    }

    fn attach_channel(&mut self, channel: u8) {
        (**self).attach_channel(channel)
    }
}

impl<D: DeadtimeBank + ?Sized> DeadtimeBank for &mut D {
    fn bind(&mut self, top: u8, bottom: u8) -> Option<DtmSlot> {
        (**self).bind(top, bottom)
    }

    fn clock_frequency(&self, slot: DtmSlot) -> HertzU32 {
        (**self).clock_frequency(slot)
    }

    fn source_frequency(&self, clock: DtmClock) -> HertzU32 {
        (**self).source_frequency(clock)
    }

    fn set_clock_source(&mut self, slot: DtmSlot, clock: DtmClock) {
        (**self).set_clock_source(slot, clock)
    }

    fn set_deadtime_ticks(&mut self, slot: DtmSlot, rising: u32, falling: u32) {
        (**self).set_deadtime_ticks(slot, rising, falling)
    }

    fn enable_path(&mut self, slot: DtmSlot, output: DtmOutput) {
        (**self).enable_path(slot, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mask() {
        let mut mask = ChannelMask::empty();
        mask.insert(0);
        mask.insert(5);
        assert_eq!(mask, ChannelMask(0b10_0001));
        assert!(mask.contains(5));
        assert!(!mask.contains(1));
        assert_eq!(ChannelMask::of(3), ChannelMask(0b1000));

        let mut it = mask.iter();
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next(), Some(5));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_channel_mask_ignores_out_of_range() {
        let mut mask = ChannelMask::of(15);
        mask.insert(16);
        mask.insert(200);
        assert_eq!(mask, ChannelMask(1 << 15));
        assert!(!mask.contains(16));
        assert_eq!(ChannelMask::of(16), ChannelMask::empty());
        assert_eq!(mask.iter().collect::<std::vec::Vec<_>>(), [15]);
    }
}
