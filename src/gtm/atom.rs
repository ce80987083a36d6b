//! ATOM instance: channel registers, AGC and the timer built on them.

use fugit_timer::HertzU32;
use vcell::VolatileCell;

use crate::config::ATOM_CHANNELS;
use crate::hw::{ChannelMask, TimerChannel};
use crate::pwm::ActiveState;
use crate::{Error, Result};

const CTRL_MODE_SOMP: u32 = 0b10;
const CTRL_SL: u32 = 1 << 11;
const CTRL_CLK_SRC_SHIFT: u32 = 12;
const CTRL_RST_CCU0: u32 = 1 << 20;
const CTRL_TRIGOUT: u32 = 1 << 24;

const GLB_CTRL_HOST_TRIG: u32 = 1;
const GLB_CTRL_UPEN_SHIFT: u32 = 16;

#[repr(C)]
pub struct AgcRegisters {
    pub glb_ctrl: VolatileCell<u32>,
    pub endis_ctrl: VolatileCell<u32>,
    pub endis_stat: VolatileCell<u32>,
    pub act_tb: VolatileCell<u32>,
    pub outen_ctrl: VolatileCell<u32>,
    pub outen_stat: VolatileCell<u32>,
    pub fupd_ctrl: VolatileCell<u32>,
    pub int_trig: VolatileCell<u32>,
}

/// 0x80 byte channel window. The AGC block sits inside the window of
/// channel 0, the same offset is reserved for all other channels.
#[repr(C)]
pub struct AtomChannelRegisters {
    pub rdaddr: VolatileCell<u32>,
    pub ctrl: VolatileCell<u32>,
    pub sr0: VolatileCell<u32>,
    pub sr1: VolatileCell<u32>,
    pub cm0: VolatileCell<u32>,
    pub cm1: VolatileCell<u32>,
    pub cn0: VolatileCell<u32>,
    pub stat: VolatileCell<u32>,
    pub irq_notify: VolatileCell<u32>,
    pub irq_en: VolatileCell<u32>,
    pub irq_forcint: VolatileCell<u32>,
    pub irq_mode: VolatileCell<u32>,
    _reserved0: [u32; 4],
    agc: AgcRegisters,
    _reserved1: [u32; 8],
}

#[repr(C)]
pub struct AtomRegisters {
    pub ch: [AtomChannelRegisters; ATOM_CHANNELS],
}

impl AgcRegisters {
    const fn new() -> Self {
        Self {
            glb_ctrl: VolatileCell::new(0),
            endis_ctrl: VolatileCell::new(0),
            endis_stat: VolatileCell::new(0),
            act_tb: VolatileCell::new(0),
            outen_ctrl: VolatileCell::new(0),
            outen_stat: VolatileCell::new(0),
            fupd_ctrl: VolatileCell::new(0),
            int_trig: VolatileCell::new(0),
        }
    }
}

impl AtomChannelRegisters {
    const fn new() -> Self {
        Self {
            rdaddr: VolatileCell::new(0),
            ctrl: VolatileCell::new(0),
            sr0: VolatileCell::new(0),
            sr1: VolatileCell::new(0),
            cm0: VolatileCell::new(0),
            cm1: VolatileCell::new(0),
            cn0: VolatileCell::new(0),
            stat: VolatileCell::new(0),
            irq_notify: VolatileCell::new(0),
            irq_en: VolatileCell::new(0),
            irq_forcint: VolatileCell::new(0),
            irq_mode: VolatileCell::new(0),
            _reserved0: [0; 4],
            agc: AgcRegisters::new(),
            _reserved1: [0; 8],
        }
    }
}

impl AtomRegisters {
    /// Reset-state block in RAM, for simulation.
    pub const fn new() -> Self {
        Self {
            ch: [
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
                AtomChannelRegisters::new(),
            ],
        }
    }

    /// # Safety
    /// `addr` must be the base of an ATOM instance, and the returned
    /// reference the only one in use.
    pub unsafe fn from_addr(addr: usize) -> &'static Self {
        &*(addr as *const Self)
    }

    pub fn agc(&self) -> &AgcRegisters {
        &self.ch[0].agc
    }
}

impl Default for AtomRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// 2 bit per channel control fields: 0b10 enable, 0b01 disable, else keep.
pub(crate) fn agc_bits(enable: ChannelMask, disable: ChannelMask) -> u32 {
    (0..ATOM_CHANNELS as u8).fold(0, |acc, ch| {
        let shift = 2 * ch as u32;
        if enable.contains(ch) {
            acc | 0b10 << shift
        } else if disable.contains(ch) {
            acc | 0b01 << shift
        } else {
            acc
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CmuClock {
    Clk0 = 0,
    Clk1,
    Clk2,
    Clk3,
    Clk4,
    Clk5,
    Clk6,
    Clk7,
}

/// Free running period generator on one ATOM channel (CM0 = period).
/// The other channels of the instance are reset by its trigger.
pub struct AtomTimer<'a> {
    regs: &'a AtomRegisters,
    timer_channel: u8,
    clock_source: CmuClock,
    clock: HertzU32,
    period: u32,
    attached: ChannelMask,
}

impl<'a> AtomTimer<'a> {
    pub fn new(
        regs: &'a AtomRegisters,
        timer_channel: u8,
        clock_source: CmuClock,
        clock: HertzU32,
        period: u32,
    ) -> Result<Self> {
        let ch = regs
            .ch
            .get(timer_channel as usize)
            .ok_or(Error::InvalidChannel(timer_channel))?;
        ch.ctrl.set(
            CTRL_MODE_SOMP
                | CTRL_SL
                | (clock_source as u32) << CTRL_CLK_SRC_SHIFT
                | CTRL_TRIGOUT,
        );
        ch.sr0.set(period);
        ch.sr1.set(0);
        ch.cm0.set(period);
        ch.cm1.set(0);

        Ok(Self {
            regs,
            timer_channel,
            clock_source,
            clock,
            period,
            attached: ChannelMask::of(timer_channel),
        })
    }

    pub fn timer_channel(&self) -> u8 {
        self.timer_channel
    }

    /// Channels updated together with the timer
    pub fn attached(&self) -> ChannelMask {
        self.attached
    }

    /// New period, latched with the next [`apply_update`](Self::apply_update).
    /// Compare values written for the old period are not rescaled.
    pub fn set_period(&mut self, period: u32) {
        self.period = period;
        self.regs.ch[self.timer_channel as usize].sr0.set(period);
    }

    /// Shadow to active transfer of the timer and every attached channel.
    pub fn apply_update(&mut self) {
        let agc = self.regs.agc();
        agc.glb_ctrl
            .set(agc_bits(self.attached, ChannelMask::empty()) << GLB_CTRL_UPEN_SHIFT);
        agc.glb_ctrl.set(GLB_CTRL_HOST_TRIG);
    }
}

impl TimerChannel for AtomTimer<'_> {
    fn period(&self) -> u32 {
        self.period
    }

    fn clock_frequency(&self) -> HertzU32 {
        self.clock
    }

    fn configure_pwm(&mut self, channel: u8, active: ActiveState) {
        let sl = match active {
            ActiveState::High => CTRL_SL,
            ActiveState::Low => 0,
        };
        // channels past the instance are never bound by the CDTM
        if let Some(ch) = self.regs.ch.get(channel as usize) {
            ch.ctrl.set(
                CTRL_MODE_SOMP
                    | sl
                    | (self.clock_source as u32) << CTRL_CLK_SRC_SHIFT
                    | CTRL_RST_CCU0,
            );
        }
    }

    fn set_compare_shadow(&mut self, channel: u8, cm0: u32, cm1: u32) {
        if let Some(ch) = self.regs.ch.get(channel as usize) {
            ch.sr0.set(cm0);
            ch.sr1.set(cm1);
        }
    }

    fn enable_outputs(&mut self, mask: ChannelMask) {
        self.regs
            .agc()
            .outen_ctrl
            .set(agc_bits(mask, ChannelMask::empty()));
    }

    fn enable_channels(&mut self, mask: ChannelMask) {
        self.regs
            .agc()
            .endis_ctrl
            .set(agc_bits(mask, ChannelMask::empty()));
    }

    fn force_shadow_transfer(&mut self, mask: ChannelMask) {
        self.regs
            .agc()
            .fupd_ctrl
            .set(agc_bits(mask, ChannelMask::empty()));
    }

    fn release_shadow_transfer(&mut self, mask: ChannelMask) {
        self.regs
            .agc()
            .fupd_ctrl
            .set(agc_bits(ChannelMask::empty(), mask));
    }

    fn trigger_transfer(&mut self) {
        self.regs.agc().glb_ctrl.set(GLB_CTRL_HOST_TRIG);
    }

    fn attach_channel(&mut self, channel: u8) {
        self.attached.insert(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLK: HertzU32 = HertzU32::from_raw(100_000_000);

    #[test]
    fn test_layout() {
        assert_eq!(core::mem::size_of::<AtomChannelRegisters>(), 0x80);
        assert_eq!(core::mem::size_of::<AtomRegisters>(), 0x400);

        let regs = AtomRegisters::new();
        let base = &regs as *const _ as usize;
        assert_eq!(regs.agc().glb_ctrl.as_ptr() as usize - base, 0x40);
        assert_eq!(regs.agc().fupd_ctrl.as_ptr() as usize - base, 0x58);
        assert_eq!(regs.ch[1].sr0.as_ptr() as usize - base, 0x88);
    }

    #[test]
    fn test_agc_bits() {
        assert_eq!(agc_bits(ChannelMask(0b101), ChannelMask::empty()), 0b10_00_10);
        assert_eq!(agc_bits(ChannelMask::empty(), ChannelMask(0b10)), 0b01_00);
        assert_eq!(agc_bits(ChannelMask(1 << 7), ChannelMask::empty()), 0b10 << 14);
    }

    #[test]
    fn test_timer_channel_setup() {
        let regs = AtomRegisters::new();
        let timer = AtomTimer::new(&regs, 3, CmuClock::Clk1, CLK, 5000).unwrap();

        assert_eq!(regs.ch[3].cm0.get(), 5000);
        assert_eq!(regs.ch[3].ctrl.get(), 0b10 | 1 << 11 | 1 << 12 | 1 << 24);
        assert_eq!(timer.attached(), ChannelMask::of(3));
        assert_eq!(timer.period(), 5000);
    }

    #[test]
    fn test_timer_channel_out_of_range() {
        let regs = AtomRegisters::new();
        assert_eq!(
            AtomTimer::new(&regs, 8, CmuClock::Clk0, CLK, 5000).err(),
            Some(Error::InvalidChannel(8))
        );

        let mut timer = AtomTimer::new(&regs, 0, CmuClock::Clk0, CLK, 5000).unwrap();
        timer.configure_pwm(8, ActiveState::High);
        timer.set_compare_shadow(12, 1, 2);
        assert!(regs.ch[1..].iter().all(|ch| ch.ctrl.get() == 0 && ch.sr0.get() == 0));
    }

    #[test]
    fn test_pwm_channel_ctrl() {
        let regs = AtomRegisters::new();
        let mut timer = AtomTimer::new(&regs, 0, CmuClock::Clk0, CLK, 5000).unwrap();

        timer.configure_pwm(2, ActiveState::Low);
        assert_eq!(regs.ch[2].ctrl.get(), 0b10 | 1 << 20);
        timer.configure_pwm(4, ActiveState::High);
        assert_eq!(regs.ch[4].ctrl.get(), 0b10 | 1 << 11 | 1 << 20);
    }

    #[test]
    fn test_period_update() {
        let regs = AtomRegisters::new();
        let mut timer = AtomTimer::new(&regs, 0, CmuClock::Clk0, CLK, 5000).unwrap();
        timer.attach_channel(1);

        timer.set_period(4000);
        assert_eq!(regs.ch[0].sr0.get(), 4000);
        assert_eq!(regs.ch[0].cm0.get(), 5000);

        timer.apply_update();
        assert_eq!(regs.agc().glb_ctrl.get(), 1);
        assert_eq!(timer.attached(), ChannelMask(0b11));
    }
}
