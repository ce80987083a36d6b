//! Cluster deadtime module: one DTM per 4 output channels.

use fugit_timer::HertzU32;
use vcell::VolatileCell;

use crate::config::{ATOM_CHANNELS, ATOM_DTM_BASE, CDTM_DTM_COUNT, DTM_CHANNELS, MAX_DEADTIME_TICKS};
use crate::hw::{DeadtimeBank, DtmClock, DtmOutput, DtmSlot};

const CTRL_CLK_SEL_MASK: u32 = 0b11;
const DTV_RELFALL_SHIFT: u32 = 16;
const CH_CTRL2_DT0: u32 = 1 << 3;
const CH_CTRL2_DT1: u32 = 1 << 7;

#[repr(C)]
pub struct DtmRegisters {
    pub ctrl: VolatileCell<u32>,
    pub ch_ctrl1: VolatileCell<u32>,
    pub ch_ctrl2: VolatileCell<u32>,
    pub ch_ctrl2_sr: VolatileCell<u32>,
    pub ps_ctrl: VolatileCell<u32>,
    pub dtv_ch: [VolatileCell<u32>; DTM_CHANNELS],
    pub ch_sr: VolatileCell<u32>,
    pub ch_ctrl3: VolatileCell<u32>,
    _reserved: [u32; 5],
}

#[repr(C)]
pub struct CdtmRegisters {
    pub dtm: [DtmRegisters; CDTM_DTM_COUNT],
}

impl DtmRegisters {
    const fn new() -> Self {
        Self {
            ctrl: VolatileCell::new(0),
            ch_ctrl1: VolatileCell::new(0),
            ch_ctrl2: VolatileCell::new(0),
            ch_ctrl2_sr: VolatileCell::new(0),
            ps_ctrl: VolatileCell::new(0),
            dtv_ch: [
                VolatileCell::new(0),
                VolatileCell::new(0),
                VolatileCell::new(0),
                VolatileCell::new(0),
            ],
            ch_sr: VolatileCell::new(0),
            ch_ctrl3: VolatileCell::new(0),
            _reserved: [0; 5],
        }
    }

    /// Rising/falling relative values of `channel`
    pub fn deadtime(&self, channel: u8) -> (u32, u32) {
        let dtv = self.dtv_ch[channel as usize].get();
        (dtv & MAX_DEADTIME_TICKS, (dtv >> DTV_RELFALL_SHIFT) & MAX_DEADTIME_TICKS)
    }
}

impl CdtmRegisters {
    /// Reset-state block in RAM, for simulation.
    pub const fn new() -> Self {
        Self {
            dtm: [
                DtmRegisters::new(),
                DtmRegisters::new(),
                DtmRegisters::new(),
                DtmRegisters::new(),
                DtmRegisters::new(),
                DtmRegisters::new(),
            ],
        }
    }

    /// # Safety
    /// `addr` must be the base of a CDTM instance, and the returned
    /// reference the only one in use.
    pub unsafe fn from_addr(addr: usize) -> &'static Self {
        &*(addr as *const Self)
    }
}

impl Default for CdtmRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequencies behind the DTM clock selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtmClocks {
    pub system: HertzU32,
    pub cmu_clk0: HertzU32,
    pub cmu_clk1: HertzU32,
    pub cmu_clk2: HertzU32,
}

impl DtmClocks {
    /// Everything on one clock
    pub const fn uniform(clock: HertzU32) -> Self {
        Self {
            system: clock,
            cmu_clk0: clock,
            cmu_clk1: clock,
            cmu_clk2: clock,
        }
    }

    fn get(&self, clock: DtmClock) -> HertzU32 {
        match clock {
            DtmClock::SystemClock => self.system,
            DtmClock::CmuClk0 => self.cmu_clk0,
            DtmClock::CmuClk1 => self.cmu_clk1,
            DtmClock::CmuClk2 => self.cmu_clk2,
        }
    }
}

/// The DTMs of a CDTM wired to one ATOM instance.
pub struct Cdtm<'a> {
    regs: &'a CdtmRegisters,
    clocks: DtmClocks,
}

impl<'a> Cdtm<'a> {
    pub fn new(regs: &'a CdtmRegisters, clocks: DtmClocks) -> Self {
        Self { regs, clocks }
    }

    fn dtm(&self, slot: DtmSlot) -> &DtmRegisters {
        &self.regs.dtm[slot.unit as usize]
    }
}

impl DeadtimeBank for Cdtm<'_> {
    /// ATOM channel `n` runs through DTM `4 + n / 4`, channel `n % 4`.
    /// The complementary output has to come from the same DTM channel.
    fn bind(&mut self, top: u8, bottom: u8) -> Option<DtmSlot> {
        let (top, bottom) = (top as usize, bottom as usize);
        if top >= ATOM_CHANNELS || bottom >= ATOM_CHANNELS {
            return None;
        }
        if top % DTM_CHANNELS != bottom % DTM_CHANNELS {
            return None;
        }

        let unit = ATOM_DTM_BASE + top / DTM_CHANNELS;
        if unit >= CDTM_DTM_COUNT {
            return None;
        }

        Some(DtmSlot {
            unit: unit as u8,
            channel: (top % DTM_CHANNELS) as u8,
        })
    }

    fn clock_frequency(&self, slot: DtmSlot) -> HertzU32 {
        let clock = match self.dtm(slot).ctrl.get() & CTRL_CLK_SEL_MASK {
            0 => DtmClock::SystemClock,
            1 => DtmClock::CmuClk0,
            2 => DtmClock::CmuClk1,
            _ => DtmClock::CmuClk2,
        };
        self.clocks.get(clock)
    }

    fn source_frequency(&self, clock: DtmClock) -> HertzU32 {
        self.clocks.get(clock)
    }

    fn set_clock_source(&mut self, slot: DtmSlot, clock: DtmClock) {
        let ctrl = &self.dtm(slot).ctrl;
        ctrl.set((ctrl.get() & !CTRL_CLK_SEL_MASK) | clock as u32);
    }

    fn set_deadtime_ticks(&mut self, slot: DtmSlot, rising: u32, falling: u32) {
        let rising = rising.min(MAX_DEADTIME_TICKS);
        let falling = falling.min(MAX_DEADTIME_TICKS);
        self.dtm(slot).dtv_ch[slot.channel as usize].set(falling << DTV_RELFALL_SHIFT | rising);
    }

    fn enable_path(&mut self, slot: DtmSlot, output: DtmOutput) {
        let bit = match output {
            DtmOutput::Output0 => CH_CTRL2_DT0,
            DtmOutput::Output1 => CH_CTRL2_DT1,
        };
        let ch_ctrl2 = &self.dtm(slot).ch_ctrl2;
        ch_ctrl2.set(ch_ctrl2.get() | bit << (8 * slot.channel as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYS: HertzU32 = HertzU32::from_raw(100_000_000);
    const CMU0: HertzU32 = HertzU32::from_raw(50_000_000);

    fn clocks() -> DtmClocks {
        DtmClocks {
            system: SYS,
            cmu_clk0: CMU0,
            ..DtmClocks::uniform(SYS)
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(core::mem::size_of::<DtmRegisters>(), 0x40);
        let regs = CdtmRegisters::new();
        let base = &regs as *const _ as usize;
        assert_eq!(regs.dtm[4].dtv_ch[1].as_ptr() as usize - base, 4 * 0x40 + 0x18);
    }

    #[test]
    fn test_bind() {
        let regs = CdtmRegisters::new();
        let mut cdtm = Cdtm::new(&regs, clocks());

        assert_eq!(cdtm.bind(0, 0), Some(DtmSlot { unit: 4, channel: 0 }));
        assert_eq!(cdtm.bind(6, 2), Some(DtmSlot { unit: 5, channel: 2 }));
        assert_eq!(cdtm.bind(1, 2), None);
        assert_eq!(cdtm.bind(8, 0), None);
    }

    #[test]
    fn test_clock_selection() {
        let regs = CdtmRegisters::new();
        let mut cdtm = Cdtm::new(&regs, clocks());
        let slot = DtmSlot { unit: 4, channel: 1 };

        assert_eq!(cdtm.clock_frequency(slot), SYS);
        assert_eq!(cdtm.source_frequency(DtmClock::CmuClk0), CMU0);
        cdtm.set_clock_source(slot, DtmClock::CmuClk0);
        assert_eq!(regs.dtm[4].ctrl.get(), 1);
        assert_eq!(cdtm.clock_frequency(slot), CMU0);
    }

    #[test]
    fn test_deadtime_and_paths() {
        let regs = CdtmRegisters::new();
        let mut cdtm = Cdtm::new(&regs, clocks());
        let slot = DtmSlot { unit: 5, channel: 1 };

        cdtm.set_deadtime_ticks(slot, 30, 40);
        assert_eq!(regs.dtm[5].dtv_ch[1].get(), 40 << 16 | 30);
        assert_eq!(regs.dtm[5].deadtime(1), (30, 40));

        cdtm.enable_path(slot, DtmOutput::Output0);
        cdtm.enable_path(slot, DtmOutput::Output1);
        assert_eq!(regs.dtm[5].ch_ctrl2.get(), (1 << 3 | 1 << 7) << 8);
    }
}
