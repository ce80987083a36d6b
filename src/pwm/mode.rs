use super::pwm_calc::{OnTime, Pulse, Shift};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    CenterAligned = 0,
    CenterAlignedInverted = 1,
    LeftAligned = 2,
    RightAligned = 3,
    Off = 4,
    /// Before the driver is initialised, cannot be selected
    Init = 5,
}

impl TryFrom<u8> for Mode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::CenterAligned),
            1 => Ok(Mode::CenterAlignedInverted),
            2 => Ok(Mode::LeftAligned),
            3 => Ok(Mode::RightAligned),
            4 => Ok(Mode::Off),
            5 => Ok(Mode::Init),
            v => Err(v),
        }
    }
}

pub(crate) struct ModeEntry {
    pub mode: Mode,
    pub inverted: bool,
    pub update: OnTime,
    pub update_and_shift: Shift,
    pub update_pulse: Pulse,
}

static MODES: [ModeEntry; 5] = [
    ModeEntry {
        mode: Mode::CenterAligned,
        inverted: false,
        update: OnTime::CenterAligned,
        update_and_shift: Shift::CenterAligned,
        update_pulse: Pulse::Pulse,
    },
    ModeEntry {
        mode: Mode::CenterAlignedInverted,
        inverted: true,
        update: OnTime::CenterAligned,
        update_and_shift: Shift::CenterAligned,
        update_pulse: Pulse::Pulse,
    },
    ModeEntry {
        mode: Mode::LeftAligned,
        inverted: false,
        update: OnTime::LeftAligned,
        update_and_shift: Shift::Off,
        update_pulse: Pulse::Pulse,
    },
    ModeEntry {
        mode: Mode::RightAligned,
        inverted: true,
        update: OnTime::RightAligned,
        update_and_shift: Shift::Off,
        update_pulse: Pulse::Pulse,
    },
    ModeEntry {
        mode: Mode::Off,
        inverted: false,
        update: OnTime::Off,
        update_and_shift: Shift::Off,
        update_pulse: Pulse::Off,
    },
];

/// `None` for modes without update strategies.
pub(crate) fn lookup(mode: Mode) -> Option<&'static ModeEntry> {
    MODES.get(mode as usize).filter(|e| e.mode == mode)
}

pub(crate) fn off() -> &'static ModeEntry {
    &MODES[Mode::Off as usize]
}
