/// Channel pairs one driver can own. A DTM serves 4 channels.
pub const MAX_CHANNELS: usize = 4;

/// RELRISE/RELFALL are 10 bit wide.
pub const MAX_DEADTIME_TICKS: u32 = (1 << 10) - 1;

//-----------------------------------------------------------------------------

pub const ATOM_CHANNELS: usize = 8;

pub const DTM_CHANNELS: usize = 4;
pub const CDTM_DTM_COUNT: usize = 6;

/// DTM0..DTM3 belong to the TOM, DTM4/DTM5 to the ATOM.
pub const ATOM_DTM_BASE: usize = 4;
