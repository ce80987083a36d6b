//! GTM register level backend for the PWM driver: an ATOM instance as the
//! timer and the CDTM attached to it as the deadtime bank.
//!
//! Register blocks are plain `#[repr(C)]` structs of volatile cells. On
//! target they are placed over the peripheral with `from_addr`, for
//! simulation they can live in RAM (`new`).

mod atom;
mod cdtm;

pub use atom::{AgcRegisters, AtomChannelRegisters, AtomRegisters, AtomTimer, CmuClock};
pub use cdtm::{Cdtm, CdtmRegisters, DtmClocks, DtmRegisters};
