//! Compare value computation for each alignment strategy.
//!
//! All functions are pure: they take a snapshot of the period/clamp state and
//! a requested on-time in timer ticks and return the pair written to the
//! shadow compare registers (SR0, SR1). A compare value of `period + 1` is
//! never reached by the counter and thus produces no compare event.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compare {
    pub cm0: u32,
    pub cm1: u32,
}

impl Compare {
    pub const fn new(cm0: u32, cm1: u32) -> Self {
        Self { cm0, cm1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub period: u32,
    pub min_pulse: u32,
    pub max_pulse: u32,
    pub inverted: bool,
}

impl Limits {
    /// Inverts if needed, then clamps: below `min_pulse` is off, above
    /// `max_pulse` is fully on. Keeps the deadtime gap between the edges of
    /// the complementary outputs.
    pub fn on_ticks(&self, x: u32) -> u32 {
        let x = if self.inverted {
            self.period.saturating_sub(x)
        } else {
            x
        };

        if x < self.min_pulse {
            0
        } else if x > self.max_pulse {
            self.period
        } else {
            x
        }
    }

    /// Output held inactive for the whole period
    pub fn off(&self) -> Compare {
        Compare::new(self.period + 1, self.period + 1)
    }
}

/// Immediate on-time update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnTime {
    CenterAligned,
    LeftAligned,
    RightAligned,
    Off,
}

/// On-time update with a phase shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    CenterAligned,
    Off,
}

/// On-time and start offset update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    Pulse,
    Off,
}

impl OnTime {
    /// `None` input leaves the channel untouched, except in `Off`.
    pub fn compute(self, limits: &Limits, t_on: Option<u32>) -> Option<Compare> {
        match self {
            OnTime::CenterAligned => t_on.map(|x| center_aligned(limits, x)),
            OnTime::LeftAligned => t_on.map(|x| left_aligned(limits, x)),
            OnTime::RightAligned => t_on.map(|x| right_aligned(limits, x)),
            OnTime::Off => Some(limits.off()),
        }
    }
}

impl Shift {
    pub fn compute(self, limits: &Limits, input: Option<(u32, i32)>) -> Option<Compare> {
        match self {
            Shift::CenterAligned => input.map(|(x, s)| shifted_center_aligned(limits, x, s)),
            Shift::Off => Some(limits.off()),
        }
    }
}

impl Pulse {
    pub fn compute(self, limits: &Limits, input: Option<(u32, u32)>) -> Option<Compare> {
        match self {
            Pulse::Pulse => input.map(|(x, o)| pulse(limits, x, o)),
            Pulse::Off => Some(limits.off()),
        }
    }
}

//-----------------------------------------------------------------------------

pub fn center_aligned(limits: &Limits, t_on: u32) -> Compare {
    let period = limits.period;
    let x = limits.on_ticks(t_on);

    if x == 0 {
        limits.off()
    } else {
        Compare::new((period - x) / 2, (period + x) / 2)
    }
}

// Boundaries get dedicated pairs, the GTM misfires on a regular pair there.
fn edge_boundary(limits: &Limits, x: u32) -> Option<Compare> {
    let period = limits.period;
    if x == period {
        Some(Compare::new(0, period + 1))
    } else if x == 0 {
        Some(Compare::new(period + 1, 0))
    } else {
        None
    }
}

pub fn left_aligned(limits: &Limits, t_on: u32) -> Compare {
    let x = limits.on_ticks(t_on);
    edge_boundary(limits, x).unwrap_or(Compare::new(0, x))
}

pub fn right_aligned(limits: &Limits, t_on: u32) -> Compare {
    let x = limits.on_ticks(t_on);
    edge_boundary(limits, x).unwrap_or(Compare::new(x, 0))
}

pub fn shifted_center_aligned(limits: &Limits, t_on: u32, shift: i32) -> Compare {
    let period = limits.period;
    let x = limits.on_ticks(t_on);

    if x == period {
        // first compare event lands one tick late on the GTM
        Compare::new(period + 1, 2)
    } else if x == 0 {
        Compare::new(1, period + 2)
    } else {
        let half_gap = (period as i64 - x as i64) / 2;
        let s = shift as i64;
        // window must not cross 0 or period
        let s = if s > 0 {
            s.min(half_gap - 1)
        } else {
            s.max(1 - half_gap)
        };

        let falling = s + (period as i64 + x as i64) / 2;
        let rising = s + half_gap;
        Compare::new(falling.max(0) as u32, rising.max(0) as u32)
    }
}

pub fn pulse(limits: &Limits, t_on: u32, offset: u32) -> Compare {
    let period = limits.period;
    let x = if limits.inverted {
        period.saturating_sub(t_on)
    } else {
        t_on
    };

    let x = if x < limits.min_pulse || offset > period {
        0
    } else if x > limits.max_pulse || offset.saturating_add(x) > period {
        period
    } else {
        x
    };

    if x == period {
        Compare::new(period + 1, 2)
    } else if x == 0 {
        Compare::new(1, period + 2)
    } else {
        // +2 instead of +1: GTM compare erratum
        Compare::new(offset + x, offset + 2)
    }
}
