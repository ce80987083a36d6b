use fugit_timer::HertzU32;

/// Seconds to clock ticks. Truncates, negative and NaN inputs give 0.
pub fn s_to_tick(clock: HertzU32, seconds: f32) -> u32 {
    let ticks = libm::floorf(seconds * clock.to_Hz() as f32);
    if ticks > 0.0 {
        ticks as u32
    } else {
        0
    }
}

pub fn tick_to_s(clock: HertzU32, ticks: u32) -> f32 {
    match clock.to_Hz() {
        0 => 0.0,
        hz => ticks as f32 / hz as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLK: HertzU32 = HertzU32::from_raw(1 << 20);

    #[test]
    fn test_s_to_tick_truncates() {
        assert_eq!(s_to_tick(CLK, 20.0 / (1 << 20) as f32), 20);
        assert_eq!(s_to_tick(CLK, 20.75 / (1 << 20) as f32), 20);
    }

    #[test]
    fn test_s_to_tick_negative() {
        assert_eq!(s_to_tick(CLK, -1.0), 0);
        assert_eq!(s_to_tick(CLK, f32::NAN), 0);
    }

    #[test]
    fn test_tick_to_s() {
        assert_eq!(tick_to_s(CLK, 1 << 19), 0.5);
        assert_eq!(tick_to_s(HertzU32::from_raw(0), 100), 0.0);
    }
}
