use fugit_timer::HertzU32;
use heapless::Vec;

use super::mode::{self, ModeEntry};
use super::pwm_calc::{Compare, Limits};
use super::{ActiveState, Mode, PwmHlConfig, PwmHlInterface};
use crate::config::{MAX_CHANNELS, MAX_DEADTIME_TICKS};
use crate::hw::{ChannelMask, DeadtimeBank, DtmOutput, DtmSlot, TimerChannel};
use crate::support::{s_to_tick, tick_to_s};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct BoundPair {
    top: u8,
    bottom: u8,
    dtm: DtmSlot,
}

/// Complementary PWM on timer channels routed through deadtime units.
///
/// The driver owns the mode/deadtime/clamp state and writes shadow compare
/// values only. Single writer: calls must be serialized by the caller.
pub struct DtmPwmHl<T, D> {
    timer: T,
    dtm: D,
    mode: Mode,
    entry: &'static ModeEntry,
    inverted: bool,
    ccx_active_state: ActiveState,
    coutx_active_state: ActiveState,
    /// DTM clock ticks
    deadtime: u32,
    /// Timer clock ticks, deadtime included
    min_pulse: u32,
    max_pulse: u32,
    /// Assumed identical for every DTM, taken from channel 0
    dtm_clock: HertzU32,
    channels: Vec<BoundPair, MAX_CHANNELS>,
}

impl<T, D> DtmPwmHl<T, D>
where
    T: TimerChannel,
    D: DeadtimeBank,
{
    /// Configures every pair, applies deadtime and minimum pulse, and
    /// latches an all-off state into the active compare registers.
    ///
    /// Channel indices, channel count, deadtime bindings, deadtime and
    /// minimum pulse are all checked before any register is touched. On
    /// error the peripherals are dropped unconfigured.
    pub fn init(mut timer: T, mut dtm: D, config: &PwmHlConfig) -> Result<Self> {
        let count = config.pairs.len();
        if count == 0 || count > MAX_CHANNELS {
            log_error!("pwm-hl: {} channels requested, 1..={} supported", count, MAX_CHANNELS);
            return Err(Error::ChannelCount(count));
        }

        let mut channels = Vec::new();
        for (i, pair) in config.pairs.iter().enumerate() {
            if let Some(&ch) = [pair.top, pair.bottom]
                .iter()
                .find(|&&ch| ch >= ChannelMask::CAPACITY)
            {
                log_error!("pwm-hl: pair {} uses timer channel {}", i, ch);
                return Err(Error::InvalidChannel(ch));
            }

            let slot = match dtm.bind(pair.top, pair.bottom) {
                Some(slot) => slot,
                None => {
                    log_error!(
                        "pwm-hl: no deadtime unit for pair {} ({} / {})",
                        i,
                        pair.top,
                        pair.bottom
                    );
                    return Err(Error::DeadtimeBinding { channel: i });
                }
            };
            channels
                .push(BoundPair {
                    top: pair.top,
                    bottom: pair.bottom,
                    dtm: slot,
                })
                .map_err(|_| Error::ChannelCount(count))?;
        }

        // every DTM runs from the configured source
        let dtm_clock = dtm.source_frequency(config.deadtime_clock);
        let timer_clock = timer.clock_frequency();
        let period = timer.period();

        let deadtime = deadtime_to_ticks(dtm_clock, config.deadtime)?;
        let min_pulse = min_pulse_to_ticks(
            period,
            timer_clock,
            config.min_pulse,
            deadtime_in_timer_ticks(dtm_clock, timer_clock, deadtime),
        )?;

        let mut mask = ChannelMask::empty();
        for ch in channels.iter() {
            mask.insert(ch.top);

            timer.configure_pwm(ch.top, config.ccx_active_state);

            dtm.set_clock_source(ch.dtm, config.deadtime_clock);
            dtm.enable_path(ch.dtm, DtmOutput::Output0);
            dtm.enable_path(ch.dtm, DtmOutput::Output1);
        }

        let mut driver = Self {
            timer,
            dtm,
            mode: Mode::Off,
            entry: mode::off(),
            inverted: false,
            ccx_active_state: config.ccx_active_state,
            coutx_active_state: config.coutx_active_state,
            deadtime: 0,
            min_pulse,
            max_pulse: period - min_pulse,
            dtm_clock,
            channels,
        };
        driver.commit_deadtime(deadtime);

        driver.timer.enable_outputs(mask);
        driver.timer.enable_channels(mask);

        let off = driver.limits().off();
        driver.write_compare(|_| Some(off));

        driver.timer.force_shadow_transfer(mask);
        driver.timer.trigger_transfer();
        driver.timer.release_shadow_transfer(mask);

        for ch in driver.channels.iter() {
            driver.timer.attach_channel(ch.top);
        }

        log_debug!(
            "pwm-hl: {} channels, period {} ticks, deadtime {} ticks, pulse {}..{}",
            count,
            period,
            driver.deadtime,
            driver.min_pulse,
            driver.max_pulse
        );

        Ok(driver)
    }

    /// Pairs in configuration order
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.channels.iter().map(|ch| (ch.top, ch.bottom))
    }

    pub fn ccx_active_state(&self) -> ActiveState {
        self.ccx_active_state
    }

    pub fn coutx_active_state(&self) -> ActiveState {
        self.coutx_active_state
    }

    /// Timer ticks, deadtime included
    pub fn min_pulse_ticks(&self) -> u32 {
        self.min_pulse
    }

    pub fn max_pulse_ticks(&self) -> u32 {
        self.max_pulse
    }

    pub fn deadtime_clock(&self) -> HertzU32 {
        self.dtm_clock
    }

    pub fn release(self) -> (T, D) {
        (self.timer, self.dtm)
    }

    fn limits(&self) -> Limits {
        Limits {
            period: self.timer.period(),
            min_pulse: self.min_pulse,
            max_pulse: self.max_pulse,
            inverted: self.inverted,
        }
    }

    fn write_compare(&mut self, mut f: impl FnMut(usize) -> Option<Compare>) {
        for (i, ch) in self.channels.iter().enumerate() {
            if let Some(c) = f(i) {
                self.timer.set_compare_shadow(ch.top, c.cm0, c.cm1);
            }
        }
    }

    fn commit_deadtime(&mut self, ticks: u32) {
        self.deadtime = ticks;
        for ch in self.channels.iter() {
            self.dtm.set_deadtime_ticks(ch.dtm, ticks, ticks);
        }
    }
}

fn deadtime_to_ticks(dtm_clock: HertzU32, deadtime: f32) -> Result<u32> {
    let ticks = s_to_tick(dtm_clock, deadtime);
    if ticks > MAX_DEADTIME_TICKS {
        log_warn!("pwm-hl: deadtime {} ticks rejected", ticks);
        return Err(Error::DeadtimeOutOfRange(ticks));
    }
    Ok(ticks)
}

fn deadtime_in_timer_ticks(dtm_clock: HertzU32, timer_clock: HertzU32, deadtime: u32) -> u32 {
    if dtm_clock == timer_clock {
        deadtime
    } else if deadtime == 0 {
        0
    } else {
        // truncates, may lose up to one timer tick
        s_to_tick(timer_clock, tick_to_s(dtm_clock, deadtime))
    }
}

/// Timer ticks, deadtime included. At most half the period.
fn min_pulse_to_ticks(period: u32, timer_clock: HertzU32, min_pulse: f32, deadtime: u32) -> Result<u32> {
    let ticks = s_to_tick(timer_clock, min_pulse).saturating_add(deadtime);
    if ticks > period / 2 {
        log_warn!("pwm-hl: min pulse {} ticks rejected, period {}", ticks, period);
        return Err(Error::MinPulseOutOfRange(ticks));
    }
    Ok(ticks)
}

impl<T, D> PwmHlInterface for DtmPwmHl<T, D>
where
    T: TimerChannel,
    D: DeadtimeBank,
{
    type Timer = T;

    fn set_deadtime(&mut self, deadtime: f32) -> Result<()> {
        let ticks = deadtime_to_ticks(self.dtm_clock, deadtime)?;
        self.commit_deadtime(ticks);
        Ok(())
    }

    fn deadtime(&self) -> f32 {
        tick_to_s(self.dtm_clock, self.deadtime)
    }

    fn deadtime_ticks(&self) -> u32 {
        self.deadtime
    }

    fn set_min_pulse(&mut self, min_pulse: f32) -> Result<()> {
        let period = self.timer.period();
        let timer_clock = self.timer.clock_frequency();
        let deadtime = deadtime_in_timer_ticks(self.dtm_clock, timer_clock, self.deadtime);
        let ticks = min_pulse_to_ticks(period, timer_clock, min_pulse, deadtime)?;

        self.min_pulse = ticks;
        self.max_pulse = period - ticks;

        Ok(())
    }

    fn min_pulse(&self) -> f32 {
        tick_to_s(
            self.timer.clock_frequency(),
            self.min_pulse.saturating_sub(deadtime_in_timer_ticks(
                self.dtm_clock,
                self.timer.clock_frequency(),
                self.deadtime,
            )),
        )
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn inverted(&self) -> bool {
        self.inverted
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if self.mode == mode {
            return Ok(());
        }

        let (entry, result) = match mode::lookup(mode) {
            Some(entry) => (entry, Ok(())),
            None => {
                log_warn!("pwm-hl: mode {:?} has no update strategy, forcing off", mode);
                (mode::off(), Err(Error::InvalidMode(mode)))
            }
        };

        self.mode = entry.mode;
        self.entry = entry;

        // off keeps the previous polarity
        if entry.mode != Mode::Off {
            self.inverted = entry.inverted;
        }

        result
    }

    fn set_on_time(&mut self, t_on: &[u32]) {
        let limits = self.limits();
        let update = self.entry.update;

        self.write_compare(|i| update.compute(&limits, t_on.get(i).copied()));
    }

    fn set_on_time_and_shift(&mut self, t_on: &[u32], shift: &[i32]) {
        let limits = self.limits();
        let update = self.entry.update_and_shift;

        self.write_compare(|i| {
            let input = t_on.get(i).copied().zip(shift.get(i).copied());
            update.compute(&limits, input)
        });
    }

    fn set_pulse(&mut self, t_on: &[f32], offset: &[f32]) {
        let limits = self.limits();
        let update = self.entry.update_pulse;
        let clock = self.timer.clock_frequency();

        self.write_compare(|i| {
            let input = t_on
                .get(i)
                .zip(offset.get(i))
                .map(|(&x, &o)| (s_to_tick(clock, x), s_to_tick(clock, o)));
            update.compute(&limits, input)
        });
    }

    fn timer(&self) -> &T {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
