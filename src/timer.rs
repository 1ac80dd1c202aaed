//! The two countdown counters of the machine.

/// The delay and sound counters.
///
/// Both count down at the fixed timer rate, decoupled from the
/// instruction rate; the host advances them through
/// [`tick_timers`](crate::machine::Machine::tick_timers).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    /// Advances both counters by a single tick, each floored at zero.
    pub(crate) fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub(crate) fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub(crate) fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// True while the sound counter runs; the host keeps its tone on
    /// exactly then.
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_independently() {
        let mut timers = Timers::default();
        timers.set_delay(3);
        timers.set_sound(1);

        timers.tick();
        assert_eq!(timers.delay(), 2);
        assert_eq!(timers.sound(), 0);

        timers.tick();
        assert_eq!(timers.delay(), 1);
        assert_eq!(timers.sound(), 0);
    }

    #[test]
    fn never_ticks_below_zero() {
        let mut timers = Timers::default();
        for _ in 0..4 {
            timers.tick();
        }
        assert_eq!(timers.delay(), 0);
        assert_eq!(timers.sound(), 0);
    }

    #[test]
    fn sound_gating_follows_the_counter() {
        let mut timers = Timers::default();
        assert!(!timers.sound_active());
        timers.set_sound(2);
        assert!(timers.sound_active());
        timers.tick();
        assert!(timers.sound_active());
        timers.tick();
        assert!(!timers.sound_active());
    }
}
