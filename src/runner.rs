//! Host-side pacing.
//!
//! The engine in [`Machine`](crate::machine::Machine) never blocks and never
//! sleeps, so whoever hosts it needs something that calls into it on a
//! schedule. [`run`] moves a machine onto a [`TimedWorker`] and drives the
//! whole loop from there: key events in, instruction steps, frames out,
//! timer ticks and the buzzer.

use std::{
    sync::{
        mpsc::{self, RecvTimeoutError, SyncSender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crate::{
    definitions::{cpu, timer},
    devices::{Buzzer, FrameSink, KeyEvent, KeySource},
    machine::Machine,
};

/// A periodic callback driver.
///
/// Implementations own whatever runs the callback (a thread here, a
/// `setInterval` handle on wasm hosts) and guarantee the callback is no
/// longer invoked once [`stop`](TimedWorker::stop) returns.
pub trait TimedWorker {
    fn new() -> Self;

    /// Runs the callback roughly every `interval` until stopped.
    fn start<T>(&mut self, callback: T, interval: Duration)
    where
        T: FnMut() + Send + 'static;

    fn stop(&mut self);

    fn is_alive(&self) -> bool;
}

/// A [`TimedWorker`] backed by a plain thread.
///
/// The thread waits on a shutdown channel with a timeout, so a stop
/// request and the next scheduled callback race cleanly instead of the
/// thread sleeping through the shutdown.
pub struct Worker {
    thread: Option<JoinHandle<()>>,
    shutdown: Option<SyncSender<()>>,
    /// One clone lives on the worker thread, so a strong count above one
    /// means the thread is still running.
    alive: Arc<()>,
}

impl TimedWorker for Worker {
    fn new() -> Self {
        Self {
            thread: None,
            shutdown: None,
            alive: Arc::new(()),
        }
    }

    fn start<T>(&mut self, mut callback: T, interval: Duration)
    where
        T: FnMut() + Send + 'static,
    {
        let (send, recv) = mpsc::sync_channel::<()>(1);
        let alive = Arc::clone(&self.alive);
        let thread = thread::spawn(move || {
            let _alive = alive;
            let mut timeout = interval;
            loop {
                match recv.recv_timeout(timeout) {
                    Err(RecvTimeoutError::Timeout) => {
                        let begin = Instant::now();
                        callback();
                        // The next wait shrinks by however long the
                        // callback ran, keeping the average rate.
                        timeout = interval.saturating_sub(begin.elapsed());
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        self.thread = Some(thread);
        self.shutdown = Some(send);
    }

    fn stop(&mut self) {
        // Either the message or the closing channel ends the loop,
        // whichever the thread observes first.
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("the worker thread panicked before shutdown");
            }
        }
    }

    fn is_alive(&self) -> bool {
        Arc::strong_count(&self.alive) > 1
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tracks when a fixed-rate task is due inside a faster loop.
struct Cadence {
    interval: Duration,
    last: Instant,
}

impl Cadence {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    /// Advances by whole intervals, so a stalled caller catches up
    /// instead of losing ticks.
    fn due(&mut self) -> bool {
        if self.last.elapsed() >= self.interval {
            self.last += self.interval;
            true
        } else {
            false
        }
    }
}

/// Wires a machine to its host devices and drives it from a worker.
///
/// The machine moves onto the worker, every engine call happens there:
/// pending key events are drained first, then one instruction executes,
/// the frame is presented whenever the display changed, and the timers
/// tick on their own 60 Hz cadence with the buzzer following the sound
/// timer. A fault stops the stepping for good, with the machine state
/// dumped to the log, but the worker stays alive so keys, timers and the
/// shutdown still work.
pub fn run<W, F, K, B>(mut machine: Machine, mut frames: F, mut keys: K, mut buzzer: B) -> W
where
    W: TimedWorker,
    F: FrameSink + Send + 'static,
    K: KeySource + Send + 'static,
    B: Buzzer + Send + 'static,
{
    let mut timers = Cadence::new(Duration::from_millis(timer::INTERVAL));
    let mut halted = false;
    let mut buzzing = false;

    let tick = move || {
        while let Some(event) = keys.poll() {
            match event {
                KeyEvent::Down(key) => machine.keydown(key),
                KeyEvent::Up(key) => machine.keyup(key),
            }
        }

        if !halted {
            match machine.step() {
                Ok(true) => frames.present(machine.screen()),
                Ok(false) => {}
                Err(fault) => {
                    log::error!("halting '{}': {fault}", machine.name());
                    log::debug!("{machine}");
                    halted = true;
                }
            }
        }

        if timers.due() {
            machine.tick_timers();
        }

        let sounding = machine.sound_active();
        if sounding != buzzing {
            if sounding {
                buzzer.start();
            } else {
                buzzer.stop();
            }
            buzzing = sounding;
        }
    };

    let mut worker = W::new();
    worker.start(tick, Duration::from_millis(cpu::INTERVAL));
    worker
}
