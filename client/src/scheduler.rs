//! Periodic dead-reckoning of every connected simulator.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::session::SimulatorRegistry;

/// Drives [`Simulator::interpolate`](crate::Simulator::interpolate) on a
/// fixed cadence until shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationScheduler {
    interval: Duration,
    min_delay: Duration,
}

impl InterpolationScheduler {
    #[must_use]
    pub const fn new(interval: Duration, min_delay: Duration) -> Self {
        Self {
            interval,
            min_delay,
        }
    }

    /// Delay before the next tick given how long the last tick's work took.
    #[must_use]
    pub fn next_delay(&self, work: Duration) -> Duration {
        self.interval.saturating_sub(work).max(self.min_delay)
    }

    /// Spawns the loop. It exits when `shutdown` turns `true` or its sender
    /// is dropped.
    pub fn spawn(
        self,
        simulators: SimulatorRegistry,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut last_tick = Instant::now();
            let mut delay = self.interval;
            loop {
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                        continue;
                    }
                }

                let start = Instant::now();
                let elapsed = start - last_tick;
                last_tick = start;

                let mut moved = 0;
                for simulator in simulators.connected() {
                    moved += simulator.interpolate(elapsed);
                }
                trace!(moved, elapsed_ms = elapsed.as_millis() as u64, "interpolation tick");

                delay = self.next_delay(start.elapsed());
            }
            debug!("interpolation stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_floors_at_minimum() {
        let scheduler =
            InterpolationScheduler::new(Duration::from_millis(250), Duration::from_millis(50));
        assert_eq!(scheduler.next_delay(Duration::ZERO), Duration::from_millis(250));
        assert_eq!(
            scheduler.next_delay(Duration::from_millis(100)),
            Duration::from_millis(150)
        );
        assert_eq!(
            scheduler.next_delay(Duration::from_millis(230)),
            Duration::from_millis(50)
        );
        assert_eq!(
            scheduler.next_delay(Duration::from_secs(2)),
            Duration::from_millis(50)
        );
    }
}
