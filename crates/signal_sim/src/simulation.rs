//! # Simulation Driver
//!
//! Owns every traffic light and every vehicle thread of a run.
//!
//! ## Architecture
//!
//! ```text
//!   Simulation::run
//!     ├── Vec<CyclerHandle>      one per light, stopped + joined at the end
//!     ├── vehicle-I-V threads    loop { intersection.cross(); send event }
//!     └── crossbeam channel      CrossingEvent ──> driver (until run_ms)
//! ```
//!
//! Shutdown order: stop lights (wakes waiting vehicles), join vehicles,
//! drain late events, report.

use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use signal_core::{CyclerError, CyclerHandle, Phase};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::intersection::Intersection;

/// A vehicle got through an intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossingEvent {
    /// Intersection crossed.
    pub intersection: u32,
    /// Vehicle number within that intersection.
    pub vehicle: u32,
    /// Time from arrival to crossing.
    pub waited: Duration,
}

/// Per-intersection summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntersectionReport {
    /// Intersection identifier.
    pub id: u32,
    /// Vehicles that crossed.
    pub crossings: u64,
    /// Light phase changes.
    pub toggles: u64,
    /// Light phase at the end of the run.
    pub final_phase: Phase,
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimReport {
    /// Crossing events received by the driver.
    pub crossings: u64,
    /// Per-intersection counters.
    pub intersections: Vec<IntersectionReport>,
    /// Mean wait over all crossings.
    pub avg_wait: Duration,
    /// Longest single wait.
    pub max_wait: Duration,
    /// Vehicles released by shutdown while still waiting.
    pub stopped_vehicles: u64,
    /// Wall-clock length of the run.
    pub elapsed: Duration,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Report ===")?;
        writeln!(f, "Elapsed:          {:?}", self.elapsed)?;
        writeln!(f, "Crossings:        {}", self.crossings)?;
        writeln!(f, "Average wait:     {:?}", self.avg_wait)?;
        writeln!(f, "Max wait:         {:?}", self.max_wait)?;
        writeln!(f, "Stopped vehicles: {}", self.stopped_vehicles)?;
        for i in &self.intersections {
            writeln!(
                f,
                "  intersection {:>3}: {:>4} crossings, {:>4} toggles, ends {}",
                i.id, i.crossings, i.toggles, i.final_phase
            )?;
        }
        Ok(())
    }
}

/// Running totals while events come in.
#[derive(Default)]
struct WaitTally {
    count: u64,
    total: Duration,
    max: Duration,
}

impl WaitTally {
    fn record(&mut self, event: &CrossingEvent) {
        self.count += 1;
        self.total += event.waited;
        self.max = self.max.max(event.waited);
    }

    fn average(&self) -> Duration {
        let n = u32::try_from(self.count).unwrap_or(u32::MAX);
        self.total.checked_div(n).unwrap_or(Duration::ZERO)
    }
}

/// A set of intersections and the vehicles that use them.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    intersections: Vec<Arc<Intersection>>,
}

impl Simulation {
    /// Builds all intersections. Lights stay red until [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns the config validation error or a light construction error.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let intersections = (0..config.lights)
            .map(|id| Intersection::new(id, config.cycle_for(id)).map(Arc::new))
            .collect::<SimResult<Vec<_>>>()?;

        Ok(Self {
            config,
            intersections,
        })
    }

    /// Returns the intersections.
    #[must_use]
    pub fn intersections(&self) -> &[Arc<Intersection>] {
        &self.intersections
    }

    /// Runs the simulation for `run_ms` and shuts everything down.
    ///
    /// # Errors
    ///
    /// Returns an error if a light or vehicle thread cannot be started, or a
    /// light's thread panicked. Everything already started is stopped first.
    /// Lights cycle once per lifetime, so a second `run` fails with
    /// [`CyclerError::AlreadyStarted`].
    pub fn run(&self) -> SimResult<SimReport> {
        let start = Instant::now();

        let handles = self
            .intersections
            .iter()
            .map(|i| i.start())
            .collect::<SimResult<Vec<CyclerHandle>>>()?;

        tracing::info!(
            lights = handles.len(),
            vehicles_per_light = self.config.vehicles_per_light,
            run_ms = self.config.run_ms,
            "simulation started"
        );

        let (tx, rx) = unbounded();
        let vehicles = self.spawn_vehicles(&tx)?;
        drop(tx);

        let mut tally = WaitTally::default();
        let deadline = start + self.config.run_duration();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(event) => tally.record(&event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    // No vehicles left: the lights still run to the deadline
                    thread::sleep(deadline.saturating_duration_since(Instant::now()));
                    break;
                }
            }
        }

        for handle in handles {
            handle.join()?;
        }

        let mut stopped_vehicles = 0u64;
        for vehicle in vehicles {
            match vehicle.join() {
                Ok(true) => stopped_vehicles += 1,
                Ok(false) => {}
                Err(_) => tracing::warn!("vehicle thread panicked"),
            }
        }

        for event in rx.try_iter() {
            tally.record(&event);
        }

        let report = SimReport {
            crossings: tally.count,
            intersections: self
                .intersections
                .iter()
                .map(|i| IntersectionReport {
                    id: i.id(),
                    crossings: i.crossings(),
                    toggles: i.light().stats().toggles,
                    final_phase: i.light().current_phase(),
                })
                .collect(),
            avg_wait: tally.average(),
            max_wait: tally.max,
            stopped_vehicles,
            elapsed: start.elapsed(),
        };

        tracing::info!(
            crossings = report.crossings,
            stopped_vehicles = report.stopped_vehicles,
            "simulation finished"
        );
        Ok(report)
    }

    /// Spawns `vehicles_per_light` threads per intersection.
    ///
    /// Each thread returns `true` if it was released by shutdown.
    fn spawn_vehicles(&self, tx: &Sender<CrossingEvent>) -> SimResult<Vec<JoinHandle<bool>>> {
        let spacing = self.config.vehicle_spacing();
        let mut vehicles = Vec::new();

        for intersection in &self.intersections {
            for vehicle in 0..self.config.vehicles_per_light {
                let intersection = Arc::clone(intersection);
                let tx = tx.clone();

                let handle = thread::Builder::new()
                    .name(format!("vehicle-{}-{vehicle}", intersection.id()))
                    .spawn(move || drive(&intersection, vehicle, spacing, &tx))
                    .map_err(|e| SimError::Spawn(e.to_string()))?;
                vehicles.push(handle);
            }
        }

        Ok(vehicles)
    }
}

/// Vehicle loop: cross, report, pause, repeat until the light stops.
fn drive(
    intersection: &Intersection,
    vehicle: u32,
    spacing: Duration,
    tx: &Sender<CrossingEvent>,
) -> bool {
    loop {
        match intersection.cross(vehicle) {
            Ok(waited) => {
                let event = CrossingEvent {
                    intersection: intersection.id(),
                    vehicle,
                    waited,
                };
                if tx.send(event).is_err() {
                    return false;
                }
            }
            Err(SimError::Cycler(CyclerError::Stopped(_))) => return true,
            Err(e) => {
                tracing::warn!(intersection = intersection.id(), vehicle, "vehicle gave up: {e}");
                return false;
            }
        }
        thread::sleep(spacing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_red_intersections() {
        let sim = Simulation::new(SimConfig::quick()).unwrap();
        assert_eq!(sim.intersections().len(), 2);
        for (id, i) in (0u32..).zip(sim.intersections()) {
            assert_eq!(i.id(), id);
            assert_eq!(i.light().current_phase(), Phase::Red);
        }
    }

    #[test]
    fn test_new_rejects_invalid() {
        let config = SimConfig {
            lights: 0,
            ..SimConfig::quick()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_wait_tally() {
        let mut tally = WaitTally::default();
        assert_eq!(tally.average(), Duration::ZERO);

        for ms in [10, 20, 60] {
            tally.record(&CrossingEvent {
                intersection: 0,
                vehicle: 0,
                waited: Duration::from_millis(ms),
            });
        }
        assert_eq!(tally.count, 3);
        assert_eq!(tally.average(), Duration::from_millis(30));
        assert_eq!(tally.max, Duration::from_millis(60));
    }

    #[test]
    fn test_report_display() {
        let report = SimReport {
            crossings: 2,
            intersections: vec![IntersectionReport {
                id: 0,
                crossings: 2,
                toggles: 5,
                final_phase: Phase::Green,
            }],
            ..SimReport::default()
        };
        let text = report.to_string();
        assert!(text.contains("Crossings:        2"));
        assert!(text.contains("ends green"));
    }
}
