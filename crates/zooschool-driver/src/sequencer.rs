/*
[INPUT]:  Ordered riders and a destination from a TripPlan
[OUTPUT]: Current step, progress fraction, elapsed time for a drive session
[POS]:    Core - trip step state machine
[UPDATE]: When step kinds or transition rules change
*/

use rust_decimal::Decimal;
use thiserror::Error;
use zooschool_adapter::RiderInfo;

use crate::trip_data::{PlannedRider, TripPlan};

/// Sequencer precondition violations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerError {
    #[error("trip already started")]
    AlreadyStarted,

    #[error("trip not started")]
    NotStarted,
}

/// One entry of the step list
#[derive(Debug, Clone, PartialEq)]
pub enum TripStep {
    /// Not yet departed
    Start,
    Pickup {
        rider: RiderInfo,
        eta_minutes: u32,
        distance_miles: Decimal,
    },
    /// Always last
    Destination {
        address: String,
        arrival_eta: Option<String>,
    },
}

impl TripStep {
    pub fn label(&self) -> String {
        match self {
            TripStep::Start => "Start Trip".to_string(),
            TripStep::Pickup { rider, .. } => format!("Pick up {}", rider.name),
            TripStep::Destination { .. } => "Arrive at Destination".to_string(),
        }
    }

    pub fn rider(&self) -> Option<&RiderInfo> {
        match self {
            TripStep::Pickup { rider, .. } => Some(rider),
            _ => None,
        }
    }
}

/// Where the driver is in the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    /// 1-based pickup number
    AtPickup(usize),
    AtDestination,
}

/// Outcome of [`TripExecution::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Moved to this step index
    Moved(usize),
    /// Confirmed at the destination; the caller should leave the trip view
    Finished,
}

/// Per-session trip execution state.
///
/// Steps are `[Start, Pickup(r1) .. Pickup(rN), Destination]` in the order the
/// riders were given. The index only moves forward.
#[derive(Debug, Clone)]
pub struct TripExecution {
    steps: Vec<TripStep>,
    current_index: usize,
    started: bool,
    elapsed_seconds: u64,
}

impl TripExecution {
    pub fn new(
        riders: impl IntoIterator<Item = PlannedRider>,
        destination_address: impl Into<String>,
        arrival_eta: Option<String>,
    ) -> Self {
        let mut steps = vec![TripStep::Start];
        steps.extend(riders.into_iter().map(|planned| TripStep::Pickup {
            rider: planned.rider,
            eta_minutes: planned.eta_minutes,
            distance_miles: planned.distance_miles,
        }));
        steps.push(TripStep::Destination {
            address: destination_address.into(),
            arrival_eta,
        });

        Self {
            steps,
            current_index: 0,
            started: false,
            elapsed_seconds: 0,
        }
    }

    pub fn from_plan(plan: &TripPlan) -> Self {
        Self::new(
            plan.riders.iter().cloned(),
            plan.destination_address.clone(),
            plan.arrival_eta.clone(),
        )
    }

    /// Depart: move to the first pickup (or straight to the destination with no riders).
    pub fn start(&mut self) -> Result<usize, SequencerError> {
        if self.started {
            return Err(SequencerError::AlreadyStarted);
        }
        self.started = true;
        self.current_index = 1;
        Ok(self.current_index)
    }

    /// Confirm the current step.
    pub fn advance(&mut self) -> Result<Progress, SequencerError> {
        if !self.started {
            return Err(SequencerError::NotStarted);
        }
        if self.current_index >= self.last_index() {
            return Ok(Progress::Finished);
        }
        self.current_index += 1;
        Ok(Progress::Moved(self.current_index))
    }

    /// One clock second; ignored before start
    pub fn tick(&mut self) {
        if self.started {
            self.elapsed_seconds += 1;
        }
    }

    pub fn current_step(&self) -> &TripStep {
        &self.steps[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn steps(&self) -> &[TripStep] {
        &self.steps
    }

    pub fn rider_count(&self) -> usize {
        self.steps.len() - 2
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::NotStarted
        } else if self.current_index == self.last_index() {
            Phase::AtDestination
        } else {
            Phase::AtPickup(self.current_index)
        }
    }

    /// 0.0 before start, 1.0 exactly at the destination
    pub fn progress_fraction(&self) -> f64 {
        if !self.started {
            return 0.0;
        }
        self.current_index as f64 / self.last_index() as f64
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    fn last_index(&self) -> usize {
        self.steps.len() - 1
    }
}

/// `"{h}h {m}m"`, hours omitted when zero
pub fn format_elapsed(seconds: u64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn rider(name: &str, eta_minutes: u32) -> PlannedRider {
        PlannedRider {
            rider: RiderInfo {
                name: name.to_string(),
                ..RiderInfo::default()
            },
            eta_minutes,
            distance_miles: Decimal::new(12, 1),
        }
    }

    fn riders(n: usize) -> Vec<PlannedRider> {
        (0..n).map(|i| rider(&format!("Rider {i}"), 5)).collect()
    }

    fn school_run() -> TripExecution {
        TripExecution::new(
            vec![
                rider("Emma Johnson", 5),
                rider("Noah Williams", 7),
                rider("Olivia Davis", 6),
            ],
            "1234 Wildlife Way, Anytown, USA",
            Some("7:25 AM".to_string()),
        )
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(12)]
    fn test_step_count_is_riders_plus_two(#[case] n: usize) {
        let trip = TripExecution::new(riders(n), "School", None);
        assert_eq!(trip.steps().len(), n + 2);
        assert_eq!(trip.steps()[0], TripStep::Start);
        assert!(matches!(trip.steps()[n + 1], TripStep::Destination { .. }));
        assert_eq!(trip.rider_count(), n);
    }

    #[test]
    fn test_school_run_scenario() {
        let mut trip = school_run();
        assert_eq!(trip.phase(), Phase::NotStarted);
        assert_eq!(trip.progress_fraction(), 0.0);

        assert_eq!(trip.start(), Ok(1));
        assert_eq!(trip.current_step().rider().unwrap().name, "Emma Johnson");
        assert!((trip.progress_fraction() - 0.25).abs() < f64::EPSILON);

        assert_eq!(trip.advance(), Ok(Progress::Moved(2)));
        assert_eq!(trip.current_step().rider().unwrap().name, "Noah Williams");
        assert_eq!(trip.advance(), Ok(Progress::Moved(3)));
        assert_eq!(trip.current_step().rider().unwrap().name, "Olivia Davis");
        assert_eq!(trip.phase(), Phase::AtPickup(3));

        assert_eq!(trip.advance(), Ok(Progress::Moved(4)));
        assert_eq!(trip.phase(), Phase::AtDestination);
        assert_eq!(trip.progress_fraction(), 1.0);

        assert_eq!(trip.advance(), Ok(Progress::Finished));
        assert_eq!(trip.current_index(), 4);
    }

    #[test]
    fn test_zero_riders_go_straight_to_destination() {
        let mut trip = TripExecution::new(Vec::new(), "School", None);
        trip.start().unwrap();
        assert_eq!(trip.phase(), Phase::AtDestination);
        assert_eq!(trip.progress_fraction(), 1.0);
        assert!(matches!(trip.current_step(), TripStep::Destination { .. }));
        assert_eq!(trip.advance(), Ok(Progress::Finished));
    }

    #[test]
    fn test_start_twice_rejected_without_change() {
        let mut trip = school_run();
        trip.start().unwrap();
        trip.advance().unwrap();

        assert_eq!(trip.start(), Err(SequencerError::AlreadyStarted));
        assert_eq!(trip.current_index(), 2);
        assert!(trip.is_started());
    }

    #[test]
    fn test_advance_before_start_rejected() {
        let mut trip = school_run();
        assert_eq!(trip.advance(), Err(SequencerError::NotStarted));
        assert_eq!(trip.current_index(), 0);
    }

    #[test]
    fn test_progress_is_non_decreasing() {
        let mut trip = TripExecution::new(riders(5), "School", None);
        let mut last = trip.progress_fraction();
        trip.start().unwrap();
        for _ in 0..10 {
            let now = trip.progress_fraction();
            assert!(now >= last);
            assert!(now <= 1.0);
            last = now;
            let _ = trip.advance();
        }
        assert_eq!(trip.current_index(), 6);
    }

    #[test]
    fn test_clock_only_runs_after_start() {
        let mut trip = school_run();
        trip.tick();
        assert_eq!(trip.elapsed_seconds(), 0);

        trip.start().unwrap();
        for _ in 0..125 {
            trip.tick();
        }
        assert_eq!(trip.elapsed_seconds(), 125);
        assert_eq!(trip.elapsed(), "2m");
    }

    #[rstest]
    #[case(0, "0m")]
    #[case(59, "0m")]
    #[case(720, "12m")]
    #[case(3900, "1h 5m")]
    #[case(7200, "2h 0m")]
    fn test_format_elapsed(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(format_elapsed(seconds), expected);
    }
}
