/*
[INPUT]:  Public API exports for zooschool-driver crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod completion;
pub mod config;
pub mod messaging;
pub mod sequencer;
pub mod state;
pub mod trip_data;

// Re-export main types for convenience
pub use completion::{CompletionRecorder, TripCompletion};
pub use config::DriverConfig;
pub use messaging::{MessageTemplate, Messenger, SmsSender};
pub use sequencer::{Phase, Progress, SequencerError, TripExecution, TripStep};
pub use trip_data::{BackendTripSource, FileTripSource, PlannedRider, TripPlan, TripSource};
