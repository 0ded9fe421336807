/*
[INPUT]:  Trip plan, messenger, completion recorder, log buffer
[OUTPUT]: Ratatui drive console for executing one trip
[POS]:    TUI module for zooschool-driver binary
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub use app::DriveApp;
pub use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_drive};
