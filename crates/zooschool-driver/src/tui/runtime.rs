/*
[INPUT]:  DriveApp, delivery reports, shutdown token, terminal key events
[OUTPUT]: Ratatui drive-session run loop and log buffer utilities
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing the drive loop, clock, or log capture
[UPDATE]: 2026-10-16 Drive a single trip session with a 1s clock tick
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::Result;
use ratatui::crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::fmt::MakeWriter;
use zooschool_driver::messaging::DeliveryReport;

use super::app::DriveApp;
use super::events::{KeyOutcome, handle_key_event};
use super::terminal::TerminalGuard;
use super::ui::draw_ui;

const CLOCK_TICK: Duration = Duration::from_secs(1);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const LOG_BUFFER_CAPACITY: usize = 500;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn handle(capacity: usize) -> LogBufferHandle {
        Arc::new(StdMutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }
}

/// `MakeWriter` that feeds tracing output into a [`LogBuffer`]
#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

/// Run the drive console until the trip is completed, the driver quits, or `shutdown` fires.
pub async fn run_drive(
    mut app: DriveApp,
    mut reports: mpsc::UnboundedReceiver<DeliveryReport>,
    shutdown: CancellationToken,
) -> Result<DriveApp> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = shutdown.child_token();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut clock = tokio::time::interval_at(Instant::now() + CLOCK_TICK, CLOCK_TICK);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        terminal.draw(|frame| draw_ui(frame, &app))?;
        if app.is_done() {
            break;
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("shutdown requested");
                break;
            }
            _ = clock.tick() => app.on_tick(),
            Some(report) = reports.recv() => app.on_delivery(report),
            maybe_event = event_rx.recv() => match maybe_event {
                Some(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key).await == KeyOutcome::Quit {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    input_shutdown.cancel();
    Ok(app)
}
