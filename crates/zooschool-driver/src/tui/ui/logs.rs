/*
[INPUT]:  LogBufferHandle snapshots for UI
[OUTPUT]: Activity panel rendered into Ratatui frame
[POS]:    TUI UI logs panel rendering
[UPDATE]: 2026-10-16 Render the tail only; tolerate a missing buffer
*/

use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::border_style;
use crate::tui::LogBufferHandle;

pub(super) fn draw_logs(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    buffer: Option<&LogBufferHandle>,
) {
    let available = area.height.saturating_sub(2) as usize;
    let lines = match buffer {
        Some(buffer) => {
            let guard = buffer.lock().unwrap_or_else(|e| e.into_inner());
            guard.tail(available)
        }
        None => Vec::new(),
    };

    let text = lines.into_iter().map(Line::from).collect::<Vec<_>>();
    let log_widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Activity"),
    );
    frame.render_widget(log_widget, area);
}
