/*
[INPUT]:  DriveApp state
[OUTPUT]: Full-frame render of the drive console
[POS]:    TUI UI module root
[UPDATE]: 2026-10-16 Lay out header, progress, step panels, activity and footer
*/

mod forms;
mod layout;
mod logs;
mod steps;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use super::app::{DriveApp, Mode};

pub(in crate::tui) fn draw_ui(frame: &mut ratatui::Frame, app: &DriveApp) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(4),
        ])
        .split(area);

    layout::draw_header(frame, rows[0], app);
    layout::draw_progress(frame, rows[1], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);
    steps::draw_current_step(frame, middle[0], app);
    steps::draw_step_list(frame, middle[1], app);

    logs::draw_logs(frame, rows[3], app.log_buffer.as_ref());
    layout::draw_footer(frame, rows[4], app);

    match &app.mode {
        Mode::Compose(compose) => {
            forms::draw_compose(frame, centered_rect(area, 70, 50), compose);
        }
        Mode::Complete(form) => {
            forms::draw_completion(frame, centered_rect(area, 60, 45), app, form);
        }
        Mode::Trip | Mode::Done => {}
    }
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Green)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
