/*
[INPUT]:  DriveApp trip plan, execution state, status message
[OUTPUT]: Header, progress gauge and hotkey footer
[POS]:    TUI UI frame chrome
[UPDATE]: 2026-10-16 Replace tab bar with trip header and progress gauge
*/

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};

use zooschool_driver::sequencer::Phase;

use super::{border_style, key_style};
use crate::tui::app::{DriveApp, Mode};

pub(super) fn draw_header(frame: &mut ratatui::Frame, area: Rect, app: &DriveApp) {
    let plan = &app.plan;
    let mut title = vec![
        Span::styled(
            plan.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", plan.kind.label())),
    ];
    if let Some(group) = &plan.group_name {
        title.push(Span::styled(
            format!("  {group}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let clock = format!(
        "{}  elapsed {}",
        app.now.format("%-I:%M:%S %p"),
        app.execution.elapsed()
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(" ZooSchool Carpool ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(Line::from(title)), inner);
    frame.render_widget(
        Paragraph::new(clock).alignment(Alignment::Right),
        inner,
    );
}

pub(super) fn draw_progress(frame: &mut ratatui::Frame, area: Rect, app: &DriveApp) {
    let execution = &app.execution;
    let last = execution.steps().len() - 1;
    let label = match execution.phase() {
        Phase::NotStarted => "Not started".to_string(),
        Phase::AtPickup(n) => format!(
            "Pickup {n} of {}  ({:.0}%)",
            execution.rider_count(),
            execution.progress_fraction() * 100.0
        ),
        Phase::AtDestination => format!("Destination  (step {last} of {last})"),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Trip Progress"),
        )
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(execution.progress_fraction().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

pub(super) fn draw_footer(frame: &mut ratatui::Frame, area: Rect, app: &DriveApp) {
    let keys: &[(&str, &str)] = match app.mode {
        Mode::Trip if !app.execution.is_started() => &[("[Enter]", " Start Trip  "), ("[q]", " Quit")],
        Mode::Trip => &[
            ("[Enter]", " Confirm step  "),
            ("[m]", " Message  "),
            ("[c]", " Call  "),
            ("[n]", " Navigate  "),
            ("[q]", " Quit"),
        ],
        Mode::Compose(_) => &[
            ("[Tab]", " Template  "),
            ("[Enter]", " Send  "),
            ("[Esc]", " Cancel"),
        ],
        Mode::Complete(_) => &[
            ("[Up/Down]", " Rating  "),
            ("[Enter]", " Save  "),
            ("[Esc]", " Skip"),
        ],
        Mode::Done => &[],
    };

    let hotkeys = Line::from(
        keys.iter()
            .flat_map(|(key, action)| [Span::styled(*key, key_style()), Span::raw(*action)])
            .collect::<Vec<_>>(),
    );
    let status = Line::from(format!("Status: {}", app.status_message));

    let widget = Paragraph::new(Text::from(vec![hotkeys, status]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Hotkeys"),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}
