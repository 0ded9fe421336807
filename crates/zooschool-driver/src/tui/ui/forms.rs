/*
[INPUT]:  Compose and completion form state
[OUTPUT]: Modal overlays with text input and cursor
[POS]:    TUI UI modal forms
[UPDATE]: 2026-10-16 Add message compose and trip completion forms
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tui_input::Input;

use zooschool_driver::completion::MAX_RATING;

use super::{border_style, header_style};
use crate::tui::app::{ComposeState, CompletionForm, DriveApp};

pub(super) fn draw_compose(frame: &mut ratatui::Frame, area: Rect, compose: &ComposeState) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(format!(" Message {} ", compose.contact_name));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format!("To: {}", compose.contact_phone)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Template: "),
            Span::styled(format!(" {} ", compose.template.label()), header_style()),
        ])),
        rows[1],
    );
    draw_input(frame, rows[3], "Message", &compose.input);
}

pub(super) fn draw_completion(
    frame: &mut ratatui::Frame,
    area: Rect,
    app: &DriveApp,
    form: &CompletionForm,
) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(" Trip Complete ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format!(
            "{} riders dropped off at {} in {}",
            app.execution.rider_count(),
            app.plan.destination,
            app.execution.elapsed()
        )),
        rows[0],
    );

    let filled = form.rating.unwrap_or(0);
    let stars: String = (1..=MAX_RATING)
        .map(|n| if n <= filled { '*' } else { '.' })
        .collect();
    let rating = match form.rating {
        Some(r) => format!("{r}/{MAX_RATING}"),
        None => "no rating".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Rating: "),
            Span::styled(
                stars,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {rating}")),
        ])),
        rows[1],
    );
    draw_input(frame, rows[3], "Notes (optional)", &form.notes);
}

fn draw_input(frame: &mut ratatui::Frame, area: Rect, title: &str, input: &Input) {
    let width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let widget = Paragraph::new(input.value())
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);

    let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
    frame.set_cursor_position((area.x + 1 + cursor.min(width as u16), area.y + 1));
}
