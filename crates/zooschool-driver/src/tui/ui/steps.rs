/*
[INPUT]:  TripExecution steps and current index
[OUTPUT]: Current-step detail panel and step checklist
[POS]:    TUI UI step panels
[UPDATE]: 2026-10-16 Add pickup/destination detail and checklist
*/

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use zooschool_driver::sequencer::TripStep;

use super::border_style;
use crate::tui::app::DriveApp;

pub(super) fn draw_current_step(frame: &mut ratatui::Frame, area: Rect, app: &DriveApp) {
    let execution = &app.execution;
    let plan = &app.plan;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let (title, lines) = match execution.current_step() {
        TripStep::Start => {
            let mut lines = vec![
                Line::styled("Ready to depart", bold),
                Line::raw(""),
                Line::raw(format!("Riders: {}", execution.rider_count())),
                Line::raw(format!("Destination: {}", plan.destination)),
                Line::raw(format!(
                    "Vehicle: {} {}",
                    plan.vehicle.color, plan.vehicle.model
                )),
            ];
            if let Some(plate) = &plan.vehicle.license_plate {
                lines.push(Line::raw(format!("License plate: {plate}")));
            }
            if !plan.notes.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::styled(format!("Note: {}", plan.notes), dim));
            }
            ("Start Trip".to_string(), lines)
        }
        TripStep::Pickup {
            rider,
            eta_minutes,
            distance_miles,
        } => {
            let mut name = vec![Span::styled(rider.name.clone(), bold)];
            if let Some(age) = rider.age {
                name.push(Span::raw(format!("  age {age}")));
            }
            let mut lines = vec![
                Line::from(name),
                Line::raw(""),
                Line::raw(format!("Address: {}", rider.address)),
                Line::raw(format!(
                    "ETA: {eta_minutes} min  Distance: {distance_miles} miles"
                )),
            ];
            if let Some(time) = &rider.pickup_time {
                lines.push(Line::raw(format!("Scheduled pickup: {time}")));
            }
            lines.push(Line::raw(format!(
                "Contact: {}  {}",
                rider.contact_name, rider.contact_phone
            )));
            if let Some(seating) = &rider.seating {
                lines.push(Line::raw(format!("Seating: {seating}")));
            }
            if !rider.notes.is_empty() {
                lines.push(Line::styled(format!("Notes: {}", rider.notes), dim));
            }
            (format!("Pickup #{}", execution.current_index()), lines)
        }
        TripStep::Destination {
            address,
            arrival_eta,
        } => {
            let mut lines = vec![
                Line::styled(plan.destination.clone(), bold),
                Line::raw(""),
                Line::raw(format!("Address: {address}")),
            ];
            if let Some(eta) = arrival_eta {
                lines.push(Line::raw(format!("Expected arrival: {eta}")));
            }
            lines.push(Line::raw(format!(
                "Riders on board: {}",
                execution.rider_count()
            )));
            ("Destination".to_string(), lines)
        }
    };

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

pub(super) fn draw_step_list(frame: &mut ratatui::Frame, area: Rect, app: &DriveApp) {
    let execution = &app.execution;
    let current = execution.current_index();

    let items: Vec<ListItem> = execution
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let (marker, style) = if index < current {
                ("[x]", Style::default().fg(Color::Green))
            } else if index == current {
                (
                    "[>]",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("[ ]", Style::default().fg(Color::DarkGray))
            };
            ListItem::new(Line::styled(format!("{marker} {}", step.label()), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Steps"),
    );
    frame.render_widget(list, area);
}
