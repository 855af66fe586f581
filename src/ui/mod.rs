mod grid;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    grid::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let pages = app.state.cursor().saturating_sub(1);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "dexgrid - Pokédex",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} loaded, {} page(s)", app.state.entries().len(), pages),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let border = if app.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::raw(app.state.search().to_string())];
    if app.search_mode {
        spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
    } else if app.state.search().is_empty() {
        spans.push(Span::styled(
            "Search by name",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" / Search "),
    );
    frame.render_widget(search, area);
}

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.state.is_loading() {
        Line::from(vec![Span::styled(
            format!("{} Loading...", SPINNER[app.spinner % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = if app.search_mode {
            "type to filter | Backspace: delete | Enter/Esc: done"
        } else {
            "h/j/k/l: move | Ctrl+d/u: page | g/G: top/bottom | /: search | o: open image | y: yank url | q: quit"
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
