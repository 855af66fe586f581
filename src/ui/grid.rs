use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, CARD_HEIGHT, CARD_WIDTH};
use crate::filter::{category_color, category_style_class, parse_hex, presentation_gradient};
use crate::types::{CatalogEntry, Category};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let visible = app.visible();

    let block = Block::default().borders(Borders::ALL).title(format!(
        " Pokémon ({}/{}) ",
        visible.len(),
        app.state.entries().len()
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if visible.is_empty() {
        let message = if app.state.is_loading() {
            "Loading..."
        } else if app.state.search().is_empty() {
            "Nothing loaded yet"
        } else {
            "No matches"
        };
        let empty = Paragraph::new(message).style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, inner);
        return;
    }

    let columns = app.layout.columns;
    let buf = frame.buffer_mut();
    for (row_offset, row) in visible
        .chunks(columns)
        .skip(app.scroll_row)
        .take(app.layout.visible_rows)
        .enumerate()
    {
        for (column, entry) in row.iter().enumerate() {
            let index = (app.scroll_row + row_offset) * columns + column;
            let card = Rect {
                x: inner.x + column as u16 * CARD_WIDTH,
                y: inner.y + row_offset as u16 * CARD_HEIGHT,
                width: CARD_WIDTH - 1,
                height: CARD_HEIGHT - 1,
            }
            .intersection(inner);
            paint_card(buf, entry, card, index == app.selected);
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    } else {
        text.to_string()
    }
}

/// Paints one card: gradient background along the 135° diagonal, then
/// id, name and category badges on top.
fn paint_card(buf: &mut Buffer, entry: &CatalogEntry, area: Rect, selected: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let gradient = presentation_gradient(&entry.categories);
    let span_x = area.width.saturating_sub(1).max(1) as f32;
    let span_y = area.height.saturating_sub(1).max(1) as f32;
    for y in 0..area.height {
        for x in 0..area.width {
            let t = (x as f32 / span_x + y as f32 / span_y) / 2.0;
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_bg(rgb(gradient.sample(t)));
            }
        }
    }

    let text_width = area.width.saturating_sub(2) as usize;
    let ink = Style::default().fg(Color::Black);
    let x = area.x + 1;

    buf.set_string(x, area.y, format!("#{:03}", entry.id), ink);

    if area.height > 1 {
        let mut name_style = ink.add_modifier(Modifier::BOLD);
        if selected {
            name_style = name_style.add_modifier(Modifier::REVERSED);
        }
        let name = truncate(&capitalize(&entry.name), text_width);
        buf.set_string(x, area.y + 1, name, name_style);
    }

    if area.height > 2 {
        let mut col = x;
        let end = area.x + area.width;
        for category in &entry.categories {
            let badge = format!(" {} ", category);
            let width = badge.chars().count() as u16;
            if col + width > end {
                break;
            }
            buf.set_string(col, area.y + 2, &badge, badge_style(category, ink));
            col += width + 1;
        }
    }

    if selected && area.height > 3 {
        let marker = "▔".repeat(text_width);
        buf.set_string(x, area.y + area.height - 1, marker, ink);
    }
}

/// Known categories get their colour; unknown ones stay unstyled on the
/// card background.
fn badge_style(category: &Category, ink: Style) -> Style {
    if category_style_class(category).is_empty() {
        return ink.add_modifier(Modifier::ITALIC);
    }
    let bg = parse_hex(category_color(category)).map(rgb).unwrap_or(Color::White);
    ink.bg(bg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn capitalize_and_truncate() {
        assert_eq!(capitalize("bulbasaur"), "Bulbasaur");
        assert_eq!(capitalize(""), "");
        assert_eq!(truncate("fletchinder", 6), "fletc…");
        assert_eq!(truncate("mew", 6), "mew");
    }

    #[test]
    fn card_shows_id_name_and_badges() {
        let area = Rect::new(0, 0, 21, 4);
        let mut buf = Buffer::empty(area);
        paint_card(&mut buf, &entry(1, "bulbasaur", &["grass", "poison"]), area, false);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
                .collect()
        };
        assert!(row(0).contains("#001"));
        assert!(row(1).contains("Bulbasaur"));
        assert!(row(2).contains(" grass "));
        assert!(row(2).contains(" poison "));

        // gradient runs from grass green in the top-left corner
        assert_eq!(
            buf.cell((0, 0)).map(|c| c.bg),
            Some(Color::Rgb(0x4c, 0xaf, 0x50))
        );
        assert_eq!(
            buf.cell((20, 3)).map(|c| c.bg),
            Some(Color::Rgb(0x9e, 0x5c, 0xda))
        );
    }

    #[test]
    fn empty_area_is_ignored() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 5));
        paint_card(&mut buf, &entry(4, "charmander", &["fire"]), Rect::new(0, 0, 0, 0), true);
        assert_eq!(buf.cell((0, 0)).map(|c| c.bg), Some(Color::Reset));
    }

    #[test]
    fn unknown_category_badge_keeps_card_background() {
        let area = Rect::new(0, 0, 21, 4);
        let mut buf = Buffer::empty(area);
        let oddity = entry(9, "oddity", &["cosmic", "fire"]);
        paint_card(&mut buf, &oddity, area, false);

        // " cosmic " starts one column in; its 'c' sits at x = 2
        let badge = buf.cell((2, 2)).expect("cell in area");
        assert_eq!(badge.symbol(), "c");
        let gradient = presentation_gradient(&oddity.categories);
        let t = (2.0 / 20.0 + 2.0 / 3.0) / 2.0;
        assert_eq!(badge.bg, rgb(gradient.sample(t)));
        assert!(badge.modifier.contains(Modifier::ITALIC));

        let known = Style::default();
        assert_eq!(
            badge_style(&Category::Fire, known).bg,
            Some(Color::Rgb(0xc2, 0x7e, 0x10))
        );
    }
}
