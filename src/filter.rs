use std::fmt;

use crate::types::{CatalogEntry, Category};

pub const WHITE: &str = "#ffffff";
const SHORT_WHITE: &str = "#fff";
const GRADIENT_ANGLE: u16 = 135;

/// Entries whose name contains `query`, ignoring case. Order is preserved
/// and an empty query keeps everything.
pub fn visible_entries<'a>(entries: &'a [CatalogEntry], query: &str) -> Vec<&'a CatalogEntry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// Style token for a category. Unknown categories get no class.
pub fn category_style_class(category: &Category) -> &str {
    if category.is_known() {
        category.name()
    } else {
        ""
    }
}

pub fn category_color(category: &Category) -> &'static str {
    match category {
        Category::Fire => "#c27e10",
        Category::Grass => "#4CAF50",
        Category::Water => "#00BFFF",
        Category::Bug => "#98e880",
        Category::Normal => "#A9A9A9",
        Category::Poison => "#9e5cda",
        Category::Electric => "#ffd365",
        Category::Ground => "#9e7e52",
        Category::Ghost => "#5626de",
        Category::Fighting => "#ba082a",
        Category::Psychic => "#e39fa4",
        Category::Rock => "#897975",
        Category::Ice => "#42bed3",
        Category::Steel => "#999999",
        Category::Dark => "#12124f",
        Category::Flying => "#23f1c7",
        Category::Fairy => "#f040f3",
        Category::Dragon => "#3263cc",
        Category::Unknown(_) => WHITE,
    }
}

/// Two-stop linear gradient used as a card background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub angle: u16,
    pub from: &'static str,
    pub to: &'static str,
}

impl Gradient {
    /// Colour at position `t` along the gradient axis, `t` in `0.0..=1.0`.
    pub fn sample(&self, t: f32) -> (u8, u8, u8) {
        let from = parse_hex(self.from).unwrap_or((255, 255, 255));
        let to = parse_hex(self.to).unwrap_or((255, 255, 255));
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linear-gradient({}deg, {}, {})",
            self.angle, self.from, self.to
        )
    }
}

/// Background for an entry: first two categories blended, a single
/// category fading to white, and flat white when there are none.
pub fn presentation_gradient(categories: &[Category]) -> Gradient {
    let (from, to) = match categories {
        [] => (WHITE, SHORT_WHITE),
        [only] => (category_color(only), SHORT_WHITE),
        [first, second, ..] => (category_color(first), category_color(second)),
    };
    Gradient {
        angle: GRADIENT_ANGLE,
        from,
        to,
    }
}

/// Parses `#rgb` or `#rrggbb`.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    match digits.len() {
        3 => {
            let mut channels = digits.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}
