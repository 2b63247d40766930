//! News list and the full-text detail view.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::config::VISIBLE_NEWS;
use crate::model::PanelData;
use crate::pages::{
    back_button, fill_rect, fill_round_rect, league_badge, scroll_arrows, scroll_position, text,
    title_bar,
};
use crate::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_HEADER, COLOR_TEXT};

const ROW_START_Y: i32 = 50;
const ROW_STRIDE: i32 = 34;

/// Characters per wrapped line in the detail view (6px glyphs over a 300px
/// column).
const WRAP_CHARS: usize = 48;

pub fn draw<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    data: &PanelData,
    scroll_offset: usize,
) -> Result<(), D::Error> {
    title_bar(display, "Senaste nyheterna", COLOR_ACCENT)?;

    if data.news.is_empty() {
        return text(display, "Inga nyheter just nu", 80, 128, COLOR_DIM);
    }

    scroll_arrows(
        display,
        scroll_offset > 0,
        scroll_offset + VISIBLE_NEWS < data.news.len(),
    )?;

    let end = (scroll_offset + VISIBLE_NEWS).min(data.news.len());
    for (row, item) in data.news[scroll_offset..end].iter().enumerate() {
        let y = ROW_START_Y + row as i32 * ROW_STRIDE;

        fill_round_rect(display, 5, y, 305, 30, 4, COLOR_HEADER)?;
        league_badge(display, item.league, 8, y + 3, 28)?;

        let mut title = item.title.as_str();
        if title.chars().count() > 40 {
            title = clip_chars(title, 39);
        }
        text(display, title, 42, y + 19, COLOR_TEXT)?;
    }

    scroll_position(display, scroll_offset, data.news.len(), VISIBLE_NEWS)
}

pub fn draw_detail<D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    data: &PanelData,
    index: usize,
) -> Result<(), D::Error> {
    let Some(item) = data.news.get(index) else {
        return text(display, "Nyheten saknas", 100, 128, COLOR_DIM);
    };

    back_button(display)?;
    league_badge(display, item.league, 65, 34, 35)?;

    // Wrapped title, then a separator, then the wrapped summary.
    let mut y = 70;
    for line in WrapLines::new(&item.title, WRAP_CHARS).take(3) {
        text(display, line, 10, y, COLOR_ACCENT)?;
        y += 16;
    }

    y += 5;
    fill_rect(display, 10, y - 10, 300, 1, COLOR_HEADER)?;
    y += 5;

    let summary = if item.summary.is_empty() {
        "(Ingen sammanfattning tillganglig)"
    } else {
        item.summary.as_str()
    };

    let mut lines = WrapLines::new(summary, WRAP_CHARS + 2);
    for line in lines.by_ref().take(7) {
        text(display, line, 10, y, COLOR_TEXT)?;
        y += 15;
    }
    if lines.next().is_some() {
        text(display, "...", 10, y, COLOR_DIM)?;
    }
    Ok(())
}

/// Clip to at most `max` characters, on a char boundary.
fn clip_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// Greedy word wrap: each line holds up to `max_chars` characters, breaking
/// at the last space when one lands far enough in, otherwise mid-word.
pub(crate) struct WrapLines<'a> {
    rest: &'a str,
    max_chars: usize,
}

impl<'a> WrapLines<'a> {
    pub(crate) fn new(text: &'a str, max_chars: usize) -> Self {
        Self {
            rest: text.trim_start(),
            max_chars,
        }
    }
}

impl<'a> Iterator for WrapLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        if self.rest.chars().count() <= self.max_chars {
            let line = self.rest;
            self.rest = "";
            return Some(line);
        }

        let window = clip_chars(self.rest, self.max_chars);
        // Break at the last space unless it sits too close to the start of
        // the line to be worth it.
        let split = match window.rfind(' ') {
            Some(pos) if pos > 10 => pos,
            _ => window.len(),
        };
        let line = &self.rest[..split];
        self.rest = self.rest[split..].trim_start();
        Some(line)
    }
}
