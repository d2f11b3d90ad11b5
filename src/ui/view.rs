use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthChar;

use crate::{
    model::Movie,
    store::{Intent, MovieState},
    ui::app::App,
    util::colors,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    f.buffer_mut()
        .set_style(area, Style::new().bg(colors::BACKGROUND));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(area);

    let state = app.store.snapshot();
    render_search_box(app, f, chunks[0]);
    render_results(app, &state, f, chunks[1]);
    render_detail(app, &state, f, chunks[2]);
    render_footer(app, &state, f, chunks[3]);
}

fn render_search_box(app: &App, f: &mut Frame, area: Rect) {
    let style = if app.is_editing {
        Style::default().fg(colors::PRIMARY)
    } else {
        Style::default().fg(colors::NEUTRAL)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search")
        .border_style(style);

    let text = if app.is_editing {
        format!("{}█", app.input)
    } else {
        app.input.clone()
    };
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_results(app: &mut App, state: &MovieState, f: &mut Frame, area: Rect) {
    let title = match &state.intent {
        Intent::Popular => "Popular".to_string(),
        Intent::Search(query) => format!("Results for \"{query}\""),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if state.is_loading && state.movies.is_empty() {
        let label = match &state.intent {
            Intent::Popular => "Loading popular titles...",
            Intent::Search(_) => "Searching...",
        };
        let spinner = format!("{} {label}", spinner_symbol(app.spinner_frame));
        let paragraph = Paragraph::new(spinner)
            .style(Style::default().fg(colors::PRIMARY))
            .centered()
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = state
        .movies
        .iter()
        .map(|movie| ListItem::new(list_line(movie, width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    if !state.movies.is_empty() && app.list_state.selected().is_none() {
        app.list_state.select(Some(0));
    }

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail(app: &App, state: &MovieState, f: &mut Frame, area: Rect) {
    let selected = app.list_state.selected().and_then(|i| state.movies.get(i));

    let Some(movie) = selected else {
        f.render_widget(Block::default().borders(Borders::TOP), area);
        return;
    };

    let mut lines = Vec::new();
    if let Some(overview) = movie.overview.as_deref() {
        lines.push(Line::from(overview.to_string()));
    }
    if let Some(poster) = app.config.poster_url(movie.poster_path.as_deref()) {
        lines.push(Line::styled(poster, Style::default().fg(colors::NEUTRAL)));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .title(movie.title.clone())
        .title_style(
            Style::default()
                .fg(colors::SECONDARY)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_footer(app: &App, state: &MovieState, f: &mut Frame, area: Rect) {
    let footer = if let Some(err) = &state.last_error {
        Paragraph::new(err.to_string()).style(Style::default().fg(colors::ERROR))
    } else if state.is_loading {
        Paragraph::new(format!("{} fetching...", spinner_symbol(app.spinner_frame)))
            .style(Style::default().fg(colors::PRIMARY))
    } else {
        Paragraph::new(format!(
            "{} titles  |  / search  r refresh  q quit",
            state.movies.len()
        ))
        .style(Style::default().fg(colors::NEUTRAL))
    };
    f.render_widget(footer, area);
}

fn list_line(movie: &Movie, width: usize) -> String {
    let mut line = truncate_to_width(&movie.title, width.saturating_sub(16).max(8));
    if let Some(year) = movie.year() {
        line.push_str(&format!(" ({year})"));
    }
    if movie.vote_average > 0.0 {
        line.push_str(&format!("  ★ {:.1}", movie.vote_average));
    }
    line
}

fn spinner_symbol(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

fn truncate_to_width(text: &str, max: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            out.push('…');
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, vote: f64, date: Option<&str>) -> Movie {
        Movie {
            id: 1,
            title: title.to_string(),
            poster_path: None,
            vote_average: vote,
            release_date: date.map(str::to_string),
            overview: None,
        }
    }

    #[test]
    fn list_line_shows_year_and_rating_when_present() {
        let line = list_line(&movie("Dune", 8.2, Some("2021-09-15")), 60);
        assert_eq!(line, "Dune (2021)  ★ 8.2");
    }

    #[test]
    fn list_line_omits_absent_rating() {
        let line = list_line(&movie("Dune", 0.0, None), 60);
        assert_eq!(line, "Dune");
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("abcdef", 4), "abcd…");
        assert_eq!(truncate_to_width("abc", 4), "abc");
    }
}
