use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    render_favorites(frame, app, chunks[0]);
    render_hints(frame, chunks[1]);
}

fn render_favorites(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Favorites ({}) ", app.favorites.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.favorites.is_empty() {
        let message = if app.is_authenticated() {
            "Nothing saved yet - press [f] on a product to add it"
        } else {
            "Sign in with [l] to see your favorites"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("  {}", message),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .favorites
        .iter()
        .enumerate()
        .map(|(i, favorite)| {
            let saved = favorite
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default();
            let line = Line::from(vec![
                Span::raw(format!(
                    " {:<34}",
                    truncate_string(&favorite.product_name, 34)
                )),
                Span::raw(format!("{:<10}", favorite.platform_name)),
                Span::styled(format!("{:>12}", favorite.price_display()), styles::price_style()),
                Span::styled(format!("  {}", saved), styles::muted_style()),
            ]);

            let style = if i == app.favorite_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.favorite_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        " [d] remove | [u] refresh | [1] products",
        styles::muted_style(),
    )));
    frame.render_widget(paragraph, area);
}
