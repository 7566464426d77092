use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(2)])
        .split(area);

    render_catalog(frame, app, chunks[0]);
    render_hints(frame, app, chunks[1]);
}

fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", product.favorite_marker()),
                    styles::favorite_style(),
                ),
                Span::raw(format!("{:<40}", truncate_string(&product.name, 40))),
                Span::styled(
                    format!("  {}", product.category_display()),
                    styles::muted_style(),
                ),
            ]);

            let style = if i == app.product_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" Products ({}) ", app.products.len());
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.products.is_empty() {
        let message = if app.refreshing {
            "Loading catalog..."
        } else {
            "No products yet - press [u] to refresh or [s] to queue a scrape"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format!("  {}", message),
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.product_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if app.is_authenticated() {
        "[Enter] price history | [f] toggle favorite | [s] scrape | [u] refresh"
    } else {
        "[Enter] price history | [l] sign in | [u] refresh"
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", hints),
        styles::muted_style(),
    )));
    frame.render_widget(paragraph, area);
}
