use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::router::Route;

use super::styles;
use super::views::{favorites, history, login, products};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Pricewatch";
    let identity = match app.session {
        Some(ref session) => {
            let who = app
                .profile
                .as_ref()
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| session.email.clone());
            format!("{} ({}) ", who, session.age_display())
        }
        None => "browsing signed out ".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + identity.len() + 2),
        )),
        Span::styled(identity, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let main_tabs = vec![
        ("[1] Products", app.route == Route::Products),
        ("[2] Favorites", app.route == Route::Favorites),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in main_tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        if *selected {
            spans.push(Span::styled(*label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(*label, styles::muted_style()));
        }
    }

    // Off-tab routes (history, login) show on the right
    let right_label = match app.route {
        Route::History { .. } | Route::Login | Route::NotFound => Some(app.route.title()),
        _ => None,
    };
    if let Some(label) = right_label {
        let main_width: usize = spans.iter().map(|s| s.content.len()).sum();
        let padding = (area.width as usize).saturating_sub(main_width + label.len() + 2);
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(label, styles::tab_style(true)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Products => products::render(frame, app, area),
        Route::Favorites => favorites::render(frame, app, area),
        Route::History { .. } => history::render(frame, app, area),
        Route::Login => login::render(frame, app, area),
        Route::NotFound => render_not_found(frame, area),
    }
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  There is nothing here.",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press [1] for products or Esc to go back.",
            styles::muted_style(),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.refreshing {
        " Refreshing... ".to_string()
    } else {
        String::from(" Ready ")
    };

    let center_text = match app.stats {
        Some(ref stats) => format!(
            "{} models | {} price records | platforms: {}",
            stats.total_models,
            stats.total_price_records,
            stats.platforms_display()
        ),
        None => String::new(),
    };

    let right_text = " [?] help | [q] quit ";

    let width = area.width as usize;
    let center_start = (width.saturating_sub(center_text.len())) / 2;
    let left_pad = center_start.saturating_sub(left_text.len());
    let right_start = center_start + center_text.len();
    let right_pad = width
        .saturating_sub(right_start)
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(left_pad)),
        Span::styled(center_text, styles::muted_style()),
        Span::raw(" ".repeat(right_pad)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            "      ╔═╗╦═╗╦╔═╗╔═╗╦ ╦╔═╗╔╦╗╔═╗╦ ╦",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "      ╠═╝╠╦╝║║  ║╣ ║║║╠═╣ ║ ║  ╠═╣",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "      ╩  ╩╚═╩╚═╝╚═╝╚╩╝╩ ╩ ╩ ╚═╝╩ ╩",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("  1/2       ", "Products / Favorites"),
        help_line("  ↑/↓ j/k   ", "Move selection"),
        help_line("  Enter     ", "Price history for selection"),
        help_line("  Esc       ", "Go back"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("  f         ", "Toggle favorite"),
        help_line("  d         ", "Remove favorite (favorites screen)"),
        help_line("  s         ", "Queue a scrape run"),
        help_line("  u         ", "Refresh data"),
        help_line("  l         ", "Sign in / sign out"),
        help_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
