use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph},
    text::{Line, Span},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 15 } else { 13 };
    let dialog = centered_rect_fixed(46, height, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![];

    // Banner (centered for 46-width box)
    lines.push(Line::from(Span::styled(
        "   ╔═╗╦═╗╦╔═╗╔═╗╦ ╦╔═╗╔╦╗╔═╗╦ ╦",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "   ╠═╝╠╦╝║║  ║╣ ║║║╠═╣ ║ ║  ╠═╣",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "   ╩  ╩╚═╩╚═╝╚═╝╚╩╝╩ ╩ ╩ ╚═╝╩ ╩",
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    // Email field
    let email_focused = app.login_focus == LoginFocus::Email;
    let email_style = if email_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let email_shown: String = app
        .login_email
        .chars()
        .rev()
        .take(24)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Email:    [", styles::muted_style()),
        Span::styled(format!("{:<24}{}", email_shown, cursor), email_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Password field, always masked
    let password_focused = app.login_focus == LoginFocus::Password;
    let password_style = if password_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let masked: String = "*".repeat(app.login_password.chars().count().min(24));
    let cursor = if password_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<24}{}", masked, cursor), password_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Sign-in button
    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(""));
    let button_label = if button_focused {
        " ▶ Sign in ◀ "
    } else {
        "   Sign in   "
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "    Esc browses the catalog signed out",
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
