use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Sparkline},
    Frame,
};

use crate::app::App;
use crate::models::PriceTrend;
use crate::ui::styles;
use crate::utils::format_price;

/// Number of most recent observations shown under the chart
const RECENT_POINTS: usize = 10;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref trend) = app.history else {
        let block = Block::default()
            .title(" Price History ")
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "  Loading price history...",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),                        // Summary
            Constraint::Min(5),                           // Chart
            Constraint::Length(RECENT_POINTS as u16 + 2), // Recent observations
            Constraint::Length(2),                        // Hints
        ])
        .split(area);

    render_summary(frame, trend, chunks[0]);
    render_chart(frame, trend, chunks[1]);
    render_recent(frame, trend, chunks[2]);
    render_hints(frame, chunks[3]);
}

fn render_summary(frame: &mut Frame, trend: &PriceTrend, area: Rect) {
    let mut lines = Vec::new();
    if let Some(latest) = trend.latest() {
        lines.push(Line::from(vec![
            Span::styled("Latest:  ", styles::muted_style()),
            Span::styled(format_price(latest.price), styles::price_style()),
            Span::styled(
                format!("  ({} on {})", latest.platform, latest.date),
                styles::muted_style(),
            ),
        ]));
    }
    if let (Some(min), Some(max)) = (trend.min_price(), trend.max_price()) {
        lines.push(Line::from(vec![
            Span::styled("Range:   ", styles::muted_style()),
            Span::raw(format!("{} - {}", format_price(min), format_price(max))),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Sources: ", styles::muted_style()),
        Span::raw(trend.platforms().join(", ")),
    ]));

    let block = Block::default()
        .title(format!(" {} ", trend.model_name))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_chart(frame: &mut Frame, trend: &PriceTrend, area: Rect) {
    // Offset by the series minimum so small price moves stay visible
    let floor = trend.min_price().unwrap_or(0.0);
    let data: Vec<u64> = trend
        .history
        .iter()
        .map(|p| (p.price - floor).max(0.0).round() as u64 + 1)
        .collect();

    let block = Block::default()
        .title(" Trend (oldest to newest) ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .style(styles::price_style());

    frame.render_widget(sparkline, area);
}

fn render_recent(frame: &mut Frame, trend: &PriceTrend, area: Rect) {
    let items: Vec<ListItem> = trend
        .history
        .iter()
        .rev()
        .take(RECENT_POINTS)
        .map(|point| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {}  ", point.date)),
                Span::styled(
                    format!("{:>12}", format_price(point.price)),
                    styles::price_style(),
                ),
                Span::styled(format!("  {}", point.platform), styles::muted_style()),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(format!(
            " Recent observations ({} total) ",
            trend.history.len()
        ))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    if items.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "  No price observations recorded yet",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        " [Esc] back to products | [u] refresh",
        styles::muted_style(),
    )));
    frame.render_widget(paragraph, area);
}
