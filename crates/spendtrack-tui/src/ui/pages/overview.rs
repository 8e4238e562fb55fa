//! Frames for the ledger pages (dashboard, income, expense, category, filter).

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use spendtrack_core::routes::Route;

use crate::app::App;
use crate::ui::styles;

fn description(route: Route) -> &'static str {
    match route {
        Route::Dashboard => "Overview of recent income and expenses.",
        Route::Income => "Income entries by source and date.",
        Route::Expense => "Expense entries by category and date.",
        Route::Category => "Categories used to group income and expenses.",
        Route::Filter => "Search transactions by date range and keyword.",
        Route::Login | Route::Signup => "",
    }
}

pub fn render(frame: &mut Frame, app: &App, route: Route, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(description(route), styles::muted_style())),
        Line::from(""),
    ];

    match app.current_user() {
        Some(user) => {
            lines.push(Line::from(vec![
                Span::styled("Signed in as ", styles::muted_style()),
                Span::styled(user.display_name(), styles::highlight_style()),
            ]));
            if let Some(email) = user.email() {
                lines.push(Line::from(Span::styled(
                    email.to_string(),
                    styles::muted_style(),
                )));
            }
        }
        None if app.api.token().is_some() => {
            // Restored from storage; the user record only arrives with a login
            lines.push(Line::from(Span::styled(
                "Session restored from a saved token.",
                styles::muted_style(),
            )));
        }
        None => {
            lines.push(Line::from(vec![
                Span::styled("Not signed in. Press ", styles::muted_style()),
                Span::styled("6", styles::help_key_style()),
                Span::styled(" to log in.", styles::muted_style()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Backend: {}", app.api.endpoints().base_url()),
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(Span::styled(format!(" {} ", route.title()), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
