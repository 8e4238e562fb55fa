//! Login and signup forms.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus, SignupFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

const FORM_WIDTH: u16 = 52;

/// Visible characters inside a field's brackets
const FIELD_WIDTH: usize = 28;

/// Label column width, so fields line up
const LABEL_WIDTH: usize = 11;

/// Fit a value to the field, keeping the end (where the cursor is) visible
fn field_text(value: &str, masked: bool) -> String {
    let chars: Vec<char> = if masked {
        vec!['*'; value.chars().count()]
    } else {
        value.chars().collect()
    };
    let start = chars.len().saturating_sub(FIELD_WIDTH - 1);
    chars[start..].iter().collect()
}

fn field_line<'a>(label: &'a str, value: &str, masked: bool, focused: bool) -> Line<'a> {
    let cursor = if focused { "▌" } else { "" };
    let text = format!("{}{}", field_text(value, masked), cursor);
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<width$}[", label, width = LABEL_WIDTH), styles::muted_style()),
        Span::styled(format!("{:<width$}", text, width = FIELD_WIDTH), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

fn button_line(label: &str, focused: bool, busy: bool) -> Line<'static> {
    let text = if focused && !busy {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if busy {
        styles::muted_style()
    } else {
        styles::field_style(focused)
    };
    let pad = (FORM_WIDTH as usize - 2).saturating_sub(text.chars().count() + 2) / 2;
    Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::raw("["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn link_line<'a>(prompt: &'a str, link: &'a str, focused: bool) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(prompt, styles::muted_style()),
        Span::raw(" "),
        Span::styled(link, styles::link_style(focused)),
    ])
}

fn render_form(frame: &mut Frame, area: Rect, title: &str, mut lines: Vec<Line>, error: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let height = lines.len() as u16 + 2;
    let form_area = centered_rect_fixed(FORM_WIDTH, height, area);
    frame.render_widget(Clear, form_area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), form_area);
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let focus = app.login_focus;
    let busy = form.is_submitting();

    let lines = vec![
        Line::from(Span::styled("  Welcome Back", styles::title_style())),
        Line::from(Span::styled(
            "  Please enter your details to login",
            styles::muted_style(),
        )),
        Line::from(""),
        field_line("Email", &form.email, false, focus == LoginFocus::Email),
        field_line("Password", &form.password, true, focus == LoginFocus::Password),
        Line::from(""),
        button_line(
            if busy { "Please wait..." } else { "Login" },
            focus == LoginFocus::Button,
            busy,
        ),
        Line::from(""),
        link_line(
            "Don't have an account?",
            "Sign Up",
            focus == LoginFocus::SignupLink,
        ),
    ];

    render_form(frame, area, "Login", lines, form.error());
}

pub fn render_signup(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.signup;
    let focus = app.signup_focus;
    let busy = form.is_submitting();

    let lines = vec![
        Line::from(Span::styled("  Create An Account", styles::title_style())),
        Line::from(Span::styled(
            "  Start tracking your spendings by joining us",
            styles::muted_style(),
        )),
        Line::from(""),
        field_line("Full Name", &form.full_name, false, focus == SignupFocus::FullName),
        field_line("Email", &form.email, false, focus == SignupFocus::Email),
        field_line("Password", &form.password, true, focus == SignupFocus::Password),
        Line::from(""),
        button_line(
            if busy { "Signing Up..." } else { "Sign Up" },
            focus == SignupFocus::Button,
            busy,
        ),
        Line::from(""),
        link_line(
            "Already have an account?",
            "Login",
            focus == SignupFocus::LoginLink,
        ),
    ];

    render_form(frame, area, "Sign Up", lines, form.error());
}
