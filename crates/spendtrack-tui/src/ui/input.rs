//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use spendtrack_core::routes::Route;

use crate::app::{
    can_add_email_char, can_add_full_name_char, can_add_password_char, App, AppState,
    LoginFocus, SignupFocus,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Alt+digit jumps to a route from anywhere, including inside a form
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c) = key.code {
            if let Some(route) = route_for_digit(c) {
                app.navigate(route);
            }
        }
        return Ok(false);
    }

    match app.route() {
        Route::Login => handle_login_input(app, key),
        Route::Signup => handle_signup_input(app, key),
        _ => handle_page_input(app, key),
    }
}

/// Route bound to a number key, in route table order
fn route_for_digit(c: char) -> Option<Route> {
    let index = c.to_digit(10)?.checked_sub(1)? as usize;
    Route::ALL.get(index).copied()
}

fn cycle_route(app: &mut App, forward: bool) {
    let current = Route::ALL
        .iter()
        .position(|r| *r == app.route())
        .unwrap_or(0);
    let len = Route::ALL.len();
    let next = if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    };
    app.navigate(Route::ALL[next]);
}

fn handle_page_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('l') => {
            app.logout();
        }
        KeyCode::Right | KeyCode::Tab => cycle_route(app, true),
        KeyCode::Left | KeyCode::BackTab => cycle_route(app, false),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Char(c) => {
            if let Some(route) = route_for_digit(c) {
                app.navigate(route);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => {
                // The form ignores this while a request is pending
                app.submit_login();
            }
            LoginFocus::SignupLink => {
                app.signup_focus = SignupFocus::FullName;
                app.navigate(Route::Signup);
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login.email.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button | LoginFocus::SignupLink => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login.email.chars().count(), c) {
                    app.login.email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login.password.chars().count(), c) {
                    app.login.password.push(c);
                }
            }
            LoginFocus::Button | LoginFocus::SignupLink => {
                // Ignore character input on buttons
            }
        },
        _ => {}
    }
    Ok(false)
}

fn handle_signup_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.signup_focus = app.signup_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.signup_focus = app.signup_focus.prev();
        }
        KeyCode::Enter => match app.signup_focus {
            SignupFocus::FullName => app.signup_focus = SignupFocus::Email,
            SignupFocus::Email => app.signup_focus = SignupFocus::Password,
            SignupFocus::Password | SignupFocus::Button => app.submit_signup(),
            SignupFocus::LoginLink => {
                app.login_focus = LoginFocus::Email;
                app.navigate(Route::Login);
            }
        },
        KeyCode::Backspace => match app.signup_focus {
            SignupFocus::FullName => {
                app.signup.full_name.pop();
            }
            SignupFocus::Email => {
                app.signup.email.pop();
            }
            SignupFocus::Password => {
                app.signup.password.pop();
            }
            SignupFocus::Button | SignupFocus::LoginLink => {}
        },
        KeyCode::Char(c) => match app.signup_focus {
            SignupFocus::FullName => {
                if can_add_full_name_char(app.signup.full_name.chars().count(), c) {
                    app.signup.full_name.push(c);
                }
            }
            SignupFocus::Email => {
                if can_add_email_char(app.signup.email.chars().count(), c) {
                    app.signup.email.push(c);
                }
            }
            SignupFocus::Password => {
                if can_add_password_char(app.signup.password.chars().count(), c) {
                    app.signup.password.push(c);
                }
            }
            SignupFocus::Button | SignupFocus::LoginLink => {}
        },
        _ => {}
    }
    Ok(false)
}
