//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{can_add_email_char, can_add_password_char, App, AppState, LoginFocus};
use crate::router::Route;

/// Number of items to jump on page up/down
const PAGE_SCROLL: i64 = 10;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Help overlay eats everything except its close keys
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Quit confirmation
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

    // The login screen owns the keyboard while active
    if app.route == Route::Login {
        return handle_login_input(app, key).await;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('1') => app.navigate(Route::Products),
        KeyCode::Char('2') => app.navigate(Route::Favorites),
        KeyCode::Char('u') => match app.route {
            Route::History { model_id } => app.fetch_history(model_id),
            _ => app.refresh_all(),
        },
        KeyCode::Char('l') => {
            if app.is_authenticated() {
                app.logout();
            } else {
                app.navigate(Route::Login);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-PAGE_SCROLL),
        KeyCode::PageDown => app.move_selection(PAGE_SCROLL),
        _ => handle_route_input(app, key),
    }

    Ok(false)
}

/// Keys that only mean something on a specific screen
fn handle_route_input(app: &mut App, key: KeyEvent) {
    match app.route {
        Route::Products => match key.code {
            KeyCode::Enter => {
                if let Some(product) = app.selected_product() {
                    let model_id = product.id;
                    app.navigate(Route::History { model_id });
                }
            }
            KeyCode::Char('f') => app.toggle_selected_favorite(),
            KeyCode::Char('s') => app.start_scrape(None),
            _ => {}
        },
        Route::Favorites => match key.code {
            KeyCode::Char('d') => app.remove_selected_favorite(),
            KeyCode::Esc => app.navigate(Route::Products),
            _ => {}
        },
        Route::History { .. } => match key.code {
            KeyCode::Esc | KeyCode::Backspace => app.navigate(Route::Products),
            _ => {}
        },
        Route::NotFound => {
            if key.code == KeyCode::Esc {
                app.navigate(Route::Products);
            }
        }
        Route::Login => {}
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // The catalog is browsable without an account
            app.navigate(Route::Products);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login().await,
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }

    Ok(false)
}
