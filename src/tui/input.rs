use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Insert => handle_insert(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => {
            let count = app.visible_ids().len();
            if count > 0 && app.cursor < count - 1 {
                app.cursor += 1;
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::Char('a') | KeyCode::Char('i')) => {
            app.status_message = None;
            app.input.clear();
            app.input_cursor = 0;
            app.mode = Mode::Insert;
        }
        (KeyModifiers::NONE, KeyCode::Char(' ') | KeyCode::Char('x')) => {
            app.toggle_selected();
        }
        (KeyModifiers::NONE, KeyCode::Char('e')) => {
            app.start_edit();
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) => {
            if let Some(id) = app.selected_id() {
                app.confirm_delete = Some(id);
                app.mode = Mode::Confirm;
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('r')) => {
            app.load();
        }
        _ => {}
    }
}

fn handle_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.input_cursor = 0;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                // Blank add is a no-op
                app.input.clear();
                app.input_cursor = 0;
                app.mode = Mode::Navigate;
            } else {
                app.add();
                // On failure the buffer survives so the user can retry
                if app.input.is_empty() {
                    app.mode = Mode::Navigate;
                }
            }
        }
        KeyCode::Char(c) => {
            app.input.insert(app.input_cursor, c);
            app.input_cursor += c.len_utf8();
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                let prev = prev_boundary(&app.input, app.input_cursor);
                app.input.remove(prev);
                app.input_cursor = prev;
            }
        }
        KeyCode::Left => {
            app.input_cursor = prev_boundary(&app.input, app.input_cursor);
        }
        KeyCode::Right => {
            app.input_cursor = next_boundary(&app.input, app.input_cursor);
        }
        KeyCode::Home => app.input_cursor = 0,
        KeyCode::End => app.input_cursor = app.input.len(),
        _ => {}
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.cancel_edit();
        }
        KeyCode::Enter => {
            app.save_edit();
        }
        KeyCode::Char(c) => {
            if let Some(edit) = &mut app.edit {
                edit.buffer.insert(edit.cursor, c);
                edit.cursor += c.len_utf8();
            }
        }
        KeyCode::Backspace => {
            if let Some(edit) = &mut app.edit
                && edit.cursor > 0
            {
                let prev = prev_boundary(&edit.buffer, edit.cursor);
                edit.buffer.remove(prev);
                edit.cursor = prev;
            }
        }
        KeyCode::Left => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = prev_boundary(&edit.buffer, edit.cursor);
            }
        }
        KeyCode::Right => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = next_boundary(&edit.buffer, edit.cursor);
            }
        }
        KeyCode::Home => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = 0;
            }
        }
        KeyCode::End => {
            if let Some(edit) = &mut app.edit {
                edit.cursor = edit.buffer.len();
            }
        }
        _ => {}
    }
}

fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            let id = app.confirm_delete.take();
            app.mode = Mode::Navigate;
            if let Some(id) = id {
                app.remove(id);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.confirm_delete = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

/// Largest char boundary strictly before `i` (0 if none)
fn prev_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while i > 0 {
        i -= 1;
        if s.is_char_boundary(i) {
            return i;
        }
    }
    0
}

/// Smallest char boundary strictly after `i` (len if none)
fn next_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut i = i + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
