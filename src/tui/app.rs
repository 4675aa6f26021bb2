use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::client::{HttpTasksApi, TasksApi};
use crate::model::{Task, TaskCounts};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input row
    Insert,
    /// Editing the text of an existing task inline
    Edit,
    /// Awaiting y/n for a delete
    Confirm,
}

/// Transient inline-edit state. UI-only; never part of the task itself.
#[derive(Debug, Clone)]
pub struct EditState {
    pub id: i64,
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    pub cursor: usize,
}

/// Main application state. Owns the in-memory task list for this session and
/// drives every API call; the list is only patched from rows the server
/// returned, never from optimistic guesses.
pub struct App {
    pub client: Box<dyn TasksApi>,
    pub tasks: Vec<Task>,
    pub mode: Mode,
    /// Cursor index into the visible rows (pending first, then completed)
    pub cursor: usize,
    /// New-task input buffer (Insert mode)
    pub input: String,
    /// Byte offset into `input`, always on a char boundary
    pub input_cursor: usize,
    pub edit: Option<EditState>,
    /// Task id awaiting delete confirmation
    pub confirm_delete: Option<i64>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub theme: Theme,
}

impl App {
    pub fn new(client: Box<dyn TasksApi>) -> Self {
        App {
            client,
            tasks: Vec::new(),
            mode: Mode::Navigate,
            cursor: 0,
            input: String::new(),
            input_cursor: 0,
            edit: None,
            confirm_delete: None,
            status_message: None,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::of(&self.tasks)
    }

    /// Task ids in display order: pending in list order, then completed in
    /// list order. The cursor indexes into this.
    pub fn visible_ids(&self) -> Vec<i64> {
        let pending = self.tasks.iter().filter(|t| !t.completed).map(|t| t.id);
        let completed = self.tasks.iter().filter(|t| t.completed).map(|t| t.id);
        pending.chain(completed).collect()
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.visible_ids().get(self.cursor).copied()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let id = self.selected_id()?;
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.visible_ids().len();
        if count == 0 {
            self.cursor = 0;
        } else {
            self.cursor = self.cursor.min(count - 1);
        }
    }

    fn replace_entry(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    // -----------------------------------------------------------------------
    // Controller operations
    // -----------------------------------------------------------------------

    /// Fetch the full list and replace the in-memory copy wholesale. On
    /// failure the prior list stays as-is.
    pub fn load(&mut self) {
        match self.client.list() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.clamp_cursor();
                self.status_message = None;
            }
            Err(_) => {
                self.status_message = Some("Failed to load tasks".to_string());
            }
        }
    }

    /// Create a task from the input buffer. Blank after trim is a no-op. The
    /// server's returned row is prepended, matching the list's newest-first
    /// order.
    pub fn add(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        match self.client.create(&text) {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.input.clear();
                self.input_cursor = 0;
                self.status_message = None;
            }
            Err(_) => {
                self.status_message = Some("Failed to add task".to_string());
            }
        }
    }

    /// Flip the completed flag of the task under the cursor via the server,
    /// then patch in the returned row.
    pub fn toggle_selected(&mut self) {
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        match self.client.toggle(id) {
            Ok(task) => {
                self.replace_entry(task);
                self.clamp_cursor();
                self.status_message = None;
            }
            Err(_) => {
                self.status_message = Some("Failed to update task".to_string());
            }
        }
    }

    /// Begin inline editing of the task under the cursor. Only pending tasks
    /// carry the edit affordance.
    pub fn start_edit(&mut self) {
        let (id, buffer) = match self.selected_task() {
            Some(t) if !t.completed => (t.id, t.text.clone()),
            _ => return,
        };
        let cursor = buffer.len();
        self.edit = Some(EditState { id, buffer, cursor });
        self.mode = Mode::Edit;
    }

    /// Save the edit buffer. Blank after trim or unchanged text discards the
    /// edit without a request.
    pub fn save_edit(&mut self) {
        let edit = match self.edit.take() {
            Some(e) => e,
            None => return,
        };
        self.mode = Mode::Navigate;

        let text = edit.buffer.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self
            .tasks
            .iter()
            .any(|t| t.id == edit.id && t.text == text)
        {
            return;
        }
        match self.client.edit(edit.id, &text) {
            Ok(task) => {
                self.replace_entry(task);
                self.status_message = None;
            }
            Err(_) => {
                self.status_message = Some("Failed to edit task".to_string());
            }
        }
    }

    /// Discard the edit buffer and re-render from the unmodified list.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.mode = Mode::Navigate;
    }

    /// Delete a task after confirmation, then drop it from the list. A 404
    /// from a double-press is a normal failure path, not fatal.
    pub fn remove(&mut self, id: i64) {
        match self.client.delete(id) {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.clamp_cursor();
                self.status_message = None;
            }
            Err(_) => {
                self.status_message = Some("Failed to delete task".to_string());
            }
        }
    }
}

/// Run the TUI against the given API base URL
pub fn run(api_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = HttpTasksApi::new(api_url);
    let mut app = App::new(Box::new(client));
    app.load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{StubApi, app_with_tasks, stub_task};
    use pretty_assertions::assert_eq;

    #[test]
    fn load_replaces_list_wholesale() {
        let mut app = app_with_tasks(vec![]);
        app.tasks = vec![stub_task(99, "stale", false)];
        app.load();
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn load_failure_keeps_prior_list() {
        let api = StubApi::with_tasks(vec![]);
        api.fail.set(true);
        let mut app = App::new(Box::new(api));
        app.tasks = vec![stub_task(1, "keep me", false)];
        app.load();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Failed to load tasks"));
    }

    #[test]
    fn add_trims_and_prepends_server_row() {
        let mut app = app_with_tasks(vec![stub_task(1, "old", false)]);
        app.input = "  new task  ".to_string();
        app.add();
        assert_eq!(app.tasks[0].text, "new task");
        assert_eq!(app.tasks[1].text, "old");
        assert!(app.input.is_empty());
    }

    #[test]
    fn add_blank_is_a_no_op() {
        let mut app = app_with_tasks(vec![]);
        app.input = "   ".to_string();
        app.add();
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn toggle_patches_entry_from_server_row() {
        let mut app = app_with_tasks(vec![stub_task(1, "a", false)]);
        app.cursor = 0;
        app.toggle_selected();
        assert!(app.tasks[0].completed);
        app.toggle_selected();
        assert!(!app.tasks[0].completed);
    }

    #[test]
    fn edit_affordance_skips_completed_rows() {
        let mut app = app_with_tasks(vec![stub_task(1, "done", true)]);
        app.cursor = 0;
        app.start_edit();
        assert!(app.edit.is_none());
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn save_edit_replaces_matching_entry() {
        let mut app = app_with_tasks(vec![stub_task(1, "before", false)]);
        app.cursor = 0;
        app.start_edit();
        app.edit.as_mut().unwrap().buffer = "after".to_string();
        app.save_edit();
        assert_eq!(app.tasks[0].text, "after");
        assert!(app.edit.is_none());
    }

    #[test]
    fn cancel_edit_discards_buffer() {
        let mut app = app_with_tasks(vec![stub_task(1, "before", false)]);
        app.cursor = 0;
        app.start_edit();
        app.edit.as_mut().unwrap().buffer = "scratch".to_string();
        app.cancel_edit();
        assert_eq!(app.tasks[0].text, "before");
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn remove_filters_entry_out() {
        let mut app = app_with_tasks(vec![stub_task(1, "a", false), stub_task(2, "b", false)]);
        app.remove(1);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].id, 2);
    }

    #[test]
    fn remove_missing_id_surfaces_notice_and_keeps_list() {
        let mut app = app_with_tasks(vec![stub_task(1, "a", false)]);
        app.remove(42);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Failed to delete task"));
    }

    #[test]
    fn visible_ids_put_pending_before_completed() {
        let app = app_with_tasks(vec![
            stub_task(3, "done", true),
            stub_task(2, "open", false),
            stub_task(1, "open too", false),
        ]);
        assert_eq!(app.visible_ids(), vec![2, 1, 3]);
    }
}
