use chrono::{Datelike, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Terminal,
};
use std::io;

use taskers::error::BoardError;
use taskers::kanban_board::TaskBoard;
use taskers::special_day::{parse_month, SpecialDayForm};
use taskers::store::TaskStore;
use taskers::task::Bucket;
use taskers::view::{MonthWindow, View};

/// How the board session ended.
pub enum Exit {
    Quit,
    ReauthRequired,
}

struct App<S> {
    board: TaskBoard<S>,
    selected_status: Bucket,
    selected_task: usize,
    months: Option<MonthWindow>,
    message: String,
}

impl<S: TaskStore> App<S> {
    fn new(board: TaskBoard<S>) -> Self {
        let months = match board.view() {
            View::Monthly { month } => Some(MonthWindow::starting(*month)),
            _ => None,
        };
        Self {
            board,
            selected_status: Bucket::Todo,
            selected_task: 0,
            months,
            message: String::new(),
        }
    }

    fn column_len(&self) -> usize {
        self.board.columns().get(self.selected_status).len()
    }

    fn clamp_selection(&mut self) {
        self.selected_task = self.selected_task.min(self.column_len().saturating_sub(1));
    }

    /// Records the outcome in the status line. `Err(())` means the session
    /// is gone and the UI should stop.
    fn report<T>(&mut self, result: Result<T, BoardError>, done: &str) -> Result<Option<T>, ()> {
        match result {
            Ok(value) => {
                self.message = done.to_string();
                Ok(Some(value))
            }
            Err(BoardError::ReauthRequired) => Err(()),
            Err(err) => {
                self.message = err.to_string();
                Ok(None)
            }
        }
    }

    async fn shift_period(&mut self, forward: bool) -> Result<(), ()> {
        let view = match (self.months.as_mut(), self.board.view()) {
            (Some(window), _) => {
                let moved = if forward { window.forward() } else { window.back() };
                if !moved {
                    return Ok(());
                }
                View::Monthly {
                    month: window.current(),
                }
            }
            (None, view) if forward => view.next(),
            (None, view) => view.prev(),
        };
        if &view == self.board.view() {
            return Ok(());
        }
        let result = self.board.set_view(view).await;
        self.report(result, "")?;
        self.selected_task = 0;
        Ok(())
    }

    // Drops the selected task at the bottom of another column.
    async fn move_selected(&mut self, to: Bucket) -> Result<(), ()> {
        if to == self.selected_status || self.selected_task >= self.column_len() {
            return Ok(());
        }
        let to_index = self.board.columns().get(to).len();
        let result = self
            .board
            .move_task(self.selected_status, self.selected_task, to, to_index)
            .await;
        self.report(result, "Task moved")?;
        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<bool, ()> {
        let selected_id = self
            .board
            .columns()
            .get(self.selected_status)
            .get(self.selected_task)
            .map(|t| t.id.clone());

        match key.code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char('a') => {
                if let Some(title) = prompt("Enter task title") {
                    let result = self.board.add_task(&title).await;
                    self.report(result, "Task added")?;
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = selected_id {
                    if let Some(title) = prompt("Enter new title") {
                        let result = self.board.edit_title(&id, &title).await;
                        self.report(result, "Task updated")?;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected_id {
                    let result = self.board.delete_task(&id, self.selected_status).await;
                    self.report(result, "Task deleted")?;
                }
            }
            KeyCode::Char('s') => {
                if let Some(form) = prompt_special_day() {
                    let result = self.board.add_special_day(form).await;
                    self.report(result, "Special day added")?;
                }
            }
            KeyCode::Char('n') => self.shift_period(true).await?,
            KeyCode::Char('p') => self.shift_period(false).await?,
            KeyCode::Char(c @ '1'..='5') => {
                let slot = usize::from(c as u8 - b'1');
                if let Some(view) = self.board.view().pick_day(slot) {
                    let result = self.board.set_view(view).await;
                    self.report(result, "")?;
                    self.selected_task = 0;
                }
            }
            KeyCode::Char('r') => {
                let result = self.board.load().await;
                self.report(result, "Reloaded")?;
            }
            KeyCode::Char('>') | KeyCode::Enter => {
                let to = self.selected_status.next();
                self.move_selected(to).await?;
            }
            KeyCode::Char('<') => {
                let to = self.selected_status.prev();
                self.move_selected(to).await?;
            }
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                if self.selected_task > 0 && self.selected_task < self.column_len() {
                    let bucket = self.selected_status;
                    let index = self.selected_task;
                    let result = self.board.move_task(bucket, index, bucket, index - 1).await;
                    if let Some(true) = self.report(result, "")? {
                        self.selected_task -= 1;
                    }
                }
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                if self.selected_task + 1 < self.column_len() {
                    let bucket = self.selected_status;
                    let index = self.selected_task;
                    let result = self.board.move_task(bucket, index, bucket, index + 1).await;
                    if let Some(true) = self.report(result, "")? {
                        self.selected_task += 1;
                    }
                }
            }
            KeyCode::Left => {
                self.selected_status = self.selected_status.prev();
            }
            KeyCode::Right => {
                self.selected_status = self.selected_status.next();
            }
            KeyCode::Up => {
                if self.selected_task > 0 {
                    self.selected_task -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_task + 1 < self.column_len() {
                    self.selected_task += 1;
                }
            }
            _ => {}
        }
        self.clamp_selection();
        Ok(true)
    }
}

pub async fn run_app<B: Backend, S: TaskStore>(
    terminal: &mut Terminal<B>,
    board: TaskBoard<S>,
) -> io::Result<Exit> {
    let mut app = App::new(board);
    loop {
        terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let mut header_spans = vec![Span::styled(
                app.board.view().title(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for (slot, day) in app.board.view().day_strip().into_iter().enumerate() {
                let style = if slot == 0 {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                header_spans.push(Span::styled(
                    format!("  {}:{}", slot + 1, day.format("%a %d")),
                    style,
                ));
            }
            let header = Paragraph::new(Line::from(header_spans))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, rows[0]);

            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Percentage(33),
                    Constraint::Percentage(33),
                    Constraint::Percentage(34),
                ])
                .split(rows[1]);

            for bucket in Bucket::ALL {
                let tasks = app.board.columns().get(bucket);
                let items: Vec<ListItem> = tasks
                    .iter()
                    .map(|t| {
                        let mut spans = vec![
                            Span::raw(format!("[#{}] ", t.id)),
                            Span::styled(t.title.as_str(), Style::default().fg(Color::White)),
                        ];
                        if let Some(due) = t.due_date {
                            spans.push(Span::raw(format!(" (Due: {due})")));
                        }
                        if t.is_special_day {
                            spans.push(Span::styled(" *", Style::default().fg(Color::Yellow)));
                        }
                        ListItem::new(Line::from(spans))
                    })
                    .collect();

                let is_selected = app.selected_status == bucket;
                let list = List::new(items)
                    .block(
                        Block::default()
                            .title(format!("{} ({})", bucket.label(), tasks.len()))
                            .borders(Borders::ALL)
                            .border_style(if is_selected {
                                Style::default().fg(Color::Cyan)
                            } else {
                                Style::default()
                            }),
                    )
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

                let mut state = ListState::default();
                if is_selected && !tasks.is_empty() {
                    state.select(Some(app.selected_task));
                }
                f.render_stateful_widget(list, chunks[bucket.index()], &mut state);
            }

            let help = "a add  e edit  d delete  </> move  shift+up/down reorder  n/p period  1-5 day  s special day  r reload  q quit";
            let footer = Paragraph::new(vec![
                Line::from(Span::styled(app.message.as_str(), Style::default().fg(Color::Yellow))),
                Line::from(Span::raw(help)),
            ])
            .block(Block::default().borders(Borders::TOP));
            f.render_widget(footer, rows[2]);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key).await {
                Ok(true) => {}
                Ok(false) => return Ok(Exit::Quit),
                Err(()) => return Ok(Exit::ReauthRequired),
            }
            if matches!(key.code, KeyCode::Char('a' | 'e' | 's')) {
                terminal.clear()?;
            }
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("\r\n{}", message);
    let mut input = String::new();
    let read = io::stdin().read_line(&mut input);
    enable_raw_mode().ok();
    match read {
        Ok(_) => Some(input.trim().to_string()),
        Err(_) => None,
    }
}

fn prompt_special_day() -> Option<SpecialDayForm> {
    let title = prompt("Special day task")?;
    let month = prompt("Month (name or number)")?;
    let day = prompt("Day (1-31)")?;
    Some(SpecialDayForm {
        year: Local::now().year(),
        month: parse_month(&month).ok(),
        day: day.trim().parse().ok(),
        title,
    })
}

