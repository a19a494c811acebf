//! Full-screen terminal view.
//!
//! The view never touches the poll loop. It samples the table on its own redraw
//! tick and draws either the placeholder or the rows.

use std::{io, time::Duration};

use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use lookout_common::sys::shutdown_signal;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{error, info};

use crate::{
    errors::Result,
    render::{COLUMNS, MemoryBlock, RowKind},
    session::DashboardSession,
    table::{Phase, TableView},
};

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

const WIDTHS: [Constraint; 9] = [
    Constraint::Min(12),
    Constraint::Min(18),
    Constraint::Length(8),
    Constraint::Length(9),
    Constraint::Length(11),
    Constraint::Length(30),
    Constraint::Length(5),
    Constraint::Length(10),
    Constraint::Length(6),
];

pub fn draw(f: &mut Frame, view: &TableView, endpoint: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    match view.phase {
        Phase::Loading => draw_placeholder(f, view, endpoint, chunks[0]),
        Phase::Live => draw_table(f, view, endpoint, chunks[0]),
    }
    draw_status_bar(f, view, chunks[1]);
}

fn title<'a>(endpoint: &str, stale: bool) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!(" {endpoint} "),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if stale {
        spans.push(Span::styled(
            " STALE ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn draw_placeholder(f: &mut Frame, view: &TableView, endpoint: &str, area: Rect) {
    let mut lines = vec![Line::from(""), Line::from("Waiting for cluster data...")];
    if view.consecutive_failures > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} attempts failed so far", view.consecutive_failures),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title(endpoint, view.stale)),
    );
    f.render_widget(paragraph, area);
}

fn draw_table(f: &mut Frame, view: &TableView, endpoint: &str, area: Rect) {
    let header = Row::new(COLUMNS.map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows = view.rows.iter().map(|row| {
        let style = match row.kind {
            RowKind::Local => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            RowKind::Peer => Style::default(),
        };
        let height = match row.memory {
            MemoryBlock(Some(_)) => MemoryBlock::HEIGHT,
            MemoryBlock(None) => 1,
        };
        Row::new(row.cells().map(Cell::from))
            .style(style)
            .height(height)
            .bottom_margin(1)
    });

    let table = Table::new(rows, WIDTHS).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title(endpoint, view.stale)),
    );
    f.render_widget(table, area);
}

fn draw_status_bar(f: &mut Frame, view: &TableView, area: Rect) {
    let mut spans = match view.phase {
        Phase::Loading => vec![Span::styled(
            " LOADING ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )],
        Phase::Live => vec![
            Span::styled(" LIVE ", Style::default().fg(Color::Black).bg(Color::Green)),
            Span::raw(format!(" {} nodes", view.rows.len())),
        ],
    };
    if let Some(updated_at) = view.updated_at {
        spans.push(Span::raw(format!(
            " | updated {}",
            updated_at.format("%H:%M:%S")
        )));
    }
    if view.consecutive_failures > 0 {
        spans.push(Span::styled(
            format!(" | {} failed polls", view.consecutive_failures),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(" | q: quit", Style::default().fg(Color::DarkGray)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn should_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Raw mode and the alternate screen, undone on drop. Dropping also runs while
/// unwinding, so a panic while drawing still hands the shell back intact.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            error!("failed to disable raw mode, {err}");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            error!("failed to leave alternate screen, {err}");
        }
    }
}

/// Takes over the terminal until the operator quits, then restores the terminal
/// and stops the session, whichever way the view ended.
pub async fn run(mut session: DashboardSession) -> Result<()> {
    session.start();

    let result = watch(&session).await;
    let stopped = session.stop().await;
    if let Err(err) = &stopped {
        error!("failed to stop dashboard session, {err}");
    }
    info!("dashboard closed");
    result.and(stopped)
}

async fn watch(session: &DashboardSession) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    event_loop(&mut terminal, session).await
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &DashboardSession,
) -> Result<()> {
    let endpoint = session.endpoint();
    let table = session.table();
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = redraw.tick() => {
                let view = table.view();
                terminal.draw(|f| draw(f, &view, &endpoint))?;
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if should_quit(&key) => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            _ = &mut shutdown => break,
        }
    }
    Ok(())
}
