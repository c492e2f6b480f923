//! trackify board command implementation
//!
//! Interactive session view: cards as rows, one live timer, key bindings for
//! the timer transitions. Everything runs on a single thread; timer ticks,
//! key input and settled network calls interleave in one select loop, and
//! quitting flushes the running timer before teardown.

use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute, queue};

use crate::card::{format_elapsed, CardState};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::session::{Session, SessionEvent};

const INPUT_POLL: Duration = Duration::from_millis(50);
const KEY_HELP: &str = "space start/pause  s stop  u urgency  d delete  j/k select  q quit";

/// Restores the terminal even when the loop errors out
struct RawTerminal;

impl RawTerminal {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

enum KeyAction {
    None,
    Redraw,
    Quit,
}

pub async fn run(gateway: Gateway) -> Result<()> {
    let mut session = Session::new(gateway);
    session.load().await;

    let _terminal = RawTerminal::enter()?;
    let mut selected: usize = 0;
    let mut status = String::new();
    let mut poll = tokio::time::interval(INPUT_POLL);

    draw(&session, selected, &status)?;

    loop {
        let mut dirty = false;

        tokio::select! {
            session_event = session.next_event() => {
                match session_event {
                    SessionEvent::Tick(_) | SessionEvent::Removed(_) => dirty = true,
                    SessionEvent::NetSettled => {}
                }
            }
            _ = poll.tick() => {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let ctrl_c = key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c {
                        session.shutdown().await;
                        return Ok(());
                    }
                    match handle_key(&mut session, key.code, &mut selected, &mut status) {
                        KeyAction::Quit => {
                            session.shutdown().await;
                            return Ok(());
                        }
                        KeyAction::Redraw => dirty = true,
                        KeyAction::None => {}
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                session.shutdown().await;
                return Ok(());
            }
        }

        if dirty {
            selected = selected.min(session.cards().len().saturating_sub(1));
            draw(&session, selected, &status)?;
        }
    }
}

fn handle_key(
    session: &mut Session,
    code: KeyCode,
    selected: &mut usize,
    status: &mut String,
) -> KeyAction {
    let count = session.cards().len();

    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            *selected = selected.saturating_sub(1);
            return KeyAction::Redraw;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if count > 0 && *selected < count - 1 {
                *selected += 1;
            }
            return KeyAction::Redraw;
        }
        _ => {}
    }

    let (id, running, urgency) = match session.display_order().get(*selected) {
        Some(card) => (card.id, card.state() == CardState::Running, card.urgency),
        None => return KeyAction::None,
    };

    let outcome = match code {
        KeyCode::Char(' ') => {
            if running {
                session.pause(id)
            } else {
                session.start(id)
            }
        }
        KeyCode::Char('s') => session.stop(id),
        KeyCode::Char('u') => session.set_urgency(id, urgency.cycled()),
        KeyCode::Char('d') => session.request_delete(id).map(|()| {
            status.clear();
            status.push_str("delete requested, waiting for the card store");
        }),
        _ => return KeyAction::None,
    };

    match outcome {
        Ok(()) => {
            if code != KeyCode::Char('d') {
                status.clear();
            }
        }
        Err(err) => {
            status.clear();
            status.push_str(&err.to_string());
        }
    }
    KeyAction::Redraw
}

fn draw(session: &Session, selected: usize, status: &str) -> Result<()> {
    fn put(out: &mut std::io::Stdout, row: &mut u16, line: &str) -> Result<()> {
        queue!(out, cursor::MoveTo(0, *row))?;
        out.write_all(line.as_bytes())?;
        *row += 1;
        Ok(())
    }

    let mut out = stdout();
    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let mut row: u16 = 0;

    put(&mut out, &mut row, "trackify board")?;
    put(&mut out, &mut row, "")?;
    put(
        &mut out,
        &mut row,
        &format!(
            "  {:<3} {:<32} {:<7} {:>9} {:<7} {}",
            "", "DESCRIPTION", "URGENCY", "TIME", "STATE", "CREATED"
        ),
    )?;

    let ordered = session.display_order();
    if ordered.is_empty() {
        put(&mut out, &mut row, "  no cards; create one with: trackify add")?;
    }
    for (idx, card) in ordered.iter().enumerate() {
        let marker = if idx == selected { ">" } else { " " };
        let state = match card.state() {
            CardState::Running => "running",
            CardState::Stopped => "stopped",
            CardState::Idle => "idle",
        };
        let line = format!(
            "{} {:<3} {:<32} {:<7} {:>9} {:<7} {}",
            marker,
            idx + 1,
            truncated(&card.description, 32),
            card.urgency.to_string(),
            format_elapsed(session.displayed_time(card)),
            state,
            card.created
        );
        put(&mut out, &mut row, &line)?;
    }

    put(&mut out, &mut row, "")?;
    if !status.is_empty() {
        put(&mut out, &mut row, &format!("  {status}"))?;
    }
    put(&mut out, &mut row, &format!("  {KEY_HELP}"))?;

    out.flush()?;
    Ok(())
}

fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_short_text() {
        assert_eq!(truncated("short", 10), "short");
        assert_eq!(truncated("exactlyten", 10), "exactlyten");
    }

    #[test]
    fn truncation_marks_long_text() {
        let long = "a very long card description indeed";
        let out = truncated(long, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }
}
