//! Masked password entry on the terminal.

use std::io::{BufRead, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};

use crate::error::{AppError, Result};

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub fn password(prompt: &str) -> Result<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err(AppError::Terminal("interrupted".to_string()));
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

/// Password and confirmation, both masked.
pub fn password_twice() -> Result<(String, String)> {
    let first = password("Password: ")?;
    let second = password("Confirm password: ")?;
    Ok((first, second))
}

/// Read `count` lines from stdin, for scripted use.
pub fn lines_from_stdin(count: usize) -> Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut lines = Vec::with_capacity(count);
    for line in stdin.lock().lines().take(count) {
        lines.push(line?.trim_end_matches('\r').to_string());
    }
    if lines.len() < count {
        return Err(AppError::Terminal(format!(
            "expected {count} line(s) on stdin, got {}",
            lines.len()
        )));
    }
    Ok(lines)
}
