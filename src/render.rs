use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use itertools::Itertools;

use crate::gridsnake::{Coord, Snapshot};

/// Plain-text board encoding: `H` head, `B` body, `F` food, `.` empty,
/// cells space-separated, rows newline-separated. This is what goes into
/// LLM prompts and telemetry rows.
#[must_use]
pub fn board_text(snap: &Snapshot) -> String {
    (0..snap.height)
        .map(|y| {
            (0..snap.width)
                .map(|x| {
                    let cell = Coord { x, y };
                    if cell == snap.head() {
                        "H"
                    } else if snap.snake.contains(&cell) {
                        "B"
                    } else if cell == snap.food {
                        "F"
                    } else {
                        "."
                    }
                })
                .join(" ")
        })
        .join("\n")
}

/// Redraws the whole board with the score header and a colored border.
pub fn draw(
    out: &mut impl Write,
    snap: &Snapshot,
    label: &str,
) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    writeln!(out, "{}", format!("Score: {}", snap.score).yellow())?;
    if !label.is_empty() {
        writeln!(out, "Proposer: {label}")?;
    }

    let width = usize::try_from(snap.width).unwrap_or(0);
    let horizontal = format!("+{}+", "-".repeat(width));
    writeln!(out, "{}", horizontal.clone().blue())?;
    for y in 0..snap.height {
        write!(out, "{}", "|".blue())?;
        for x in 0..snap.width {
            let cell = Coord { x, y };
            if cell == snap.head() {
                write!(out, "{}", "O".green().bold())?;
            } else if snap.snake.contains(&cell) {
                write!(out, "{}", "o".green())?;
            } else if cell == snap.food {
                write!(out, "{}", "*".red())?;
            } else {
                write!(out, " ")?;
            }
        }
        writeln!(out, "{}", "|".blue())?;
    }
    writeln!(out, "{}", horizontal.blue())?;

    if snap.over {
        writeln!(
            out,
            "{}",
            format!("Game Over! Final Score: {}", snap.score).red()
        )?;
    }
    out.flush()
}
