//! ASCII board renderer for terminals

use std::io::{self, Write};

use super::Frontend;
use crate::consts::*;
use crate::sim::{GamePhase, Snapshot};

/// Board height in character rows
pub const BOARD_ROWS: usize = 20;

const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

fn row_for(y: f32) -> usize {
    let cell = PLAYFIELD_HEIGHT / BOARD_ROWS as f32;
    ((y / cell).floor().max(0.0) as usize).min(BOARD_ROWS - 1)
}

/// Draw the playfield, obstacles as `o`, the player as `A` (or `X` when hit)
pub fn render_board(snapshot: &Snapshot) -> String {
    let mut grid = [[' '; LANE_COUNT]; BOARD_ROWS];

    for obstacle in &snapshot.obstacles {
        grid[row_for(obstacle.top)][obstacle.lane.index()] = 'o';
    }
    let player = if snapshot.phase == GamePhase::Terminated {
        'X'
    } else {
        'A'
    };
    grid[row_for(PLAYER_TOP)][snapshot.player_lane.index()] = player;

    let border = format!("+{}", "---+".repeat(LANE_COUNT));
    let mut out = String::with_capacity((BOARD_ROWS + 4) * (border.len() + 1));
    out.push_str(&border);
    out.push('\n');
    for row in &grid {
        out.push('|');
        for cell in row {
            out.push(' ');
            out.push(*cell);
            out.push_str(" |");
        }
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format!(
        "Level {}  Rounds {}  Speed {}\n",
        snapshot.level, snapshot.round_count, snapshot.speed
    ));
    if let Some(banner) = &snapshot.banner {
        out.push_str(&format!("*** {} ***\n", banner));
    }
    out
}

/// Redraws the board on a terminal when something visible changes
pub struct TextFrontend<W: Write> {
    out: W,
    last_frame: String,
}

impl TextFrontend<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextFrontend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: String) {
        if frame == self.last_frame {
            return;
        }
        if let Err(e) = write!(self.out, "{CLEAR_SCREEN}{frame}").and_then(|_| self.out.flush()) {
            log::warn!("Render error: {}", e);
        }
        self.last_frame = frame;
    }
}

impl<W: Write> Frontend for TextFrontend<W> {
    fn present(&mut self, snapshot: &Snapshot) {
        self.draw(render_board(snapshot));
    }

    fn terminated(&mut self, snapshot: &Snapshot) {
        let mut frame = render_board(snapshot);
        frame.push_str("Collision!\n");
        self.draw(frame);
    }
}
