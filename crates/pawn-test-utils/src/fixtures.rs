//! Placeholder game data built on arrays.
//!
//! - [`Board`]: squares and players for one match, sized at creation.
//! - [`DrawList`]: per-frame command, index, and vertex streams.
//!
//! Element types mirror the client's shapes closely enough to exercise
//! alignment: [`BoardSquare`] and [`BoardPlayer`] have power-of-two sizes
//! and fit in an arena, while [`DrawVertex`] (28 bytes) and
//! [`DrawCommand`] (12 bytes) need an allocator without that restriction.

use pawn_alloc::Allocator;
use pawn_array::Array;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    #[default]
    None,
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct BoardSquare {
    pub row: i16,
    pub column: i16,
    pub piece: PieceKind,
    pub owner: u8,
    pub _pad: [u8; 2],
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct BoardPlayer {
    pub id: i64,
    pub moves_made: i64,
    pub elo: i32,
    pub average_time_per_move: f32,
    pub move_time_left: f32,
    pub total_time_left: f32,
}

pub struct Board<'a> {
    pub rows: i32,
    pub columns: i32,
    pub squares: Array<'a, BoardSquare>,
    pub players: Array<'a, BoardPlayer>,
    pub player_turn: i32,
}

/// Allocate a `rows × columns` board with room for `player_count` players.
///
/// Squares are populated in row-major order; the player list starts empty.
///
/// # Panics
///
/// Panics if either dimension exceeds `i16::MAX`.
#[track_caller]
pub fn create_board(
    allocator: &dyn Allocator,
    rows: i32,
    columns: i32,
    player_count: usize,
) -> Board<'_> {
    let (Ok(row_count), Ok(column_count)) =
        (i16::try_from(rows.max(0)), i16::try_from(columns.max(0)))
    else {
        panic!("board of {rows}x{columns} squares exceeds i16 coordinates");
    };
    let cells = row_count as usize * column_count as usize;
    let mut squares = Array::new(allocator, cells);
    for row in 0..row_count {
        for column in 0..column_count {
            let appended = squares.append(BoardSquare {
                row,
                column,
                ..BoardSquare::default()
            });
            assert!(appended, "board sized for every square");
        }
    }
    Board {
        rows,
        columns,
        squares,
        players: Array::new(allocator, player_count),
        player_turn: 0,
    }
}

impl Board<'_> {
    pub fn square(&self, row: i32, column: i32) -> Option<&BoardSquare> {
        if !(0..self.rows).contains(&row) || !(0..self.columns).contains(&column) {
            return None;
        }
        self.squares.get((row * self.columns + column) as usize)
    }

    pub fn square_mut(&mut self, row: i32, column: i32) -> Option<&mut BoardSquare> {
        if !(0..self.rows).contains(&row) || !(0..self.columns).contains(&column) {
            return None;
        }
        let index = (row * self.columns + column) as usize;
        self.squares.as_mut_slice().get_mut(index)
    }

    /// Advance to the next seated player.
    pub fn next_turn(&mut self) {
        let seated = self.players.len() as i32;
        if seated > 0 {
            self.player_turn = (self.player_turn + 1) % seated;
        }
    }

    /// Release both arrays. Only valid for allocators that free blocks.
    pub fn release(&mut self) {
        self.squares.release();
        self.players.release();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCommand {
    pub vertex_offset: u32,
    pub index_offset: u32,
    pub elements: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

pub struct DrawList<'a> {
    pub commands: Array<'a, DrawCommand>,
    pub indices: Array<'a, u32>,
    pub vertices: Array<'a, DrawVertex>,
    pub draw_flags: u64,
}

impl<'a> DrawList<'a> {
    /// Create a draw list with room for `quads` rectangles.
    #[track_caller]
    pub fn with_quads(allocator: &'a dyn Allocator, quads: usize) -> Self {
        Self {
            commands: Array::new(allocator, quads),
            indices: Array::new(allocator, quads * 6),
            vertices: Array::new(allocator, quads * 4),
            draw_flags: 0,
        }
    }

    /// Queue an axis-aligned rectangle. Returns `false`, leaving every
    /// stream untouched, if any of them is full.
    pub fn push_rect(&mut self, min: [f32; 2], max: [f32; 2], color: [f32; 3]) -> bool {
        if self.commands.is_full() || self.indices.remaining() < 6 || self.vertices.remaining() < 4
        {
            return false;
        }
        let base = self.vertices.len() as u32;
        let command = DrawCommand {
            vertex_offset: base,
            index_offset: self.indices.len() as u32,
            elements: 6,
        };
        let corners = [
            ([min[0], min[1]], [0.0, 0.0]),
            ([max[0], min[1]], [1.0, 0.0]),
            ([max[0], max[1]], [1.0, 1.0]),
            ([min[0], max[1]], [0.0, 1.0]),
        ];
        let vertices = corners.map(|(position, uv)| DrawVertex {
            position,
            uv,
            color,
        });
        let indices = [0, 1, 2, 2, 3, 0].map(|i| base + i);

        self.vertices.extend_from_slice(&vertices)
            && self.indices.extend_from_slice(&indices)
            && self.commands.append(command)
    }

    /// Drop queued geometry, keeping capacity for the next frame.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.indices.clear();
        self.vertices.clear();
    }

    pub fn release(&mut self) {
        self.commands.release();
        self.indices.release();
        self.vertices.release();
    }
}
