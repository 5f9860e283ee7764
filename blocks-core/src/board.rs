use crate::draggable::{CellId, GameObject, InputEvent, Notice, Point};
use crate::level::{Level, MAX_CELLS};

/// One grid slot. Holds at most one piece, by index into the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: CellId,
    pub occupant: Option<usize>,
}

/// Grid of tiles plus the pieces sitting on it. Receives piece notices and
/// keeps occupancy in step with where pieces are dropped.
#[derive(Clone, Debug)]
pub struct Board {
    cols: u32,
    rows: u32,
    cell_size: f64,
    tiles: Vec<Tile>,
    pieces: Vec<GameObject>,
    selected: Option<usize>,
}

impl Board {
    /// Empty grid of `cols` by `rows` cells. Callers bound the size; levels
    /// are capped by `Level::validate`.
    pub fn new(cols: u32, rows: u32, cell_size: f64) -> Self {
        let cells = (cols as usize).checked_mul(rows as usize).unwrap_or(0);
        let mut tiles = Vec::with_capacity(cells.min(MAX_CELLS));
        for row in 0..rows {
            for col in 0..cols {
                tiles.push(Tile {
                    id: CellId::new(col, row),
                    occupant: None,
                });
            }
        }
        Board {
            cols,
            rows,
            cell_size,
            tiles,
            pieces: Vec::new(),
            selected: None,
        }
    }

    /// Build the board for a validated level, every piece seated on its cell.
    pub fn from_level(level: &Level) -> Self {
        let mut board = Board::new(level.cols, level.rows, level.cell_size);
        for spec in &level.pieces {
            let idx = board.add_piece(GameObject::new(spec.x, spec.y, level.cell_size, spec.color));
            board.place(idx, CellId::new(spec.x, spec.y));
        }
        board
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Pixel size of the whole grid.
    pub fn extent(&self) -> (f64, f64) {
        (
            f64::from(self.cols) * self.cell_size,
            f64::from(self.rows) * self.cell_size,
        )
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: CellId) -> Option<&Tile> {
        self.tile_index(id).map(|i| &self.tiles[i])
    }

    pub fn pieces(&self) -> &[GameObject] {
        &self.pieces
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Piece currently being dragged.
    pub fn active(&self) -> Option<usize> {
        self.pieces.iter().position(GameObject::is_dragging)
    }

    pub fn add_piece(&mut self, piece: GameObject) -> usize {
        self.pieces.push(piece);
        self.pieces.len() - 1
    }

    fn tile_index(&self, id: CellId) -> Option<usize> {
        if id.col < self.cols && id.row < self.rows {
            Some(id.row as usize * self.cols as usize + id.col as usize)
        } else {
            None
        }
    }

    pub fn cell_centre(&self, id: CellId) -> Point {
        Point::new(
            self.cell_size * f64::from(id.col) + self.cell_size / 2.0,
            self.cell_size * f64::from(id.row) + self.cell_size / 2.0,
        )
    }

    /// Cell under a pixel point, if the point is on the grid.
    pub fn cell_at(&self, p: Point) -> Option<CellId> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / self.cell_size).floor();
        let row = (p.y / self.cell_size).floor();
        if col >= f64::from(self.cols) || row >= f64::from(self.rows) {
            return None;
        }
        Some(CellId::new(col as u32, row as u32))
    }

    /// Topmost piece whose footprint covers `p`: highest z-index first, then
    /// the most recently added.
    pub fn piece_at(&self, p: Point) -> Option<usize> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, g)| g.contains(p))
            .max_by_key(|(i, g)| (g.sprite().z_index, *i))
            .map(|(i, _)| i)
    }

    /// Seat a piece on a cell, vacating whatever cell it held before.
    pub fn place(&mut self, idx: usize, cell: CellId) {
        let Some(tile_idx) = self.tile_index(cell) else {
            log::warn!("place: cell {cell:?} is off the board");
            return;
        };
        let Some(piece) = self.pieces.get(idx) else {
            return;
        };
        if let Some(prev_idx) = piece.cell().and_then(|prev| self.tile_index(prev))
            && self.tiles[prev_idx].occupant == Some(idx)
        {
            self.tiles[prev_idx].occupant = None;
        }
        self.tiles[tile_idx].occupant = Some(idx);
        let c = self.cell_centre(cell);
        let piece = &mut self.pieces[idx];
        piece.set_cell(cell);
        piece.set_position(c.x, c.y);
    }

    /// Feed one input to a piece and act on what it reports.
    pub fn dispatch(&mut self, idx: usize, event: InputEvent) {
        let Some(piece) = self.pieces.get_mut(idx) else {
            log::warn!("dispatch: no piece {idx}");
            return;
        };
        let mut outbox: Vec<Notice> = Vec::new();
        piece.handle(event, &mut outbox);
        for notice in outbox {
            match notice {
                Notice::Select => self.selected = Some(idx),
                Notice::Deselect => {
                    if self.selected == Some(idx) {
                        self.selected = None;
                    }
                }
                Notice::CheckCell => self.check_cell(idx),
            }
        }
    }

    fn check_cell(&mut self, idx: usize) {
        let piece = &self.pieces[idx];
        let target = self
            .cell_at(piece.position())
            .filter(|c| self.tile(*c).is_some_and(|t| t.occupant.is_none_or(|o| o == idx)));
        match (target, piece.cell()) {
            (Some(cell), _) => {
                log::debug!("piece {idx} dropped on {cell:?}");
                self.place(idx, cell);
            }
            (None, Some(prev)) => {
                let c = self.cell_centre(prev);
                self.pieces[idx].set_position(c.x, c.y);
            }
            (None, None) => {
                let b = piece.base_position();
                self.pieces[idx].set_position(b.x, b.y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::PieceSpec;
    use crate::palette::ColorId;

    fn level() -> Level {
        Level {
            cols: 4,
            rows: 3,
            cell_size: 10.0,
            pieces: vec![
                PieceSpec {
                    x: 0,
                    y: 0,
                    color: ColorId::Red,
                },
                PieceSpec {
                    x: 2,
                    y: 1,
                    color: ColorId::Blue,
                },
            ],
        }
    }

    fn drag(board: &mut Board, idx: usize, from: Point, to: Point) {
        board.dispatch(idx, InputEvent::Toggle { global: from });
        board.dispatch(idx, InputEvent::DragMove { global: to });
        board.dispatch(idx, InputEvent::DragEnd);
    }

    #[test]
    fn level_pieces_start_seated() {
        let b = Board::from_level(&level());
        assert_eq!(b.tiles().len(), 12);
        assert_eq!(b.tile(CellId::new(0, 0)).unwrap().occupant, Some(0));
        assert_eq!(b.tile(CellId::new(2, 1)).unwrap().occupant, Some(1));
        assert_eq!(b.pieces()[1].cell(), Some(CellId::new(2, 1)));
        assert_eq!(b.pieces()[1].position(), Point::new(25.0, 15.0));
        assert_eq!(b.extent(), (40.0, 30.0));
    }

    #[test]
    fn drop_on_free_cell_moves_occupancy() {
        let mut b = Board::from_level(&level());
        drag(&mut b, 0, Point::new(5.0, 5.0), Point::new(38.0, 27.0));
        assert_eq!(b.tile(CellId::new(0, 0)).unwrap().occupant, None);
        assert_eq!(b.tile(CellId::new(3, 2)).unwrap().occupant, Some(0));
        assert_eq!(b.pieces()[0].cell(), Some(CellId::new(3, 2)));
        assert_eq!(b.pieces()[0].position(), Point::new(35.0, 25.0));
        assert_eq!(b.selected(), None);
        assert_eq!(b.active(), None);
    }

    #[test]
    fn drop_on_taken_cell_snaps_back() {
        let mut b = Board::from_level(&level());
        drag(&mut b, 0, Point::new(5.0, 5.0), Point::new(26.0, 16.0));
        assert_eq!(b.pieces()[0].cell(), Some(CellId::new(0, 0)));
        assert_eq!(b.pieces()[0].position(), Point::new(5.0, 5.0));
        assert_eq!(b.tile(CellId::new(2, 1)).unwrap().occupant, Some(1));
    }

    #[test]
    fn drop_inside_own_cell_keeps_occupancy() {
        let mut b = Board::from_level(&level());
        drag(&mut b, 0, Point::new(5.0, 5.0), Point::new(8.0, 7.0));
        assert_eq!(b.tile(CellId::new(0, 0)).unwrap().occupant, Some(0));
        assert_eq!(b.pieces()[0].cell(), Some(CellId::new(0, 0)));
        assert_eq!(b.pieces()[0].position(), Point::new(5.0, 5.0));
        let held = b.tiles().iter().filter(|t| t.occupant == Some(0)).count();
        assert_eq!(held, 1);
    }

    #[test]
    fn large_coordinates_index_without_overflow() {
        let b = Board::new(128, 128, 1.0);
        assert_eq!(b.tiles().len(), 128 * 128);
        let last = b.tile(CellId::new(127, 127)).unwrap();
        assert_eq!(last.id, CellId::new(127, 127));
        assert!(b.tile(CellId::new(u32::MAX, 0)).is_none());
    }

    #[test]
    fn drop_off_board_without_cell_returns_to_base() {
        let mut b = Board::new(2, 2, 10.0);
        let idx = b.add_piece(GameObject::new(1, 1, 10.0, ColorId::Yellow));
        drag(&mut b, idx, Point::new(15.0, 15.0), Point::new(100.0, 15.0));
        assert_eq!(b.pieces()[idx].position(), Point::new(15.0, 15.0));
        assert_eq!(b.pieces()[idx].cell(), None);
    }

    #[test]
    fn toggle_select_tracks_selection() {
        let mut b = Board::from_level(&level());
        b.dispatch(1, InputEvent::Toggle { global: Point::new(25.0, 15.0) });
        assert_eq!(b.selected(), Some(1));
        assert_eq!(b.active(), Some(1));
        b.dispatch(1, InputEvent::DragMove { global: Point::new(35.0, 15.0) });
        b.dispatch(1, InputEvent::Toggle { global: Point::new(35.0, 15.0) });
        assert_eq!(b.selected(), None);
        assert_eq!(b.active(), None);
        assert_eq!(b.pieces()[1].cell(), Some(CellId::new(3, 1)));
    }

    #[test]
    fn piece_at_prefers_raised_then_latest() {
        let mut b = Board::new(2, 1, 10.0);
        let a = b.add_piece(GameObject::new(0, 0, 10.0, ColorId::Red));
        let c = b.add_piece(GameObject::new(0, 0, 10.0, ColorId::Blue));
        assert_eq!(b.piece_at(Point::new(5.0, 5.0)), Some(c));
        b.dispatch(a, InputEvent::DragBegin { global: Point::new(5.0, 5.0) });
        assert_eq!(b.piece_at(Point::new(5.0, 5.0)), Some(a));
        assert_eq!(b.piece_at(Point::new(15.0, 5.0)), None);
    }

    #[test]
    fn cell_at_bounds() {
        let b = Board::new(4, 3, 10.0);
        assert_eq!(b.cell_at(Point::new(0.0, 0.0)), Some(CellId::new(0, 0)));
        assert_eq!(b.cell_at(Point::new(39.9, 29.9)), Some(CellId::new(3, 2)));
        assert_eq!(b.cell_at(Point::new(40.0, 5.0)), None);
        assert_eq!(b.cell_at(Point::new(-0.1, 5.0)), None);
        assert!(b.tile(CellId::new(4, 0)).is_none());
    }

    #[test]
    fn dispatch_to_missing_piece_is_ignored() {
        let mut b = Board::new(1, 1, 10.0);
        b.dispatch(3, InputEvent::DragEnd);
        assert!(b.pieces().is_empty());
    }
}
