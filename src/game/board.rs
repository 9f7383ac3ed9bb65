use rand::seq::SliceRandom;

pub const TILE_COUNT: usize = 36;
pub const COPIES_PER_COLOR: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Magenta,
    Cyan,
    DarkGreen,
}

impl TileColor {
    pub const ALL: [TileColor; 9] = [
        TileColor::Red,
        TileColor::Orange,
        TileColor::Yellow,
        TileColor::Green,
        TileColor::Blue,
        TileColor::Indigo,
        TileColor::Magenta,
        TileColor::Cyan,
        TileColor::DarkGreen,
    ];

    pub fn rgb(self) -> (f64, f64, f64) {
        match self {
            TileColor::Red => (0.878, 0.105, 0.141),
            TileColor::Orange => (1.0, 0.470, 0.0),
            TileColor::Yellow => (0.964, 0.827, 0.176),
            TileColor::Green => (0.2, 0.819, 0.478),
            TileColor::Blue => (0.207, 0.517, 0.894),
            TileColor::Indigo => (0.380, 0.207, 0.513),
            TileColor::Magenta => (0.752, 0.380, 0.796),
            TileColor::Cyan => (0.2, 0.780, 0.870),
            TileColor::DarkGreen => (0.149, 0.635, 0.411),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub color: TileColor,
    pub state: TileState,
}

#[derive(Clone, Debug)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// A freshly shuffled standard board: 9 colors, 4 copies each, all hidden.
    pub fn new() -> Self {
        let mut colors = Vec::with_capacity(TILE_COUNT);
        for color in TileColor::ALL {
            for _ in 0..COPIES_PER_COLOR {
                colors.push(color);
            }
        }

        let mut rng = rand::rng();
        colors.shuffle(&mut rng);

        Self::with_layout(colors)
    }

    /// A board with an explicit color arrangement, all hidden.
    pub fn with_layout(colors: Vec<TileColor>) -> Self {
        Board {
            tiles: colors
                .into_iter()
                .map(|color| Tile {
                    color,
                    state: TileState::Hidden,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub(crate) fn set_state(&mut self, index: usize, state: TileState) {
        self.tiles[index].state = state;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation_order() -> Vec<TileColor> {
        let mut colors = Vec::with_capacity(TILE_COUNT);
        for color in TileColor::ALL {
            for _ in 0..COPIES_PER_COLOR {
                colors.push(color);
            }
        }
        colors
    }

    #[test]
    fn test_new_board_size_and_all_hidden() {
        let board = Board::new();
        assert_eq!(board.len(), TILE_COUNT);
        assert!(board.tiles().iter().all(|t| t.state == TileState::Hidden));
    }

    #[test]
    fn test_new_board_has_four_of_each_color() {
        let board = Board::new();
        for color in TileColor::ALL {
            let count = board.tiles().iter().filter(|t| t.color == color).count();
            assert_eq!(count, COPIES_PER_COLOR, "color {:?}", color);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut expected = generation_order();
        expected.sort_by_key(|c| *c as u8);

        let board = Board::new();
        let mut actual: Vec<TileColor> = board.tiles().iter().map(|t| t.color).collect();
        actual.sort_by_key(|c| *c as u8);

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_shuffle_is_not_the_identity_arrangement() {
        // Statistical: the odds of 8 consecutive identity shuffles of a
        // 36-element deck are negligible.
        let reference = generation_order();
        let any_shuffled = (0..8).any(|_| {
            let board = Board::new();
            board
                .tiles()
                .iter()
                .map(|t| t.color)
                .collect::<Vec<_>>()
                != reference
        });
        assert!(any_shuffled);
    }

    #[test]
    fn test_with_layout_preserves_order() {
        let layout = vec![TileColor::Red, TileColor::Red, TileColor::Cyan, TileColor::Cyan];
        let board = Board::with_layout(layout.clone());
        assert_eq!(board.len(), 4);
        let colors: Vec<TileColor> = board.tiles().iter().map(|t| t.color).collect();
        assert_eq!(colors, layout);
    }

    #[test]
    fn test_tile_lookup_out_of_range() {
        let board = Board::new();
        assert!(board.tile(TILE_COUNT).is_none());
        assert!(board.tile(0).is_some());
    }
}
