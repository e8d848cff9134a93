use super::format::ChangeLabel;
use super::tile::Tile;

/// One feed item as displayed on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub change: ChangeLabel,
    /// Full formatted price, before clamping to tiles.
    pub price: String,
    pub tiles: Vec<Tile>,
}

impl Card {
    pub fn tile_text(&self) -> String {
        self.tiles.iter().map(|tile| tile.glyph).collect()
    }

    pub fn target_text(&self) -> String {
        self.tiles.iter().map(|tile| tile.target).collect()
    }
}
