//! Price and change formatting for the board.

pub const MIN_TILES: usize = 4;
pub const MAX_TILES: usize = 7;

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Two decimals, Italian style: `1234.5` -> `1.234,50`.
pub fn format_price(price: f64) -> String {
    let price = if price.is_finite() { price } else { 0.0 };
    let fixed = format!("{:.2}", price.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }

    // -0,00 reads as a glitch on the board
    let negative = price < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    format!("{}{}{}{}", sign, grouped, DECIMAL_SEPARATOR, fraction)
}

/// Tile glyphs for a formatted price, clamped to `MIN_TILES..=MAX_TILES`.
///
/// Short strings are left-padded with spaces, long ones keep their last
/// `MAX_TILES` characters.
pub fn to_tiles(formatted: &str) -> Vec<char> {
    let chars: Vec<char> = formatted.chars().collect();
    if chars.len() > MAX_TILES {
        return chars[chars.len() - MAX_TILES..].to_vec();
    }

    let width = chars.len().max(MIN_TILES);
    let mut tiles = vec![' '; width - chars.len()];
    tiles.extend(chars);
    tiles
}

/// Glyphs that are placed directly instead of rolling through digits.
pub fn is_static_glyph(glyph: char) -> bool {
    matches!(glyph, ' ' | ',' | '.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
}

impl ChangeDirection {
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            ChangeDirection::Up
        } else if change < 0.0 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            ChangeDirection::Up => '+',
            ChangeDirection::Down => '\u{2212}',
            ChangeDirection::Flat => '±',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeLabel {
    pub direction: ChangeDirection,
    pub text: String,
}

impl ChangeLabel {
    pub fn new(change: f64) -> Self {
        let change = if change.is_finite() { change } else { 0.0 };
        let direction = ChangeDirection::of(change);
        Self {
            direction,
            text: format!("{}{:.1}%", direction.glyph(), change.abs()),
        }
    }
}
