use chrono::Local;

use super::format::{format_price, to_tiles, ChangeLabel};
use super::{Board, Card, Tile};
use crate::feed::FeedItem;
use crate::log_debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub cards: usize,
    /// Cards whose price changed and therefore roll.
    pub animated: usize,
}

impl Board {
    /// Rebuild the whole card list from `items` and start the flap cycle.
    ///
    /// Prices are compared by feed index against the previous render; a card
    /// rolls when its string differs or on the first load, otherwise its tiles
    /// are set directly.
    pub fn render(&mut self, items: &[FeedItem]) -> RenderReport {
        self.animator.begin_cycle();
        let now = self.clock.now();

        let mut report = RenderReport::default();
        let mut cards = Vec::with_capacity(items.len());
        let mut max_tiles = 0;

        for (index, item) in items.iter().enumerate() {
            let price = format_price(item.price);
            let glyphs = to_tiles(&price);
            max_tiles = max_tiles.max(glyphs.len());

            let previous = self.previous.get(index).map(String::as_str).unwrap_or("");
            let changed = self.first_load || price != previous;

            let tiles = glyphs
                .iter()
                .enumerate()
                .map(|(column, &glyph)| {
                    if changed {
                        self.animator.schedule_tile(now, index, column, glyph);
                        Tile::pending(glyph)
                    } else {
                        Tile::settled(glyph)
                    }
                })
                .collect();

            if changed {
                report.animated += 1;
            }

            cards.push(Card {
                name: item.name.clone(),
                change: ChangeLabel::new(item.change),
                price: price.clone(),
                tiles,
            });

            if index < self.previous.len() {
                self.previous[index] = price;
            } else {
                self.previous.push(price);
            }
        }

        report.cards = cards.len();
        self.cards = cards;
        self.animator.finish_cycle(now, max_tiles);
        self.has_rendered = true;
        self.last_updated = Some(Local::now());

        log_debug!("rendered {} cards, {} animated", report.cards, report.animated);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ManualClock, RollTiming};
    use std::sync::Arc;

    fn board() -> (Board, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (Board::new(RollTiming::default(), clock.clone()), clock)
    }

    fn run_until_idle(board: &mut Board, clock: &ManualClock) {
        for _ in 0..200 {
            clock.advance_ms(16);
            board.advance_frame();
            if !board.is_busy() {
                return;
            }
        }
        panic!("board never went idle");
    }

    #[test]
    fn test_first_load_scenario() {
        let (mut board, clock) = board();
        let report = board.render(&[FeedItem::new("ACME", 1234.5, 2.3)]);

        assert_eq!(report, RenderReport { cards: 1, animated: 1 });
        let card = &board.cards()[0];
        assert_eq!(card.name, "ACME");
        assert_eq!(card.change.text, "+2.3%");
        assert_eq!(card.price, "1.234,50");
        assert_eq!(card.target_text(), ".234,50");
        assert!(card.tiles.iter().all(|t| !t.is_settled()));
        assert!(board.is_busy());

        run_until_idle(&mut board, &clock);
        assert_eq!(board.cards()[0].tile_text(), ".234,50");
        assert!(!board.is_first_load());
    }

    #[test]
    fn test_cards_follow_feed_order() {
        let (mut board, _clock) = board();
        let items = vec![
            FeedItem::new("B", 2.0, 0.0),
            FeedItem::new("A", 1.0, 0.0),
            FeedItem::new("C", 3.0, 0.0),
        ];
        board.render(&items);

        let names: Vec<&str> = board.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_unchanged_price_snaps_after_first_load() {
        let (mut board, clock) = board();
        let items = vec![FeedItem::new("ACME", 10.0, 0.0), FeedItem::new("GLOBEX", 20.0, 0.0)];
        board.render(&items);
        run_until_idle(&mut board, &clock);

        let next = vec![FeedItem::new("ACME", 10.0, 1.0), FeedItem::new("GLOBEX", 21.0, 0.0)];
        let report = board.render(&next);

        assert_eq!(report.animated, 1);
        assert!(board.cards()[0].tiles.iter().all(Tile::is_settled));
        assert_eq!(board.cards()[0].tile_text(), "10,00");
        assert!(board.cards()[1].tiles.iter().all(|t| !t.is_settled()));
    }

    #[test]
    fn test_equal_render_during_first_load_still_animates() {
        let (mut board, _clock) = board();
        let items = vec![FeedItem::new("ACME", 10.0, 0.0)];
        board.render(&items);
        // Guard still up, so the first load phase has not ended.
        let report = board.render(&items);
        assert_eq!(report.animated, 1);
    }

    #[test]
    fn test_previous_prices_are_index_based() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("A", 1.0, 0.0), FeedItem::new("B", 2.0, 0.0)]);
        run_until_idle(&mut board, &clock);

        // Swapped order: both indices see a different string.
        let report = board.render(&[FeedItem::new("B", 2.0, 0.0), FeedItem::new("A", 1.0, 0.0)]);
        assert_eq!(report.animated, 2);
        assert_eq!(board.previous_prices(), &["2,00".to_string(), "1,00".to_string()]);
    }

    #[test]
    fn test_static_glyphs_appear_without_rolling() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("X", 5.0, 0.0)]);
        // tiles "5,00": the comma in column 1 lands at 40ms
        clock.advance_ms(40);
        board.advance_frame();

        let card = &board.cards()[0];
        assert_eq!(card.tiles[1].glyph, ',');
        assert!(card.tiles[1].is_settled());
        assert!(card.tiles[0].is_rolling());
        assert_eq!(card.tiles[2].phase, crate::board::TilePhase::Idle);
    }

    #[test]
    fn test_clack_requests_per_frame() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("A", 11.11, 0.0), FeedItem::new("B", 22.22, 0.0)]);

        // Column 0 of both cards starts rolling on the first frame.
        let first = board.advance_frame();
        assert_eq!(first.clacks, 2);
        assert!(first.should_clack());

        // Same digit step, nothing new to hear.
        clock.advance_ms(1);
        let quiet = board.advance_frame();
        assert_eq!(quiet.clacks, 0);
        assert!(!quiet.should_clack());
    }

    #[test]
    fn test_guard_release_timing() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("ACME", 1234.5, 2.3)]);

        // roll 2000 + 7 * 40 + 50
        clock.advance_ms(2329);
        board.advance_frame();
        assert!(board.is_busy());

        clock.advance_ms(1);
        let report = board.advance_frame();
        assert!(report.released);
        assert!(!board.is_busy());
    }

    #[test]
    fn test_new_render_cancels_previous_cycle() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("OLD", 1111.11, 0.0)]);
        clock.advance_ms(100);
        board.advance_frame();

        board.render(&[FeedItem::new("NEW", 22.0, 0.0)]);
        assert_eq!(board.animator().rolling_tiles(), 0);

        // Old release was due 2330ms after the first render, the new one at 2350ms.
        for _ in 0..140 {
            clock.advance_ms(16);
            board.advance_frame();
        }
        assert!(board.is_busy());

        let card = &board.cards()[0];
        assert_eq!(card.name, "NEW");
        assert_eq!(card.tile_text(), "22,00");
    }

    #[test]
    fn test_empty_feed_still_releases_guard() {
        let (mut board, clock) = board();
        let report = board.render(&[]);
        assert_eq!(report.cards, 0);
        assert!(board.is_busy());

        clock.advance_ms(2050);
        board.advance_frame();
        assert!(!board.is_busy());
    }

    #[test]
    fn test_malformed_payload_leaves_cards_alone() {
        let (mut board, clock) = board();
        board.render(&[FeedItem::new("ACME", 1.0, 0.0)]);
        run_until_idle(&mut board, &clock);
        let before = board.cards().to_vec();

        board.apply_poll_result(Err("JSON non valido: expected value".to_string()));

        assert!(board.error_banner().unwrap().contains("ERRORE DATI"));
        assert_eq!(board.cards(), before.as_slice());
    }
}
