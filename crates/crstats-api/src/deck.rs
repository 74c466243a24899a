//! Current-deck listings for one or more players.

use crate::walker::{display_value, walk};
use serde_json::Value;

/// Number of cards in a battle deck.
pub const DECK_SIZE: usize = 8;

/// Player names and cards, flattened in document order.
///
/// The service returns every matching player with their deck; the listing
/// assumes each player owns exactly [`DECK_SIZE`] consecutive `card` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckListing {
    /// Every `name` value found.
    pub players: Vec<String>,
    /// Every `card` value found.
    pub cards: Vec<String>,
}

/// One player's slice of a [`DeckListing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDeck<'a> {
    /// Zero-based player position.
    pub index: usize,
    /// Player name.
    pub player: &'a str,
    /// Up to [`DECK_SIZE`] cards.
    pub cards: &'a [String],
}

impl DeckListing {
    /// Extracts names and cards from a decoded response.
    pub fn from_json(document: &Value) -> Self {
        let mut listing = Self::default();
        walk(document, &mut |slot, value| match slot.key() {
            Some("name") => listing.players.push(display_value(value)),
            Some("card") => listing.cards.push(display_value(value)),
            _ => {}
        });
        listing
    }

    /// Whether no player was found.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Pairs each player with the run of cards at their position.
    pub fn decks(&self) -> Vec<PlayerDeck<'_>> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let start = (index * DECK_SIZE).min(self.cards.len());
                let end = (start + DECK_SIZE).min(self.cards.len());
                PlayerDeck {
                    index,
                    player,
                    cards: &self.cards[start..end],
                }
            })
            .collect()
    }
}

/// Formats cards as a comma separated list of inline code spans.
pub fn format_cards(cards: &[String]) -> String {
    cards
        .iter()
        .map(|card| format!("`{card}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
