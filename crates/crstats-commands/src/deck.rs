//! `deck <name>[,trophies]`: current decks of the matching players.

use crate::context::CommandContext;
use crate::player_lookup::fetch_player_document;
use crate::registry::{Command, CommandHandler};
use async_trait::async_trait;
use crstats_api::{format_cards, DeckListing, PlayerDeck, StatsApi};
use crstats_common::{Embed, Result, COLOR_SUCCESS};
use std::sync::Arc;

/// Usage text for `help deck`.
pub const DECK_HELP: &str = "deck player[,trophies]\nExample: deck SomePlayer,6400\n\
*Note: Currently minimum trophies search is 6000. Also you can use without trophies this \
command but maybe it will be not 100% correct in finding selected player.";

/// Replies with the eight-card deck of every player the service matched.
pub struct DeckCommand {
    api: Arc<dyn StatsApi>,
}

impl DeckCommand {
    /// Creates the handler over a statistics service.
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self { api }
    }

    /// The registrable command.
    pub fn command(api: Arc<dyn StatsApi>) -> Command {
        Command::new("deck", 0, false, Self::new(api)).with_help(DECK_HELP)
    }
}

/// One embed per player, numbered `(n/total)`.
fn player_embed(deck: &PlayerDeck<'_>, total: usize) -> Embed {
    Embed::new(COLOR_SUCCESS)
        .title(format!(
            "Current deck of players ({}/{})",
            deck.index + 1,
            total
        ))
        .field(
            "Result:",
            format!("**{}** - {}", deck.player, format_cards(deck.cards)),
            false,
        )
}

fn single_embed(listing: &DeckListing) -> Embed {
    Embed::new(COLOR_SUCCESS)
        .title("Current deck of player")
        .field("Player", listing.players.join(" "), true)
        .field("Cards", format_cards(&listing.cards), true)
}

#[async_trait]
impl CommandHandler for DeckCommand {
    async fn execute(&self, ctx: &CommandContext<'_>, tokens: &[String]) -> Result<()> {
        let Some(document) = fetch_player_document(ctx, self.api.as_ref(), tokens).await? else {
            return Ok(());
        };

        let listing = DeckListing::from_json(&document);
        if listing.is_empty() {
            return ctx.reply(ctx.replies.player_not_found()).await;
        }

        let total = listing.players.len();
        if total == 1 {
            return ctx.reply(single_embed(&listing)).await;
        }
        for deck in listing.decks() {
            ctx.reply(player_embed(&deck, total)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(players: &[&str], cards_each: usize) -> DeckListing {
        DeckListing {
            players: players.iter().map(ToString::to_string).collect(),
            cards: players
                .iter()
                .flat_map(|p| (1..=cards_each).map(move |c| format!("{p}{c}")))
                .collect(),
        }
    }

    #[test]
    fn test_player_embed_numbering() {
        let listing = listing(&["A", "B"], 8);
        let decks = listing.decks();
        let embed = player_embed(&decks[1], 2);

        assert_eq!(embed.title.as_deref(), Some("Current deck of players (2/2)"));
        let result = embed.field_value("Result:").unwrap();
        assert!(result.starts_with("**B** - `B1`, `B2`"));
        assert!(result.ends_with("`B8`"));
    }

    #[test]
    fn test_single_embed_lists_everything() {
        let embed = single_embed(&listing(&["A"], 2));

        assert_eq!(embed.title.as_deref(), Some("Current deck of player"));
        assert_eq!(embed.field_value("Player"), Some("A"));
        assert_eq!(embed.field_value("Cards"), Some("`A1`, `A2`"));
        assert!(embed.fields.iter().all(|f| f.inline));
    }
}
