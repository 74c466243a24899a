//! Fetch-and-decode step shared by the player commands.

use crate::context::CommandContext;
use crstats_api::{PlayerQuery, StatsApi};
use crstats_common::Result;
use serde_json::Value;
use tracing::{debug, error};

/// Shows the typing indicator, validates the arguments and fetches the decoded
/// response document for the player named in `tokens`.
///
/// Returns `Ok(None)` when the user has already been told why there is nothing
/// to show: no name given, service unreachable, or a body that is not JSON.
pub async fn fetch_player_document(
    ctx: &CommandContext<'_>,
    api: &dyn StatsApi,
    tokens: &[String],
) -> Result<Option<Value>> {
    ctx.typing().await;

    if tokens.len() < 2 {
        ctx.reply(ctx.replies.missing_player_name()).await?;
        return Ok(None);
    }

    let query = PlayerQuery::from_args(&tokens[1..]);
    let body = match api.fetch_player(&query).await {
        Ok(body) => body,
        Err(e) => {
            error!("Can't get player from API, err: {}", e);
            ctx.reply(ctx.replies.api_unreachable()).await?;
            return Ok(None);
        }
    };

    match serde_json::from_str(&body) {
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            debug!("Undecodable response for player '{}': {}", query.name, e);
            ctx.reply(ctx.replies.player_not_found()).await?;
            Ok(None)
        }
    }
}
