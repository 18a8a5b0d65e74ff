use crate::{
    board::{CardHandle, JobBoard},
    domain::{Affordances, CardFacts},
};

const VIEWED_MARKER: &str = "viewed";
const APPLIED_MARKER: &str = "applied";
/// The host's "we won’t show you this job" notice, with a typographic
/// apostrophe or none at all.
const HIDDEN_MARKERS: [&str; 2] = ["won\u{2019}t show you this job", "wont show you this job"];
const ACTIVE_MARKER: &str = "page";

/// Reads one card into [`CardFacts`]. `None` means the card has not rendered
/// its job-detail container and must be left alone this pass.
pub fn extract<B: JobBoard + ?Sized>(board: &B, card: &CardHandle) -> Option<CardFacts> {
    let Some(markup) = board.read_card(card) else {
        tracing::debug!(target: "filter", card = %card.identity, "job detail not rendered; skipping");
        return None;
    };

    let raw_text = markup.detail_text.to_lowercase();
    let title_phrase = markup
        .title_emphasis
        .or(markup.title_text)
        .map(|title| title.trim().to_string());

    Some(CardFacts {
        identity: card.identity.clone(),
        is_promoted: markup.promoted_marker,
        is_viewed: raw_text.contains(VIEWED_MARKER),
        is_hidden: HIDDEN_MARKERS.iter().any(|marker| raw_text.contains(marker)),
        is_applied: raw_text.contains(APPLIED_MARKER),
        is_active: markup.current.as_deref() == Some(ACTIVE_MARKER),
        title_phrase,
        affordances: Affordances {
            block_control: markup.block_control,
            dismiss_hook: markup.dismiss,
        },
        raw_text,
    })
}
