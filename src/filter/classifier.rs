use crate::{
    board::{CardHandle, JobBoard},
    domain::{CardFacts, DismissHook, FilterMode, PersistedConfig, Visibility},
};

use super::extractor::extract;

/// Decides whether a card stays on screen.
///
/// Rules run in order and later rules win. The suppressions (unviewed,
/// unhidden, unapplied, blocked phrase) can only hide a card; the promoted /
/// normal filter modes then overwrite the result outright, so they can bring
/// back a card an earlier rule hid.
pub fn classify(facts: &CardFacts, config: &PersistedConfig) -> Visibility {
    let mut visible = true;

    if config.only_unviewed && facts.is_viewed && !facts.is_active {
        visible = false;
    }
    if config.only_unhidden && facts.is_hidden {
        visible = false;
    }
    if config.only_unapplied && facts.is_applied {
        visible = false;
    }
    if is_blocked(facts, config) {
        visible = false;
    }

    match config.active_filter {
        FilterMode::All => {}
        FilterMode::PromotedOnly => visible = facts.is_promoted,
        FilterMode::NormalOnly => visible = !facts.is_promoted,
    }

    Visibility::from_visible(visible)
}

pub fn is_blocked(facts: &CardFacts, config: &PersistedConfig) -> bool {
    config
        .blocked_phrases
        .iter()
        .any(|phrase| facts.raw_text.contains(&phrase.to_lowercase()))
}

/// What one reconcile step changed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub visibility: Visibility,
    pub control_inserted: bool,
    pub hook_attached: bool,
}

/// Attaches the block control and dismiss hook when missing, then applies the
/// classification to the card's display state.
pub fn reconcile<B: JobBoard + ?Sized>(
    board: &mut B,
    card: &CardHandle,
    facts: &CardFacts,
    config: &PersistedConfig,
) -> Reconciled {
    let control_inserted = !facts.affordances.block_control && board.insert_block_control(card);
    let hook_attached =
        facts.affordances.dismiss_hook == DismissHook::Unhooked && board.hook_dismiss(card);

    let visibility = classify(facts, config);
    board.set_visibility(card, visibility);

    Reconciled {
        visibility,
        control_inserted,
        hook_attached,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub scanned: usize,
    pub skipped: usize,
    pub shown: usize,
    pub hidden: usize,
    pub controls_inserted: usize,
    pub hooks_attached: usize,
}

/// One full sweep over every card currently on the board.
pub fn run_pass<B: JobBoard + ?Sized>(board: &mut B, config: &PersistedConfig) -> PassSummary {
    let mut summary = PassSummary::default();
    for card in board.cards() {
        summary.scanned += 1;
        let Some(facts) = extract(&*board, &card) else {
            summary.skipped += 1;
            continue;
        };
        let outcome = reconcile(board, &card, &facts, config);
        match outcome.visibility {
            Visibility::Shown => summary.shown += 1,
            Visibility::Hidden => summary.hidden += 1,
        }
        summary.controls_inserted += usize::from(outcome.control_inserted);
        summary.hooks_attached += usize::from(outcome.hook_attached);
    }

    tracing::debug!(
        target: "filter",
        scanned = summary.scanned,
        skipped = summary.skipped,
        shown = summary.shown,
        hidden = summary.hidden,
        controls = summary.controls_inserted,
        hooks = summary.hooks_attached,
        "classification pass finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fake::{FakeBoard, FakeCard};

    fn facts(text: &str) -> CardFacts {
        CardFacts {
            identity: "1".into(),
            raw_text: text.to_lowercase(),
            ..CardFacts::default()
        }
    }

    fn config() -> PersistedConfig {
        PersistedConfig::default()
    }

    #[test]
    fn defaults_show_everything() {
        let cards = [
            CardFacts {
                is_promoted: true,
                ..facts("a")
            },
            CardFacts {
                is_applied: true,
                ..facts("b")
            },
            CardFacts {
                is_viewed: true,
                ..facts("c")
            },
        ];
        for card in &cards {
            assert_eq!(classify(card, &config()), Visibility::Shown);
        }
    }

    #[test]
    fn only_unapplied_hides_applied_card() {
        let cfg = PersistedConfig {
            only_unapplied: true,
            ..config()
        };
        let promoted = CardFacts {
            is_promoted: true,
            ..facts("a")
        };
        let applied = CardFacts {
            is_applied: true,
            ..facts("b")
        };
        let viewed = CardFacts {
            is_viewed: true,
            ..facts("c")
        };
        assert_eq!(classify(&promoted, &cfg), Visibility::Shown);
        assert_eq!(classify(&applied, &cfg), Visibility::Hidden);
        assert_eq!(classify(&viewed, &cfg), Visibility::Shown);
    }

    #[test]
    fn active_card_is_exempt_from_unviewed_filter() {
        let cfg = PersistedConfig {
            only_unviewed: true,
            ..config()
        };
        let viewed = CardFacts {
            is_viewed: true,
            ..facts("x")
        };
        let active = CardFacts {
            is_active: true,
            ..viewed.clone()
        };
        assert_eq!(classify(&viewed, &cfg), Visibility::Hidden);
        assert_eq!(classify(&active, &cfg), Visibility::Shown);
    }

    #[test]
    fn only_unhidden_hides_dismissed_notice() {
        let cfg = PersistedConfig {
            only_unhidden: true,
            ..config()
        };
        let card = CardFacts {
            is_hidden: true,
            ..facts("x")
        };
        assert_eq!(classify(&card, &cfg), Visibility::Hidden);
    }

    #[test]
    fn blocked_phrase_hides_regardless_of_other_flags() {
        let cfg = PersistedConfig {
            blocked_phrases: vec!["SENIOR".into()],
            ..config()
        };
        let flag_sets = [
            (false, false, false, false),
            (true, true, true, true),
            (true, false, true, false),
            (false, true, false, true),
        ];
        for (viewed, hidden, applied, active) in flag_sets {
            let card = CardFacts {
                is_viewed: viewed,
                is_hidden: hidden,
                is_applied: applied,
                is_active: active,
                ..facts("Senior Engineer at Acme")
            };
            assert_eq!(classify(&card, &cfg), Visibility::Hidden);
        }
    }

    #[test]
    fn promoted_only_overrides_earlier_suppression() {
        let cfg = PersistedConfig {
            active_filter: FilterMode::PromotedOnly,
            only_unviewed: true,
            ..config()
        };
        let promoted_viewed = CardFacts {
            is_promoted: true,
            is_viewed: true,
            ..facts("x")
        };
        let normal = facts("y");
        assert_eq!(classify(&promoted_viewed, &cfg), Visibility::Shown);
        assert_eq!(classify(&normal, &cfg), Visibility::Hidden);
    }

    #[test]
    fn promoted_only_resurfaces_phrase_blocked_card() {
        let cfg = PersistedConfig {
            active_filter: FilterMode::PromotedOnly,
            blocked_phrases: vec!["Senior".into()],
            ..config()
        };
        let promoted = CardFacts {
            is_promoted: true,
            ..facts("Senior Engineer")
        };
        let normal = facts("Senior Engineer");
        assert_eq!(classify(&promoted, &cfg), Visibility::Shown);
        assert_eq!(classify(&normal, &cfg), Visibility::Hidden);

        let all = PersistedConfig {
            active_filter: FilterMode::All,
            ..cfg
        };
        assert_eq!(classify(&promoted, &all), Visibility::Hidden);
    }

    #[test]
    fn normal_only_is_inverse_of_promoted() {
        let cfg = PersistedConfig {
            active_filter: FilterMode::NormalOnly,
            only_unapplied: true,
            ..config()
        };
        let applied_normal = CardFacts {
            is_applied: true,
            ..facts("x")
        };
        let promoted = CardFacts {
            is_promoted: true,
            ..facts("y")
        };
        assert_eq!(classify(&applied_normal, &cfg), Visibility::Shown);
        assert_eq!(classify(&promoted, &cfg), Visibility::Hidden);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut board = FakeBoard::new(vec![
            FakeCard::job("1", "Senior Engineer").with_dismiss(),
            FakeCard::job("2", "Data Analyst").with_dismiss(),
        ]);
        let cfg = PersistedConfig {
            blocked_phrases: vec!["senior".into()],
            ..config()
        };

        let first = run_pass(&mut board, &cfg);
        assert_eq!(first.controls_inserted, 2);
        assert_eq!(first.hooks_attached, 2);
        assert_eq!(first.hidden, 1);

        let second = run_pass(&mut board, &cfg);
        assert_eq!(second.controls_inserted, 0);
        assert_eq!(second.hooks_attached, 0);
        assert_eq!(second.hidden, 1);
        assert_eq!(board.controls_inserted, 2);
        assert_eq!(board.hooks_attached, 2);
        assert_eq!(board.visibility("1"), Visibility::Hidden);
        assert_eq!(board.visibility("2"), Visibility::Shown);
    }

    #[test]
    fn skipped_cards_are_left_untouched() {
        let mut board = FakeBoard::new(vec![
            FakeCard::placeholder("1").hidden(),
            FakeCard::job("2", "x"),
        ]);
        let cfg = PersistedConfig {
            active_filter: FilterMode::NormalOnly,
            ..config()
        };
        let summary = run_pass(&mut board, &cfg);
        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(board.visibility("1"), Visibility::Hidden);
        assert_eq!(board.controls_inserted, 1);
    }

    #[test]
    fn card_without_actions_retries_next_pass() {
        let mut board = FakeBoard::new(vec![FakeCard::job("1", "x").without_actions()]);
        assert_eq!(run_pass(&mut board, &config()).controls_inserted, 0);
        board.cards[0].has_actions = true;
        assert_eq!(run_pass(&mut board, &config()).controls_inserted, 1);
    }
}
