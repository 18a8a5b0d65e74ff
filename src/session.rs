use crate::{
    board::{CardHandle, JobBoard},
    db::{load_or_default, save_best_effort, SettingsStore},
    domain::{DismissHook, FilterMode, PersistedConfig, Toggle},
    filter::{advance, extract, run_pass, PassSummary},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Blocked {
        phrase: String,
        summary: PassSummary,
        opened: Option<CardHandle>,
    },
    AlreadyBlocked(String),
    /// The card has not rendered, or its block control is not attached yet.
    Unavailable,
    NoPhrase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseOutcome {
    Added {
        summary: PassSummary,
        opened: Option<CardHandle>,
    },
    Duplicate,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissOutcome {
    Advanced(Option<CardHandle>),
    NotHooked,
}

/// Owns the board, the settings and their store. Every mutation goes through
/// `&mut self`, so passes and settings writes never interleave.
pub struct FilterSession<B, S> {
    board: B,
    store: S,
    config: PersistedConfig,
}

impl<B: JobBoard, S: SettingsStore> FilterSession<B, S> {
    pub async fn start(board: B, store: S) -> Self {
        let config = load_or_default(&store).await;
        tracing::info!(
            target: "filter",
            filter = %config.active_filter,
            only_unviewed = config.only_unviewed,
            only_unhidden = config.only_unhidden,
            only_unapplied = config.only_unapplied,
            phrases = config.blocked_phrases.len(),
            "settings loaded"
        );
        Self {
            board,
            store,
            config,
        }
    }

    pub fn config(&self) -> &PersistedConfig {
        &self.config
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// First card on the board keyed `identity`.
    pub fn find_card(&self, identity: &str) -> Option<CardHandle> {
        self.board
            .cards()
            .into_iter()
            .find(|card| card.identity == identity)
    }

    pub fn reclassify(&mut self) -> PassSummary {
        run_pass(&mut self.board, &self.config)
    }

    pub fn open_next(&mut self, reference: Option<&CardHandle>) -> Option<CardHandle> {
        advance(&mut self.board, reference)
    }

    pub async fn set_filter(&mut self, mode: FilterMode) -> PassSummary {
        self.config.active_filter = mode;
        self.persist().await;
        self.reclassify()
    }

    pub async fn toggle(&mut self, toggle: Toggle) -> (bool, PassSummary) {
        let enabled = self.config.toggle(toggle);
        self.persist().await;
        (enabled, self.reclassify())
    }

    /// Adds a phrase typed by the user, then reopens the first visible card.
    pub async fn add_phrase(&mut self, raw: &str) -> PhraseOutcome {
        let phrase = raw.trim();
        if phrase.is_empty() {
            return PhraseOutcome::Empty;
        }
        if !self.config.add_phrase(phrase) {
            return PhraseOutcome::Duplicate;
        }
        self.persist().await;
        let summary = self.reclassify();
        let opened = self.open_next(None);
        PhraseOutcome::Added { summary, opened }
    }

    pub async fn remove_phrase(&mut self, phrase: &str) -> Option<PassSummary> {
        if !self.config.remove_phrase(phrase) {
            return None;
        }
        self.persist().await;
        Some(self.reclassify())
    }

    /// Activation of a card's block control: blocks its title phrase and moves
    /// on to the card after it.
    pub async fn block_card(&mut self, card: &CardHandle) -> BlockOutcome {
        let Some(facts) = extract(&self.board, card) else {
            return BlockOutcome::Unavailable;
        };
        if !facts.affordances.block_control {
            return BlockOutcome::Unavailable;
        }
        let Some(phrase) = facts.title_phrase.filter(|p| !p.is_empty()) else {
            return BlockOutcome::NoPhrase;
        };
        if !self.config.add_phrase(&phrase) {
            return BlockOutcome::AlreadyBlocked(phrase);
        }
        tracing::info!(target: "filter", card = %card.identity, phrase = %phrase, "blocked job title");

        self.persist().await;
        let summary = self.reclassify();
        let opened = self.open_next(Some(card));
        BlockOutcome::Blocked {
            phrase,
            summary,
            opened,
        }
    }

    /// The host's dismiss control fired on `card`. The host still performs
    /// its own dismissal; this only moves selection along.
    pub fn dismiss_card(&mut self, card: &CardHandle) -> DismissOutcome {
        let hooked = extract(&self.board, card)
            .is_some_and(|facts| facts.affordances.dismiss_hook == DismissHook::Hooked);
        if !hooked {
            return DismissOutcome::NotHooked;
        }
        DismissOutcome::Advanced(self.open_next(Some(card)))
    }

    async fn persist(&self) {
        save_best_effort(&self.store, &self.config).await;
    }
}
