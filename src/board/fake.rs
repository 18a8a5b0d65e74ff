use crate::{
    domain::{DismissHook, Visibility},
    filter::watcher::{MutationRecord, MutationSink},
};

use super::{CardHandle, CardMarkup, JobBoard};

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub handle: CardHandle,
    pub markup: Option<CardMarkup>,
    pub has_actions: bool,
    pub has_title: bool,
    pub visibility: Visibility,
}

impl FakeCard {
    pub fn job(id: &str, text: &str) -> Self {
        Self {
            handle: CardHandle::new(0, id),
            markup: Some(CardMarkup {
                detail_text: text.to_string(),
                title_text: Some(text.to_string()),
                ..CardMarkup::default()
            }),
            has_actions: true,
            has_title: true,
            visibility: Visibility::Shown,
        }
    }

    /// A list item whose job-detail container has not rendered yet.
    pub fn placeholder(id: &str) -> Self {
        Self {
            markup: None,
            has_title: false,
            ..Self::job(id, "")
        }
    }

    pub fn promoted(mut self) -> Self {
        self.markup_mut().promoted_marker = true;
        self
    }

    pub fn current(mut self) -> Self {
        self.markup_mut().current = Some("page".to_string());
        self
    }

    pub fn title(mut self, text: &str, emphasis: Option<&str>) -> Self {
        let markup = self.markup_mut();
        markup.title_text = Some(text.to_string());
        markup.title_emphasis = emphasis.map(str::to_string);
        self
    }

    pub fn without_title(mut self) -> Self {
        self.has_title = false;
        let markup = self.markup_mut();
        markup.title_text = None;
        markup.title_emphasis = None;
        self
    }

    pub fn with_dismiss(mut self) -> Self {
        self.markup_mut().dismiss = DismissHook::Unhooked;
        self
    }

    pub fn without_actions(mut self) -> Self {
        self.has_actions = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    fn markup_mut(&mut self) -> &mut CardMarkup {
        self.markup.get_or_insert_with(CardMarkup::default)
    }
}

/// In-memory board that records every mutation the filter performs.
#[derive(Debug, Default)]
pub struct FakeBoard {
    pub cards: Vec<FakeCard>,
    pub activated: Vec<CardHandle>,
    pub controls_inserted: usize,
    pub hooks_attached: usize,
    sink: Option<MutationSink>,
}

impl FakeBoard {
    /// Builds a board; each card's handle takes its position in `cards`.
    pub fn new(mut cards: Vec<FakeCard>) -> Self {
        for (position, card) in cards.iter_mut().enumerate() {
            card.handle.position = position;
        }
        Self {
            cards,
            ..Self::default()
        }
    }

    pub fn observed_by(mut self, sink: MutationSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Handle of the first card keyed `id`; a dangling handle when none is.
    pub fn handle(&self, id: &str) -> CardHandle {
        self.cards
            .iter()
            .find(|card| card.handle.identity == id)
            .map(|card| card.handle.clone())
            .unwrap_or_else(|| CardHandle::new(usize::MAX, id))
    }

    pub fn visibility(&self, id: &str) -> Visibility {
        self.find(&self.handle(id))
            .map(|card| card.visibility)
            .unwrap_or(Visibility::Hidden)
    }

    pub fn last_activated(&self) -> Option<&str> {
        self.activated.last().map(|h| h.identity.as_str())
    }

    fn find(&self, handle: &CardHandle) -> Option<&FakeCard> {
        self.cards
            .get(handle.position)
            .filter(|card| &card.handle == handle)
    }

    fn find_mut(&mut self, handle: &CardHandle) -> Option<&mut FakeCard> {
        self.cards
            .get_mut(handle.position)
            .filter(|card| &card.handle == handle)
    }
}

impl JobBoard for FakeBoard {
    fn cards(&self) -> Vec<CardHandle> {
        self.cards.iter().map(|card| card.handle.clone()).collect()
    }

    fn read_card(&self, card: &CardHandle) -> Option<CardMarkup> {
        self.find(card).and_then(|card| card.markup.clone())
    }

    fn insert_block_control(&mut self, handle: &CardHandle) -> bool {
        let inserted = match self.find_mut(handle) {
            Some(FakeCard {
                markup: Some(markup),
                has_actions: true,
                ..
            }) if !markup.block_control => {
                markup.block_control = true;
                true
            }
            _ => false,
        };
        if inserted {
            self.controls_inserted += 1;
            if let Some(sink) = &self.sink {
                sink.record(MutationRecord::inserted(1));
            }
        }
        inserted
    }

    fn hook_dismiss(&mut self, handle: &CardHandle) -> bool {
        let hooked = match self.find_mut(handle).and_then(|card| card.markup.as_mut()) {
            Some(markup) if markup.dismiss == DismissHook::Unhooked => {
                markup.dismiss = DismissHook::Hooked;
                true
            }
            _ => false,
        };
        if hooked {
            self.hooks_attached += 1;
        }
        hooked
    }

    fn set_visibility(&mut self, handle: &CardHandle, visibility: Visibility) {
        if let Some(card) = self.find_mut(handle) {
            card.visibility = visibility;
        }
    }

    fn is_rendered(&self, handle: &CardHandle) -> bool {
        self.find(handle)
            .is_some_and(|card| card.visibility.is_shown())
    }

    fn activate(&mut self, handle: &CardHandle) -> bool {
        if !self.find(handle).is_some_and(|card| card.has_title) {
            return false;
        }
        for card in &mut self.cards {
            if let Some(markup) = card.markup.as_mut() {
                markup.current = (&card.handle == handle).then(|| "page".to_string());
            }
        }
        self.activated.push(handle.clone());
        true
    }
}
