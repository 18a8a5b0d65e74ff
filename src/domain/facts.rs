#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Visibility::Shown)
    }
}

/// State of the host's own dismiss control on a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DismissHook {
    #[default]
    Absent,
    Unhooked,
    Hooked,
}

/// Per-card idempotency flags for the controls the filter attaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    pub block_control: bool,
    pub dismiss_hook: DismissHook,
}

/// Everything the classifier knows about one card during a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFacts {
    pub identity: String,
    pub raw_text: String,
    pub is_promoted: bool,
    pub is_viewed: bool,
    pub is_hidden: bool,
    pub is_applied: bool,
    pub is_active: bool,
    pub title_phrase: Option<String>,
    pub affordances: Affordances,
}
