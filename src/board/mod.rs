//! Capability port over the rendered job list.
//!
//! The filter never touches markup directly; it enumerates cards, reads a
//! [`CardMarkup`] snapshot for each one and asks the board to mutate display
//! state or attach controls.

pub mod html;

#[cfg(test)]
pub mod fake;

use crate::domain::{DismissHook, Visibility};

pub use html::HtmlBoard;

/// Points at one card element: its position among the board's cards plus the
/// element's own key attribute. Two cards sharing a key are still distinct
/// handles. A handle whose position now holds a different key is stale and
/// resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardHandle {
    pub position: usize,
    pub identity: String,
}

impl CardHandle {
    pub fn new(position: usize, identity: impl Into<String>) -> Self {
        Self {
            position,
            identity: identity.into(),
        }
    }
}

/// Raw reads for one card whose job-detail container is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardMarkup {
    pub detail_text: String,
    pub current: Option<String>,
    pub promoted_marker: bool,
    pub title_text: Option<String>,
    pub title_emphasis: Option<String>,
    pub block_control: bool,
    pub dismiss: DismissHook,
}

pub trait JobBoard {
    /// All candidate cards in document order.
    fn cards(&self) -> Vec<CardHandle>;

    /// `None` when the card has no job-detail container yet.
    fn read_card(&self, card: &CardHandle) -> Option<CardMarkup>;

    /// Inserts the block control into the card's actions region. Returns
    /// `false` when nothing was inserted.
    fn insert_block_control(&mut self, card: &CardHandle) -> bool;

    /// Marks the host dismiss control as intercepted. Returns `false` when the
    /// card has no unhooked dismiss control.
    fn hook_dismiss(&mut self, card: &CardHandle) -> bool;

    fn set_visibility(&mut self, card: &CardHandle, visibility: Visibility);

    /// Whether the card currently occupies layout space.
    fn is_rendered(&self, card: &CardHandle) -> bool;

    /// Simulated primary-action click on the card's title control.
    fn activate(&mut self, card: &CardHandle) -> bool;
}
