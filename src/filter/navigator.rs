use crate::board::{CardHandle, JobBoard};

/// Cards currently occupying layout space, in document order.
pub fn visible_cards<B: JobBoard + ?Sized>(board: &B) -> Vec<CardHandle> {
    board
        .cards()
        .into_iter()
        .filter(|card| board.is_rendered(card))
        .collect()
}

/// Opens the visible card after `reference`, falling back to the first
/// visible card. Returns the card that was targeted, if any.
pub fn advance<B: JobBoard + ?Sized>(
    board: &mut B,
    reference: Option<&CardHandle>,
) -> Option<CardHandle> {
    let visible = visible_cards(&*board);

    let successor = reference.and_then(|current| {
        visible
            .iter()
            .position(|card| card == current)
            .and_then(|idx| visible.get(idx + 1))
    });
    let Some(target) = successor.or_else(|| visible.first()).cloned() else {
        tracing::info!(target: "nav", "no visible card to open");
        return None;
    };

    if board.activate(&target) {
        tracing::info!(
            target: "nav",
            card = %target.identity,
            from = reference.map(|r| r.identity.as_str()),
            "opened card"
        );
    } else {
        tracing::debug!(target: "nav", card = %target.identity, "card has no title control to open");
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fake::{FakeBoard, FakeCard};

    fn board() -> FakeBoard {
        FakeBoard::new(vec![
            FakeCard::job("1", "a"),
            FakeCard::job("2", "b").hidden(),
            FakeCard::job("3", "c"),
            FakeCard::job("4", "d"),
        ])
    }

    #[test]
    fn opens_successor_skipping_hidden_cards() {
        let mut board = board();
        let target = advance(&mut board, Some(&CardHandle::new(0, "1")));
        assert_eq!(target, Some(CardHandle::new(2, "3")));
        assert_eq!(board.last_activated(), Some("3"));
    }

    #[test]
    fn last_card_wraps_to_first() {
        let mut board = board();
        advance(&mut board, Some(&CardHandle::new(3, "4")));
        assert_eq!(board.last_activated(), Some("1"));
    }

    #[test]
    fn missing_or_hidden_reference_opens_first() {
        let mut board = board();
        advance(&mut board, Some(&CardHandle::new(1, "2")));
        assert_eq!(board.last_activated(), Some("1"));
        advance(&mut board, Some(&CardHandle::new(9, "99")));
        advance(&mut board, None);
        assert_eq!(board.activated.len(), 3);
        assert!(board.activated.iter().all(|c| c.identity == "1"));
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let mut board = FakeBoard::new(vec![FakeCard::job("1", "a").hidden()]);
        assert_eq!(advance(&mut board, None), None);
        assert_eq!(advance(&mut board, Some(&CardHandle::new(0, "1"))), None);
        assert!(board.activated.is_empty());
    }

    #[test]
    fn target_without_title_is_not_activated() {
        let mut board = FakeBoard::new(vec![FakeCard::job("1", "a").without_title()]);
        assert_eq!(advance(&mut board, None), Some(CardHandle::new(0, "1")));
        assert!(board.activated.is_empty());
    }
}
