use super::log_decision;
use bigtwo_core::game::bot::{BotAction, BotPolicy, BotView};
use bigtwo_core::model::trick::{CardGroup, TrickInfo};
use bigtwo_core::rules::{CombinationCursor, can_suppress};

/// Plays the weakest thing that works: the lowest single on a lead, the
/// first stronger combination of the same group when following, then the
/// first bomb that beats the table. Passes otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowestPlayPolicy;

impl LowestPlayPolicy {
    pub fn new() -> Self {
        Self
    }

    fn choose(view: &BotView<'_>) -> BotAction {
        let Some(previous) = view.last_trick else {
            // The lowest card is the three of clubs whenever its holder leads.
            return BotAction::Show(vec![0]);
        };

        let class = view.classification();
        let evaluator = view.evaluator();

        if evaluator.allows(previous.group) {
            if let Some(cursor) = CombinationCursor::start_above(&class, previous.group, previous.power) {
                return BotAction::Show(cursor.indices());
            }
        }

        for bomb in [CardGroup::FourOfKind, CardGroup::StraightFlush] {
            let found = class.combinations(bomb).find(|combo| {
                let candidate = TrickInfo {
                    group: combo.group,
                    power: combo.power,
                    cards: combo.cards(&class),
                };
                can_suppress(&candidate, previous)
            });
            if let Some(combo) = found {
                return BotAction::Show(combo.indices);
            }
        }

        BotAction::Pass
    }
}

impl BotPolicy for LowestPlayPolicy {
    fn think(&mut self, view: &BotView<'_>) -> BotAction {
        let action = Self::choose(view);
        log_decision(view, "lowest", &action, 1);
        action
    }

    fn post_think(&mut self, accepted: bool, action: &BotAction) {
        if !accepted {
            tracing::debug!(target: "bigtwo_bot::decision", ?action, "lowest play rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LowestPlayPolicy;
    use bigtwo_core::game::bot::{BotAction, BotPolicy, BotView};
    use bigtwo_core::model::card::parse_cards;
    use bigtwo_core::model::hand::Hand;
    use bigtwo_core::model::seat::Seat;
    use bigtwo_core::model::trick::TrickInfo;
    use bigtwo_core::rules::{Rules, TrickEvaluator};

    fn view<'a>(hand: &'a Hand, last: Option<&'a TrickInfo>) -> BotView<'a> {
        BotView {
            seat: Seat::South,
            hand,
            last_trick: last,
            last_shown_seat: last.map(|_| Seat::East),
            first_lead: last.is_none(),
            card_counts: [13; 4],
            rules: Rules::default(),
        }
    }

    fn trick(text: &str) -> TrickInfo {
        let cards = parse_cards(text).unwrap();
        let indices: Vec<usize> = (0..cards.len()).collect();
        TrickEvaluator::default().validate(&cards, &indices).unwrap()
    }

    #[test]
    fn leads_the_lowest_card() {
        let hand = Hand::with_cards(parse_cards("3C 7D 2S").unwrap());
        assert_eq!(LowestPlayPolicy.think(&view(&hand, None)), BotAction::Show(vec![0]));
    }

    #[test]
    fn follows_with_the_next_stronger_pair() {
        let hand = Hand::with_cards(parse_cards("4C 4D 9H 9S KC KS").unwrap());
        let previous = trick("8C 8D");
        assert_eq!(
            LowestPlayPolicy.think(&view(&hand, Some(&previous))),
            BotAction::Show(vec![2, 3])
        );
    }

    #[test]
    fn bombs_when_it_cannot_follow() {
        let hand = Hand::with_cards(parse_cards("4C 6C 6D 6H 6S").unwrap());
        let previous = trick("2S");
        assert_eq!(
            LowestPlayPolicy.think(&view(&hand, Some(&previous))),
            BotAction::Show(vec![0, 1, 2, 3, 4])
        );
    }

    #[test]
    fn passes_without_an_answer() {
        let hand = Hand::with_cards(parse_cards("3D 4H").unwrap());
        let previous = trick("2S");
        assert_eq!(LowestPlayPolicy.think(&view(&hand, Some(&previous))), BotAction::Pass);
    }
}
