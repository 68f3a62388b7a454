use super::{legal_plays, log_decision};
use bigtwo_core::game::bot::{BotAction, BotPolicy, BotView};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Picks uniformly among every legal show, plus passing when allowed.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: SmallRng,
    rejected: usize,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rejected: 0,
        }
    }

    /// Proposals the server refused so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl BotPolicy for RandomPolicy {
    fn think(&mut self, view: &BotView<'_>) -> BotAction {
        let plays = legal_plays(view);
        let can_pass = !view.is_leading();
        let options = plays.len() + usize::from(can_pass);
        if options == 0 {
            return BotAction::Pass;
        }

        let pick = self.rng.gen_range(0..options);
        let action = match plays.into_iter().nth(pick) {
            Some(combo) => BotAction::Show(combo.indices),
            None => BotAction::Pass,
        };
        log_decision(view, "random", &action, options);
        action
    }

    fn post_think(&mut self, accepted: bool, _action: &BotAction) {
        if !accepted {
            self.rejected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RandomPolicy;
    use crate::policy::legal_plays;
    use bigtwo_core::game::bot::{BotAction, BotPolicy, BotView};
    use bigtwo_core::model::card::{Card, parse_cards};
    use bigtwo_core::model::hand::Hand;
    use bigtwo_core::model::seat::Seat;
    use bigtwo_core::rules::Rules;

    fn opening_view(hand: &Hand) -> BotView<'_> {
        BotView {
            seat: Seat::North,
            hand,
            last_trick: None,
            last_shown_seat: None,
            first_lead: true,
            card_counts: [13; 4],
            rules: Rules::default(),
        }
    }

    #[test]
    fn opening_choices_all_hold_three_of_clubs() {
        let hand = Hand::with_cards(parse_cards("3C 3D 4H 5S 6C 7D 9H").unwrap());
        let view = opening_view(&hand);
        let plays = legal_plays(&view);
        assert!(!plays.is_empty());
        for combo in &plays {
            assert!(combo.indices.contains(&0), "{combo:?}");
        }

        let mut policy = RandomPolicy::new(3);
        for _ in 0..20 {
            match policy.think(&view) {
                BotAction::Show(indices) => assert_eq!(hand.cards()[indices[0]], Card::STARTING),
                BotAction::Pass => panic!("leader may not pass"),
            }
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let hand = Hand::with_cards(parse_cards("3C 3D 4H 5S 6C 7D 9H").unwrap());
        let view = opening_view(&hand);
        let mut a = RandomPolicy::new(99);
        let mut b = RandomPolicy::new(99);
        for _ in 0..10 {
            assert_eq!(a.think(&view), b.think(&view));
        }
    }
}
