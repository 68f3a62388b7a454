use bigtwo_core::game::settlement::{holding_reasons, settle};
use bigtwo_core::model::card::{Card, parse_cards};
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::rank::Rank;
use bigtwo_core::model::score::ScoreReasons;
use bigtwo_core::model::seat::Seat;
use bigtwo_core::model::suit::Suit;
use bigtwo_core::model::trick::{CardGroup, TrickInfo};
use bigtwo_core::rules::{TrickEvaluator, can_suppress};

fn play(text: &str) -> TrickInfo {
    let hand = Hand::with_cards(parse_cards(text).unwrap());
    let indices: Vec<usize> = (0..hand.len()).collect();
    TrickEvaluator::default().validate(hand.cards(), &indices).unwrap()
}

#[test]
fn full_house_of_fours_over_threes() {
    let info = play("3C 3D 4S 4H 4D");
    assert_eq!(info.group, CardGroup::FullHouse);
    assert_eq!(info.power, Card::new(Rank::Four, Suit::Spades).power());
}

#[test]
fn pair_of_twos_suppresses_pair_of_kings() {
    assert!(can_suppress(&play("2C 2H"), &play("KD KH")));
}

#[test]
fn any_straight_flush_suppresses_four_fives() {
    let quad = play("5C 5D 5H 5S 3D");
    for text in ["AC 2C 3C 4C 5C", "3D 4D 5D 6D 7D", "10S JS QS KS AS"] {
        let flush = play(text);
        assert_eq!(flush.group, CardGroup::StraightFlush);
        assert!(can_suppress(&flush, &quad), "{text}");
    }
}

#[test]
fn three_residual_twos_multiply_penalty_by_eight() {
    let residual = Hand::with_cards(parse_cards("2C 2D 2H 8S").unwrap());
    let reasons = holding_reasons(&residual);
    assert_eq!(reasons.twos_held(), 3);
    assert!(reasons.contains(ScoreReasons::holding_twos(3)));

    let hands = [
        Hand::with_cards(parse_cards("9C").unwrap()),
        Hand::new(),
        residual,
        Hand::with_cards(parse_cards("JC").unwrap()),
    ];
    let result = settle(Seat::East, &play("7H 8H 9H 10D JS"), &hands, [500; 4]);
    assert_eq!(result.penalties[Seat::South.index()], 4 * 8);
    assert_eq!(result.money[Seat::East.index()], 500 + 32 + 1 + 1);
}
