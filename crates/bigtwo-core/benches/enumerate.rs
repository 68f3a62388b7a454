use bigtwo_core::model::card::parse_cards;
use bigtwo_core::model::deck::Deck;
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::trick::CardGroup;
use bigtwo_core::rules::Classification;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn dealt_hand(seed: u64) -> Hand {
    let [north, ..] = Deck::shuffled_with_seed(seed).deal();
    north
}

fn count_all(class: &Classification) -> usize {
    CardGroup::ALL
        .into_iter()
        .map(|group| class.combinations(group).count())
        .sum()
}

fn enumerate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    for seed in [7u64, 1040, 2024] {
        let hand = dealt_hand(seed);
        group.bench_function(format!("classify_{seed}"), |b| {
            b.iter(|| Classification::from_hand(black_box(&hand)))
        });
        let class = Classification::from_hand(&hand);
        group.bench_function(format!("all_groups_{seed}"), |b| b.iter(|| count_all(black_box(&class))));
    }

    let dense = Hand::with_cards(parse_cards("3C 3D 3H 4C 4D 4H 5C 5D 5H 6C 6D 7C 7S").unwrap());
    let class = Classification::from_hand(&dense);
    group.bench_function("full_house_dense", |b| {
        b.iter(|| black_box(&class).combinations(CardGroup::FullHouse).count())
    });
    group.bench_function("straight_dense", |b| {
        b.iter(|| black_box(&class).combinations(CardGroup::Straight).count())
    });
    group.finish();
}

criterion_group!(benches, enumerate_bench);
criterion_main!(benches);
