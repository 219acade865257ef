use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memory_match::core::{build_deck, Catalog, GameState, SimpleRng};
use memory_match::types::MISMATCH_RESOLVE_MS;

fn bench_build_deck(c: &mut Criterion) {
    let catalog = Catalog::demo();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("build_deck_8_pairs", |b| {
        b.iter(|| build_deck(black_box(&catalog), &mut rng))
    });
}

fn bench_reveal_turn(c: &mut Criterion) {
    let mut game = GameState::new(Catalog::demo(), 12345);
    let first = game.tiles()[0];
    let other = game.tiles()[1..]
        .iter()
        .find(|t| t.pair_key != first.pair_key)
        .map(|t| t.position)
        .unwrap();

    c.bench_function("reveal_mismatch_turn", |b| {
        b.iter(|| {
            // Two mismatching reveals plus the resolution tick; the
            // round returns to idle, so every iteration does full work.
            let _ = game.reveal(black_box(first.position));
            let _ = game.reveal(black_box(other));
            game.tick(MISMATCH_RESOLVE_MS);
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut game = GameState::new(Catalog::demo(), 12345);
    let _ = game.reveal(0);
    let _ = game.reveal(1);

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            game.tick(black_box(16));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let game = GameState::new(Catalog::demo(), 12345);
    let mut out = game.snapshot();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(black_box(&mut out));
        })
    });
}

fn bench_reset(c: &mut Criterion) {
    let mut game = GameState::new(Catalog::demo(), 12345);

    c.bench_function("reset_round", |b| {
        b.iter(|| {
            game.reset();
        })
    });
}

criterion_group!(
    benches,
    bench_build_deck,
    bench_reveal_turn,
    bench_tick,
    bench_snapshot,
    bench_reset
);
criterion_main!(benches);
