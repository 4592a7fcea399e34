use criterion::{black_box, criterion_group, criterion_main, Criterion};
use palisade_core::{Game, GameConfig, TowerKind};

fn defended_game() -> Game {
    let config = GameConfig {
        starting_gold: 10_000,
        ..GameConfig::default()
    };
    let mut game = match Game::new(config, 42) {
        Ok(game) => game,
        Err(err) => panic!("benchmark field rejected: {err}"),
    };
    let spots = game.field().placeable_spots().to_vec();
    for (spot, kind) in spots.into_iter().zip(TowerKind::ALL.into_iter().cycle()) {
        let _ = game.buy_tower(kind, spot);
    }
    game
}

fn bench_tick_mid_wave(c: &mut Criterion) {
    // Warm up into a busy field before measuring
    let mut game = defended_game();
    if let Err(err) = game.start(None) {
        panic!("start failed: {err}");
    }
    for _ in 0..400 {
        game.tick();
    }

    c.bench_function("tick_mid_wave", |b| {
        b.iter_batched(
            || game.clone(),
            |mut game| {
                game.tick();
                black_box(game.current_tick())
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_generate_field(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut seed = 0u64;
    c.bench_function("generate_game", |b| {
        b.iter(|| {
            seed += 1;
            black_box(Game::new(config.clone(), black_box(seed)).is_ok())
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut game = defended_game();
    let _ = game.start(None);
    for _ in 0..400 {
        game.tick();
    }
    c.bench_function("snapshot", |b| b.iter(|| black_box(game.snapshot())));
}

criterion_group!(benches, bench_tick_mid_wave, bench_generate_field, bench_snapshot);
criterion_main!(benches);
