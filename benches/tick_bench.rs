use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lane_tactician::core::types::{Side, Tile};
use lane_tactician::state::{BoardUnit, PlayRecord};
use lane_tactician::{DecisionEngine, GameSnapshot};

fn busy_snapshot(elapsed: f32) -> GameSnapshot {
    let mut snapshot = GameSnapshot::at(elapsed).with_hand(&["giant", "musketeer", "cannon", "zap"]);
    snapshot.own_elixir = 9.2;
    snapshot.units = vec![
        BoardUnit::new(1, "hog_rider", Side::Enemy, Tile::new(14, 13)),
        BoardUnit::new(2, "musketeer", Side::Enemy, Tile::new(4, 18)),
        BoardUnit::new(3, "golem", Side::Enemy, Tile::new(4, 10)),
        BoardUnit::new(4, "knight", Side::Own, Tile::new(13, 9)),
    ];
    snapshot.enemy_history = vec![
        PlayRecord::new("golem", Tile::new(4, 28), elapsed - 12.0, Side::Enemy),
        PlayRecord::new("musketeer", Tile::new(4, 24), elapsed - 8.0, Side::Enemy),
        PlayRecord::new("hog_rider", Tile::new(14, 18), elapsed - 3.0, Side::Enemy),
    ];
    snapshot
}

fn bench_tick(c: &mut Criterion) {
    let mut engine = DecisionEngine::standard().expect("engine");
    let mut elapsed = 60.0;
    c.bench_function("tick_uncached", |b| {
        b.iter(|| {
            elapsed += 1.0;
            engine.tick(black_box(&busy_snapshot(elapsed)))
        })
    });

    let mut engine = DecisionEngine::standard().expect("engine");
    let snapshot = busy_snapshot(90.0);
    let _ = engine.tick(&snapshot);
    c.bench_function("tick_cached", |b| b.iter(|| engine.tick(black_box(&snapshot))));
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
