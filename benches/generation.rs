//! Generation and pathfinding benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warren::{DungeonGenerator, GenerationConfig, LevelRng, Pathfinder};

fn bench_generation(c: &mut Criterion) {
    let generator = DungeonGenerator::new(GenerationConfig::new()).unwrap();
    c.bench_function("generate 33x33", |b| {
        b.iter(|| {
            let mut rng = LevelRng::new(black_box(42));
            generator.generate(&mut rng).unwrap()
        })
    });
}

fn bench_pathfinding(c: &mut Criterion) {
    let generator = DungeonGenerator::new(GenerationConfig::new()).unwrap();
    let dungeon = generator.generate(&mut LevelRng::new(42)).unwrap();
    let start = dungeon.rooms.first().unwrap().center();
    let goal = dungeon.rooms.last().unwrap().center();

    c.bench_function("path across 33x33", |b| {
        let pathfinder = Pathfinder::new(&dungeon.grid);
        b.iter(|| pathfinder.path(black_box(start), black_box(goal)))
    });
}

criterion_group!(benches, bench_generation, bench_pathfinding);
criterion_main!(benches);
