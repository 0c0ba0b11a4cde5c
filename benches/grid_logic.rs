use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use match3::core::{Grid, GridConfig, Session};
use match3::types::Position;

fn all_positions() -> Vec<Position> {
    (0..8)
        .flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
        .collect()
}

fn bench_find_matches(c: &mut Criterion) {
    let mut grid = Grid::new(GridConfig::default().with_seed(12345)).unwrap();
    let seeds = all_positions();

    c.bench_function("find_matches_full_board", |b| {
        b.iter(|| {
            let _ = grid.find_matches(black_box(&seeds), None);
        })
    });
}

fn bench_settle(c: &mut Criterion) {
    let grid = Grid::new(GridConfig::default().with_seed(12345)).unwrap();
    let column: Vec<Position> = (0..8).map(|row| Position::new(row, 3)).collect();

    c.bench_function("settle_and_refill_column", |b| {
        b.iter_batched(
            || {
                let mut g = grid.clone();
                let _ = g.clear_cells(&column);
                g
            },
            |mut g| black_box(g.settle_and_refill()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_count_moves(c: &mut Criterion) {
    let mut grid = Grid::new(GridConfig::default().with_seed(12345)).unwrap();

    c.bench_function("count_possible_matches", |b| {
        b.iter(|| black_box(grid.count_possible_matches()))
    });
}

fn bench_session_swap(c: &mut Criterion) {
    let mut session = Session::new(GridConfig::default().with_seed(12345)).unwrap();
    let (from, to) = session.grid_mut().possible_swaps()[0];

    c.bench_function("session_swap", |b| {
        b.iter_batched(
            || session.clone(),
            |mut s| black_box(s.try_swap(from, to)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_settle,
    bench_count_moves,
    bench_session_swap
);
criterion_main!(benches);
