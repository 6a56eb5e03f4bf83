use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use nfl_gamelog::derive::derive_games;
use nfl_gamelog::fixtures::{raw_table, synthetic_season};
use nfl_gamelog::game;
use nfl_gamelog::schema::clean;
use nfl_gamelog::table::{read_csv_from, write_csv_to};

fn bench_clean(c: &mut Criterion) {
    let raw = raw_table(&synthetic_season(2023, 18));
    c.bench_function("schema_clean_season", |b| {
        b.iter(|| {
            let rows = clean(black_box(&raw)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_derive(c: &mut Criterion) {
    let rows = clean(&raw_table(&synthetic_season(2023, 18))).unwrap();
    c.bench_function("derive_games_season", |b| {
        b.iter(|| {
            let games = derive_games(black_box(rows.clone())).unwrap();
            black_box(game::to_table(&games).len());
        })
    });
}

fn bench_csv_round_trip(c: &mut Criterion) {
    let raw = raw_table(&synthetic_season(2023, 18));
    let mut buf = Vec::new();
    write_csv_to(&mut buf, &raw).unwrap();
    c.bench_function("raw_csv_load", |b| {
        b.iter(|| {
            let table = read_csv_from(black_box(buf.as_slice())).unwrap();
            black_box(table.len());
        })
    });
}

criterion_group!(benches, bench_clean, bench_derive, bench_csv_round_trip);
criterion_main!(benches);
