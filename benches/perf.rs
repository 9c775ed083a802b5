use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use kit_colors::fuzzy::{MatchConfig, fuzzy_match};
use kit_colors::store::OverrideStore;
use kit_colors::team_db;
use kit_colors::{ColorResolver, HexColor};

const FIXTURE_NAMES: &[&str] = &[
    "Arsenal",
    "ARS",
    "Man Utd",
    "Tottenham Hotspur",
    "Arsenl",
    "Washington Spirit Women",
    "Bayern Munich",
    "Real",
    "PSG",
    "Forest Green Rovers",
];

fn bench_builtin_lookup(c: &mut Criterion) {
    c.bench_function("builtin_lookup", |b| {
        b.iter(|| {
            for name in FIXTURE_NAMES {
                black_box(team_db::builtin_color(black_box(name)));
            }
        })
    });
}

fn bench_fuzzy_match(c: &mut Criterion) {
    let cfg = MatchConfig::default();
    c.bench_function("fuzzy_match", |b| {
        b.iter(|| {
            for name in FIXTURE_NAMES {
                black_box(fuzzy_match(black_box(name), team_db::fuzzy_keys(), cfg));
            }
        })
    });
}

fn bench_resolver_lookup(c: &mut Criterion) {
    let mut store = OverrideStore::in_memory();
    for idx in 0..200u32 {
        store.set(
            &format!("Sunday League XI {idx}"),
            HexColor::parse(&format!("#{:06X}", idx * 4097)).unwrap(),
        );
    }
    let resolver = ColorResolver::new(store);
    let hints: HashMap<String, String> = HashMap::new();

    c.bench_function("resolver_lookup", |b| {
        b.iter(|| {
            for name in FIXTURE_NAMES {
                let hint = hints.get(*name).map(String::as_str);
                black_box(resolver.lookup(black_box(name), hint));
            }
        })
    });
}

fn bench_team_abbrev(c: &mut Criterion) {
    c.bench_function("team_abbrev", |b| {
        b.iter(|| {
            for name in FIXTURE_NAMES {
                black_box(team_db::team_abbrev(black_box(name)));
            }
        })
    });
}

criterion_group!(
    perf,
    bench_builtin_lookup,
    bench_fuzzy_match,
    bench_resolver_lookup,
    bench_team_abbrev
);
criterion_main!(perf);
