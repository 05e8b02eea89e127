use criterion::{criterion_group, criterion_main, Criterion};
use fitcheck_lib::{
    aggregate, parse_fitting, FitRequirements, Pilot, SkillResolver, StaticCatalog,
};
use once_cell::sync::Lazy;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

static CATALOG: Lazy<StaticCatalog> = Lazy::new(|| {
    StaticCatalog::from_dir(&fixtures_dir().join("catalog")).expect("fixture catalog loads")
});
static RIFTER: Lazy<String> = Lazy::new(|| {
    fs::read_to_string(fixtures_dir().join("fittings/rifter_drones.eft")).expect("fixture fit")
});

/// 300 pilots with a spread of trained levels across the fixture skills.
static PILOTS: Lazy<Vec<Pilot>> = Lazy::new(|| {
    let skills = [
        3327, 3329, 3330, 3334, 30651, 3392, 3394, 3449, 3435, 3300, 3302, 26252, 26254, 3425,
        3436, 24241, 12487,
    ];
    (0..300)
        .map(|i| Pilot {
            id: i,
            name: format!("Pilot {i}"),
            skills: skills
                .iter()
                .enumerate()
                .map(|(j, &skill)| (skill, ((i as usize + j) % 6) as u8))
                .collect(),
        })
        .collect()
});

static FITS: Lazy<Vec<FitRequirements>> = Lazy::new(|| {
    let fit = parse_fitting(&RIFTER, &*CATALOG).expect("fixture parses");
    let skills = SkillResolver::new(&*CATALOG)
        .resolve_fitting(&fit)
        .expect("fixture resolves");
    (0..20)
        .map(|i| FitRequirements {
            id: i,
            name: format!("Fit {i}"),
            skills: skills.clone(),
        })
        .collect()
});

fn benchmark_readiness(c: &mut Criterion) {
    c.bench_function("parse_rifter_drones", |b| {
        b.iter(|| {
            let fit = parse_fitting(&RIFTER, &*CATALOG).expect("parses");
            black_box(fit.slots.len())
        });
    });

    c.bench_function("resolve_rifter_drones", |b| {
        let fit = parse_fitting(&RIFTER, &*CATALOG).expect("parses");
        let resolver = SkillResolver::new(&*CATALOG);
        b.iter(|| {
            let skills = resolver.resolve_fitting(&fit).expect("resolves");
            black_box(skills.fit_skills.len())
        });
    });

    c.bench_function("aggregate_300_pilots_20_fits", |b| {
        let pilots = &*PILOTS;
        let fits = &*FITS;
        b.iter(|| {
            let matrix = aggregate(pilots, fits);
            black_box(matrix.totals.len())
        });
    });
}

criterion_group!(benches, benchmark_readiness);
criterion_main!(benches);
