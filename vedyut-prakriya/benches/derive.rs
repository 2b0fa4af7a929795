use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vedyut_prakriya::dhatupatha::gana_tag;
use vedyut_prakriya::driver::{DerivationConfig, Driver};
use vedyut_prakriya::rules::{self, tin};
use vedyut_prakriya::state::State;
use vedyut_prakriya::tag::Tag;
use vedyut_prakriya::term::{ParseOptions, Upadesha};

fn dhatu(raw: &str, gana: u8) -> Upadesha {
    Upadesha::parse(raw, ParseOptions::default())
        .add_tag(Tag::Dhatu)
        .add_tag(gana_tag(gana))
}

fn tip() -> Upadesha {
    tin::build(tin::Purusha::Prathama, tin::Vacana::Eka).unwrap()
}

fn bench_derive_bhu(c: &mut Criterion) {
    let driver = Driver::new(rules::build_registry(), DerivationConfig::default());
    c.bench_function("derive_bhu_bhavati", |b| {
        b.iter(|| {
            let start = State::new(vec![dhatu("BU", 1), tip()]);
            black_box(driver.derive_forms(start).unwrap())
        })
    });
}

fn bench_derive_kr(c: &mut Criterion) {
    let driver = Driver::new(rules::build_registry(), DerivationConfig::default());
    c.bench_function("derive_kr_karoti", |b| {
        b.iter(|| {
            let start = State::new(vec![dhatu("qukf\\Y", 8), tip()]);
            black_box(driver.derive_forms(start).unwrap())
        })
    });
}

fn bench_derive_kri(c: &mut Criterion) {
    let driver = Driver::new(rules::build_registry(), DerivationConfig::default());
    c.bench_function("derive_kri_krinati", |b| {
        b.iter(|| {
            let start = State::new(vec![dhatu("qukrI\\Y", 9), tip()]);
            black_box(driver.derive_forms(start).unwrap())
        })
    });
}

fn bench_build_registry(c: &mut Criterion) {
    c.bench_function("build_registry", |b| b.iter(|| black_box(rules::build_registry())));
}

criterion_group!(
    benches,
    bench_derive_bhu,
    bench_derive_kr,
    bench_derive_kri,
    bench_build_registry,
);
criterion_main!(benches);
