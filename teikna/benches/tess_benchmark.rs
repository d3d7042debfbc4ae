use criterion::{criterion_group, criterion_main, Criterion};
use teikna::{BuildOptions, TessellatedFont};

pub fn build_coarse(c: &mut Criterion) {
    let data = ttf_test_data::font::test_font();
    c.bench_function("build step 0.5", |b| {
        b.iter(|| {
            let options = BuildOptions {
                step: 0.5,
                ..Default::default()
            };
            TessellatedFont::build(&data, &options).unwrap()
        })
    });
}

pub fn build_fine(c: &mut Criterion) {
    let data = ttf_test_data::font::test_font();
    c.bench_function("build step 0.01", |b| {
        b.iter(|| {
            let options = BuildOptions {
                step: 0.01,
                ..Default::default()
            };
            TessellatedFont::build(&data, &options).unwrap()
        })
    });
}

criterion_group!(benches, build_coarse, build_fine);
criterion_main!(benches);
