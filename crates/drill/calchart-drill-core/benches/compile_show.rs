use calchart_drill_core::continuity::{CounterMarch, Fountain};
use calchart_drill_core::{compile_show, Config, Continuity, DotId, DotType, Show};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A block of `rows * cols` dots that fountains back and forth over `sheets`
/// sheets, with a counter march on every other sheet.
fn block_show(rows: usize, cols: usize, sheets: usize) -> Show {
    let mut show = Show::new("bench block");
    let dots: Vec<DotId> = (0..rows * cols)
        .map(|i| DotId::new(format!("D{i}")))
        .collect();
    for dot in &dots {
        let label = dot.as_str().to_string();
        show.add_dot(dot.clone(), label).expect("add dot");
    }
    for s in 0..sheets {
        let sheet = show.add_sheet(format!("{}", s + 1), 16);
        let shift = if s % 2 == 0 { 0.0 } else { 4.0 };
        for (i, dot) in dots.iter().enumerate() {
            let (r, c) = ((i / cols) as f64, (i % cols) as f64);
            show.place(sheet, dot, r * 2.0 + shift, c * 2.0 + shift, DotType::Plain)
                .expect("place dot");
        }
        let kind = if s % 2 == 1 {
            Continuity::new(DotType::Plain, CounterMarch::new(dots.clone()).for_beats(8))
        } else {
            Continuity::new(DotType::Plain, Fountain::default())
        };
        show.add_continuity(sheet, kind).expect("add continuity");
    }
    show
}

fn bench_compile(c: &mut Criterion) {
    let small = block_show(4, 4, 8);
    let large = block_show(12, 16, 24);
    let cfg = Config::default();

    c.bench_function("compile 16 dots x 8 sheets", |b| {
        b.iter(|| compile_show(black_box(&small), &cfg))
    });
    c.bench_function("compile 192 dots x 24 sheets", |b| {
        b.iter(|| compile_show(black_box(&large), &cfg))
    });

    let timeline = compile_show(&large, &cfg);
    c.bench_function("sample every dot at one beat", |b| {
        b.iter(|| timeline.states_at(black_box(123.5)))
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
