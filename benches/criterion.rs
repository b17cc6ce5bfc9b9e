use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use patchbay::{config::PanelConfig, engine::Propagation, markup::PanelDecl, Panel};

/// A power node feeding a chain of `len` plain nodes, closed into a ring.
fn ring(len: usize) -> PanelDecl {
    let mut decl = PanelDecl::default().node(&[("id", "p"), ("type", "power"), ("connectedWith", "n0")]);
    for i in 0..len {
        let id = format!("n{}", i);
        let next = format!("n{}", (i + 1) % len);
        decl = decl.node(&[("id", id.as_str()), ("connectedWith", next.as_str())]);
    }
    decl
}

fn propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");
    for len in [8, 32, 128] {
        for mode in [Propagation::Flood, Propagation::Relaxation] {
            let config = PanelConfig { propagation: mode, ..PanelConfig::default() };
            let mut panel = Panel::load(ring(len), config).unwrap();
            group.bench_with_input(BenchmarkId::new(format!("{:?}", mode), len), &len, |b, _| {
                b.iter(|| black_box(&mut panel).propagate())
            });
        }
    }
    group.finish();
}

fn click(c: &mut Criterion) {
    let mut panel = Panel::load(ring(64), PanelConfig::default()).unwrap();
    c.bench_function("click pair", |b| {
        b.iter(|| {
            panel.click(black_box("n10")).unwrap();
            panel.click(black_box("n40")).unwrap();
        })
    });
}

criterion_group!(benches, propagate, click);
criterion_main!(benches);
