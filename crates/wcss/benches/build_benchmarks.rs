use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use wcss::{CompileOptions, Compiler, compile};

const ENTRY: &str = r#"
    @theme {
        --spacing: 0.25rem;
        --spacing-4: 1rem;
        --color-red-500: #ef4444;
        --color-blue-500: #3b82f6;
        --breakpoint-sm: 40rem;
        --breakpoint-md: 48rem;
        --breakpoint-lg: 64rem;
    }
    @utility tab-* { tab-size: --value(integer); }
    @tailwind utilities;
"#;

fn compiler() -> Compiler {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime
        .block_on(compile(ENTRY, "/", CompileOptions::new().minify(true)))
        .unwrap()
}

fn candidates(count: usize) -> Vec<String> {
    const BASES: &[&str] = &[
        "flex", "mt-4", "-mt-4", "p-3", "bg-red-500", "bg-blue-500/50", "text-red-500",
        "underline", "w-1/2", "mx-auto", "tab-4", "mt-[10px]", "opacity-75",
    ];
    const VARIANTS: &[&str] = &["", "hover:", "md:", "md:focus:", "dark:", "lg:hover:"];

    VARIANTS
        .iter()
        .flat_map(|v| BASES.iter().map(move |b| format!("{v}{b}")))
        .cycle()
        .take(count)
        .collect()
}

fn bench_compile(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    c.bench_function("compile_entry", |b| {
        b.iter(|| {
            runtime
                .block_on(compile(black_box(ENTRY), "/", CompileOptions::new()))
                .unwrap()
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let compiler = compiler();

    for count in [10, 78, 500] {
        let input = candidates(count);
        group.bench_with_input(BenchmarkId::new("candidates", count), &input, |b, input| {
            b.iter(|| compiler.build(black_box(input)))
        });
    }
    group.finish();
}

fn bench_unknown_candidates(c: &mut Criterion) {
    let compiler = compiler();
    let noise: Vec<String> = (0..500).map(|i| format!("not-a-class-{i}")).collect();

    c.bench_function("build_unknown_500", |b| {
        b.iter(|| compiler.build(black_box(&noise)))
    });
}

criterion_group!(benches, bench_compile, bench_build, bench_unknown_candidates);
criterion_main!(benches);
