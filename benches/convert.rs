use criterion::*;
use std::fs::File;
use std::io::Read;
use taskprof::convert::{self, Options};

fn convert_benchmark(c: &mut Criterion, id: &str, infile: &str) {
    let mut f = File::open(infile).expect("file not found");

    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes).expect("Could not read file");

    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_with_input(BenchmarkId::new("from_slice", id), &bytes, |b, data| {
        b.iter(|| {
            let _profile = convert::from_slice(&Options::default(), data);
        })
    });
    group.finish();

    let profile = convert::from_slice(&Options::default(), &bytes).expect("Could not convert file");
    c.bench_function(&format!("serialize/{}", id), |b| {
        b.iter(|| serde_json::to_vec(&profile).unwrap())
    });
}

macro_rules! convert_benchmarks {
    ($($name:ident : $infile:expr),*) => {
        $(
            fn $name(c: &mut Criterion) {
                let id = stringify!($name);
                convert_benchmark(c, id, $infile);
            }
        )*

        criterion_group!(benches, $($name),*);
        criterion_main!(benches);
    }
}

convert_benchmarks! {
    single: "tests/data/tasks/single.json",
    group: "tests/data/tasks/group.json"
}
