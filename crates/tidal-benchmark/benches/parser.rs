use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use tidal_db::{File, RootDatabase};

fn benchmark_parser(c: &mut Criterion) {
    let db = RootDatabase::default();
    let files = vec![
        File::new(
            &db,
            "Simple".into(),
            r#"
let answer = 42
echo answer
"#
            .to_string(),
        ),
        File::new(
            &db,
            "Medium".into(),
            r#"
proc classify(n: int): string =
  if n < 0:
    return "negative"
  elif n == 0:
    return "zero"
  else:
    return "positive"

var total = 0
for i, item in items:
  total = total +
    item * i
  block inner:
    let squared = item ^ 2
    echo classify(squared), total
"#
            .to_string(),
        ),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for file in files {
        let code_length = file.text(&db).len() as u64;
        group.throughput(Throughput::Bytes(code_length));
        group.bench_with_input(
            BenchmarkId::new("parse_code", file.path(&db)),
            &file,
            |b, &file| {
                b.iter(|| {
                    let parse = tidal_parse::parse(file.text(&db));
                    black_box(parse);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
