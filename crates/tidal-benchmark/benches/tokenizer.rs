use std::hint::black_box;

use codspeed_criterion_compat::{Criterion, Throughput, criterion_group, criterion_main};
use tidal_tokenizer::{SyntaxKind, Tokenizer};

static SOURCE: &str = "
proc foo(a, b: int): int =
  if a <= b and not done:
    result = a *% b ^ 2 .. [1, 2, 3]
  elif @ptr.field != nil:
    discard foo(a - 1, b)
  else:
    while x >= 0: x -= 1
";

static IDENTIFIERS: &str =
    "It was the year when they finally immanentized the Eschaton It was the year when they \
     finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton It was the year when \
     they finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton";

static COMMENTS: &str = "
# line comment
# continued
#[ block #[ nested ]# comment ]#
## documentation
echo x # trailing
";

fn candidates() -> [(&'static str, String); 3] {
    [
        ("identifiers", IDENTIFIERS.to_owned()),
        ("keywords_operators_and_layout", SOURCE.repeat(30)),
        ("comments", COMMENTS.repeat(30)),
    ]
}

fn drain(source: &str) -> usize {
    let mut tokenizer = Tokenizer::new(source);
    let mut count = 0;
    while tokenizer.next_token().kind != SyntaxKind::EOF {
        count += 1;
    }
    count
}

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    for (name, source) in candidates() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, source| b.iter(|| black_box(drain(source))));
    }

    group.finish();
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
