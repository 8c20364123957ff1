//! Conversion throughput over generated text tables

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tabmat::{page_rounded_size, MappedRegion, ScanConfig};

fn write_table(rows: usize, cols: usize) -> tempfile::NamedTempFile {
    let mut rng = StdRng::seed_from_u64(42);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for _ in 0..rows {
        let mut line = String::new();
        for c in 0..cols {
            if c > 0 {
                line.push(',');
            }
            line.push_str(&format!("{:.4}", rng.gen_range(-1000.0..1000.0)));
        }
        line.push('\n');
        file.write_all(line.as_bytes()).unwrap();
    }
    file.flush().unwrap();
    file
}

fn bench_convert(c: &mut Criterion) {
    let config = ScanConfig::default();
    let table = write_table(1000, 8);
    let size = page_rounded_size(table.path()).unwrap();

    c.bench_function("text_to_matrix_1000x8", |b| {
        b.iter(|| {
            let mut text = MappedRegion::open_file(table.path(), "r", size).unwrap();
            let matrix = text.to_double_matrix(None, &config).unwrap();
            black_box(matrix.matrix_values().unwrap()[0]);
        })
    });

    c.bench_function("field_and_record_count_1000x8", |b| {
        b.iter(|| {
            let mut text = MappedRegion::open_file(table.path(), "r", size).unwrap();
            let fields = text.text_fields(&config).unwrap();
            let records = text.text_records(&config).unwrap();
            black_box((fields, records));
        })
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
