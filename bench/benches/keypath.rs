use std::hint::black_box;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use mimalloc::MiMalloc;
use ods::{Registry, Tag, delete, find, get, get_all, replace, set, to_vec_all};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// A save file with `players` player objects, each holding a small
/// inventory and some stats.
fn document(players: usize) -> Vec<Tag> {
    (0..players)
        .map(|p| {
            Tag::object(
                format!("player{p}"),
                vec![
                    Tag::string("name", format!("Player {p}")),
                    Tag::new("level", p as i32),
                    Tag::new("health", 20.0f32),
                    Tag::object(
                        "Inventory",
                        (0..27)
                            .map(|slot| Tag::string(format!("slot{slot}"), "minecraft:stone"))
                            .collect(),
                    ),
                    Tag::object(
                        "Position",
                        vec![
                            Tag::new("x", 1.0f64),
                            Tag::new("y", 64.0f64),
                            Tag::new("z", -3.5f64),
                        ],
                    ),
                ],
            )
        })
        .collect()
}

fn bench_lookup(c: &mut Criterion) {
    let registry = Registry::default();
    let data = to_vec_all(&document(200), &registry).unwrap();
    let key = "player150.Position.y";

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("get", |b| {
        b.iter(|| get(black_box(&data), black_box(key), &registry).unwrap())
    });
    group.bench_function("find", |b| {
        b.iter(|| find(black_box(&data), black_box(key)).unwrap())
    });
    group.bench_function("get_all", |b| {
        b.iter(|| get_all(black_box(&data), &registry).unwrap())
    });
    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let registry = Registry::default();
    let data = to_vec_all(&document(200), &registry).unwrap();
    let name = Tag::string("name", "A considerably longer player name");
    let fresh = Tag::new("armor", 7);

    let mut group = c.benchmark_group("mutation");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("delete", |b| {
        b.iter_batched(
            || data.clone(),
            |mut buf| delete(&mut buf, "player150.Inventory.slot3").unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("replace", |b| {
        b.iter_batched(
            || data.clone(),
            |mut buf| replace(&mut buf, "player150.name", &name, &registry).unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("set_new_path", |b| {
        b.iter_batched(
            || data.clone(),
            |mut buf| set(&mut buf, "player150.Stats.armor", &fresh, &registry).unwrap(),
            BatchSize::LargeInput,
        )
    });
    group.bench_function("decode_modify_encode", |b| {
        b.iter_batched(
            || data.clone(),
            |buf| {
                let mut tags = get_all(&buf, &registry).unwrap();
                tags[150].push(Tag::new("armor", 7)).unwrap();
                to_vec_all(&tags, &registry).unwrap()
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let registry = Registry::default();
    let tags = document(50);

    let mut group = c.benchmark_group("compressed_object");
    for compressor in ["NONE", "GZIP", "ZLIB", "ZSTD"] {
        let tag = Tag::compressed_object("World", compressor, tags.clone());
        let data = to_vec_all(std::slice::from_ref(&tag), &registry).unwrap();
        group.bench_function(format!("encode/{compressor}"), |b| {
            b.iter(|| to_vec_all(std::slice::from_ref(black_box(&tag)), &registry).unwrap())
        });
        group.bench_function(format!("decode/{compressor}"), |b| {
            b.iter(|| get_all(black_box(&data), &registry).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_mutation, bench_compression);
criterion_main!(benches);
