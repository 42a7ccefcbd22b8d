use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vox_pack::{Container, GridPair, Material, Model, Module, World};

fn bench_world() -> World {
    let module = Module {
        input: (0..256).collect(),
        input_remap: (0..=255).collect(),
        output: (0..64).collect(),
        output_remap: (0..64).map(|i| i as u8).collect(),
        ..Module::default()
    };
    let materials = (0..16)
        .map(|i| Material {
            id: i,
            density: (i % 16) as u8,
            module: Some(module.clone()),
            models: vec![Model {
                resolution: 16,
                data: vec![i as u8; 4096],
                icon: vec![0; 256],
                ..Model::default()
            }],
            ..Material::default()
        })
        .collect();
    World {
        resolution: [64, 64, 64],
        module: Some(module),
        materials,
        cell_data: GridPair::from_halves(&vec![0x11; 1 << 16], &vec![0x22; 1 << 16]),
        flow_data: GridPair::from_halves(&vec![0x33; 1 << 16], &vec![0x44; 1 << 16]),
        ..World::default()
    }
}

fn roundtrip(c: &mut Criterion) {
    let world = bench_world();
    let buf = world.encode();

    c.bench_function("world_encode", |b| {
        b.iter(|| black_box(&world).encode());
    });
    c.bench_function("world_decode", |b| {
        b.iter(|| World::decode(black_box(&buf)).unwrap());
    });
}

criterion_group!(benches, roundtrip);
criterion_main!(benches);
