//! This bench adds recipes one at a time to a store that already holds a
//! large collection, so every insertion rewrites the whole snapshot.

#![allow(missing_docs)]

use brewmate::{
    Grain, Hop, HopFormat, MemoryBackend, RecipeData, RecipeStore, Yeast, YeastType,
};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

fn recipe(i: usize) -> RecipeData {
    RecipeData {
        name: format!("Batch {i}"),
        style: "American Pale Ale".to_string(),
        volume: 20.0,
        grains: vec![Grain::new("Pale Malt", 4500.0), Grain::new("Crystal 60", 250.0)],
        hops: vec![
            Hop::new("Cascade", 30.0, HopFormat::Pellets, 6.5),
            Hop::new("Citra", 50.0, HopFormat::Pellets, 12.5),
        ],
        yeast: Some(Yeast::new("US-05", YeastType::Ale, 11.5)),
        instructions: Some("Mash at 66C for 60 minutes, boil for 60 minutes.".to_string()),
        ..RecipeData::default()
    }
}

/// A store pre-filled with `count` recipes.
fn preseed_store(count: usize) -> RecipeStore<MemoryBackend> {
    let mut store = RecipeStore::open(MemoryBackend::new()).unwrap();
    for i in 0..count {
        store.add(recipe(i)).unwrap();
    }
    store
}

fn add_many(c: &mut Criterion) {
    c.bench_function("add 100 recipes to 500", |b| {
        b.iter_batched(
            || preseed_store(500),
            |mut store| {
                for i in 0..100 {
                    store.add(recipe(i)).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, add_many);
criterion_main!(benches);
