// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for fixed-capacity component storage
//!
//! These benchmarks measure:
//! - Slot claiming as the array fills (linear free-slot scan)
//! - Owner lookup across a full array
//! - Iteration over live slots

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ecs_sim::ecs::components::Position;
use ecs_sim::ecs::{ComponentStore, EntityId};

fn filled_store(count: usize) -> ComponentStore {
    let mut store = ComponentStore::with_capacity(count);
    for i in 1..=count {
        store
            .attach(EntityId::new(i as u64), Position::new(i as f32, i as f32 * 2.0))
            .unwrap();
    }
    store
}

/// Benchmark: Fill an array to capacity
fn bench_storage_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_create");

    for entity_count in [100, 1000, 4000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("LinearScan", entity_count),
            entity_count,
            |b, &count| {
                b.iter(|| black_box(filled_store(count)));
            },
        );
    }

    group.finish();
}

/// Benchmark: Look up every owner once
fn bench_storage_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_lookup");

    for entity_count in [100, 1000, 4000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        let store = filled_store(*entity_count);
        group.bench_with_input(
            BenchmarkId::new("LinearScan", entity_count),
            entity_count,
            |b, &count| {
                b.iter(|| {
                    let mut sum = 0.0;
                    for i in 1..=count {
                        if let Ok(pos) = store.get_component::<Position>(EntityId::new(i as u64)) {
                            sum += pos.x() + pos.y();
                        }
                    }
                    black_box(sum);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Sequential pass over live slots
fn bench_storage_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage_iteration");

    for entity_count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        let store = filled_store(*entity_count);
        group.bench_with_input(BenchmarkId::new("view", entity_count), entity_count, |b, _| {
            b.iter(|| {
                let view = store.component_array::<Position>().unwrap();
                let sum: f32 = view.iter().map(|pos| pos.x() + pos.y()).sum();
                black_box(sum);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_storage_create,
    bench_storage_lookup,
    bench_storage_iteration
);
criterion_main!(benches);
