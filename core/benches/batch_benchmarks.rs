use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crm_core::batch::ApplyFuture;
use crm_core::{BatchPolicy, Crm, Customer, MemoryRepository, NewCustomer, Repository};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion

fn apply_insert(repo: &dyn Repository, draft: NewCustomer) -> ApplyFuture<'_, Customer> {
  Box::pin(async move { repo.insert_customer(draft).await })
}

fn customer_drafts(count: usize) -> Vec<NewCustomer> {
  (0..count)
    .map(|i| NewCustomer {
      name: format!("Customer {}", i),
      email: format!("customer{}@example.com", i),
      phone: None,
    })
    .collect()
}

fn bench_best_effort_batches(c: &mut Criterion) {
  let mut group = c.benchmark_group("BestEffortCustomerBatches");
  let rt = Runtime::new().unwrap();

  for batch_size in [1usize, 10, 100].iter() {
    group.throughput(Throughput::Elements(*batch_size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(batch_size), batch_size, |b, &size| {
      b.iter(|| {
        rt.block_on(async {
          // Fresh store per iteration so the uniqueness pre-check always
          // scans a comparable table.
          let crm = Crm::new(Arc::new(MemoryRepository::new()));
          let outcome = crm
            .bulk_create_customers(customer_drafts(size))
            .await
            .expect("best-effort batch");
          criterion::black_box(outcome.created.len())
        })
      })
    });
  }
  group.finish();
}

fn bench_all_or_nothing_batches(c: &mut Criterion) {
  let mut group = c.benchmark_group("AllOrNothingCustomerBatches");
  let rt = Runtime::new().unwrap();

  for batch_size in [1usize, 10, 100].iter() {
    group.throughput(Throughput::Elements(*batch_size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(batch_size), batch_size, |b, &size| {
      b.iter(|| {
        rt.block_on(async {
          let repo = Arc::new(MemoryRepository::new());
          let outcome = crm_core::batch::run_batch(&*repo, customer_drafts(size), BatchPolicy::AllOrNothing, apply_insert)
            .await
            .expect("all-or-nothing batch");
          criterion::black_box(outcome.created.len())
        })
      })
    });
  }
  group.finish();
}

criterion_group!(benches, bench_best_effort_batches, bench_all_or_nothing_batches);
criterion_main!(benches);
