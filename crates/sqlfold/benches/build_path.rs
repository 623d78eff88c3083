use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlfold::{Entity, Expr, InsertBuilder, QueryBuilder, Record, Value, field};

struct Order {
    id: i64,
    customer_id: i64,
    total: f64,
    note: String,
}

impl Entity for Order {
    const NAME: &'static str = "Order";
    const TABLE: &'static str = "Orders";
    const ALIAS: &'static str = "o";
    const COLUMNS: &'static [&'static str] = &["Id", "CustomerId", "Total", "Note"];
}

impl Record for Order {
    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id),
            Value::from(self.customer_id),
            Value::from(self.total),
            Value::from(self.note.clone()),
        ]
    }
}

/// `o.CustomerId = @p1 AND o.CustomerId = @p2 AND ...` with `n` terms.
fn predicate(n: usize) -> Expr {
    Expr::all((0..n).map(|i| field::<Order>("CustomerId").eq(i as i64)))
        .unwrap_or_else(|| field::<Order>("Id").gt(0i64))
}

fn bench_query_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/build");

    for n in [1, 5, 10, 50, 100] {
        let pred = predicate(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pred, |b, pred| {
            b.iter(|| {
                let mut qb = QueryBuilder::new();
                qb.from::<Order>()
                    .and_then(|qb| qb.where_expr(pred))
                    .and_then(|qb| qb.order_by_desc(field::<Order>("Id")))
                    .and_then(|qb| qb.paginate(2, 50))
                    .ok();
                black_box(qb.build().ok())
            });
        });
    }

    group.finish();
}

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert/batch");

    for rows in [1, 10, 100, 500] {
        let orders: Vec<Order> = (0..rows)
            .map(|i| Order {
                id: i,
                customer_id: i % 7,
                total: i as f64 * 1.5,
                note: format!("order {i}"),
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &orders, |b, orders| {
            b.iter(|| {
                let builder = InsertBuilder::batch(orders).ok();
                black_box(builder.and_then(|b| b.build_insert().ok()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_query_build, bench_batch_insert);
criterion_main!(benches);
