use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;
use stockroom_core::{OrderId, ProductId};
use stockroom_infra::live_file::{decode_records, encode_records};
use stockroom_infra::records::{decode_order, decode_product, encode_order, encode_product};
use stockroom_products::Product;
use stockroom_sales::{Order, OrderItem, OrderType};

fn products(count: i32) -> Vec<Product> {
    (1..=count)
        .map(|id| {
            Product::new(
                ProductId::new(id),
                format!("Product {id}"),
                format!("Category {}", id % 12),
                id % 500,
                f64::from(id % 97) + 0.99,
            )
            .unwrap()
        })
        .collect()
}

fn orders(count: i32) -> Vec<Order> {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (1..=count)
        .map(|id| {
            let order_type = if id % 2 == 0 {
                OrderType::Wholesale
            } else {
                OrderType::Retail
            };
            let mut order = Order::new(OrderId::new(id), "Acme", "Ann", "555", order_type, date);
            for line in 1..=5 {
                let item = OrderItem::new(ProductId::new(line), "Item", "Misc", line * 11, 2.5)
                    .unwrap();
                order.add_item(item).unwrap();
            }
            order
        })
        .collect()
}

fn bench_product_file_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_file_encode");

    for count in [10, 100, 1000, 10000].iter() {
        let data = products(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| encode_records(black_box(data), encode_product).unwrap());
        });
    }

    group.finish();
}

fn bench_product_file_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_file_decode");

    for count in [10, 100, 1000, 10000].iter() {
        let bytes = encode_records(&products(*count), encode_product).unwrap();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| decode_records(black_box(bytes), decode_product).unwrap());
        });
    }

    group.finish();
}

fn bench_order_file_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_file_decode");

    for count in [10, 100, 1000].iter() {
        let bytes = encode_records(&orders(*count), encode_order).unwrap();
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| decode_records(black_box(bytes), decode_order).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_product_file_encode,
    bench_product_file_decode,
    bench_order_file_decode
);
criterion_main!(benches);
