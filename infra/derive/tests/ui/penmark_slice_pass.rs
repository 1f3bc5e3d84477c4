#[penmark_derive::penmark_slice]
pub struct Counter {
    pub name: String,
    pub limit: u64,
}

fn main() {
    let counter = Counter::new(CounterInner { name: "quota".to_owned(), limit: 3 });
    let shared = counter.clone();
    assert_eq!(shared.limit, 3);
    assert_eq!(counter.handle_count(), 2);
}
