/// Records every store created with [`crate::InMemoryUserStore::seeded`]
/// starts with, as `(name, email)` pairs. They receive ids `"1"`..`"3"`.
pub const SEED_USERS: &[(&str, &str)] = &[
    ("Alice", "alice@x.com"),
    ("Bob", "bob@x.com"),
    ("Charlie", "charlie@x.com"),
];
