// Adapters layer: concrete implementations of the domain ports (rival HTTP client, SQLite store).

pub mod rival;
pub mod sqlite;

pub use rival::HttpRivalClient;
pub use sqlite::SqliteHistoryStore;
