mod query_engine;
#[cfg(test)]
mod tests;

pub use query_engine::{Aggregated, EngineConfig, Filtered, QueryResult, TransactionQueryEngine};
