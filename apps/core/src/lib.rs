pub mod cli;
pub mod config;
pub mod debounce;
pub mod ignore_list;
pub mod launcher;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod registry;
pub mod session;
pub mod settings;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
