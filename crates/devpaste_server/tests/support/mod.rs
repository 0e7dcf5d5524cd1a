//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use devpaste_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const TEST_MAX_PASTE_SIZE: usize = 64 * 1024;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: TEST_MAX_PASTE_SIZE,
        cache_ttl_secs: 300,
        cache_capacity: 1_000,
        // Minimum Argon2 cost keeps password tests fast.
        hash_memory_kib: 8,
        hash_iterations: 1,
        hash_parallelism: 1,
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db).expect("state");
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = test_config_for_db_path(&db_path);
    let server = test_server_for_config(config);
    (server, temp_dir)
}
