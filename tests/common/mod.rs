use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

/// TestDir manages an isolated scratch directory for index files
pub struct TestDir {
    dir: PathBuf,
}

impl TestDir {
    /// Create a unique temp directory for one test
    pub fn new(name: &str) -> Self {
        init_tracing();

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap();
        let dir = std::env::temp_dir().join(format!("chertdb-test-{}-{}", name, now.as_nanos()));
        fs::create_dir_all(&dir).expect("failed to create temp dir");

        TestDir { dir }
    }

    /// Path for an index file inside the scratch directory
    pub fn index_path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
