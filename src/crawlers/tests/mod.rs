mod session_tests;

use crate::config::{MirrorConfig, WaitConfig};
use std::path::Path;

/// Config pointing at the fake site and writing into `output`
fn test_config(output: &Path) -> MirrorConfig {
    let mut config = MirrorConfig::new(fake_site::START_URL);
    config.output_dir = output.to_path_buf();
    config.wait = WaitConfig {
        timeout_ms: 1_000,
        poll_interval_ms: 50,
    };
    config
}

/// Every file below `root`, as sorted `/`-separated relative paths
fn files_under(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}
