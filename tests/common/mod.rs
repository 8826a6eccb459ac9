//! Common test utilities for installer integration tests

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Build a tar.gz release archive holding the given (path, contents) files,
/// returning the raw archive bytes.
pub fn release_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let encoder = GzEncoder::new(&mut bytes, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .expect("append archive entry");
        }
        builder
            .into_inner()
            .expect("finish tar")
            .finish()
            .expect("finish gzip");
    }
    bytes
}

/// Write a minimal release archive to disk (for tests that need a file path)
#[allow(dead_code)]
pub fn write_release_archive(dir: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let bytes = release_archive(files);
    std::io::Write::write_all(&mut File::create(&path).expect("create archive"), &bytes)
        .expect("write archive");
    path
}

/// Latest-release metadata body advertising one asset per architecture, both
/// pointing at the given download paths on `base_url`.
pub fn release_metadata(base_url: &str) -> String {
    serde_json::json!({
        "tag_name": "v1.4.0",
        "assets": [
            {
                "name": "ferret-linux-amd64.tar.gz",
                "browser_download_url": format!("{base_url}/dl/amd64"),
                "size": 1024
            },
            {
                "name": "ferret-linux-arm64.tar.gz",
                "browser_download_url": format!("{base_url}/dl/arm64"),
                "size": 1024
            }
        ]
    })
    .to_string()
}
