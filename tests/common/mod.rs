#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const USER_MANIFEST: &str = r#"
services:
  - name: user
    package: user
    methods:
      - name: GetUser
        path: /api/user/:id
        verb: GET
      - name: CreateUser
        path: /api/user
        verb: POST
"#;

pub const ORDER_MANIFEST: &str = r#"
services:
  - name: order
    package: order
    methods:
      - name: ListOrders
        path: /orders
        verb: GET
      - name: GetOrder
        path: /orders/:id
        verb: GET
"#;

/// Write `content` to `dir/name` and return the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Every file below `root`, as sorted relative paths.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    out.sort();
    out
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}
