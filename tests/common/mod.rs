// tests/common/mod.rs

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

pub use assetpipe_test_utils::{init_tracing, with_timeout};

use assetpipe::fs::{FileSystem, RealFileSystem};
use assetpipe::paths::BasePaths;
use assetpipe::stages::StageContext;

/// Write `contents` to `root/rel`, creating directories.
pub fn write_file(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// A small but complete source tree.
pub fn write_site(src: &Path) {
    write_file(src, "css/base.css", "body {\n  margin: 0;\n  color: #ff0000;\n}\n");
    write_file(src, "css/components/button.css", ".button {\n  padding: 4px 8px;\n}\n");
    write_file(src, "js/app-main.js", "function greet(name) {\n  return 'hi ' + name;\n}\n");
    write_file(src, "js/util.js", "var answer = 40 + 2;\n");
    write_file(src, "js/libs/modernizr.js", "/* modernizr */ window.Modernizr = {};\n");
    write_file(src, "js/libs/jquery.js", "/* jquery */ window.$ = function () {};\n");
    write_file(
        src,
        "img/logo.svg",
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 10 10\">\n  <!-- logo -->\n  <rect width=\"10\" height=\"10\"/>\n</svg>\n",
    );
    write_file(src, "img/notes.bin", [0u8, 1, 2, 3, 4]);
    write_file(src, "icons/favicon.ico", [0u8, 0, 1, 0, 1, 0]);
    write_file(src, "icons/apple/touch.png.txt", "not really an icon");
    write_file(
        src,
        "index.html",
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Home</title>\n  </head>\n  <!-- keep me -->\n  <body>\n    <p>Hello   world</p>\n  </body>\n</html>\n",
    );
    write_file(src, "pages/about.html", "<html><body><p>About</p></body></html>\n");
    write_file(src, "sitemap.xml", "<urlset></urlset>\n");
    write_file(src, "robots.txt", "User-agent: *\n");
}

/// Stage context on the real filesystem with `src` and `dist` under `root`.
pub fn real_context(root: &Path) -> StageContext {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    StageContext::new(BasePaths::new(root.join("src"), root.join("dist")), fs)
}

/// Every file under `dir`, relative and sorted, with its bytes.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let rel = path
                    .strip_prefix(base)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push((rel, std::fs::read(&path).unwrap()));
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}
