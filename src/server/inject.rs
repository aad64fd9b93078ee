// src/server/inject.rs

use regex::Regex;

use super::CLIENT_SCRIPT_PATH;

/// Script the browser runs to follow reload events.
///
/// A `css` event re-fetches every stylesheet in place; anything else reloads
/// the page.
pub const CLIENT_SCRIPT: &str = r#"(function () {
  var source = new EventSource("/__assetpipe/reload");
  source.addEventListener("reload", function (event) {
    if (event.data === "css") {
      var links = document.querySelectorAll('link[rel="stylesheet"]');
      Array.prototype.forEach.call(links, function (link) {
        var url = new URL(link.href, window.location.href);
        url.searchParams.set("assetpipe", Date.now().toString());
        link.href = url.toString();
      });
    } else {
      window.location.reload();
    }
  });
})();
"#;

pub fn script_tag() -> String {
    format!(r#"<script src="{CLIENT_SCRIPT_PATH}"></script>"#)
}

/// Insert the reload script tag before the last `</body>`, or append it when
/// the page has none.
pub fn inject_reload_script(html: &str) -> String {
    let tag = script_tag();
    let closing = Regex::new(r"(?i)</body\s*>")
        .ok()
        .and_then(|re| re.find_iter(html).last());

    match closing {
        Some(m) => {
            let mut out = String::with_capacity(html.len() + tag.len());
            out.push_str(&html[..m.start()]);
            out.push_str(&tag);
            out.push_str(&html[m.start()..]);
            out
        }
        None => format!("{html}{tag}"),
    }
}
