//! Local pages and snippets shown around the update gate.

use mytube_update::VersionDescriptor;

/// Shown while the update check is still deciding what to load.
pub const SPLASH_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
  body { margin: 0; background: #000; color: #fff;
         font-family: Roboto, sans-serif; display: flex;
         align-items: center; justify-content: center; height: 100vh; }
  .mark { font-size: 28px; font-weight: 500; }
  .mark span { color: #f00; }
</style>
</head>
<body><div class="mark">My<span>Tube</span></div></body>
</html>
"#;

/// Full-page stop shown when the gate blocks. The download link is a
/// plain navigation, so it flows through the classifier and opens in the
/// system browser.
pub fn update_required_html(descriptor: &VersionDescriptor) -> String {
    let notes = descriptor
        .release_notes
        .as_deref()
        .map(|n| format!("<p class=\"notes\">{}</p>", escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
  body {{ margin: 0; background: #000; color: #fff;
         font-family: Roboto, sans-serif; display: flex;
         align-items: center; justify-content: center; height: 100vh; }}
  .card {{ max-width: 420px; padding: 24px; text-align: center; }}
  .notes {{ color: #aaa; }}
  a.get {{ display: inline-block; margin-top: 16px; padding: 12px 32px;
          background: #f00; color: #fff; border-radius: 24px;
          text-decoration: none; font-weight: 500; }}
</style>
</head>
<body>
<div class="card">
  <h1>Update required</h1>
  <p>This version of MyTube is no longer supported.
     Install version {version} to keep watching.</p>
  {notes}
  <a class="get" href="{url}">Get the update</a>
</div>
</body>
</html>
"#,
        version = escape_html(&descriptor.version_name),
        notes = notes,
        url = escape_html(&descriptor.download_url),
    )
}

/// Dismissible in-page banner for a deferrable update. Guards itself so
/// re-injection after page-finish is a no-op.
pub fn deferral_banner_script(days_remaining: u64, descriptor: &VersionDescriptor) -> String {
    // JSON string literals double as JS string literals.
    let version = serde_json::to_string(&descriptor.version_name)
        .unwrap_or_else(|_| "\"\"".into());
    let url = serde_json::to_string(&descriptor.download_url)
        .unwrap_or_else(|_| "\"\"".into());

    format!(
        r#"(function () {{
  if (window.__mytubeUpdateBanner) return;
  window.__mytubeUpdateBanner = true;
  var bar = document.createElement('div');
  bar.style.cssText = 'position:fixed;bottom:0;left:0;right:0;z-index:99999;' +
    'background:#212121;color:#fff;padding:12px 16px;font-family:Roboto,sans-serif;' +
    'font-size:14px;display:flex;justify-content:space-between;align-items:center;';
  var label = document.createElement('span');
  label.textContent = 'MyTube ' + {version} + ' is available. ' +
    'This version stops working in {days} day(s).';
  var get = document.createElement('a');
  get.href = {url};
  get.textContent = 'Update';
  get.style.cssText = 'color:#f00;font-weight:500;text-decoration:none;margin-left:12px;';
  var close = document.createElement('span');
  close.textContent = '×';
  close.style.cssText = 'margin-left:12px;cursor:pointer;';
  close.onclick = function () {{ bar.remove(); }};
  bar.appendChild(label);
  bar.appendChild(get);
  bar.appendChild(close);
  (document.body || document.documentElement).appendChild(bar);
}})();"#,
        version = version,
        url = url,
        days = days_remaining,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> VersionDescriptor {
        VersionDescriptor {
            version_code: 6,
            version_name: "1.4.0".into(),
            download_url: "https://cdn.example/mytube-1.4.0.apk?x=1&y=2".into(),
            release_notes: Some("Fixes <script> & things".into()),
            is_mandatory: false,
            min_supported_version: 2,
        }
    }

    #[test]
    fn update_page_escapes_descriptor_fields() {
        let html = update_required_html(&descriptor());

        assert!(html.contains("1.4.0"));
        assert!(html.contains("Fixes &lt;script&gt; &amp; things"));
        assert!(html.contains("mytube-1.4.0.apk?x=1&amp;y=2"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn update_page_skips_notes_when_absent() {
        let mut d = descriptor();
        d.release_notes = None;

        assert!(!update_required_html(&d).contains("class=\"notes\""));
    }

    #[test]
    fn banner_script_guards_itself_and_quotes_fields() {
        let script = deferral_banner_script(1, &descriptor());

        assert!(script.contains("__mytubeUpdateBanner"));
        assert!(script.contains("\"1.4.0\""));
        assert!(script.contains("1 day(s)"));
        assert!(script.contains("https://cdn.example/mytube-1.4.0.apk"));
    }
}
