use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use validate_hatom::{Report, SessionRegistry, validate_document};

/// A complete hentry inside an hfeed: title, content, date and author
pub const COMPLETE_ENTRY: &str = r#"<html><body>
<div class="hfeed">
  <div class="hentry">
    <h2 class="entry-title">Release notes</h2>
    <abbr class="updated" title="2008-10-21T10:30:00Z">October 21</abbr>
    <address class="author vcard"><span class="fn">Ann Example</span></address>
    <div class="entry-content"><p>Everything changed.</p></div>
  </div>
</div>
</body></html>"#;

/// An hentry with a title and nothing else
pub const TITLE_ONLY_ENTRY: &str =
    r#"<div class="hfeed"><div class="hentry"><span class="entry-title">T</span></div></div>"#;

/// An entry-title with no container at all
pub const STRAY_TITLE: &str = r#"<html><body><span class="entry-title">T</span></body></html>"#;

pub const PLAIN_PAGE: &str =
    r#"<html><head><title>Home</title></head><body><p class="intro">Hello</p></body></html>"#;

/// Builds an hentry from its inner markup
pub fn entry(inner: &str) -> String {
    format!(r#"<div class="hentry">{}</div>"#, inner)
}

/// Wraps entries in an hfeed inside a page body
pub fn feed_page(entries: &[String]) -> String {
    format!(
        r#"<html><body><div class="hfeed">{}</div></body></html>"#,
        entries.concat()
    )
}

/// Validate `text` with a fresh registry and return the report messages
pub fn report_messages(text: &str) -> Vec<String> {
    reports(text)
        .iter()
        .map(|r| r.message().to_string())
        .collect()
}

pub fn reports(text: &str) -> Vec<Report> {
    let registry = SessionRegistry::default();
    validate_document(&registry, "test.html", text)
        .expect("document should parse")
        .reports
}

/// Temporary directory populated with XHTML documents
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub async fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .expect("Failed to create directory");
        }
        fs::write(&path, content)
            .await
            .expect("Failed to write file");
        path
    }

    /// Two valid pages, one invalid page, one malformed page, one ignored file
    pub async fn populate_site(&self) {
        self.write_file("index.html", COMPLETE_ENTRY).await;
        self.write_file("about.xhtml", PLAIN_PAGE).await;
        self.write_file("2008/10/draft.html", TITLE_ONLY_ENTRY).await;
        self.write_file("2008/broken.htm", "<html><body><p></body></html>")
            .await;
        self.write_file("notes.txt", STRAY_TITLE).await;
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
