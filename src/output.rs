//! Rendered pages and the on-disk output tree.
//!
//! Layout: `<out>/<namespace>/<entity>` per page plus `<out>/<namespace>/INDEX`.
//! A page file is one JSON header line followed by the markup body.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ir::EntityKind;

pub const INDEX_SLUG: &str = "INDEX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageHeader {
    pub title: String,
    pub show_toc: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub namespace: String,
    /// File name inside the namespace directory; [`INDEX_SLUG`] for the index.
    pub slug: String,
    pub kind: EntityKind,
    pub header: PageHeader,
    pub body: String,
}

impl PageHeader {
    pub fn new(title: impl Into<String>, tags: Vec<String>) -> Self {
        Self { title: title.into(), show_toc: 0, tags }
    }
}

impl Page {
    pub fn is_index(&self) -> bool {
        self.slug == INDEX_SLUG
    }

    /// Header line + body, exactly as written to disk.
    pub fn to_file_string(&self) -> String {
        // A struct of strings and integers always serializes.
        let header = serde_json::to_string(&self.header).unwrap_or_default();
        format!("{header}\n{}", self.body)
    }

    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.namespace).join(&self.slug)
    }
}

/// A page read back from disk. Only the parts the publisher needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPage {
    pub namespace: String,
    pub slug: String,
    /// Raw header text, kept verbatim so unknown fields survive.
    pub header: serde_json::Map<String, serde_json::Value>,
    pub body: String,
}

/// Splits a page file: the header runs up to the first line containing `}`.
pub fn split_page(text: &str) -> Option<(&str, &str)> {
    let mut end = 0;
    for line in text.split_inclusive('\n') {
        end += line.len();
        if line.contains('}') {
            return Some((&text[..end], &text[end..]));
        }
    }
    None
}

/// A name usable as a single path component: non-empty, not `.`/`..`, no
/// separators, not hidden (dot files are reserved for in-flight writes).
pub fn is_valid_slug(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

/// Writes through a temporary sibling and renames it into place, so a page
/// file is either the old or the new version, never a torn one.
pub fn write_page(out_dir: &Path, page: &Page) -> Result<PathBuf> {
    for name in [&page.namespace, &page.slug] {
        if !is_valid_slug(name) {
            let path = page.relative_path().display().to_string();
            return Err(Error::malformed(path, format!("invalid page name `{name}`")));
        }
    }
    let dir = out_dir.join(&page.namespace);
    std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    let path = dir.join(&page.slug);
    let staging = dir.join(format!(".{}.tmp", page.slug));
    std::fs::write(&staging, page.to_file_string()).map_err(|e| Error::io(&staging, e))?;
    std::fs::rename(&staging, &path).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

pub fn read_page(path: &Path) -> Result<StoredPage> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let (head, body) = split_page(&text).ok_or_else(|| Error::Json {
        path: path.display().to_string(),
        message: "page has no header".to_string(),
    })?;
    let header = crate::path_de::from_str_with_path(head)?;
    let name_of = |p: Option<&Path>| {
        p.and_then(Path::file_name).map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
    };
    Ok(StoredPage {
        namespace: name_of(path.parent()),
        slug: name_of(Some(path)),
        header,
        body: body.to_string(),
    })
}

/// Pages of one namespace directory, `INDEX` first, the rest by file name.
pub fn read_namespace(dir: &Path) -> Result<Vec<StoredPage>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let hidden = path.file_name().is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if path.is_file() && !hidden {
            paths.push(path);
        }
    }
    paths.sort_by_key(|p| {
        let name = p.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        (name != INDEX_SLUG, name)
    });
    paths.iter().map(|p| read_page(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(slug: &str) -> Page {
        Page {
            namespace: "alarms".into(),
            slug: slug.into(),
            kind: EntityKind::Function,
            header: PageHeader::new("alarms.create()", vec!["API".into(), "Method".into()]),
            body: "<p>Creates an alarm.</p>\n".into(),
        }
    }

    #[test]
    fn header_is_a_single_json_line() {
        let text = page("create").to_file_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, r#"{"title":"alarms.create()","show_toc":0,"tags":["API","Method"]}"#);
    }

    #[test]
    fn split_stops_at_first_closing_brace_line() {
        let (head, body) = split_page("{\"title\": \"x\",\n \"show_toc\": 0}\n<p>{ a }</p>\n").unwrap();
        assert_eq!(head, "{\"title\": \"x\",\n \"show_toc\": 0}\n");
        assert_eq!(body, "<p>{ a }</p>\n");
        assert!(split_page("no header").is_none());
    }

    #[test]
    fn written_pages_read_back() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), &page("create")).unwrap();
        write_page(dir.path(), &page(INDEX_SLUG)).unwrap();
        write_page(dir.path(), &page("clear")).unwrap();

        let pages = read_namespace(&dir.path().join("alarms")).unwrap();
        let slugs: Vec<_> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, [INDEX_SLUG, "clear", "create"]);
        assert_eq!(pages[2].namespace, "alarms");
        assert_eq!(pages[2].header["title"], "alarms.create()");
        assert_eq!(pages[2].body, "<p>Creates an alarm.</p>\n");
    }

    #[test]
    fn slugs_are_single_path_components() {
        for ok in ["create", "INDEX", "onBeforeRequest", "Alarm_2"] {
            assert!(is_valid_slug(ok), "{ok}");
        }
        for bad in ["", ".", "..", "../escape", "a/b", "a\\b", ".hidden"] {
            assert!(!is_valid_slug(bad), "{bad}");
        }
    }

    #[test]
    fn escaping_names_are_refused_and_nothing_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = write_page(&out, &page("../../escape")).unwrap_err();
        assert!(matches!(err, Error::MalformedSchema { .. }));
        assert!(!dir.path().join("escape").exists());
        assert!(!out.exists());
    }

    #[test]
    fn rewrite_replaces_the_file_and_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path(), &page("create")).unwrap();
        let mut second = page("create");
        second.body = "<p>Second version.</p>\n".into();
        let path = write_page(dir.path(), &second).unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().ends_with("<p>Second version.</p>\n"));
        let names: Vec<_> = std::fs::read_dir(dir.path().join("alarms"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["create"]);
    }
}
