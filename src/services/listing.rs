//! Directory listings for directories without an index page.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::escape_html;

/// Characters left as-is in listing links: unreserved plus the path separator.
const LINK: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// True for directories, including symlinks that point at one.
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// The symlink marker wins over the directory one; the link still gets the slash.
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    fn link(&self) -> String {
        let target = if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        };
        utf8_percent_encode(&target, LINK).to_string()
    }
}

/// Read the entries of `dir`, sorted case-insensitively by name.
pub async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry
            .file_type()
            .await
            .map(|t| t.is_symlink())
            .unwrap_or(false);
        // metadata() follows symlinks; a dangling link lists as a plain entry.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    sort_entries(&mut entries);
    Ok(entries)
}

fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());
}

/// Render the HTML listing page for `display_path`.
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut page = String::with_capacity(256 + entries.len() * 64);

    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{title}</title>\n</head>\n"));
    page.push_str(&format!("<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        page.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.link(),
            escape_html(&entry.display_name())
        ));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}
