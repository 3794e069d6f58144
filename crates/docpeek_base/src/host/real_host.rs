use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::{DocpeekError, DocpeekResult, ResultExt};

use super::traits::{DirectoryEntry, EntryKind, Host, innermost_folder};

/* 📖 # Why use std::fs instead of async or other crates?

Every invocation performs a handful of strictly sequential filesystem steps.
Blocking std::fs calls keep that sequence obvious, and there is nothing else for
the process to do while a directory is being listed.
*/

/// Characters escaped when a filesystem path becomes a `file://` URL.
const URL_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Host backed by the real filesystem and the terminal.
///
/// The "active file" and the workspace folders come from the command line.
/// Previews beside the current view are rendered to HTML and handed to the system
/// viewer; previews in place are rendered as text on standard output.
#[derive(Debug)]
pub struct RealHost {
    workspace_folders: Vec<PathBuf>,
    active_file: Option<PathBuf>,
    preview_dir: PathBuf,
}

impl RealHost {
    pub fn new(workspace_folders: Vec<PathBuf>, active_file: Option<PathBuf>) -> Self {
        Self {
            workspace_folders,
            active_file,
            preview_dir: std::env::temp_dir().join("docpeek-preview"),
        }
    }

    /// Directory that receives rendered HTML previews.
    pub fn with_preview_dir(mut self, preview_dir: PathBuf) -> Self {
        self.preview_dir = preview_dir;
        self
    }

    /// Render the markdown file to an HTML page in the preview directory.
    #[instrument(skip(self), fields(path = %path.display()))]
    fn write_preview_html(&self, path: &Path) -> DocpeekResult<PathBuf> {
        let markdown = self.read_file_to_string(path)?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_url = path.parent().map(directory_url);
        let page = render_html_page(&title, &markdown, base_url.as_deref());

        fs::create_dir_all(&self.preview_dir)
            .map_err(|e| Box::new(DocpeekError::file_error(&self.preview_dir, e)))?;
        let html_path = self.preview_dir.join(format!("{}.html", title));
        fs::write(&html_path, page)
            .map_err(|e| Box::new(DocpeekError::file_error(&html_path, e)))?;
        debug!(html = %html_path.display(), "rendered preview");
        Ok(html_path)
    }

    fn print_preview(&self, path: &Path, out: &mut impl Write) -> DocpeekResult<()> {
        let markdown = self.read_file_to_string(path)?;
        write!(out, "{}", render_terminal_text(&markdown))
            .map_err(|e| Box::new(DocpeekError::file_error("<stdout>", e)))?;
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// `file://` URL of a directory, with a trailing slash so relative links resolve inside it.
fn directory_url(directory: &Path) -> String {
    let path = directory.to_string_lossy().replace('\\', "/");
    let path = path.trim_end_matches('/');
    let separator = if path.starts_with('/') { "" } else { "/" };
    format!(
        "file://{}{}/",
        separator,
        utf8_percent_encode(path, URL_PATH)
    )
}

fn render_html_page(title: &str, markdown: &str, base_url: Option<&str>) -> String {
    let mut body = String::new();
    html::push_html(&mut body, Parser::new_ext(markdown, markdown_options()));
    let base = base_url
        .map(|url| format!("<base href=\"{}\">\n", escape_html(url)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n{}<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        base,
        escape_html(title),
        body
    )
}

/// Render markdown as plain terminal text: underlined headings, bulleted lists and
/// indented code blocks, with inline markup reduced to its text.
fn render_terminal_text(markdown: &str) -> String {
    let mut out = String::new();
    let mut heading = String::new();
    let mut in_heading = false;
    let mut in_code_block = false;
    let mut list_depth = 0usize;

    for event in Parser::new_ext(markdown, markdown_options()) {
        let target = if in_heading { &mut heading } else { &mut out };
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                heading.clear();
            }
            Event::End(TagEnd::Heading(level)) => {
                in_heading = false;
                let underline = if level == HeadingLevel::H1 { "=" } else { "-" };
                out.push_str(&heading);
                out.push('\n');
                out.push_str(&underline.repeat(heading.chars().count()));
                out.push_str("\n\n");
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                out.push_str("- ");
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                out.push('\n');
            }
            Event::End(TagEnd::Paragraph) => {
                out.push('\n');
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Text(text) if in_code_block => {
                for line in text.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Event::Text(text) => target.push_str(&text),
            Event::Code(code) => {
                target.push('`');
                target.push_str(&code);
                target.push('`');
            }
            Event::SoftBreak => target.push(' '),
            Event::HardBreak => target.push('\n'),
            Event::Rule => out.push_str("----\n\n"),
            Event::TaskListMarker(checked) => out.push_str(if checked { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    let mut text = out.trim_end().to_string();
    text.push('\n');
    text
}

/// Classify a listed entry. Symbolic links count as files when they point at one;
/// links to directories and dangling links are `Other` and never followed.
fn entry_kind(entry: &walkdir::DirEntry) -> EntryKind {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else if entry.path_is_symlink() {
        match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => EntryKind::File,
            Ok(_) => EntryKind::Other,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "dangling symbolic link");
                EntryKind::Other
            }
        }
    } else {
        EntryKind::Other
    }
}

impl Host for RealHost {
    fn active_file(&self) -> Option<PathBuf> {
        self.active_file.clone()
    }

    fn workspace_root_for(&self, path: &Path) -> Option<PathBuf> {
        innermost_folder(&self.workspace_folders, path)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn file_exists(&self, path: &Path) -> DocpeekResult<bool> {
        let exists = path
            .try_exists()
            .map_err(|e| Box::new(DocpeekError::file_error(path, e)))?;
        debug!(exists, "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn read_directory(&self, path: &Path) -> DocpeekResult<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    debug!(error = %e, "failed to read directory");
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                    return Err(Box::new(DocpeekError::file_error(path, source)));
                }
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind: entry_kind(&entry),
            });
        }
        debug!(count = entries.len(), "listed directory");
        Ok(entries)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn read_file(&self, path: &Path) -> DocpeekResult<Box<dyn Read + 'static>> {
        let file = fs::File::open(path).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(DocpeekError::file_error(path, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn show_preview(&self, path: &Path, to_side: bool) -> DocpeekResult<()> {
        if to_side {
            let html_path = self.write_preview_html(path)?;
            open::that(&html_path)
                .map_err(|e| Box::new(DocpeekError::file_error(&html_path, e)))
                .context("Failed to open preview in the system viewer")?;
            info!(preview = %html_path.display(), "opened preview beside the editor");
        } else {
            self.print_preview(path, &mut std::io::stdout().lock())?;
        }
        Ok(())
    }

    fn show_information_message(&self, message: &str) {
        info!("{}", message);
        println!("{}", message);
    }

    fn show_warning_message(&self, message: &str) {
        warn!("{}", message);
        eprintln!("Warning: {}", message);
    }
}
