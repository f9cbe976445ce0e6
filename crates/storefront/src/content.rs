//! Marketing pages loaded from markdown.
//!
//! Pages live in `<content_dir>/pages/*.md` with YAML frontmatter and are
//! rendered to HTML once at startup. The file stem is the slug, so
//! `pages/about.md` is served at `/about`.
//!
//! ```markdown
//! ---
//! title: About Aurelle
//! description: Small-batch skincare from Goa.
//! updated_at: 2026-01-15
//! ---
//!
//! We make ...
//! ```

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pages the storefront links to from every layout.
pub const REQUIRED_PAGES: [&str; 4] = ["about", "privacy", "terms", "support"];

/// Frontmatter of a page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDate>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// All loaded pages, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
}

/// A problem found while checking the content directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    /// A file failed to parse.
    Invalid { path: PathBuf, reason: String },
    /// A page every layout links to is missing.
    MissingPage(&'static str),
}

impl std::fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { path, reason } => write!(f, "{}: {reason}", path.display()),
            Self::MissingPage(slug) => write!(f, "missing required page: pages/{slug}.md"),
        }
    }
}

impl ContentStore {
    /// Load all pages, skipping (and logging) files that fail to parse.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let (pages, failures) = Self::load_pages(&content_dir.join("pages"))?;
        for (path, e) in &failures {
            tracing::error!(path = %path.display(), error = %e, "Failed to load page");
        }

        let store = Self {
            pages: Arc::new(pages),
        };
        for slug in store.missing_required() {
            tracing::warn!(slug, "Required page is missing");
        }
        Ok(store)
    }

    /// Check the content directory without serving it.
    ///
    /// # Errors
    ///
    /// Returns an error if the pages directory exists but cannot be read.
    pub fn check(content_dir: &Path) -> Result<Vec<ContentIssue>, ContentError> {
        let (pages, failures) = Self::load_pages(&content_dir.join("pages"))?;

        let mut issues: Vec<ContentIssue> = failures
            .into_iter()
            .map(|(path, e)| ContentIssue::Invalid {
                path,
                reason: e.to_string(),
            })
            .collect();

        let store = Self {
            pages: Arc::new(pages),
        };
        issues.extend(store.missing_required().map(ContentIssue::MissingPage));
        Ok(issues)
    }

    /// Parse every `*.md` file in `dir`.
    #[allow(clippy::type_complexity)]
    fn load_pages(
        dir: &Path,
    ) -> Result<(HashMap<String, Page>, Vec<(PathBuf, ContentError)>), ContentError> {
        let mut pages = HashMap::new();
        let mut failures = Vec::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok((pages, failures));
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "md") {
                match Self::load_page(&path) {
                    Ok(page) => {
                        tracing::debug!("Loaded page: {}", page.slug);
                        pages.insert(page.slug.clone(), page);
                    }
                    Err(e) => failures.push((path, e)),
                }
            }
        }

        Ok((pages, failures))
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        Self::parse_page(slug, &content)
    }

    fn parse_page(slug: String, source: &str) -> Result<Page, ContentError> {
        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<PageMeta> = matter
            .parse(source)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;
        if meta.title.trim().is_empty() {
            return Err(ContentError::Parse("Title is empty".to_string()));
        }

        Ok(Page {
            slug,
            meta,
            content_html: render_markdown(&parsed.content),
        })
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Number of loaded pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn missing_required(&self) -> impl Iterator<Item = &'static str> + '_ {
        REQUIRED_PAGES
            .into_iter()
            .filter(|slug| !self.pages.contains_key(*slug))
    }

    /// Build a store from in-memory sources; used by tests.
    ///
    /// # Errors
    ///
    /// Returns the first page that fails to parse.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ContentError> {
        let mut pages = HashMap::new();
        for (slug, source) in sources {
            let page = Self::parse_page(slug.to_string(), source)?;
            pages.insert(page.slug.clone(), page);
        }
        Ok(Self {
            pages: Arc::new(pages),
        })
    }
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    // Pages are authored in-repo; raw HTML is allowed for contact blocks
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
