//! Document title and SEO/social meta tags.
//!
//! [`PageMetadataSynchronizer`] merges partial [`PageMetadata`] against the
//! site defaults and pushes the result through a [`DocumentHead`]. The
//! in-memory [`HeadState`] is the head used by the CLI and the tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use ng_store_core::PageMetadata;
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Title used when a page does not provide one.
pub const DEFAULT_TITLE: &str = "Ng Store";

/// Description used when a page does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "Ng Store is a store for Ng products";

// =============================================================================
// Head primitive
// =============================================================================

/// Attribute a meta tag is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaSelector {
    /// `<meta name="...">`
    Name(&'static str),
    /// `<meta property="...">`
    Property(&'static str),
}

impl MetaSelector {
    /// The HTML attribute name (`name` or `property`).
    #[must_use]
    pub const fn attribute(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Property(_) => "property",
        }
    }

    /// The attribute value (e.g., `og:title`).
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Name(key) | Self::Property(key) => key,
        }
    }
}

/// A meta tag to upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub selector: MetaSelector,
    pub content: String,
}

impl MetaTag {
    #[must_use]
    pub fn new(selector: MetaSelector, content: impl Into<String>) -> Self {
        Self {
            selector,
            content: content.into(),
        }
    }
}

/// Document-head mutation primitive.
///
/// Both operations are upserts: applying the same value twice leaves the
/// head as it was after the first call.
pub trait DocumentHead {
    /// Set the document title.
    fn set_title(&self, title: &str);

    /// Insert the tag, or replace the content of the tag with the same selector.
    fn update_tag(&self, tag: MetaTag);
}

impl<T: DocumentHead + ?Sized> DocumentHead for Arc<T> {
    fn set_title(&self, title: &str) {
        (**self).set_title(title);
    }

    fn update_tag(&self, tag: MetaTag) {
        (**self).update_tag(tag);
    }
}

// =============================================================================
// Synchronizer
// =============================================================================

/// Page metadata with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

impl ResolvedMetadata {
    /// Site defaults for a storefront served from `domain`.
    #[must_use]
    pub fn defaults(domain: impl Into<String>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            image: String::new(),
            url: domain.into(),
        }
    }

    /// The six tag upserts for this metadata, in application order.
    #[must_use]
    pub fn tags(&self) -> [MetaTag; 6] {
        [
            MetaTag::new(MetaSelector::Name("title"), &self.title),
            MetaTag::new(MetaSelector::Name("description"), &self.description),
            MetaTag::new(MetaSelector::Property("og:title"), &self.title),
            MetaTag::new(MetaSelector::Property("og:description"), &self.description),
            MetaTag::new(MetaSelector::Property("og:image"), &self.image),
            MetaTag::new(MetaSelector::Property("og:url"), &self.url),
        ]
    }
}

/// Pushes page metadata to a document head.
pub struct PageMetadataSynchronizer<H> {
    head: H,
    defaults: ResolvedMetadata,
}

impl<H: DocumentHead> PageMetadataSynchronizer<H> {
    /// Create a synchronizer whose default `og:url` is `domain`.
    #[must_use]
    pub fn new(head: H, domain: impl Into<String>) -> Self {
        Self {
            head,
            defaults: ResolvedMetadata::defaults(domain),
        }
    }

    #[must_use]
    pub const fn head(&self) -> &H {
        &self.head
    }

    #[must_use]
    pub const fn defaults(&self) -> &ResolvedMetadata {
        &self.defaults
    }

    /// Merge partial metadata with the defaults.
    ///
    /// Absent fields take the default; present fields, empty strings
    /// included, are used as given.
    #[must_use]
    pub fn resolve(&self, partial: &PageMetadata) -> ResolvedMetadata {
        let pick = |value: &Option<String>, default: &String| {
            value.clone().unwrap_or_else(|| default.clone())
        };

        ResolvedMetadata {
            title: pick(&partial.title, &self.defaults.title),
            description: pick(&partial.description, &self.defaults.description),
            image: pick(&partial.image, &self.defaults.image),
            url: pick(&partial.url, &self.defaults.url),
        }
    }

    /// Set the document title and upsert the six meta tags.
    #[instrument(skip(self, partial), fields(title = ?partial.title))]
    pub fn update_meta_tags(&self, partial: &PageMetadata) {
        let resolved = self.resolve(partial);

        self.head.set_title(&resolved.title);
        for tag in resolved.tags() {
            self.head.update_tag(tag);
        }

        debug!(url = %resolved.url, "Page metadata synchronized");
    }
}

// =============================================================================
// In-memory head
// =============================================================================

/// Snapshot of the document head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadSnapshot {
    pub title: String,
    pub tags: BTreeMap<MetaSelector, String>,
}

impl HeadSnapshot {
    /// Content of the tag with the given selector.
    #[must_use]
    pub fn tag(&self, selector: MetaSelector) -> Option<&str> {
        self.tags.get(&selector).map(String::as_str)
    }

    /// Render as `<title>` plus `<meta>` elements, one per line.
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = format!("<title>{}</title>\n", escape_html(&self.title));
        for (selector, content) in &self.tags {
            let _ = writeln!(
                html,
                r#"<meta {}="{}" content="{}">"#,
                selector.attribute(),
                escape_html(selector.key()),
                escape_html(content)
            );
        }
        html
    }
}

/// Reactive in-memory document head.
///
/// Clones share state. Subscribers are only woken when a write changes
/// something.
#[derive(Clone)]
pub struct HeadState {
    inner: Arc<watch::Sender<HeadSnapshot>>,
}

impl Default for HeadState {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadState {
    #[must_use]
    pub fn new() -> Self {
        let (inner, _) = watch::channel(HeadSnapshot::default());
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Current head contents.
    #[must_use]
    pub fn snapshot(&self) -> HeadSnapshot {
        self.inner.borrow().clone()
    }

    /// Observe head changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HeadSnapshot> {
        self.inner.subscribe()
    }
}

impl DocumentHead for HeadState {
    fn set_title(&self, title: &str) {
        self.inner.send_if_modified(|head| {
            if head.title == title {
                return false;
            }
            title.clone_into(&mut head.title);
            true
        });
    }

    fn update_tag(&self, tag: MetaTag) {
        self.inner.send_if_modified(|head| {
            if head.tags.get(&tag.selector) == Some(&tag.content) {
                return false;
            }
            head.tags.insert(tag.selector, tag.content);
            true
        });
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
