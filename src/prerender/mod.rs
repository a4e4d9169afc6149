//! Prerender walker: static HTML for every SPA route.
//!
//! DESIGN
//! ======
//! Routes are a fixed list walked once, in order. Each route is rendered
//! through a [`PageRenderer`], spliced into the built `index.html` template
//! at the `<!--app-head-->` / `<!--app-html-->` markers, and written to
//! `<out>/<route>/index.html`. A failure on one route is logged and
//! recorded in the report; the walk continues with the next route.
//!
//! Rendering `/` replaces `<out>/index.html`, which is usually the template
//! itself. The untouched template is saved as `<out>/.template.html` before
//! the walk; later runs read it from there and the server uses it as the SPA
//! fallback shell.

pub mod pages;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub const APP_HTML_MARKER: &str = "<!--app-html-->";
pub const APP_HEAD_MARKER: &str = "<!--app-head-->";

/// Pristine copy of the template, kept next to the rendered output.
pub const TEMPLATE_COPY: &str = ".template.html";

/// Routes written to disk, in walk order.
pub const ROUTES: &[&str] = &["/", "/fact-check", "/myths", "/videos", "/resources", "/about", "/contact", "/privacy"];

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PrerenderError {
    #[error("failed to read template {path}: {source}")]
    Template { path: PathBuf, source: std::io::Error },
    #[error("template is missing the {} marker", APP_HTML_MARKER)]
    MissingMarker,
    #[error("no page registered for route {0}")]
    UnknownRoute(String),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// Output of rendering one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Tags spliced at `<!--app-head-->`.
    pub head: String,
    /// Markup spliced at `<!--app-html-->`.
    pub html: String,
}

/// Server-side `render(url)`.
pub trait PageRenderer {
    /// Render the page for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PrerenderError::UnknownRoute`] when no page exists for `url`.
    fn render(&self, url: &str) -> Result<RenderedPage, PrerenderError>;
}

#[derive(Debug, Default)]
pub struct PrerenderReport {
    /// Files written, paired with their route.
    pub rendered: Vec<(String, PathBuf)>,
    /// Routes that failed, with the reason.
    pub failed: Vec<(String, String)>,
    pub sitemap: Option<PathBuf>,
}

impl PrerenderReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// =============================================================================
// WALKER
// =============================================================================

/// Render every route in `routes` into `out_dir`.
///
/// When `site_url` is set, a `sitemap.xml` listing the rendered routes is
/// written alongside them.
///
/// # Errors
///
/// Only template problems are fatal: an unreadable template, one without
/// the app marker, or failing to save its copy. Per-route failures are
/// collected in the report.
pub async fn prerender(
    routes: &[&str],
    template_path: &Path,
    out_dir: &Path,
    renderer: &dyn PageRenderer,
    site_url: Option<&str>,
) -> Result<PrerenderReport, PrerenderError> {
    let template = tokio::fs::read_to_string(template_path)
        .await
        .map_err(|source| PrerenderError::Template { path: template_path.to_path_buf(), source })?;
    if !template.contains(APP_HTML_MARKER) {
        return Err(PrerenderError::MissingMarker);
    }
    preserve_template(&template, out_dir).await?;

    let mut report = PrerenderReport::default();
    for &route in routes {
        match render_route(route, &template, out_dir, renderer).await {
            Ok(path) => {
                info!(%route, path = %path.display(), "prerender: wrote route");
                report.rendered.push((route.to_string(), path));
            }
            Err(e) => {
                warn!(%route, error = %e, "prerender: route failed");
                report.failed.push((route.to_string(), e.to_string()));
            }
        }
    }

    if let Some(site_url) = site_url {
        let path = out_dir.join("sitemap.xml");
        let routes: Vec<&str> = report.rendered.iter().map(|(r, _)| r.as_str()).collect();
        match tokio::fs::write(&path, build_sitemap(site_url, &routes)).await {
            Ok(()) => report.sitemap = Some(path),
            Err(e) => warn!(path = %path.display(), error = %e, "prerender: sitemap not written"),
        }
    }

    info!(rendered = report.rendered.len(), failed = report.failed.len(), "prerender: done");
    Ok(report)
}

async fn preserve_template(template: &str, out_dir: &Path) -> Result<(), PrerenderError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| PrerenderError::Write { path: out_dir.to_path_buf(), source })?;
    let path = out_dir.join(TEMPLATE_COPY);
    tokio::fs::write(&path, template)
        .await
        .map_err(|source| PrerenderError::Write { path, source })
}

/// Template to use when none is given: the saved copy from an earlier run,
/// else the bundler's `index.html`.
#[must_use]
pub fn default_template(out_dir: &Path) -> PathBuf {
    let copy = out_dir.join(TEMPLATE_COPY);
    if copy.is_file() { copy } else { out_dir.join("index.html") }
}

async fn render_route(
    route: &str,
    template: &str,
    out_dir: &Path,
    renderer: &dyn PageRenderer,
) -> Result<PathBuf, PrerenderError> {
    let page = renderer.render(route)?;
    let html = splice(template, &page);
    let path = output_path(out_dir, route);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PrerenderError::Write { path: parent.to_path_buf(), source })?;
    }
    tokio::fs::write(&path, html)
        .await
        .map_err(|source| PrerenderError::Write { path: path.clone(), source })?;
    Ok(path)
}

/// Insert a rendered page into the template.
#[must_use]
pub fn splice(template: &str, page: &RenderedPage) -> String {
    template
        .replacen(APP_HEAD_MARKER, &page.head, 1)
        .replacen(APP_HTML_MARKER, &page.html, 1)
}

/// `/` maps to `out/index.html`; `/a/b` maps to `out/a/b/index.html`.
#[must_use]
pub fn output_path(out_dir: &Path, route: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    for segment in route.split('/').filter(|s| !s.is_empty() && *s != "." && *s != "..") {
        path.push(segment);
    }
    path.join("index.html")
}

/// A minimal `sitemap.xml` for the given routes.
#[must_use]
pub fn build_sitemap(site_url: &str, routes: &[&str]) -> String {
    let base = site_url.trim_end_matches('/');
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for route in routes {
        xml.push_str("  <url><loc>");
        xml.push_str(base);
        xml.push_str(route);
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
