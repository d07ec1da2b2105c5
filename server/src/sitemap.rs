//! sitemaps.org 0.9 document for the public site.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::blog::list_posts;
use crate::errors::ContentResult;
use crate::project::list_projects;
use crate::validation::url::normalize_base_url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

const STATIC_PAGES: &[(&str, ChangeFreq, f32)] = &[
    ("/", ChangeFreq::Daily, 1.0),
    ("/about", ChangeFreq::Monthly, 0.6),
    ("/skills", ChangeFreq::Monthly, 0.6),
    ("/portfolio", ChangeFreq::Weekly, 0.9),
    ("/blog", ChangeFreq::Daily, 0.9),
    ("/contact", ChangeFreq::Monthly, 0.5),
];

/// Static pages, then every post, then every project.
pub async fn build_sitemap(pool: &SqlitePool, base_url: &str) -> ContentResult<String> {
    let base = normalize_base_url(base_url)?;

    let mut entries: Vec<SitemapEntry> = STATIC_PAGES
        .iter()
        .map(|(path, changefreq, priority)| SitemapEntry {
            loc: format!("{base}{path}"),
            lastmod: None,
            changefreq: *changefreq,
            priority: *priority,
        })
        .collect();

    entries.extend(list_posts(pool).await?.into_iter().map(|post| SitemapEntry {
        loc: format!("{base}/blog/{}", post.slug),
        lastmod: Some(post.date_posted),
        changefreq: ChangeFreq::Weekly,
        priority: 0.8,
    }));

    entries.extend(list_projects(pool).await?.into_iter().map(|project| SitemapEntry {
        loc: format!("{base}/portfolio/project/{}", project.slug),
        lastmod: Some(project.date_posted),
        changefreq: ChangeFreq::Monthly,
        priority: 0.7,
    }));

    tracing::debug!(entries = entries.len(), "Built sitemap");

    Ok(render_sitemap(&entries))
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc));
        if let Some(lastmod) = entry.lastmod {
            let _ = writeln!(
                xml,
                "    <lastmod>{}</lastmod>",
                lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", entry.changefreq.as_str());
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
