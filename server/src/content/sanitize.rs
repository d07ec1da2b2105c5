//! Allow-list HTML sanitization for editor-submitted rich content.
//!
//! The allow-lists are plain data ([`SanitizationPolicy`]) so deployments can
//! override them from configuration and tests can exercise variant policies.
//! Parsing and tree filtering are done by `ammonia`; this module translates a
//! policy into an `ammonia::Builder` and filters inline CSS itself.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Key in [`SanitizationPolicy::allowed_attributes`] whose attributes apply to every tag.
pub const WILDCARD: &str = "*";

/// Elements that are dropped together with their content, whatever the policy says.
const CONTENT_DROPPING_TAGS: &[&str] = &["script", "style"];

const DEFAULT_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "blockquote", "code", "em", "i", "li", "ol", "p", "pre", "strong",
    "ul", "h1", "h2", "h3", "h4", "h5", "h6", "br", "hr", "img", "div", "span", "table", "thead",
    "tbody", "tr", "th", "td",
];

const DEFAULT_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title"]),
    ("img", &["src", "alt", "width", "height"]),
    ("table", &["border", "cellpadding", "cellspacing"]),
    ("td", &["colspan", "rowspan"]),
    ("th", &["colspan", "rowspan"]),
    (WILDCARD, &["class", "style"]),
];

const DEFAULT_CSS_PROPERTIES: &[&str] = &[
    "color",
    "font-size",
    "text-align",
    "width",
    "height",
    "max-width",
    "max-height",
    "margin",
    "padding",
    "border",
];

/// Fragments that disqualify a CSS value even when its property is allowed.
const UNSAFE_CSS_VALUE_FRAGMENTS: &[&str] = &["url(", "expression(", "javascript:", "@import"];

/// Which tags, attributes and CSS properties survive sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationPolicy {
    /// Tag names kept in the output
    pub allowed_tags: BTreeSet<String>,

    /// Attribute names kept per tag; the `"*"` entry applies to all tags
    #[serde(default)]
    pub allowed_attributes: BTreeMap<String, BTreeSet<String>>,

    /// CSS properties kept inside a retained `style` attribute
    #[serde(default)]
    pub allowed_css_properties: BTreeSet<String>,

    /// Remove disallowed tags but keep their text. Only `true` is supported;
    /// see [`SanitizationPolicy::validate`].
    #[serde(default = "default_strip")]
    pub strip: bool,
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self::from_tables(DEFAULT_TAGS, DEFAULT_ATTRIBUTES, DEFAULT_CSS_PROPERTIES)
    }
}

impl SanitizationPolicy {
    pub fn from_tables(
        tags: &[&str],
        attributes: &[(&str, &[&str])],
        css_properties: &[&str],
    ) -> Self {
        Self {
            allowed_tags: tags.iter().map(|t| t.to_string()).collect(),
            allowed_attributes: attributes
                .iter()
                .map(|(tag, attrs)| {
                    (
                        tag.to_string(),
                        attrs.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
            allowed_css_properties: css_properties.iter().map(|p| p.to_string()).collect(),
            strip: true,
        }
    }

    /// A policy that keeps text only. Used for guest-submitted comments.
    pub fn plain_text() -> Self {
        Self::from_tables(&[], &[], &[])
    }

    /// Attributes permitted on `tag`, including the wildcard ones.
    pub fn attributes_for(&self, tag: &str) -> BTreeSet<&str> {
        [tag, WILDCARD]
            .iter()
            .filter_map(|key| self.allowed_attributes.get(*key))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn allows_css_property(&self, property: &str) -> bool {
        self.allowed_css_properties.contains(property)
    }

    /// Check a policy loaded from configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.strip {
            return Err(
                "sanitizer strip mode cannot be disabled: disallowed tags are always stripped"
                    .to_string(),
            );
        }

        for tag in &self.allowed_tags {
            if CONTENT_DROPPING_TAGS.contains(&tag.as_str()) {
                return Err(format!("tag '{}' can never be allowed", tag));
            }
            if !is_lower_ident(tag) {
                return Err(format!(
                    "tag '{}' must contain only lowercase letters and digits",
                    tag
                ));
            }
        }

        for (tag, attributes) in &self.allowed_attributes {
            if tag != WILDCARD && !self.allowed_tags.contains(tag) {
                return Err(format!(
                    "attributes are configured for tag '{}' which is not allowed",
                    tag
                ));
            }
            if let Some(attribute) = attributes.iter().find(|a| a.starts_with("on")) {
                return Err(format!(
                    "event handler attribute '{}' can never be allowed",
                    attribute
                ));
            }
        }

        if let Some(property) = self
            .allowed_css_properties
            .iter()
            .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_lowercase() || c == '-'))
        {
            return Err(format!("invalid CSS property name '{}'", property));
        }

        Ok(())
    }
}

fn default_strip() -> bool {
    true
}

fn is_lower_ident(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Reduce `raw` to the subset of HTML permitted by `policy`.
///
/// Never fails: malformed or unterminated markup is repaired by the HTML
/// parser and whatever cannot be kept is stripped. Disallowed elements are
/// removed but their text is kept, except `script` and `style` whose content
/// is dropped as well.
pub fn sanitize(raw: &str, policy: &SanitizationPolicy) -> String {
    let tags: HashSet<&str> = policy
        .allowed_tags
        .iter()
        .map(String::as_str)
        .filter(|tag| !CONTENT_DROPPING_TAGS.contains(tag))
        .collect();

    let generic_attributes: HashSet<&str> = policy
        .allowed_attributes
        .get(WILDCARD)
        .map(|attrs| attrs.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let tag_attributes: HashMap<&str, HashSet<&str>> = policy
        .allowed_attributes
        .iter()
        .filter(|(tag, _)| tag.as_str() != WILDCARD)
        .map(|(tag, attrs)| (tag.as_str(), attrs.iter().map(String::as_str).collect()))
        .collect();

    let css_properties = policy.allowed_css_properties.clone();

    let mut builder = ammonia::Builder::default();
    builder
        .tags(tags)
        .clean_content_tags(CONTENT_DROPPING_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(generic_attributes)
        .link_rel(None)
        .strip_comments(true)
        .attribute_filter(move |_element, attribute, value| {
            if attribute == "style" {
                filter_style(value, &css_properties).map(Cow::Owned)
            } else {
                Some(Cow::Borrowed(value))
            }
        });

    builder.clean(raw).to_string()
}

/// Sanitize input that may not be valid UTF-8.
pub fn sanitize_bytes(raw: &[u8], policy: &SanitizationPolicy) -> String {
    sanitize(&String::from_utf8_lossy(raw), policy)
}

/// Reduce `raw` to the text a reader would see, with no markup left in it.
///
/// The result is not HTML: entities are decoded, so it must be escaped again
/// when rendered.
pub fn strip_to_text(raw: &str) -> String {
    let fragment = sanitize(raw, &SanitizationPolicy::plain_text());
    html_escape::decode_html_entities(&fragment).trim().to_string()
}

/// Keep only allowed, well-formed declarations of an inline `style` value.
///
/// Returns `None` when nothing survives, which drops the attribute.
fn filter_style(style: &str, allowed: &BTreeSet<String>) -> Option<String> {
    let declarations: Vec<String> = style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();

            if value.is_empty() || !allowed.contains(&property) || !is_safe_css_value(value) {
                return None;
            }
            Some(format!("{property}:{value}"))
        })
        .collect();

    if declarations.is_empty() {
        None
    } else {
        Some(declarations.join(";"))
    }
}

fn is_safe_css_value(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    !UNSAFE_CSS_VALUE_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
        && !value.contains(['\\', '<', '>', '{', '}', '"', '\''])
}
