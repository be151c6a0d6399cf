use serde::{Deserialize, Serialize};

use crate::error::{RestyleError, RestyleResult};
use crate::parsers::html::{
    has_body_tag, is_blank, sanitize, serialize_content, serialize_node, AttributeAllowList,
    Document,
};
use crate::parsers::restorer::{restore, RestoreMode};

/// The two renditions of a document body produced by [`extract_body`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedBody {
    /// `<body>` with every attribute removed, ready for a translation service
    pub clean_body: String,
    /// `<body>` exactly as parsed, styles included
    pub original_body: String,
}

/// Strips presentational attributes from a markup string
///
/// Only attributes named in `allow_list` survive. Full documents are reduced
/// to their `<body>` element; fragments keep all of their top-level nodes.
///
/// # Arguments
///
/// * `html` - Markup to clean, not necessarily well-formed
/// * `allow_list` - Attribute names to keep
///
/// # Returns
///
/// The cleaned markup, or an empty string for blank input.
///
/// # Examples
///
/// ```
/// use restyler::core::sanitize_html;
/// use restyler::parsers::AttributeAllowList;
///
/// let clean = sanitize_html("<p class=\"x\" id=\"a\">Hi</p>", &AttributeAllowList::default());
/// assert_eq!(clean, "<p id=\"a\">Hi</p>");
/// ```
pub fn sanitize_html(html: &str, allow_list: &AttributeAllowList) -> String {
    if is_blank(html) {
        return String::new();
    }

    let document = sanitize(Document::parse(html), allow_list);
    serialize_content(&document)
}

/// Splits a document into its original and attribute-free `<body>`
///
/// # Errors
///
/// Returns [`RestyleError::NoBody`] when the input carries no `<body>` tag.
pub fn extract_body(html: &str) -> RestyleResult<ExtractedBody> {
    if !has_body_tag(html) {
        return Err(RestyleError::NoBody);
    }

    let document = Document::parse_full(html);
    let body = document.body().ok_or(RestyleError::NoBody)?;
    let original_body = serialize_node(&body);

    let document = sanitize(document, &AttributeAllowList::empty());
    let clean_body = serialize_content(&document);

    tracing::debug!(
        "正文提取完成: 原始 {} 字节, 清理后 {} 字节",
        original_body.len(),
        clean_body.len()
    );

    Ok(ExtractedBody {
        clean_body,
        original_body,
    })
}

/// Moves translated text back into the styled original
///
/// # Arguments
///
/// * `original_html` - Markup carrying the styling to keep
/// * `translated_html` - Translated markup, usually produced from the sanitized original
/// * `mode` - Alignment policy
///
/// # Returns
///
/// The restored markup. When either input is blank `original_html` is returned verbatim.
pub fn restore_html(original_html: &str, translated_html: &str, mode: RestoreMode) -> String {
    if is_blank(original_html) || is_blank(translated_html) {
        return original_html.to_string();
    }

    let restored = restore(
        Document::parse(original_html),
        Document::parse(translated_html),
        mode,
    );
    serialize_content(&restored)
}
