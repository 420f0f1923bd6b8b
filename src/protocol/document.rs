//! Field lookup in the clip descriptor document.
//!
//! `rpcResult` carries a small XML document describing the clip, e.g.
//!
//! ```xml
//! <media>
//!   <url>rtmp://fms.example.com/a1/mp4:clip.mp4</url>
//!   <tvpayOnly>false</tvpayOnly>
//! </media>
//! ```
//!
//! Only two fields are ever read, so this is a targeted text scan and not an
//! XML parser. The first `<name` in the document wins, attributes are
//! skipped, and the content runs up to the next `<`. Nested or self-closing
//! elements of the same name are not handled; malformed markup yields
//! whatever text the scan finds.

/// The only entity the server is known to emit.
const AMP_ENTITY: &str = "&amp;";

/// Returns the text content of the first element named `field`.
///
/// The opening tag is matched as a prefix, so looking up `url` also matches
/// `<urlset>` if that comes first.
#[must_use]
pub fn field(document: &str, field: &str) -> Option<String> {
    let open = format!("<{field}");
    let start = document.find(&open)? + open.len();

    // Skip attributes.
    let rest = &document[start..];
    let content_start = rest.find('>')? + 1;

    let content = &rest[content_start..];
    let content_end = content.find('<')?;

    Some(content[..content_end].replace(AMP_ENTITY, "&"))
}
