//! Link annotation mapping from page fractions to pixel rectangles

use crate::source::LinkAnnotation;

/// Absolute rectangle in image pixel space (origin top-left, y down).
///
/// Not clipped: values outside the page are kept as delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// A link with a resolved target, ready to be placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLink {
    pub rect: LinkRect,
    pub uri: String,
}

/// Scale a fractional rectangle to a `width` x `height` page.
pub fn map_rect(link: &LinkAnnotation, width: u32, height: u32) -> LinkRect {
    let w = width as f64;
    let h = height as f64;
    LinkRect {
        x0: link.x * w,
        y0: link.y * h,
        x1: (link.x + link.width) * w,
        y1: (link.y + link.height) * h,
    }
}

/// Resolve the target of a link.
///
/// An explicit non-empty `uri` wins. Otherwise a non-empty `trackedUrl` is
/// used, prefixed with `host` when it is a root-relative path. Otherwise
/// there is no target.
pub fn resolve_uri(link: &LinkAnnotation, host: &str) -> Option<String> {
    if let Some(uri) = link.uri.as_deref().filter(|u| !u.is_empty()) {
        return Some(uri.to_string());
    }

    let tracked = link.tracked_url.as_deref().filter(|u| !u.is_empty())?;
    if tracked.starts_with('/') {
        Some(format!("{}{}", host.trim_end_matches('/'), tracked))
    } else {
        Some(tracked.to_string())
    }
}

/// Map all annotations of a page, silently dropping those without a target.
pub fn map_links(links: &[LinkAnnotation], width: u32, height: u32, host: &str) -> Vec<ResolvedLink> {
    links
        .iter()
        .filter_map(|link| match resolve_uri(link, host) {
            Some(uri) => Some(ResolvedLink {
                rect: map_rect(link, width, height),
                uri,
            }),
            None => {
                tracing::trace!(?link, "Dropping link without target");
                None
            }
        })
        .collect()
}
