//! Image and artifact side of the pipeline
//!
//! Pages are flattened to opaque RGB, their links mapped to pixel space, and
//! the result written either as a linked PDF (lopdf) or as PNG files.

pub mod links;
pub mod normalize;
mod writer;

pub use links::{map_links, map_rect, resolve_uri, LinkRect, ResolvedLink};
pub use normalize::{decode, flatten, normalize};
pub use writer::{
    build_pdf, page_file_name, pdf_rect, render_page, write_images, write_pdf, RenderedPage,
};
