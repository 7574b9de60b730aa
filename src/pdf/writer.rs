//! Output assembly: a linked PDF or a directory of page images

use crate::error::{Error, Result};
use crate::pdf::links::{map_links, LinkRect, ResolvedLink};
use crate::pdf::normalize::flatten;
use crate::source::PageResult;
use image::{ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::{Path, PathBuf};

const IMAGE_NAME: &str = "Im0";

/// A page ready for output: opaque bitmap plus resolved links
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page number (1-indexed)
    pub page: u32,
    pub image: RgbImage,
    pub links: Vec<ResolvedLink>,
}

impl RenderedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Flatten a fetched page and resolve its links against its own dimensions.
pub fn render_page(result: &PageResult, host: &str) -> RenderedPage {
    let image = flatten(&result.image);
    let links = map_links(&result.links, image.width(), image.height(), host);
    if links.len() < result.links.len() {
        tracing::debug!(
            page = result.page,
            dropped = result.links.len() - links.len(),
            "Dropped links without a target"
        );
    }
    RenderedPage {
        page: result.page,
        image,
        links,
    }
}

// ============================================================================
// PDF mode
// ============================================================================

/// Build a PDF with one page per rendered page, 1 pixel = 1 point.
pub fn build_pdf(pages: &[RenderedPage]) -> Result<Document> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_refs = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, page)?;
        page_refs.push(Object::Reference(page_id));
    }

    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn add_page(doc: &mut Document, parent: ObjectId, page: &RenderedPage) -> Result<ObjectId> {
    let width = page.width();
    let height = page.height();

    let image_id = doc.add_object(image_xobject(&page.image)?);

    let content = format!("q\n{} 0 0 {} 0 0 cm\n/{} Do\nQ\n", width, height, IMAGE_NAME);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let annots: Vec<Object> = page
        .links
        .iter()
        .map(|link| Object::Reference(doc.add_object(link_annotation(link, height))))
        .collect();

    let mut xobjects = Dictionary::new();
    xobjects.set(IMAGE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(width as i64),
            Object::Integer(height as i64),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));
    if !annots.is_empty() {
        page_dict.set("Annots", Object::Array(annots));
    }

    Ok(doc.add_object(page_dict))
}

fn image_xobject(image: &RgbImage) -> Result<Stream> {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.width() as i64));
    dict.set("Height", Object::Integer(image.height() as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let mut stream = Stream::new(dict, image.as_raw().clone());
    stream.compress()?;
    Ok(stream)
}

/// Convert a top-left pixel rectangle to PDF user space (bottom-left origin).
pub fn pdf_rect(rect: &LinkRect, page_height: u32) -> [f32; 4] {
    let h = page_height as f64;
    [
        rect.x0 as f32,
        (h - rect.y1) as f32,
        rect.x1 as f32,
        (h - rect.y0) as f32,
    ]
}

fn link_annotation(link: &ResolvedLink, page_height: u32) -> Dictionary {
    let mut action = Dictionary::new();
    action.set("Type", Object::Name(b"Action".to_vec()));
    action.set("S", Object::Name(b"URI".to_vec()));
    action.set(
        "URI",
        Object::String(link.uri.as_bytes().to_vec(), StringFormat::Literal),
    );

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Link".to_vec()));
    annot.set(
        "Rect",
        Object::Array(
            pdf_rect(&link.rect, page_height)
                .into_iter()
                .map(Object::Real)
                .collect(),
        ),
    );
    annot.set(
        "Border",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(0),
        ]),
    );
    annot.set("A", Object::Dictionary(action));
    annot
}

/// Serialize the PDF in memory, then write it in one call.
///
/// Nothing touches the filesystem until the whole document has been built
/// and serialized, so a failure leaves no partial artifact behind.
pub fn write_pdf(pages: &[RenderedPage], path: &Path) -> Result<()> {
    let bytes = {
        let mut doc = build_pdf(pages)?;
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        writer
    };

    create_parent_dirs(path)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), pages = pages.len(), "Wrote PDF");
    Ok(())
}

// ============================================================================
// Image directory mode
// ============================================================================

/// File name of a page image inside the output directory.
pub fn page_file_name(page: u32) -> String {
    format!("{}.png", page)
}

/// Write each page as `<dir>/<page>.png`, creating `dir` if needed. Links are not kept.
pub fn write_images(pages: &[RenderedPage], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = dir.join(page_file_name(page.page));
        page.image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| Error::ImageEncode {
                path: path.display().to_string(),
                source,
            })?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), pages = written.len(), "Wrote page images");
    Ok(written)
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
