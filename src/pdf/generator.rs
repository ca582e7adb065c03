use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::{DocumentError, DocumentMetadata, DocumentResult};
use crate::pdf::builder::{real, PdfImage, PdfLayout};
use crate::pdf::fonts::{encode_win_ansi, PdfFont};

/// Turns a `PdfLayout` into a PDF file.
pub struct PdfGenerator {
    metadata: DocumentMetadata,
}

impl PdfGenerator {
    pub fn new(metadata: DocumentMetadata) -> Self {
        PdfGenerator { metadata }
    }

    pub fn to_document(&self, layout: &PdfLayout) -> DocumentResult<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in [PdfFont::Regular, PdfFont::Bold] {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), id);
        }

        let mut xobjects = Dictionary::new();
        for image in &layout.images {
            let id = add_image_xobject(&mut doc, image)?;
            xobjects.set(image.name.as_bytes().to_vec(), id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let mut kids = Vec::with_capacity(layout.pages.len());
        for operations in &layout.pages {
            let content = Content {
                operations: operations.clone(),
            };
            let bytes = content
                .encode()
                .map_err(|e| DocumentError::render(format!("Failed to encode page content: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    real(0.0),
                    real(0.0),
                    real(layout.page_width),
                    real(layout.page_height),
                ],
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(self.info_dictionary());

        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        Ok(doc)
    }

    fn info_dictionary(&self) -> Dictionary {
        let mut info = dictionary! {
            "Title" => text_string(&self.metadata.title),
            "Producer" => text_string(concat!("invoice-generator ", env!("CARGO_PKG_VERSION"))),
            "CreationDate" => Object::string_literal(
                self.metadata.created_at.format("D:%Y%m%d%H%M%S").to_string(),
            ),
        };
        if let Some(author) = &self.metadata.author {
            info.set("Author", text_string(author));
        }
        if let Some(subject) = &self.metadata.subject {
            info.set("Subject", text_string(subject));
        }
        info
    }

    /// Serializes the whole document in memory, then writes it in one call.
    pub fn render(&self, layout: &PdfLayout, output_path: &Path) -> DocumentResult<()> {
        let mut doc = self.to_document(layout)?;

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| DocumentError::render(format!("Failed to serialize PDF: {}", e)))?;

        fs::write(output_path, &buffer).map_err(|e| {
            DocumentError::render(format!("Cannot write PDF to {}: {}", output_path.display(), e))
        })?;

        tracing::info!(
            "PDF written to {} ({} pages, {} bytes)",
            output_path.display(),
            layout.pages.len(),
            buffer.len()
        );
        Ok(())
    }
}

fn text_string(text: &str) -> Object {
    Object::string_literal(encode_win_ansi(text))
}

fn deflate(data: &[u8]) -> DocumentResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| DocumentError::render(format!("Failed to compress image: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| DocumentError::render(format!("Failed to compress image: {}", e)))
}

fn add_image_xobject(doc: &mut Document, image: &PdfImage) -> DocumentResult<Object> {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if let Some(alpha) = &image.alpha {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(alpha)?,
        ));
        dict.set("SMask", Object::Reference(smask_id));
    }

    // already deflated; keep lopdf from compressing it again
    let stream = Stream::new(dict, deflate(&image.rgb)?).with_compression(false);
    Ok(Object::Reference(doc.add_object(stream)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PdfConfig, TableData};
    use crate::pdf::PdfBuilder;

    fn two_page_layout() -> PdfLayout {
        let mut builder = PdfBuilder::new(PdfConfig::default());
        builder.add_title("INVOICE", 18.0);
        let mut table = TableData::new(vec!["Description".into()]);
        for i in 0..80 {
            table.add_row(vec![format!("Item {}", i)]);
        }
        builder.add_table(&table);
        builder.build()
    }

    #[test]
    fn page_tree_lists_every_page() {
        let layout = two_page_layout();
        assert!(layout.pages.len() >= 2);

        let doc = PdfGenerator::new(DocumentMetadata::default())
            .to_document(&layout)
            .unwrap();
        assert_eq!(doc.get_pages().len(), layout.pages.len());
    }

    #[test]
    fn render_writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let layout = two_page_layout();
        PdfGenerator::new(DocumentMetadata::default())
            .render(&layout, &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.get_pages().len(), layout.pages.len());
    }

    #[test]
    fn unwritable_destination_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.pdf");
        let err = PdfGenerator::new(DocumentMetadata::default())
            .render(&two_page_layout(), &path)
            .unwrap_err();
        assert!(matches!(err, DocumentError::RenderError(_)));
        assert!(!path.exists());
    }
}
