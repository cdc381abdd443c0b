//! Shared helpers for building test PDFs

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;

/// Key stored in every generated page dictionary holding its 1-based number
pub const MARKER: &[u8] = b"TestPageNumber";

/// Build an uncompressed PDF with `num_pages` pages and one unreachable
/// object, so both stream compression and pruning have something to do
pub fn create_test_pdf(num_pages: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut page_ids = Vec::new();
    for i in 1..=num_pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
        ];
        // Repetitive text so deflate has something to shrink
        for line in 0..40 {
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(72), Object::Integer(720 - line * 16)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    format!("Page {} line {} of the test document", i, line).into_bytes(),
                    StringFormat::Literal,
                )],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            ("TestPageNumber", Object::Integer(i as i64)),
        ]));
        page_ids.push(page_id);
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    // Nothing refers to this stream
    doc.add_object(Stream::new(Dictionary::new(), vec![b'x'; 4096]));

    doc
}

/// Write a generated PDF to `path`
pub fn write_test_pdf(path: &Path, num_pages: u32) {
    let mut doc = create_test_pdf(num_pages);
    doc.save(path).expect("save test PDF");
}

/// The `TestPageNumber` of each page of the PDF at `path`, in page order
pub fn page_markers(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("load PDF");
    doc.get_pages()
        .values()
        .map(|id| {
            doc.get_dictionary(*id)
                .and_then(|page| page.get(MARKER))
                .and_then(Object::as_i64)
                .expect("page marker")
        })
        .collect()
}

/// File size in bytes
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).expect("file metadata").len()
}
