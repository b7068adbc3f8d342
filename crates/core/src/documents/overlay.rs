//! Fills the official form template by drawing text over its first page.
//!
//! Positions come from [`OverlayLayout`] and are not checked against the
//! template artwork: a new edition of the paper form needs a new layout.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use super::canvas::{A4_HEIGHT, standard_font, text_operations};
use super::error::DocumentError;
use super::form::DeclarationForm;
use super::format::{form_filename, format_amount_grouped};
use super::{PDF_CONTENT_TYPE, RenderedDocument};

const OVERLAY_FONT: &str = "FOverlay";

/// Text positions on the template, in points from the top-left corner of page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout {
    /// Declarant NIF box.
    pub declarant: (i64, i64),
    /// Year box.
    pub year: (i64, i64),
    /// Baseline of the first donor row.
    pub first_row_y: i64,
    /// Distance between consecutive rows.
    pub row_pitch: i64,
    /// Column of the donor NIF.
    pub tax_id_x: i64,
    /// Column of the operation code.
    pub code_x: i64,
    /// Column of the amount.
    pub amount_x: i64,
    /// Space between the last row and the total.
    pub total_gap: i64,
    /// Unprintable strip at the bottom of the page.
    pub bottom_margin: i64,
    /// Font size of every field.
    pub font_size: i64,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            declarant: (50, 168),
            year: (200, 168),
            first_row_y: 260,
            row_pitch: 18,
            tax_id_x: 50,
            code_x: 200,
            amount_x: 430,
            total_gap: 20,
            bottom_margin: 40,
            font_size: 13,
        }
    }
}

impl OverlayLayout {
    /// How many donor rows fit on a page of `page_height` points, total line included.
    #[must_use]
    pub fn capacity(&self, page_height: i64) -> usize {
        let room = page_height - self.bottom_margin - self.total_gap - self.first_row_y;
        if room < 0 || self.row_pitch <= 0 {
            return 0;
        }
        usize::try_from(room / self.row_pitch).unwrap_or(0)
    }

    fn row_y(&self, index: usize) -> i64 {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        self.first_row_y.saturating_add(index.saturating_mul(self.row_pitch))
    }
}

/// Bytes of the official blank form.
#[derive(Debug, Clone)]
pub struct FormTemplate {
    bytes: Vec<u8>,
}

impl FormTemplate {
    /// Reads the template from disk.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::TemplateMissing` if the file does not exist.
    pub async fn read(path: &Path) -> Result<Self, DocumentError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Self { bytes }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DocumentError::TemplateMissing {
                    path: PathBuf::from(path),
                })
            }
            Err(e) => Err(DocumentError::Io(e)),
        }
    }

    /// Wraps template bytes already in memory.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Writes a declaration onto the form template.
#[derive(Debug, Clone, Default)]
pub struct TemplateOverlay {
    layout: OverlayLayout,
}

impl TemplateOverlay {
    /// Fills page 1 of `template` with `form`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be parsed, has no pages, or
    /// cannot hold every row.
    pub fn fill(
        &self,
        template: &FormTemplate,
        form: &DeclarationForm,
    ) -> Result<RenderedDocument, DocumentError> {
        let mut doc = Document::load_mem(&template.bytes)?;
        let page_id = doc
            .get_pages()
            .get(&1)
            .copied()
            .ok_or(DocumentError::TemplateEmpty)?;

        let height = page_height(&doc, page_id);
        let capacity = self.layout.capacity(height);
        if form.rows.len() > capacity {
            return Err(DocumentError::TemplateOverflow {
                rows: form.rows.len(),
                capacity,
            });
        }

        let overlay = self.overlay_operations(form, height);

        let font_id = doc.add_object(standard_font("Helvetica"));
        let save_id = doc.add_object(content_stream(vec![Operation::new("q", vec![])])?);
        let mut restore_and_draw = vec![Operation::new("Q", vec![])];
        restore_and_draw.extend(overlay);
        let overlay_id = doc.add_object(content_stream(restore_and_draw)?);

        let mut page = doc.get_dictionary(page_id)?.clone();

        let mut resources = effective_resources(&doc, &page);
        let mut fonts = resolve_dictionary(&doc, resources.get(b"Font").ok());
        fonts.set(OVERLAY_FONT, font_id);
        resources.set("Font", fonts);
        page.set("Resources", resources);

        let mut contents: Vec<Object> = vec![save_id.into()];
        match page.get(b"Contents") {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            Ok(existing @ Object::Reference(_)) => contents.push(existing.clone()),
            _ => {}
        }
        contents.push(overlay_id.into());
        page.set("Contents", contents);

        doc.objects.insert(page_id, Object::Dictionary(page));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;

        debug!(rows = form.rows.len(), year = %form.year, "Filled form template");

        Ok(RenderedDocument {
            filename: form_filename(form.declarant_nif.as_deref(), form.year),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }

    fn overlay_operations(&self, form: &DeclarationForm, page_height: i64) -> Vec<Operation> {
        let layout = &self.layout;
        let size = layout.font_size;
        let mut ops = Vec::new();
        let mut put = |x: i64, y: i64, text: &str| {
            ops.extend(text_operations(OVERLAY_FONT, size, x, page_height - y, text));
        };

        put(layout.declarant.0, layout.declarant.1, form.declarant_label());
        put(layout.year.0, layout.year.1, &form.year.to_string());

        for (index, row) in form.rows.iter().enumerate() {
            let y = layout.row_y(index);
            put(layout.tax_id_x, y, &row.tax_id);
            put(layout.code_x, y, &row.operation_code);
            put(layout.amount_x, y, &format_amount_grouped(row.amount));
        }

        let total_y = layout.row_y(form.rows.len()) + layout.total_gap;
        put(layout.amount_x, total_y, &format_amount_grouped(form.total));

        ops
    }
}

fn content_stream(operations: Vec<Operation>) -> Result<Stream, DocumentError> {
    let content = Content { operations }.encode()?;
    Ok(Stream::new(Dictionary::new(), content))
}

/// Follows a page and its ancestors until `key` is found.
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut current = page;
    // Page trees are shallow; the bound only guards against reference cycles.
    for _ in 0..32 {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve_dictionary(doc: &Document, value: Option<&Object>) -> Dictionary {
    match value {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .map_or_else(|_| Dictionary::new(), Clone::clone),
        _ => Dictionary::new(),
    }
}

fn effective_resources(doc: &Document, page: &Dictionary) -> Dictionary {
    resolve_dictionary(doc, inherited(doc, page, b"Resources"))
}

#[allow(clippy::cast_possible_truncation)]
fn number(object: &Object) -> Option<i64> {
    match object {
        Object::Integer(value) => Some(*value),
        Object::Real(value) => Some(value.round() as i64),
        _ => None,
    }
}

fn page_height(doc: &Document, page_id: ObjectId) -> i64 {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return A4_HEIGHT;
    };
    let media_box = match inherited(doc, page, b"MediaBox") {
        Some(Object::Array(values)) => Some(values.clone()),
        Some(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .ok()
            .cloned(),
        _ => None,
    };

    media_box
        .and_then(|values| match values.as_slice() {
            [_, lower, _, upper] => Some(number(upper)? - number(lower)?),
            _ => None,
        })
        .filter(|height| *height > 0)
        .unwrap_or(A4_HEIGHT)
}
