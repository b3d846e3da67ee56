//! Request and response payloads exchanged with the Veryfi API.
//!
//! The request pipeline treats these as opaque: it serializes a request body and
//! decodes either a success value or an [`ErrorScheme`].

use serde::{Deserialize, Serialize};

/// Error body returned by Veryfi on failed requests.
///
/// The all-default value is the "no error occurred" sentinel, see
/// [`ErrorScheme::is_zero`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorScheme {
    /// HTTP code reported by the server
    #[serde(alias = "HTTPCode")]
    pub http_code: i64,
    /// Time at which the error occurred
    #[serde(alias = "Timestamp")]
    pub timestamp: String,
    /// Human readable description
    #[serde(alias = "Description")]
    pub description: String,
    /// Arbitrary context attached to the error
    #[serde(alias = "Context")]
    pub context: serde_json::Value,
}

impl ErrorScheme {
    /// Returns `true` if every field holds its default value.
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Options for processing a document available at a public URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentUrlOptions {
    /// URL of the document to process
    pub file_url: String,

    /// Additional URLs merged into the same document
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_urls: Vec<String>,

    /// Categories the document may be classified into
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    /// Tags attached to the processed document
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Upper bound on processed pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages_to_process: Option<u32>,

    /// Skip data enrichment for faster processing
    #[serde(default)]
    pub boost_mode: bool,

    /// Caller supplied identifier stored with the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Delete the document from Veryfi once processed
    #[serde(default)]
    pub auto_delete: bool,
}

impl DocumentUrlOptions {
    /// Create options for a single document URL.
    pub fn new(file_url: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            ..Default::default()
        }
    }

    /// Set the candidate categories.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the document tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum number of pages to process.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages_to_process = Some(max_pages);
        self
    }

    /// Enable or disable boost mode.
    #[must_use]
    pub fn with_boost_mode(mut self, boost_mode: bool) -> Self {
        self.boost_mode = boost_mode;
        self
    }

    /// Set the external identifier.
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Enable or disable deletion after processing.
    #[must_use]
    pub fn with_auto_delete(mut self, auto_delete: bool) -> Self {
        self.auto_delete = auto_delete;
        self
    }
}

/// Vendor extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vendor {
    /// Vendor name
    pub name: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Phone number
    pub phone_number: Option<String>,
    /// Contact email
    pub email: Option<String>,
}

/// Single line item extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    /// Line item identifier
    pub id: Option<i64>,
    /// Position of the item on the document
    pub order: Option<i64>,
    /// Item description
    pub description: Option<String>,
    /// Quantity purchased
    pub quantity: Option<f64>,
    /// Unit price
    pub price: Option<f64>,
    /// Total for the line
    pub total: Option<f64>,
    /// Stock keeping unit
    pub sku: Option<String>,
}

/// Document processed by Veryfi.
///
/// Only the commonly used fields are typed; everything else the API returns is
/// kept in [`Document::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Veryfi document identifier
    pub id: i64,
    /// Caller supplied identifier
    pub external_id: Option<String>,
    /// When Veryfi created the document
    pub created_date: Option<String>,
    /// When the document was last updated
    pub updated_date: Option<String>,
    /// Transaction date printed on the document
    pub date: Option<String>,
    /// Payment due date
    pub due_date: Option<String>,
    /// Invoice number
    pub invoice_number: Option<String>,
    /// Expense category
    pub category: Option<String>,
    /// ISO 4217 currency code
    pub currency_code: Option<String>,
    /// Amount before tax
    pub subtotal: Option<f64>,
    /// Tax amount
    pub tax: Option<f64>,
    /// Tip amount
    pub tip: Option<f64>,
    /// Grand total
    pub total: Option<f64>,
    /// Vendor that issued the document
    pub vendor: Option<Vendor>,
    /// Extracted line items
    pub line_items: Vec<LineItem>,
    /// Tags attached to the document
    pub tags: Vec<serde_json::Value>,
    /// URL of the processed image
    pub img_url: Option<String>,
    /// URL of the generated PDF
    pub pdf_url: Option<String>,
    /// Raw OCR text
    pub ocr_text: Option<String>,

    /// Fields not covered above
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
