// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the backend client, the engine and the CLI.
//!
//! Field names on the serde-derived types are the backend's wire contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique catalog identifier of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.to_string())
    }
}

/// Client-generated correlation id sent as the `sessionId` header on every call.
///
/// Not a credential: it only lets the backend group requests of one browser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog product as returned by `/getProductList`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    /// Free-form size label, e.g. `"12x24"`.
    #[serde(default)]
    pub size: String,
    /// Viewable product image.
    pub image_public_url: String,
    /// Backend-resolvable locator of the product's source image.
    pub image_gs_url: String,
    /// Human-readable name; some catalogs leave it out.
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Description when present and non-empty, otherwise the product id.
    pub fn display_name(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => self.product_id.as_str(),
        }
    }
}

/// The uploaded room photo: a viewable URL plus the storage locator the
/// backend composites against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoHandle {
    /// URL a browser can display.
    #[serde(rename = "publicUrl")]
    pub public_url: String,
    /// Storage locator passed back to generation and lookup calls.
    #[serde(rename = "gsUrl")]
    pub gs_url: String,
}

/// A room photo ready to be sent to `/uploadImage`.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// File name reported in the multipart part.
    pub file_name: String,
    /// Content type of `bytes`, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Encoded image data.
    pub bytes: Vec<u8>,
    /// Sent as the `productCategory` form field.
    pub product_category: String,
}

/// Which store (tenant) the catalog and generation calls address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSelector {
    /// Sent as `storeId=<id>`.
    Id(String),
    /// Sent as `store=<store>&company=<company>`.
    Named { store: String, company: String },
}

impl StoreSelector {
    /// The store id usable for generation triggers, if this selector has one.
    pub fn store_id(&self) -> Option<&str> {
        match self {
            StoreSelector::Id(id) => Some(id),
            StoreSelector::Named { .. } => None,
        }
    }

    /// Query parameters identifying the store.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            StoreSelector::Id(id) => vec![("storeId", id.clone())],
            StoreSelector::Named { store, company } => {
                vec![("store", store.clone()), ("company", company.clone())]
            }
        }
    }
}

/// Filter and page of a catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Top-level category, e.g. `Flooring`.
    pub category: Option<String>,
    /// Narrows the category listing.
    pub subcategory: Option<String>,
    /// Search terms; when non-blank they replace the category filter.
    pub keywords: Option<String>,
    /// Zero-based page index.
    pub page: u32,
}

impl ProductQuery {
    /// Category browse query starting at page 0.
    pub fn category(category: impl Into<String>, subcategory: Option<String>) -> Self {
        Self {
            category: Some(category.into()),
            subcategory,
            keywords: None,
            page: 0,
        }
    }

    /// Keyword search starting at page 0.
    pub fn search(keywords: impl Into<String>) -> Self {
        Self {
            category: None,
            subcategory: None,
            keywords: Some(keywords.into()),
            page: 0,
        }
    }

    /// Same filter, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Non-blank search keywords, if any.
    pub fn active_keywords(&self) -> Option<&str> {
        self.keywords
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Query parameters for `/getProductList`, store selection first.
    ///
    /// Keywords replace the category filter when present.
    pub fn query_pairs(&self, store: &StoreSelector) -> Vec<(&'static str, String)> {
        let mut pairs = store.query_pairs();
        if let Some(keywords) = self.active_keywords() {
            pairs.push(("keywords", keywords.to_string()));
        } else {
            if let Some(category) = &self.category {
                pairs.push(("category", category.clone()));
            }
            if let Some(subcategory) = &self.subcategory {
                pairs.push(("subcategory", subcategory.clone()));
            }
        }
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// Result of asking the backend whether a composite is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// 2xx with a `publicUrl` payload.
    Ready { public_url: String },
    /// 404 or any other non-2xx answer.
    NotReady { status: u16 },
}
