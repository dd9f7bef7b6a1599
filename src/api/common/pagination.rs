//
//  cydarm-connector
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for the Filtered Case Search
//!
//! Cydarm's `GET /case` endpoint follows the JSON:API conventions: the request
//! carries `page[number]` (zero-based) and `page[size]`, and each response holds a
//! `data` array plus a `links` object. The presence of a `next` key in `links`
//! is the only signal that another page exists.
//!
//! # Example
//!
//! ```rust
//! use cydarm_connector::api::common::CasePage;
//!
//! let json = r#"{
//!     "data": [{"uuid": "c1"}, {"uuid": "c2"}],
//!     "links": {"self": "/case?page[number]=0", "next": "/case?page[number]=1"}
//! }"#;
//!
//! let page: CasePage = serde_json::from_str(json).unwrap();
//! assert_eq!(page.data.len(), 2);
//! assert!(page.has_next());
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Default number of cases requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// One page of the filtered case search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CasePage {
    /// Cases on this page, in server order.
    #[serde(default)]
    pub data: Vec<Value>,

    /// Navigation links. Only the presence of `next` matters to the walker.
    #[serde(default)]
    pub links: Map<String, Value>,
}

impl CasePage {
    /// Returns `true` when the server advertised a further page.
    ///
    /// The value of `next` is never inspected; a `"next": null` entry still
    /// counts as another page.
    pub fn has_next(&self) -> bool {
        self.links.contains_key("next")
    }
}

/// Filter for the filtered case search.
///
/// Empty `filter_text` and `tags_included` are not sent to the server.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::api::common::CaseFilter;
///
/// let filter = CaseFilter::default().with_text("CVE").with_tags("phishing,urgent");
/// let query = filter.query(2);
/// assert_eq!(query[0], ("page[number]".to_string(), "2".to_string()));
/// assert_eq!(query.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFilter {
    /// Cases per page.
    #[serde(default = "default_page_size", deserialize_with = "page_size_from_number")]
    pub page_size: u32,

    /// Free text matched against locator, description and metadata values.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub filter_text: String,

    /// Comma separated list of tags a case must carry.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags_included: String,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// `null` means no filter.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `100` and `100.0`; `null` falls back to the default size.
fn page_size_from_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let Some(number) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(DEFAULT_PAGE_SIZE);
    };
    number
        .as_u64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            D::Error::custom(format!(
                "Given page_size ({}) is not valid - expected a positive integer.",
                number
            ))
        })
}

impl Default for CaseFilter {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            filter_text: String::new(),
            tags_included: String::new(),
        }
    }
}

impl CaseFilter {
    /// Sets the free text filter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.filter_text = text.into();
        self
    }

    /// Sets the comma separated tag filter.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags_included = tags.into();
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builds the query pairs for page `page_num` (zero-based).
    pub fn query(&self, page_num: u32) -> Vec<(String, String)> {
        let mut query = vec![
            ("page[number]".to_string(), page_num.to_string()),
            ("page[size]".to_string(), self.page_size.to_string()),
        ];
        if !self.filter_text.is_empty() {
            query.push(("filter[text]".to_string(), self.filter_text.clone()));
        }
        if !self.tags_included.is_empty() {
            query.push(("filter[inc_tag]".to_string(), self.tags_included.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_has_no_next() {
        let page: CasePage =
            serde_json::from_str(r#"{"data": [], "links": {"self": "/case"}}"#).unwrap();
        assert!(!page.has_next());
    }

    #[test]
    fn test_missing_links_is_last_page() {
        let page: CasePage = serde_json::from_str(r#"{"data": [{"uuid": "x"}]}"#).unwrap();
        assert!(!page.has_next());
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn test_query_skips_empty_filters() {
        let query = CaseFilter::default().with_page_size(50).query(0);
        assert_eq!(
            query,
            vec![
                ("page[number]".to_string(), "0".to_string()),
                ("page[size]".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_defaults_from_json() {
        let filter: CaseFilter = serde_json::from_str(r#"{"filter_text": "CVE"}"#).unwrap();
        assert_eq!(filter.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.filter_text, "CVE");
        assert!(filter.tags_included.is_empty());
    }

    #[test]
    fn test_null_filters_mean_no_filter() {
        let filter: CaseFilter = serde_json::from_value(serde_json::json!({
            "filter_text": null,
            "tags_included": null,
            "page_size": null
        }))
        .unwrap();
        assert_eq!(filter, CaseFilter::default());
        assert_eq!(filter.query(0).len(), 2);
    }

    #[test]
    fn test_page_size_accepts_integral_floats() {
        let filter: CaseFilter =
            serde_json::from_value(serde_json::json!({"page_size": 100.0})).unwrap();
        assert_eq!(filter.page_size, 100);

        for bad in [serde_json::json!(2.5), serde_json::json!(0), serde_json::json!(-5)] {
            let err = serde_json::from_value::<CaseFilter>(serde_json::json!({"page_size": bad}))
                .unwrap_err();
            assert!(err.to_string().contains("expected a positive integer"));
        }
    }
}
