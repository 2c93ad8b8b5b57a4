//! Per-item detail-page parsing into records
//!
//! An item record is a sparse mapping from lower-cased page labels to scalar
//! values. Two keys are always present: `itemid` (the input id, enforced
//! structurally) and `name` (the page title with the site suffix stripped,
//! or an absent marker). Every other field comes from the page's
//! number-format elements and varies per item.
//!
//! Fetching a record never fails the caller: a dead page degrades to a
//! minimal record, and individual unparseable fields are skipped with an
//! enumerated failure reason.

use crate::config::SiteConfig;
use crate::scrub::fetcher::fetch_page;
use crate::scrub::ItemId;
use crate::site::{item_url, SitePatterns};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The label the site renders with a non-breaking space
const STACK_PRICE_NBSP: &str = "stack\u{a0}price";

/// The ASCII-spaced key the record must end up with
const STACK_PRICE_ASCII: &str = "stack price";

/// A scalar record value
///
/// Serializes untagged: integers as JSON numbers, text as strings, and the
/// absent marker as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Absent,
}

/// Why a single number-format element was skipped
///
/// These never abort extraction of the remaining fields; they exist so
/// callers and tests can see exactly which fields degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFailure {
    /// The element's parent has no preceding element sibling to label it
    MissingLabel,
    /// The label element exists but its text is empty
    EmptyLabel,
    /// The element's text did not parse as a number
    BadNumber { label: String, text: String },
}

/// One item's scraped data
///
/// The `itemid` field is structural and therefore always present and always
/// equal to the id the record was created for, regardless of anything
/// scraped from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub itemid: ItemId,
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
}

impl ItemRecord {
    /// Creates a minimal record: `itemid` set, `name` absent
    pub fn new(itemid: ItemId) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Absent);
        Self { itemid, fields }
    }

    /// The id this record was produced for
    pub fn item_id(&self) -> ItemId {
        self.itemid
    }

    /// Sets a scraped field
    ///
    /// An `itemid` key is refused: the structural field always wins over
    /// anything scraped from the page.
    pub fn set(&mut self, key: &str, value: FieldValue) {
        if key == "itemid" {
            tracing::debug!("ignoring scraped itemid field for item {}", self.itemid);
            return;
        }
        self.fields.insert(key.to_string(), value);
    }

    /// Looks up a scraped field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The item name, if the page exposed one
    pub fn name(&self) -> Option<&str> {
        match self.fields.get("name") {
            Some(FieldValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    /// Iterates over the scraped fields (excluding `itemid`)
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renames the non-breaking-space stack-price key to its ASCII form
    ///
    /// The site renders the label with U+00A0; downstream consumers expect
    /// an ASCII space. The value is preserved and the NBSP-keyed entry
    /// removed. A no-op when the NBSP key is absent.
    pub fn normalize_stack_price_key(&mut self) {
        if let Some(value) = self.fields.remove(STACK_PRICE_NBSP) {
            self.fields.insert(STACK_PRICE_ASCII.to_string(), value);
        }
    }
}

/// Fetches one item's detail page and parses it into a record
///
/// Always produces a record. A fetch failure degrades to the minimal
/// record (`name` absent, `itemid` set) rather than propagating.
pub async fn fetch_item_record(
    client: &Client,
    itemid: ItemId,
    site: &SiteConfig,
    patterns: &SitePatterns,
) -> ItemRecord {
    let url = item_url(&site.origin, itemid);

    match fetch_page(client, &url).await {
        Ok(body) => parse_item_page(&body, itemid, patterns),
        Err(e) => {
            tracing::error!("failed to fetch item {itemid}: {e}");
            ItemRecord::new(itemid)
        }
    }
}

/// Parses detail-page markup into a record for the given id
pub fn parse_item_page(html: &str, itemid: ItemId, patterns: &SitePatterns) -> ItemRecord {
    let document = Html::parse_document(html);
    let mut record = ItemRecord::new(itemid);

    if let Some(name) = extract_name(&document, patterns) {
        record.set("name", FieldValue::Text(name));
    }

    let (fields, failures) = extract_number_fields(&document);
    for (label, value) in fields {
        record.set(&label, FieldValue::Integer(value));
    }
    for failure in &failures {
        tracing::debug!("item {itemid}: skipped field: {failure:?}");
    }

    record.normalize_stack_price_key();
    record
}

/// Extracts the item name from the page title
///
/// The site renders titles as `"{Item Name} - FFXIAH.com"`; the suffix is
/// stripped via the compiled title pattern. Any mismatch yields `None`.
fn extract_name(document: &Html, patterns: &SitePatterns) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())?;

    patterns
        .title
        .captures(title.trim())
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}

/// Extracts every labeled numeric field from the page
///
/// The site tags numeric values with a `number-format` class. Each value's
/// label is the text of the nearest preceding element sibling of the
/// value's parent, lower-cased and used verbatim as the record key. Values
/// are parsed as floats and truncated to integers. Failures are collected
/// per element and never abort the scan.
fn extract_number_fields(document: &Html) -> (Vec<(String, i64)>, Vec<FieldFailure>) {
    let mut fields = Vec::new();
    let mut failures = Vec::new();

    let Ok(number_selector) = Selector::parse(".number-format") else {
        return (fields, failures);
    };

    for element in document.select(&number_selector) {
        match extract_labeled_number(element) {
            Ok(field) => fields.push(field),
            Err(failure) => failures.push(failure),
        }
    }

    (fields, failures)
}

/// Extracts the (label, value) pair for one number-format element
fn extract_labeled_number(element: ElementRef) -> Result<(String, i64), FieldFailure> {
    let label_element = element
        .parent()
        .into_iter()
        .flat_map(|parent| parent.prev_siblings())
        .find_map(ElementRef::wrap)
        .ok_or(FieldFailure::MissingLabel)?;

    let label = label_element
        .text()
        .collect::<String>()
        .trim()
        .to_lowercase();
    if label.is_empty() {
        return Err(FieldFailure::EmptyLabel);
    }

    let text = element.text().collect::<String>().trim().to_string();
    let value = text
        .parse::<f64>()
        .map_err(|_| FieldFailure::BadNumber {
            label: label.clone(),
            text: text.clone(),
        })?;

    Ok((label, value as i64))
}
