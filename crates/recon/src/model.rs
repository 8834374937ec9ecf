use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Join key column shared by both inputs.
pub const REFERENCE_FIELD: &str = "transaction_reference";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

/// Fields a matched entry adds on top of the internal record.
pub const PROVIDER_AMOUNT_FIELD: &str = "providerAmount";
pub const PROVIDER_STATUS_FIELD: &str = "providerStatus";
pub const IS_AMOUNT_MATCH_FIELD: &str = "isAmountMatch";
pub const IS_STATUS_MATCH_FIELD: &str = "isStatusMatch";
pub const EXTENSION_FIELDS: [&str; 4] = [
    PROVIDER_AMOUNT_FIELD,
    PROVIDER_STATUS_FIELD,
    IS_AMOUNT_MATCH_FIELD,
    IS_STATUS_MATCH_FIELD,
];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row from either side, as an insertion-ordered field map.
///
/// Values are kept exactly as supplied. CSV ingestion always produces
/// strings; programmatic callers may hand in numbers or other JSON values,
/// which then compare by JSON equality (`"100"` is not `100`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record of string fields, in the given order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect()
    }

    /// Insert or replace a field. Replacing keeps the field's original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The join key. Missing, null, or non-string references all key as `""`.
    pub fn reference(&self) -> &str {
        self.0
            .get(REFERENCE_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn amount(&self) -> Option<&Value> {
        self.0.get(AMOUNT_FIELD)
    }

    pub fn status(&self) -> Option<&Value> {
        self.0.get(STATUS_FIELD)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TransactionRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for TransactionRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// A reference present on both sides: the internal record extended with the
/// provider's amount and status and the two agreement flags.
///
/// Serializes flat, internal fields first:
/// `{ ...internal, providerAmount, providerStatus, isAmountMatch, isStatusMatch }`.
/// An internal field already named like one of the four additions keeps its
/// position and takes the added value; absent provider values are omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedEntry {
    #[serde(flatten)]
    pub internal: TransactionRecord,
    #[serde(default)]
    pub provider_amount: Option<Value>,
    #[serde(default)]
    pub provider_status: Option<Value>,
    pub is_amount_match: bool,
    pub is_status_match: bool,
}

impl MatchedEntry {
    pub fn reference(&self) -> &str {
        self.internal.reference()
    }

    /// Both flags set.
    pub fn agrees(&self) -> bool {
        self.is_amount_match && self.is_status_match
    }

    /// Value of one of the [`EXTENSION_FIELDS`]; `None` for any other name
    /// and for an absent provider value.
    pub fn extension(&self, field: &str) -> Option<Value> {
        match field {
            PROVIDER_AMOUNT_FIELD => self.provider_amount.clone(),
            PROVIDER_STATUS_FIELD => self.provider_status.clone(),
            IS_AMOUNT_MATCH_FIELD => Some(Value::Bool(self.is_amount_match)),
            IS_STATUS_MATCH_FIELD => Some(Value::Bool(self.is_status_match)),
            _ => None,
        }
    }
}

impl Serialize for MatchedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.internal.fields() {
            if EXTENSION_FIELDS.contains(&key.as_str()) {
                if let Some(ext) = self.extension(key) {
                    map.serialize_entry(key, &ext)?;
                }
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        for field in EXTENSION_FIELDS {
            if self.internal.get(field).is_some() {
                continue;
            }
            if let Some(ext) = self.extension(field) {
                map.serialize_entry(field, &ext)?;
            }
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The engine's sole output. Built once per input pair, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconResult {
    pub matched: Vec<MatchedEntry>,
    pub only_internal: Vec<TransactionRecord>,
    pub only_provider: Vec<TransactionRecord>,
}

impl ReconResult {
    /// No disagreements and nothing one-sided.
    pub fn is_clean(&self) -> bool {
        self.only_internal.is_empty()
            && self.only_provider.is_empty()
            && self.matched.iter().all(MatchedEntry::agrees)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Internal,
    Provider,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// A reference seen more than once within one input. The last occurrence
/// takes part in matching; `dropped` holds the earlier ones, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReference {
    pub side: Side,
    pub reference: String,
    pub occurrences: usize,
    pub dropped: Vec<TransactionRecord>,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconSummary {
    pub internal_records: usize,
    pub provider_records: usize,
    pub matched: usize,
    pub fully_agreeing: usize,
    pub amount_mismatches: usize,
    pub status_mismatches: usize,
    pub only_internal: usize,
    pub only_provider: usize,
    pub duplicate_references: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub result: ReconResult,
    pub duplicates: Vec<DuplicateReference>,
}
