//! Investor candidates as stored and as scored.
//!
//! Stored rows are heterogeneous: angels and funds use different field
//! names, tag lists arrive either as comma-joined strings or as arrays, and
//! the reputation score is whatever the upstream table happened to hold.
//! [`CandidateRecord`] captures that raw shape as a tagged union and
//! [`CandidateRecord::normalise`] turns it into the single canonical
//! [`Candidate`] consumed by scorers and layout code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Stable identifier of a candidate row.
///
/// Identifiers are never blank. Their `Ord` implementation provides the
/// deterministic tie-break used when ranking equal scores.
///
/// # Examples
/// ```
/// use dealflow_core::CandidateId;
///
/// let id = CandidateId::new("  angel-42 ").expect("non-blank id");
/// assert_eq!(id.as_str(), "angel-42");
/// assert!(CandidateId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandidateId(String);

impl CandidateId {
    /// Validate and wrap a raw identifier, trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, CandidateError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CandidateError::BlankIdentifier);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CandidateId {
    type Error = CandidateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CandidateId> for String {
    fn from(id: CandidateId) -> Self {
        id.0
    }
}

/// Which investor table a candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// An individual investor.
    Angel,
    /// An institutional investor.
    Fund,
}

impl CandidateKind {
    /// Return the kind as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::CandidateKind;
    ///
    /// assert_eq!(CandidateKind::Angel.as_str(), "angel");
    /// assert_eq!(CandidateKind::Fund.to_string(), "fund");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angel => "angel",
            Self::Fund => "fund",
        }
    }

    /// Name of the table holding rows of this kind.
    pub const fn table(self) -> &'static str {
        match self {
            Self::Angel => "angels",
            Self::Fund => "funds",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "angel" | "angels" => Ok(Self::Angel),
            "fund" | "funds" => Ok(Self::Fund),
            _ => Err(format!("unknown candidate kind '{s}'")),
        }
    }
}

/// Errors raised while validating candidate identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The identifier was empty or whitespace.
    #[error("candidate identifier must not be blank")]
    BlankIdentifier,
    /// A stored row had no usable primary key.
    #[error("{kind} record {name:?} has no stable identifier")]
    MissingIdentifier {
        /// Kind of the offending record.
        kind: CandidateKind,
        /// Display name, when the row carried one.
        name: Option<String>,
    },
}

/// Canonical investor record consumed by scoring and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable identifier.
    pub id: CandidateId,
    /// Angel or fund.
    pub kind: CandidateKind,
    /// Display name of the person or firm.
    pub name: String,
    /// Free-text biography or investment thesis.
    pub bio: String,
    /// Comma-joined category tags.
    pub categories: String,
    /// Comma-joined funding-stage tags.
    pub stages: String,
    /// Free-text location.
    pub location: String,
    /// Typical cheque size, as written upstream.
    pub check_size: Option<String>,
    /// Notable investments or portfolio companies.
    pub portfolio: Option<String>,
    /// Website or professional-network URL.
    pub website: Option<String>,
    /// Reputation on a 0-100 scale; always finite when present.
    pub reputation: Option<f32>,
}

impl Candidate {
    /// Construct a minimal candidate with empty descriptive fields.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::{Candidate, CandidateId, CandidateKind};
    ///
    /// let id = CandidateId::new("a1").expect("id");
    /// let candidate = Candidate::new(id, CandidateKind::Angel, "Ada");
    /// assert!(candidate.categories.is_empty());
    /// assert!(candidate.reputation.is_none());
    /// ```
    pub fn new(id: CandidateId, kind: CandidateKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            bio: String::new(),
            categories: String::new(),
            stages: String::new(),
            location: String::new(),
            check_size: None,
            portfolio: None,
            website: None,
            reputation: None,
        }
    }
}

/// Raw angel row as stored upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AngelRecord {
    /// Primary key; a string or an integer.
    #[serde(default)]
    pub id: Option<Value>,
    /// Investor name.
    #[serde(default, alias = "full_name", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    /// Biography or headline.
    #[serde(
        default,
        alias = "about",
        alias = "headline",
        deserialize_with = "lenient_text"
    )]
    pub bio: Option<String>,
    /// Category tags.
    #[serde(
        default,
        alias = "investment_categories",
        alias = "sectors",
        deserialize_with = "lenient_text"
    )]
    pub categories: Option<String>,
    /// Stage tags.
    #[serde(
        default,
        alias = "investment_stages",
        deserialize_with = "lenient_text"
    )]
    pub stages: Option<String>,
    /// Location.
    #[serde(default, alias = "city", deserialize_with = "lenient_text")]
    pub location: Option<String>,
    /// Typical cheque size.
    #[serde(
        default,
        alias = "check_size_range",
        alias = "ticket_size",
        deserialize_with = "lenient_text"
    )]
    pub check_size: Option<String>,
    /// Notable investments.
    #[serde(
        default,
        alias = "notable_investments",
        deserialize_with = "lenient_text"
    )]
    pub portfolio: Option<String>,
    /// Professional-network profile.
    #[serde(
        default,
        alias = "linkedin",
        alias = "linkedin_url",
        deserialize_with = "lenient_text"
    )]
    pub profile_url: Option<String>,
    /// Stored reputation score, in whatever shape upstream wrote it.
    #[serde(default, alias = "score", alias = "reputation_score")]
    pub reputation: Option<Value>,
}

/// Raw fund row as stored upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FundRecord {
    /// Primary key; a string or an integer.
    #[serde(default)]
    pub id: Option<Value>,
    /// Fund or firm name.
    #[serde(
        default,
        alias = "fund_name",
        alias = "firm_name",
        deserialize_with = "lenient_text"
    )]
    pub name: Option<String>,
    /// Description or investment thesis.
    #[serde(
        default,
        alias = "thesis",
        alias = "investment_thesis",
        deserialize_with = "lenient_text"
    )]
    pub description: Option<String>,
    /// Focus sectors.
    #[serde(
        default,
        alias = "focus_areas",
        alias = "sectors",
        alias = "industries",
        deserialize_with = "lenient_text"
    )]
    pub categories: Option<String>,
    /// Stage focus.
    #[serde(
        default,
        alias = "investment_stages",
        alias = "stage_focus",
        deserialize_with = "lenient_text"
    )]
    pub stages: Option<String>,
    /// Headquarters.
    #[serde(
        default,
        alias = "hq_location",
        alias = "headquarters",
        deserialize_with = "lenient_text"
    )]
    pub location: Option<String>,
    /// Cheque size range.
    #[serde(
        default,
        alias = "check_size_range",
        deserialize_with = "lenient_text"
    )]
    pub check_size: Option<String>,
    /// Portfolio companies.
    #[serde(
        default,
        alias = "portfolio_companies",
        deserialize_with = "lenient_text"
    )]
    pub portfolio: Option<String>,
    /// Website.
    #[serde(default, alias = "url", deserialize_with = "lenient_text")]
    pub website: Option<String>,
    /// Stored reputation score, if the table has one.
    #[serde(default, alias = "score")]
    pub reputation: Option<Value>,
}

/// Accepted spellings per field, canonical key first.
const ANGEL_FIELD_KEYS: &[&[&str]] = &[
    &["name", "full_name"],
    &["bio", "about", "headline"],
    &["categories", "investment_categories", "sectors"],
    &["stages", "investment_stages"],
    &["location", "city"],
    &["check_size", "check_size_range", "ticket_size"],
    &["portfolio", "notable_investments"],
    &["profile_url", "linkedin", "linkedin_url"],
    &["reputation", "score", "reputation_score"],
];

const FUND_FIELD_KEYS: &[&[&str]] = &[
    &["name", "fund_name", "firm_name"],
    &["description", "thesis", "investment_thesis"],
    &["categories", "focus_areas", "sectors", "industries"],
    &["stages", "investment_stages", "stage_focus"],
    &["location", "hq_location", "headquarters"],
    &["check_size", "check_size_range"],
    &["portfolio", "portfolio_companies"],
    &["website", "url"],
    &["reputation", "score"],
];

/// Collapse every spelling of a field onto its canonical key.
///
/// The first key in [`ANGEL_FIELD_KEYS`] or [`FUND_FIELD_KEYS`] order that
/// holds a non-null value wins; the remaining spellings are dropped. Bags
/// that are not JSON objects are returned untouched.
fn resolve_aliases(kind: CandidateKind, fields: Value) -> Value {
    let Value::Object(mut map) = fields else {
        return fields;
    };
    let table = match kind {
        CandidateKind::Angel => ANGEL_FIELD_KEYS,
        CandidateKind::Fund => FUND_FIELD_KEYS,
    };
    for keys in table {
        let mut chosen = None;
        for key in *keys {
            if let Some(value) = map.remove(*key) {
                if chosen.is_none() && !value.is_null() {
                    chosen = Some(value);
                }
            }
        }
        if let (Some(value), Some(canonical)) = (chosen, keys.first()) {
            map.insert((*canonical).to_owned(), value);
        }
    }
    Value::Object(map)
}

/// A stored candidate row before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateRecord {
    /// Row from the angels table.
    Angel(AngelRecord),
    /// Row from the funds table.
    Fund(FundRecord),
}

impl CandidateRecord {
    /// Decode a JSON field bag into a record of the given kind.
    ///
    /// `id` overrides any identifier embedded in the bag, mirroring tables
    /// whose primary key lives in its own column.
    pub fn from_json(
        kind: CandidateKind,
        id: Option<String>,
        fields: Value,
    ) -> Result<Self, serde_json::Error> {
        let column_id = id.map(Value::String);
        let fields = resolve_aliases(kind, fields);
        match kind {
            CandidateKind::Angel => {
                let mut record: AngelRecord = serde_json::from_value(fields)?;
                if column_id.is_some() {
                    record.id = column_id;
                }
                Ok(Self::Angel(record))
            }
            CandidateKind::Fund => {
                let mut record: FundRecord = serde_json::from_value(fields)?;
                if column_id.is_some() {
                    record.id = column_id;
                }
                Ok(Self::Fund(record))
            }
        }
    }

    /// Return the kind of this record.
    pub const fn kind(&self) -> CandidateKind {
        match self {
            Self::Angel(_) => CandidateKind::Angel,
            Self::Fund(_) => CandidateKind::Fund,
        }
    }

    /// Return the raw identifier, if any.
    pub const fn raw_id(&self) -> Option<&Value> {
        match self {
            Self::Angel(record) => record.id.as_ref(),
            Self::Fund(record) => record.id.as_ref(),
        }
    }

    /// Produce the canonical [`Candidate`] for this row.
    ///
    /// Rows without a usable identifier are rejected; professional-network
    /// URLs are never promoted to identifiers. Non-numeric or non-finite
    /// reputation values become `None`.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::{AngelRecord, CandidateRecord};
    /// use serde_json::json;
    ///
    /// let record = CandidateRecord::Angel(AngelRecord {
    ///     id: Some(json!(7)),
    ///     categories: Some("fintech, payments".into()),
    ///     reputation: Some(json!("sixty")),
    ///     ..AngelRecord::default()
    /// });
    /// let candidate = record.normalise().expect("row has an id");
    /// assert_eq!(candidate.id.as_str(), "7");
    /// assert!(candidate.reputation.is_none());
    /// ```
    pub fn normalise(self) -> Result<Candidate, CandidateError> {
        let kind = self.kind();
        match self {
            Self::Angel(record) => {
                let id = resolve_id(record.id.as_ref(), kind, record.name.as_deref())?;
                Ok(Candidate {
                    id,
                    kind,
                    name: clean(record.name),
                    bio: clean(record.bio),
                    categories: clean(record.categories),
                    stages: clean(record.stages),
                    location: clean(record.location),
                    check_size: non_blank(record.check_size),
                    portfolio: non_blank(record.portfolio),
                    website: non_blank(record.profile_url),
                    reputation: record.reputation.as_ref().and_then(parse_reputation),
                })
            }
            Self::Fund(record) => {
                let id = resolve_id(record.id.as_ref(), kind, record.name.as_deref())?;
                Ok(Candidate {
                    id,
                    kind,
                    name: clean(record.name),
                    bio: clean(record.description),
                    categories: clean(record.categories),
                    stages: clean(record.stages),
                    location: clean(record.location),
                    check_size: non_blank(record.check_size),
                    portfolio: non_blank(record.portfolio),
                    website: non_blank(record.website),
                    reputation: record.reputation.as_ref().and_then(parse_reputation),
                })
            }
        }
    }
}

fn resolve_id(
    raw: Option<&Value>,
    kind: CandidateKind,
    name: Option<&str>,
) -> Result<CandidateId, CandidateError> {
    let text = match raw {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) if id.is_i64() || id.is_u64() => Some(id.to_string()),
        _ => None,
    };
    text.and_then(|id| CandidateId::new(id).ok())
        .ok_or_else(|| CandidateError::MissingIdentifier {
            kind,
            name: name.map(str::to_owned),
        })
}

fn clean(value: Option<String>) -> String {
    value.map(|text| text.trim().to_owned()).unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// Interpret a stored reputation value, guarding against non-numeric input.
fn parse_reputation(value: &Value) -> Option<f32> {
    let parsed = match value {
        Value::Number(number) => number.to_string().parse::<f32>().ok(),
        Value::String(text) => text.trim().parse::<f32>().ok(),
        _ => None,
    };
    parsed.filter(|score| score.is_finite())
}

/// Accept strings, numbers, booleans and arrays of those as free text.
///
/// Arrays are joined with `", "` so tag lists stored as JSON arrays read the
/// same as comma-joined strings.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(text_from_value))
}

fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(text_from_value)
                .filter(|part| !part.trim().is_empty())
                .collect();
            Some(parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("a-1"), "a-1")]
    #[case(json!(42), "42")]
    #[case(json!("  padded  "), "padded")]
    fn identifiers_accept_strings_and_integers(#[case] raw: Value, #[case] expected: &str) {
        let record = CandidateRecord::Angel(AngelRecord {
            id: Some(raw),
            ..AngelRecord::default()
        });
        let candidate = record.normalise().expect("identifier should resolve");
        assert_eq!(candidate.id.as_str(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(json!(null)))]
    #[case(Some(json!("")))]
    #[case(Some(json!(1.5)))]
    #[case(Some(json!({"nested": true})))]
    fn rows_without_identifier_are_rejected(#[case] raw: Option<Value>) {
        let record = CandidateRecord::Fund(FundRecord {
            id: raw,
            name: Some("Acme Ventures".into()),
            website: Some("https://acme.example".into()),
            ..FundRecord::default()
        });
        let err = record.normalise().expect_err("missing id should fail");
        assert_eq!(
            err,
            CandidateError::MissingIdentifier {
                kind: CandidateKind::Fund,
                name: Some("Acme Ventures".into()),
            }
        );
    }

    #[rstest]
    #[case(json!(60), Some(60.0))]
    #[case(json!("75.5"), Some(75.5))]
    #[case(json!("n/a"), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    fn reputation_is_parsed_leniently(#[case] raw: Value, #[case] expected: Option<f32>) {
        assert_eq!(parse_reputation(&raw), expected);
    }

    #[test]
    fn angel_aliases_and_arrays_are_normalised() {
        let fields = json!({
            "full_name": "Ada Lovelace",
            "investment_categories": ["fintech", "payments"],
            "investment_stages": "pre-seed, seed",
            "city": "London, UK",
            "linkedin_url": "https://linkedin.example/ada",
            "score": 60
        });
        let record = CandidateRecord::from_json(CandidateKind::Angel, Some("a1".into()), fields)
            .expect("fields decode");
        let candidate = record.normalise().expect("normalise");
        assert_eq!(candidate.name, "Ada Lovelace");
        assert_eq!(candidate.categories, "fintech, payments");
        assert_eq!(candidate.stages, "pre-seed, seed");
        assert_eq!(candidate.location, "London, UK");
        assert_eq!(
            candidate.website.as_deref(),
            Some("https://linkedin.example/ada")
        );
        assert_eq!(candidate.reputation, Some(60.0));
    }

    #[test]
    fn canonical_keys_win_over_aliases_in_the_same_row() {
        let fields = json!({
            "id": "a1",
            "name": "Ada",
            "full_name": "Ada Lovelace",
            "categories": "fintech",
            "score": 10,
            "reputation_score": 20,
            "linkedin": "https://linkedin.example/ada",
            "linkedin_url": "https://linkedin.example/other"
        });
        let record = CandidateRecord::from_json(CandidateKind::Angel, None, fields)
            .expect("conflicting spellings decode");
        let candidate = record.normalise().expect("normalise");
        assert_eq!(candidate.name, "Ada");
        assert_eq!(candidate.reputation, Some(10.0));
        assert_eq!(
            candidate.website.as_deref(),
            Some("https://linkedin.example/ada")
        );
    }

    #[test]
    fn null_canonical_key_falls_back_to_alias() {
        let fields = json!({"name": null, "full_name": "Grace Hopper"});
        let record = CandidateRecord::from_json(CandidateKind::Angel, Some("a2".into()), fields)
            .expect("fields decode");
        assert_eq!(record.normalise().expect("normalise").name, "Grace Hopper");
    }

    #[test]
    fn fund_rows_with_mixed_spellings_decode() {
        let fields = json!({
            "id": "f1",
            "fund_name": "Northwind",
            "firm_name": "Northwind Partners",
            "focus_areas": "saas",
            "sectors": "fintech"
        });
        let record = CandidateRecord::from_json(CandidateKind::Fund, None, fields)
            .expect("conflicting spellings decode");
        let candidate = record.normalise().expect("normalise");
        assert_eq!(candidate.name, "Northwind");
        assert_eq!(candidate.categories, "saas");
    }

    #[test]
    fn fund_aliases_are_normalised() {
        let fields = json!({
            "id": 9,
            "fund_name": "Northwind Capital",
            "investment_thesis": "Backing B2B software",
            "focus_areas": "saas, devtools",
            "stage_focus": ["series a"],
            "hq_location": "Berlin",
            "check_size_range": "$1M-$5M"
        });
        let record =
            CandidateRecord::from_json(CandidateKind::Fund, None, fields).expect("fields decode");
        let candidate = record.normalise().expect("normalise");
        assert_eq!(candidate.id.as_str(), "9");
        assert_eq!(candidate.kind, CandidateKind::Fund);
        assert_eq!(candidate.bio, "Backing B2B software");
        assert_eq!(candidate.categories, "saas, devtools");
        assert_eq!(candidate.stages, "series a");
        assert_eq!(candidate.check_size.as_deref(), Some("$1M-$5M"));
    }

    #[test]
    fn column_identifier_overrides_embedded_one() {
        let fields = json!({"id": "embedded", "name": "Grace"});
        let record = CandidateRecord::from_json(CandidateKind::Angel, Some("column".into()), fields)
            .expect("fields decode");
        assert_eq!(record.raw_id(), Some(&json!("column")));
    }

    #[rstest]
    #[case("angels", CandidateKind::Angel)]
    #[case("Fund", CandidateKind::Fund)]
    fn kind_parses_case_insensitively(#[case] raw: &str, #[case] expected: CandidateKind) {
        assert_eq!(CandidateKind::from_str(raw), Ok(expected));
    }

    #[test]
    fn kind_rejects_unknown() {
        let err = CandidateKind::from_str("syndicate").expect_err("unknown kind");
        assert!(err.contains("unknown candidate kind"));
    }
}
