//! Field prioritisation for candidate cards.
//!
//! Given a candidate and an optional query, every displayable field receives
//! a priority score. Placeholder values are hidden, the remaining fields are
//! deduplicated by kind and ordered by score, and the number of high-priority
//! fields selects a [`CardTier`]. Everything here is pure and deterministic.

use serde::{Deserialize, Serialize};

use crate::Candidate;

/// Fields scoring at or above this value count towards the card tier.
pub const PRIORITY_THRESHOLD: i32 = 50;

/// Score assigned to hidden fields.
pub const HIDDEN_SCORE: i32 = -1;

const QUERY_HIT_BONUS: i32 = 40;
const RICHNESS_BONUS: i32 = 10;
const CURRENCY_BONUS: i32 = 5;
const LONG_TEXT_PENALTY: i32 = 15;
const LONG_TEXT_CHARS: usize = 200;
const MIN_QUERY_WORD_CHARS: usize = 3;

const RICHNESS_KEYWORDS: [&str; 11] = [
    "led",
    "raised",
    "exit",
    "ipo",
    "acquired",
    "unicorn",
    "portfolio",
    "founded",
    "billion",
    "million",
    "series",
];

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

const PLACEHOLDERS: [&str; 8] = [
    "n/a",
    "na",
    "not specified",
    "unknown",
    "none",
    "null",
    "-",
    "tbd",
];

/// Kinds of displayable candidate fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Display name.
    Name,
    /// Typical cheque size.
    CheckSize,
    /// Category tags.
    Categories,
    /// Biography or thesis.
    Bio,
    /// Stage tags.
    Stages,
    /// Portfolio or notable investments.
    Portfolio,
    /// Location.
    Location,
    /// Reputation score.
    Reputation,
    /// Website or profile link.
    Website,
}

impl FieldKind {
    /// Priority before any content-based adjustment.
    ///
    /// # Examples
    /// ```
    /// use dealflow_core::layout::FieldKind;
    ///
    /// assert!(FieldKind::CheckSize.base_score() > FieldKind::Website.base_score());
    /// ```
    pub const fn base_score(self) -> i32 {
        match self {
            Self::Name => 100,
            Self::CheckSize => 60,
            Self::Categories => 55,
            Self::Bio => 50,
            Self::Stages => 45,
            Self::Portfolio => 40,
            Self::Location => 35,
            Self::Reputation => 30,
            Self::Website => 15,
        }
    }
}

/// A displayable field extracted from a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateField {
    /// What the field holds.
    pub kind: FieldKind,
    /// Text to display.
    pub value: String,
}

impl CandidateField {
    /// Construct a field.
    pub fn new(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A field paired with its computed priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritisedField {
    /// What the field holds.
    pub kind: FieldKind,
    /// Text to display.
    pub value: String,
    /// Priority score; [`HIDDEN_SCORE`] for hidden fields.
    pub score: i32,
}

impl PrioritisedField {
    /// Whether the field should be rendered.
    pub const fn is_visible(&self) -> bool {
        self.score > HIDDEN_SCORE
    }
}

/// Card template chosen from the number of high-priority fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTier {
    /// Fewer than three high-priority fields.
    Compact,
    /// Three or four high-priority fields.
    Standard,
    /// Five or more high-priority fields.
    Rich,
}

/// The fields to render for a candidate and the template to render them in.
///
/// # Examples
/// ```
/// use dealflow_core::{Candidate, CandidateId, CandidateKind};
/// use dealflow_core::layout::{CardLayout, CardTier, FieldKind};
///
/// let mut candidate = Candidate::new(CandidateId::new("a1")?, CandidateKind::Angel, "Ada");
/// candidate.location = "N/A".into();
/// candidate.categories = "fintech, payments".into();
///
/// let layout = CardLayout::for_candidate(&candidate, Some("fintech founders"));
/// assert_eq!(layout.tier, CardTier::Compact);
/// assert!(layout.fields.iter().all(|field| field.kind != FieldKind::Location));
/// # Ok::<(), dealflow_core::CandidateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Selected template.
    pub tier: CardTier,
    /// Visible fields in display order.
    pub fields: Vec<PrioritisedField>,
}

impl CardLayout {
    /// Lay out `candidate`, boosting fields that mention `query`.
    pub fn for_candidate(candidate: &Candidate, query: Option<&str>) -> Self {
        let fields = prioritise_fields(&display_fields(candidate), query);
        Self {
            tier: select_tier(&fields),
            fields,
        }
    }
}

/// Extract the displayable fields of a candidate in canonical order.
///
/// Optional fields that are absent are omitted; empty strings are kept so
/// that [`prioritise_fields`] can hide them.
pub fn display_fields(candidate: &Candidate) -> Vec<CandidateField> {
    let mut fields = vec![
        CandidateField::new(FieldKind::Name, candidate.name.as_str()),
        CandidateField::new(FieldKind::Bio, candidate.bio.as_str()),
        CandidateField::new(FieldKind::Categories, candidate.categories.as_str()),
        CandidateField::new(FieldKind::Stages, candidate.stages.as_str()),
        CandidateField::new(FieldKind::Location, candidate.location.as_str()),
    ];
    let optional = [
        (FieldKind::CheckSize, candidate.check_size.as_deref()),
        (FieldKind::Portfolio, candidate.portfolio.as_deref()),
        (FieldKind::Website, candidate.website.as_deref()),
    ];
    fields.extend(
        optional
            .into_iter()
            .filter_map(|(kind, value)| value.map(|text| CandidateField::new(kind, text))),
    );
    if let Some(reputation) = candidate.reputation {
        fields.push(CandidateField::new(
            FieldKind::Reputation,
            format!("{reputation:.0}/100"),
        ));
    }
    fields
}

/// Lowercase query words longer than three characters.
///
/// Surrounding punctuation is stripped so `"London,"` matches `"london"`.
pub fn query_words(query: Option<&str>) -> Vec<String> {
    query
        .unwrap_or_default()
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| word.chars().count() > MIN_QUERY_WORD_CHARS)
        .collect()
}

/// Report whether a value is empty, too short, or a known placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.chars().count() < 2 {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    PLACEHOLDERS.contains(&lowered.as_str())
}

/// Priority of a single field given pre-split query words.
///
/// # Examples
/// ```
/// use dealflow_core::layout::{CandidateField, FieldKind, field_priority, query_words};
///
/// let words = query_words(Some("payments seed"));
/// let field = CandidateField::new(FieldKind::Categories, "Payments, lending");
/// assert_eq!(field_priority(&field, &words), 55 + 40);
///
/// let empty = CandidateField::new(FieldKind::CheckSize, "Not specified");
/// assert_eq!(field_priority(&empty, &words), -1);
/// ```
pub fn field_priority(field: &CandidateField, query_words: &[String]) -> i32 {
    if is_placeholder(&field.value) {
        return HIDDEN_SCORE;
    }
    let text = field.value.to_lowercase();
    let mut score = field.kind.base_score();

    let query_hit = query_words.iter().any(|word| text.contains(word.as_str()));
    if query_hit {
        score += QUERY_HIT_BONUS;
    }
    if RICHNESS_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        score += RICHNESS_BONUS;
    }
    if text.contains(CURRENCY_SYMBOLS) {
        score += CURRENCY_BONUS;
    }
    if !query_hit && field.value.chars().count() > LONG_TEXT_CHARS {
        score -= LONG_TEXT_PENALTY;
    }
    score
}

/// Score, filter, deduplicate and order fields for display.
///
/// Hidden fields are dropped. When several fields share a kind the highest
/// score wins and the earlier field wins ties. The result is sorted by
/// descending score; equal scores keep their input order.
pub fn prioritise_fields(fields: &[CandidateField], query: Option<&str>) -> Vec<PrioritisedField> {
    let words = query_words(query);
    let mut kept: Vec<PrioritisedField> = Vec::with_capacity(fields.len());
    for field in fields {
        let score = field_priority(field, &words);
        if score == HIDDEN_SCORE {
            continue;
        }
        let candidate = PrioritisedField {
            kind: field.kind,
            value: field.value.clone(),
            score,
        };
        match kept.iter_mut().find(|existing| existing.kind == field.kind) {
            Some(existing) if existing.score < score => *existing = candidate,
            Some(_) => {}
            None => kept.push(candidate),
        }
    }
    kept.sort_by(|a, b| b.score.cmp(&a.score));
    kept
}

/// Choose a card tier from prioritised fields.
///
/// The name field is excluded from the count.
pub fn select_tier(fields: &[PrioritisedField]) -> CardTier {
    let strong = fields
        .iter()
        .filter(|field| field.kind != FieldKind::Name && field.score >= PRIORITY_THRESHOLD)
        .count();
    match strong {
        n if n >= 5 => CardTier::Rich,
        n if n >= 3 => CardTier::Standard,
        _ => CardTier::Compact,
    }
}
