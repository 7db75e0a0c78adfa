//! Bank document types.
//!
//! These types mirror the JSON consumed by the quiz application: a
//! single-subject bank holding items and reading passages. Item payloads are
//! an internally tagged enum keyed by the `type` field.
//!
//! Hand-edited banks carry fields and item types the generators never
//! produce. Those are kept in `extra` maps and in [`ItemKind::Other`] so that
//! rewriting a bank never drops content.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Version written into newly created bank documents.
pub const DEFAULT_BANK_VERSION: &str = "1.0";

/// Answer index given to records whose `correct` is missing or unusable.
///
/// It never indexes an option, so backfilling resets and counts it.
pub const UNSET_ANSWER: usize = usize::MAX;

fn default_version() -> String {
    DEFAULT_BANK_VERSION.to_owned()
}

const fn unset_answer() -> usize {
    UNSET_ANSWER
}

/// Reads `correct` leniently: non-negative integers and digit strings are
/// accepted, anything else becomes [`UNSET_ANSWER`].
fn answer_index<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::Number(number) => number.as_u64().and_then(|index| usize::try_from(index).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(UNSET_ANSWER))
}

/// Subjects the generators know how to produce content for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    /// Swedish language arts.
    Svenska,
    /// Mathematics.
    Matematik,
}

impl Subject {
    /// Returns the lowercase subject name used in bank documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svenska => "svenska",
            Self::Matematik => "matematik",
        }
    }

    /// Returns the ID prefix for standalone items.
    #[must_use]
    pub const fn item_prefix(self) -> &'static str {
        match self {
            Self::Svenska => "sv-",
            Self::Matematik => "ma-",
        }
    }

    /// Returns the ID prefix for reading passages.
    #[must_use]
    pub const fn passage_prefix(self) -> &'static str {
        match self {
            Self::Svenska => "sv-p-",
            Self::Matematik => "ma-p-",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "svenska" => Ok(Self::Svenska),
            "matematik" => Ok(Self::Matematik),
            other => Err(format!("unknown subject '{other}'")),
        }
    }
}

/// A single-subject question bank.
///
/// # Example
///
/// ```
/// use question_bank::Bank;
///
/// let bank = Bank::empty("svenska");
/// let json = serde_json::to_string(&bank).expect("serialise");
/// assert!(json.contains("\"subject\":\"svenska\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Document format version.
    #[serde(default = "default_version", alias = "bankVersion")]
    pub version: String,
    /// Subject name, for example `svenska`.
    pub subject: String,
    /// School grade the bank targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    /// Display name used by the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Short free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Standalone items.
    #[serde(default)]
    pub items: Vec<Item>,
    /// Reading passages with attached questions.
    #[serde(default)]
    pub passages: Vec<Passage>,
    /// Top-level fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bank {
    /// Creates an empty bank for the given subject.
    #[must_use]
    pub fn empty(subject: &str) -> Self {
        Self {
            version: default_version(),
            subject: subject.to_owned(),
            grade: None,
            label: None,
            description: None,
            items: Vec::new(),
            passages: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Iterates over every ID in the bank: items, passages and passage
    /// questions, in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        let items = self.items.iter().map(|item| item.id.as_str());
        let passages = self.passages.iter().flat_map(|passage| {
            std::iter::once(passage.id.as_str())
                .chain(passage.questions.iter().map(|q| q.id.as_str()))
        });
        items.chain(passages)
    }
}

/// One question record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    /// Bank-unique identifier such as `sv-007`.
    #[serde(default)]
    pub id: String,
    /// Topic tag such as `stavning` or `addition`.
    #[serde(default)]
    pub area: String,
    /// Prompt text.
    #[serde(default)]
    pub q: String,
    /// Type-specific payload, tagged by `type`.
    #[serde(flatten)]
    pub kind: ItemKind,
    /// Non-revealing hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Explanation shown after answering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    /// Subject the item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Difficulty level label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Fields this crate does not model, such as `image`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire shape of an item before its payload keys are separated from the
/// unmodelled ones.
#[derive(Deserialize)]
struct RawItem {
    #[serde(default)]
    id: String,
    #[serde(default)]
    area: String,
    #[serde(default)]
    q: String,
    #[serde(flatten)]
    kind: ItemKind,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    explain: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let kind = match raw.kind {
            ItemKind::Other(payload) if is_untyped(&payload) => {
                ItemKind::untyped_choice(payload)
            }
            parsed => parsed,
        };
        let mut extra = raw.extra;
        match &kind {
            ItemKind::Other(payload) => extra.retain(|key, _| !payload.contains_key(key)),
            known => {
                let fields = known.field_names();
                extra.retain(|key, _| key != "type" && !fields.contains(&key.as_str()));
            }
        }
        Self {
            id: raw.id,
            area: raw.area,
            q: raw.q,
            kind,
            hint: raw.hint,
            explain: raw.explain,
            topic: raw.topic,
            difficulty: raw.difficulty,
            extra,
        }
    }
}

fn is_untyped(payload: &Map<String, Value>) -> bool {
    match payload.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(kind)) => kind.trim().is_empty(),
        Some(_) => false,
    }
}

impl Item {
    /// Creates an item with an empty ID and no hint or explanation.
    #[must_use]
    pub fn new(area: &str, q: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: String::new(),
            area: area.to_owned(),
            q: q.into(),
            kind,
            hint: None,
            explain: None,
            topic: None,
            difficulty: None,
            extra: Map::new(),
        }
    }

    /// Sets hint and explanation.
    #[must_use]
    pub fn with_help(mut self, hint: impl Into<String>, explain: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self.explain = Some(explain.into());
        self
    }

    /// Sets the topic and difficulty labels.
    #[must_use]
    pub fn with_labels(mut self, topic: &str, difficulty: &str) -> Self {
        self.topic = Some(topic.to_owned());
        self.difficulty = Some(difficulty.to_owned());
        self
    }

    /// Returns the wire name of the item type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Returns the options and correct index for choice-based items.
    #[must_use]
    pub fn choice(&self) -> Option<(&[String], usize)> {
        match &self.kind {
            ItemKind::Mc { options, correct }
            | ItemKind::BarMax {
                options, correct, ..
            }
            | ItemKind::BarCompare {
                options, correct, ..
            } => Some((options, *correct)),
            _ => None,
        }
    }
}

/// Type-specific item payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ItemKind {
    /// Multiple choice.
    Mc {
        /// Answer alternatives.
        options: Vec<String>,
        /// Index of the correct alternative.
        #[serde(default = "unset_answer", deserialize_with = "answer_index")]
        correct: usize,
    },
    /// Drag tiles into labelled buckets.
    Dnd {
        /// Target buckets.
        #[serde(default)]
        buckets: Vec<Bucket>,
        /// Draggable words.
        #[serde(default, alias = "tokens")]
        tiles: Vec<String>,
        /// Expected bucket label per tile.
        #[serde(default)]
        solution: BTreeMap<String, String>,
    },
    /// Pick the label of the highest bar.
    BarMax {
        /// Chart dataset.
        chart: Chart,
        /// Alternatives, equal to the chart labels.
        options: Vec<String>,
        /// Index of the first highest bar.
        #[serde(default = "unset_answer", deserialize_with = "answer_index")]
        correct: usize,
    },
    /// Pick the difference between two bars.
    BarCompare {
        /// Chart dataset.
        chart: Chart,
        /// Numeric alternatives as strings.
        options: Vec<String>,
        /// Index of the correct difference.
        #[serde(default = "unset_answer", deserialize_with = "answer_index")]
        correct: usize,
    },
    /// Fill the empty cells of a table.
    TableFill {
        /// Table with blanked cells.
        table: Table,
        /// Expected values keyed by `row|column`.
        #[serde(default)]
        answers: BTreeMap<String, String>,
    },
    /// Match pie chart segments with labels.
    PieAssign {
        /// Pie segments.
        segments: Vec<PieSegment>,
        /// Labels to assign.
        labels: Vec<String>,
        /// Expected label per segment ID.
        #[serde(default)]
        solution: BTreeMap<String, String>,
    },
    /// True/false statements about chances.
    ChanceMatrix {
        /// Number of objects per colour.
        context: BTreeMap<String, u32>,
        /// Statements to judge.
        statements: Vec<ChanceStatement>,
    },
    /// A type this crate does not model, or a record whose payload does not
    /// fit its declared type. The payload, `type` included, is kept verbatim.
    #[serde(untagged)]
    Other(Map<String, Value>),
}

impl ItemKind {
    /// Returns the wire name of the variant, or the declared `type` of an
    /// unmodelled payload (`?` when it has none).
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Mc { .. } => "mc",
            Self::Dnd { .. } => "dnd",
            Self::BarMax { .. } => "bar-max",
            Self::BarCompare { .. } => "bar-compare",
            Self::TableFill { .. } => "table-fill",
            Self::PieAssign { .. } => "pie-assign",
            Self::ChanceMatrix { .. } => "chance-matrix",
            Self::Other(payload) => payload.get("type").and_then(Value::as_str).unwrap_or("?"),
        }
    }

    /// Keys a modelled variant reads from an item record, aliases included.
    const fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Mc { .. } => &["options", "correct"],
            Self::Dnd { .. } => &["buckets", "tiles", "tokens", "solution"],
            Self::BarMax { .. } | Self::BarCompare { .. } => &["chart", "options", "correct"],
            Self::TableFill { .. } => &["table", "answers"],
            Self::PieAssign { .. } => &["segments", "labels", "solution"],
            Self::ChanceMatrix { .. } => &["context", "statements"],
            Self::Other(_) => &[],
        }
    }

    /// Parses a payload that declares no `type` as multiple choice.
    fn untyped_choice(mut payload: Map<String, Value>) -> Self {
        payload.insert("type".to_owned(), Value::String("mc".to_owned()));
        serde_json::from_value(Value::Object(payload.clone()))
            .unwrap_or_else(|_| Self::Other(payload))
    }
}

/// A drag-and-drop bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket caption.
    pub label: String,
}

impl Bucket {
    /// Creates a bucket with the given caption.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
        }
    }
}

/// Bar chart dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    /// Bar captions.
    pub labels: Vec<String>,
    /// Bar heights.
    pub values: Vec<u32>,
    /// Unit shown on the value axis.
    #[serde(default)]
    pub unit: String,
    /// Chart heading.
    #[serde(default)]
    pub title: String,
}

/// Table for fill-in tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column headings.
    pub headers: Vec<String>,
    /// Rows; blank cells are empty strings.
    pub rows: Vec<TableRow>,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row heading.
    pub key: String,
    /// Cell values.
    pub cells: Vec<String>,
}

/// Pie chart segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSegment {
    /// Segment identifier such as `s1`.
    pub id: String,
    /// Share of the whole in percent.
    pub percent: u32,
}

/// A statement to mark as true or false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanceStatement {
    /// Statement text.
    pub text: String,
    /// Whether the statement is true.
    pub answer: bool,
}

/// A reading passage with comprehension questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Bank-unique identifier such as `sv-p-003`.
    #[serde(default)]
    pub id: String,
    /// Passage heading.
    #[serde(default)]
    pub title: String,
    /// Passage body.
    #[serde(default)]
    pub text: String,
    /// Attached questions.
    #[serde(default)]
    pub questions: Vec<PassageQuestion>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A comprehension question attached to a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageQuestion {
    /// Identifier of the form `<passage id>-q<n>`.
    #[serde(default)]
    pub id: String,
    /// Prompt text.
    #[serde(default)]
    pub q: String,
    /// Answer alternatives.
    #[serde(default)]
    pub options: Vec<String>,
    /// Index of the correct alternative.
    #[serde(default = "unset_answer", deserialize_with = "answer_index")]
    pub correct: usize,
    /// Non-revealing hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Explanation shown after answering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<String>,
    /// Subject the question belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Difficulty level label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
