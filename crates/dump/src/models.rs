use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Language code for tracks that don't declare one.
pub const UNDETERMINED_LANGUAGE: &str = "und";
/// Codec name for tracks that don't declare one.
pub const UNKNOWN_CODEC: &str = "unknown";

/// A track number or attachment id as found in the attachments dump.
///
/// These are integers in practice, but the dump doesn't promise it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Integer(i64),
    /// Only for values above `i64::MAX`.
    Unsigned(u64),
    Text(String),
}
impl Identifier {
    /// Anything other than an integer or a string counts as absent.
    fn from_json(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Number(n) => n
                .as_i64()
                .map(Identifier::Integer)
                .or_else(|| n.as_u64().map(Identifier::Unsigned)),
            Value::String(s) => Some(Identifier::Text(s.clone())),
            _ => None,
        }
    }
}
impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Integer(value)
    }
}
impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

/// One subtitle stream embedded in a media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub lang: String,
    pub codec: String,
    pub tracknum: Option<Identifier>,
    /// Attachment id, used to build the download link for the raw stream.
    pub afid: Option<Identifier>,
}
impl SubtitleTrack {
    /// Build a track from one entry of an attachment record's subtitle array.
    ///
    /// A `lang` or `codec` that is missing, `null` or not a string falls back
    /// to [`UNDETERMINED_LANGUAGE`] / [`UNKNOWN_CODEC`].
    pub fn from_entry(entry: &Map<String, Value>) -> Self {
        let text = |key: &str, default: &str| {
            entry.get(key).and_then(Value::as_str).unwrap_or(default).to_string()
        };
        Self {
            lang: text("lang", UNDETERMINED_LANGUAGE),
            codec: text("codec", UNKNOWN_CODEC),
            tracknum: Identifier::from_json(entry.get("tracknum")),
            afid: Identifier::from_json(entry.get("_afid")),
        }
    }
}
