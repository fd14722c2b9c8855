// src/models.rs
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_HEX: &str = "#000000";
pub const DEFAULT_COLOR_NAME: &str = "Color";
pub const DEFAULT_WALL_COLOR_NAME: &str = "Suggested Color";

/// The image the user picked or dropped, as declared by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Declared media type starts with `image/`.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Reply of `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_base64: String,
    /// Raw hex codes without the leading `#`.
    #[serde(default)]
    pub dominant_colors: Option<Vec<String>>,
    /// Model output passed through by the backend; decoded without failing.
    #[serde(default, deserialize_with = "lenient_object")]
    pub parsed_data: Option<ParsedData>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Structured form of the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedData {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub dominant_colors: Option<Vec<DominantColor>>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub wall_colors: Option<Vec<WallColor>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub decoration_tips: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub furniture_colors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub accessories_colors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub color_harmony: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    #[serde(default, deserialize_with = "string_or_unset")]
    pub hex: Option<String>,
    #[serde(default, deserialize_with = "string_or_unset")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_percentage")]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallColor {
    #[serde(default, deserialize_with = "string_or_unset")]
    pub hex: Option<String>,
    #[serde(default, deserialize_with = "string_or_unset")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
}

impl WallColor {
    pub fn hex_or_default(&self) -> &str {
        non_empty(&self.hex).unwrap_or(DEFAULT_HEX)
    }

    pub fn name_or_default(&self) -> &str {
        non_empty(&self.name).unwrap_or(DEFAULT_WALL_COLOR_NAME)
    }
}

/// A palette entry after defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveColor {
    pub hex: String,
    pub name: String,
    /// Only set when the source carried a non-zero value.
    pub percentage: Option<f64>,
}

impl AnalysisResponse {
    /// Structured colors win; otherwise the raw hex codes are named by
    /// position. Entries without a hex stay in the list as black.
    pub fn effective_colors(&self) -> Vec<EffectiveColor> {
        if let Some(colors) = self
            .parsed_data
            .as_ref()
            .and_then(|parsed| parsed.dominant_colors.as_ref())
        {
            return colors
                .iter()
                .map(|color| EffectiveColor {
                    hex: non_empty(&color.hex).unwrap_or(DEFAULT_HEX).to_string(),
                    name: non_empty(&color.name)
                        .unwrap_or(DEFAULT_COLOR_NAME)
                        .to_string(),
                    percentage: color.percentage.filter(|p| *p != 0.0),
                })
                .collect();
        }

        self.dominant_colors
            .as_ref()
            .map(|raw| {
                raw.iter()
                    .enumerate()
                    .map(|(i, hex)| EffectiveColor {
                        hex: if hex.is_empty() {
                            DEFAULT_HEX.to_string()
                        } else {
                            format!("#{}", hex)
                        },
                        name: format!("Color {}", i + 1),
                        percentage: None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `30`, `30.5`, `"30"` or `"30%"`.
fn lenient_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

/// Strings pass through, anything else counts as unset.
fn string_or_unset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn value_as_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Free text; non-string values are kept as their JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_as_text))
}

/// Model output sometimes nests objects in text lists; keep them as JSON text.
/// A value that is not a list counts as absent.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(value_as_text).collect()),
        _ => None,
    })
}

/// Lists of objects. Items that are not objects become all-unset entries so
/// the list keeps its length and order.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
                    _ => T::default(),
                })
                .collect(),
        ),
        _ => None,
    })
}

/// An object decoded leniently; any other shape counts as absent.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
