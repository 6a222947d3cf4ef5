//! # Application document — the single persisted dashboard state
//!
//! [`AppData`] is the one document the whole homepage reads and writes:
//! bookmark cards, todos, the notepad text, widget ordering, weather
//! configuration, and per-widget visibility. It serializes as camelCase JSON
//! so documents written by earlier versions of the frontend parse unchanged.
//!
//! ## Merge semantics
//!
//! Every field carries a serde default, so a partial document deserializes
//! merged onto defaults — a missing field never becomes a hole. Wholesale
//! replacement happens only on explicit import, which goes through
//! [`AppData::from_json`] and then overwrites the working copy as a unit.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`AppData`] | The full persisted document. |
//! | [`Card`] | One bookmark card: name, URL, optional icon URL. |
//! | [`Todo`] | One todo item with a creation-millis id, priority, and completion flag. |
//! | [`WeatherConfig`] | Weather provider key and city selection. |
//! | [`WidgetKind`] | The reorderable/hideable widget types. |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A bookmark card shown in the launcher grid. Order is user-significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Card {
    pub fn new(name: &str, url: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            icon: Some(icon.to_string()),
        }
    }
}

/// Todo priority, lowest to highest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A todo item. `id` is derived from the creation timestamp in milliseconds
/// and must be unique within the collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// Weather panel configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_city_code")]
    pub city_code: String,
    #[serde(default = "default_city_name")]
    pub city_name: String,
}

fn default_city_code() -> String {
    "445281".to_string()
}

fn default_city_name() -> String {
    "普宁市".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            city_code: default_city_code(),
            city_name: default_city_name(),
        }
    }
}

impl WeatherConfig {
    /// Field-wise merge: empty strings in `other` keep the current value.
    pub fn merged_with(&self, other: &WeatherConfig) -> WeatherConfig {
        let pick = |new: &String, old: &String| {
            if new.is_empty() {
                old.clone()
            } else {
                new.clone()
            }
        };
        WeatherConfig {
            api_key: pick(&other.api_key, &self.api_key),
            city_code: pick(&other.city_code, &self.city_code),
            city_name: pick(&other.city_name, &self.city_name),
        }
    }
}

/// The widget types the dashboard can reorder and hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Weather,
    Todo,
    Notepad,
}

impl WidgetKind {
    /// Every widget kind in canonical display order.
    pub const ALL: [WidgetKind; 3] = [WidgetKind::Weather, WidgetKind::Todo, WidgetKind::Notepad];
}

/// The full persisted document. One instance per browser profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default = "default_cards")]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub notepad: String,
    #[serde(default = "default_widget_order")]
    pub widget_order: Vec<WidgetKind>,
    #[serde(default)]
    pub weather_config: WeatherConfig,
    #[serde(default = "default_widget_visibility")]
    pub widget_visibility: BTreeMap<WidgetKind, bool>,
}

fn default_cards() -> Vec<Card> {
    vec![
        Card::new(
            "GitHub",
            "https://github.com",
            "https://github.githubassets.com/favicons/favicon.svg",
        ),
        Card::new(
            "百度",
            "https://www.baidu.com",
            "https://www.baidu.com/favicon.ico",
        ),
        Card::new(
            "知乎",
            "https://www.zhihu.com",
            "https://static.zhihu.com/heifetz/favicon.ico",
        ),
        Card::new("微博", "https://weibo.com", "https://weibo.com/favicon.ico"),
    ]
}

fn default_widget_order() -> Vec<WidgetKind> {
    WidgetKind::ALL.to_vec()
}

fn default_widget_visibility() -> BTreeMap<WidgetKind, bool> {
    WidgetKind::ALL.iter().map(|&k| (k, true)).collect()
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            cards: default_cards(),
            todos: Vec::new(),
            notepad: String::new(),
            widget_order: default_widget_order(),
            weather_config: WeatherConfig::default(),
            widget_visibility: default_widget_visibility(),
        }
    }
}

impl AppData {
    /// Parse a document. Missing fields fall back to defaults, so a partial
    /// document merges rather than punching holes.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Compact serialization for cache and remote writes.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Pretty serialization for export downloads.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// True when every todo id appears exactly once.
    pub fn todo_ids_unique(&self) -> bool {
        let mut seen = std::collections::BTreeSet::new();
        self.todos.iter().all(|t| seen.insert(t.id))
    }

    /// True when no widget kind appears twice in the order.
    pub fn widget_order_distinct(&self) -> bool {
        let mut seen = std::collections::BTreeSet::new();
        self.widget_order.iter().all(|k| seen.insert(*k))
    }
}
