//! Multi-valued form representation shared by submitted forms and outbound payloads.
//!
//! Entries keep insertion order and keys may repeat. `get` returns the first
//! value under a key and `get_all` every value, mirroring browser `FormData`.

use serde::{Serialize, Serializer};

/// Opaque uploaded file. The framework never inspects the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "size", serialize_with = "serialize_len")]
    pub bytes: Vec<u8>,
}

fn serialize_len<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(bytes.len() as u64)
}

impl FileEntry {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    #[inline]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A single form entry value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    File(FileEntry),
}

impl FormValue {
    /// Text content, or `None` for file entries.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }

    /// Empty text counts as "not filled in"; a file entry is always present.
    #[inline]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<FileEntry> for FormValue {
    fn from(value: FileEntry) -> Self {
        Self::File(value)
    }
}

/// Ordered multi-map of form entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from text pairs, preserving order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<FormValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            form.append(key, value);
        }
        form
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(input: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(input.as_bytes()).map(|(k, v)| (k.into_owned(), v.into_owned())))
    }

    #[inline]
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries.iter().filter(move |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text values under `key`; file entries are skipped.
    pub fn get_all_text<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.get_all(key).filter_map(FormValue::as_text)
    }

    /// Remove every entry stored under `key`.
    pub fn delete(&mut self, key: &str) {
        self.entries.retain(|(k, _)| k != key);
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose key starts with `prefix`, re-keyed with the prefix stripped.
    pub fn narrow(&self, prefix: &str) -> FormData {
        let entries = self
            .entries
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        FormData { entries }
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_first_and_get_all_returns_every_value() {
        let form = FormData::from_pairs([("tags[]", "a"), ("title", "hi"), ("tags[]", "b")]);
        assert_eq!(form.get("tags[]"), Some(&FormValue::from("a")));
        let tags: Vec<&str> = form.get_all_text("tags[]").collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert!(form.get("missing").is_none());
    }

    #[test]
    fn delete_removes_every_entry_for_key() {
        let mut form = FormData::from_pairs([("k", "1"), ("other", "x"), ("k", "2")]);
        form.delete("k");
        assert_eq!(form.len(), 1);
        assert!(!form.contains("k"));
    }

    #[test]
    fn narrow_strips_prefix_and_drops_other_keys() {
        let form = FormData::from_pairs([
            ("category", "tree"),
            ("tree.height", "12"),
            ("shrub.height", "1"),
            ("tree.soil-type", "clay"),
        ]);
        let narrowed = form.narrow("tree.");
        let keys: Vec<&str> = narrowed.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["height", "soil-type"]);
    }

    #[test]
    fn urlencoded_input_is_decoded_in_order() {
        let form = FormData::from_urlencoded("latin-name=Quercus+robur&soil-type%5B%5D=clay&soil-type%5B%5D=sand");
        assert_eq!(form.get("latin-name"), Some(&FormValue::from("Quercus robur")));
        assert_eq!(form.get_all_text("soil-type[]").collect::<Vec<_>>(), vec!["clay", "sand"]);
    }

    #[test]
    fn blank_text_is_not_a_value_but_files_are() {
        assert!(FormValue::from("").is_blank());
        assert!(!FormValue::from("x").is_blank());
        assert!(!FormValue::File(FileEntry::new("a.png", Vec::new())).is_blank());
    }
}
