//! Album payloads.
//!
//! Albums are not parsed through a field registry: name and description are
//! always sent, even when empty, and the plant selection comes from the
//! autocomplete widget rather than a form input.

use serde::Serialize;

use crate::form::FormData;

const PLANT_IDS_KEY: &str = "plant_ids";

/// Album as submitted on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumDraft {
    pub name: String,
    pub description: String,
    pub plant_ids: Vec<String>,
}

impl AlbumDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            plant_ids: Vec::new(),
        }
    }

    #[inline]
    pub fn with_plants<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.plant_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Multipart body for album creation. An empty selection is sent as a
    /// single blank `plant_ids` entry so the key is always present.
    pub fn to_form_data(&self) -> FormData {
        let mut payload = FormData::new();
        payload.append("name", self.name.as_str());
        payload.append("description", self.description.as_str());
        for id in &self.plant_ids {
            payload.append(PLANT_IDS_KEY, id.as_str());
        }
        if self.plant_ids.is_empty() {
            payload.append(PLANT_IDS_KEY, "");
        }
        payload
    }
}

/// Edited album state compared against what the page was loaded with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlbumEdit {
    pub name: String,
    pub description: String,
    pub initial_plant_ids: Vec<String>,
    pub selected_plant_ids: Vec<String>,
}

impl AlbumEdit {
    pub fn selection_diff(&self) -> SelectionDiff {
        SelectionDiff::between(&self.initial_plant_ids, &self.selected_plant_ids)
    }
}

/// Plants to add and remove to turn one selection into another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionDiff {
    /// Newly selected, in selection order.
    pub added: Vec<String>,
    /// No longer selected, in initial order.
    pub removed: Vec<String>,
}

impl SelectionDiff {
    pub fn between(initial: &[String], selected: &[String]) -> Self {
        Self {
            added: selected.iter().filter(|id| !initial.contains(*id)).cloned().collect(),
            removed: initial.iter().filter(|id| !selected.contains(*id)).cloned().collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Split a comma-separated id list, trimming whitespace and dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormValue;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_sends_blank_plant_ids() {
        let payload = AlbumDraft::new("Shade", "").to_form_data();
        let keys: Vec<&str> = payload.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "description", "plant_ids"]);
        assert_eq!(payload.get("plant_ids"), Some(&FormValue::from("")));
    }

    #[test]
    fn selected_plants_repeat_the_key() {
        let payload = AlbumDraft::new("Shade", "Ferns").with_plants(["a", "b"]).to_form_data();
        assert_eq!(payload.get_all_text("plant_ids").collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn diff_reports_additions_and_removals() {
        let diff = SelectionDiff::between(&ids(&["a", "b", "c"]), &ids(&["c", "d", "a"]));
        assert_eq!(diff.added, ids(&["d"]));
        assert_eq!(diff.removed, ids(&["b"]));
        assert!(SelectionDiff::between(&ids(&["a"]), &ids(&["a"])).is_empty());
    }

    #[test]
    fn id_list_trims_and_drops_blanks() {
        assert_eq!(parse_id_list(" a, b ,,c "), ids(&["a", "b", "c"]));
        assert!(parse_id_list("").is_empty());
    }
}
