//! Visible column list and the reorder controller
//!
//! Both drag surfaces (the configuration panel list and the table header
//! row) report a [`DragEnd`]; both are applied through [`reorder`], so a
//! move made on one surface shows up on the other.

use serde::{Deserialize, Serialize};

use crate::columns::{self, ColumnDefinition};

/// Ordered ids of the columns shown in the table pane.
///
/// Always contains the mandatory columns (`numero`, `nome`), never contains
/// an id unknown to the catalog and never contains duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleColumns(Vec<String>);

impl VisibleColumns {
    /// The list never gets shorter than this
    pub const MIN_LEN: usize = 2;

    /// The documented default set
    pub fn default_set() -> Self {
        Self(columns::DEFAULT_VISIBLE.iter().map(|s| s.to_string()).collect())
    }

    /// Build from arbitrary ids: unknown ids and duplicates are dropped and
    /// missing mandatory columns are put back at the front.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if columns::is_known(id) && !list.iter().any(|existing| existing == id) {
                list.push(id.to_string());
            }
        }

        let missing: Vec<String> = columns::MANDATORY
            .iter()
            .filter(|m| !list.iter().any(|id| id == *m))
            .map(|m| m.to_string())
            .collect();
        if !missing.is_empty() {
            list.splice(0..0, missing);
        }

        Self(list)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|c| c == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|c| c == id)
    }

    /// Catalog definitions in display order
    pub fn definitions(&self) -> Vec<&'static ColumnDefinition> {
        columns::resolve(self.iter())
    }

    /// Sum of visible column widths, in pixels
    pub fn total_width(&self) -> u32 {
        columns::total_width(self.iter())
    }

    /// See [`toggle`]
    pub fn toggle(&self, id: &str) -> Self {
        toggle(self, id)
    }

    /// See [`reorder`]
    pub fn reorder(&self, from: usize, to: usize) -> Self {
        Self(reorder(&self.0, from, to))
    }

    /// Apply the end of a drag from either surface
    pub fn apply_drag(&self, drag: &DragEnd) -> Self {
        match drag.destination {
            Some(to) => self.reorder(drag.source, to),
            None => self.clone(),
        }
    }
}

impl Default for VisibleColumns {
    fn default() -> Self {
        Self::default_set()
    }
}

/// Show or hide a column.
///
/// Hiding is a no-op for mandatory columns and whenever the list would drop
/// below [`VisibleColumns::MIN_LEN`]. Showing appends at the end. Ids unknown
/// to the catalog are ignored.
pub fn toggle(list: &VisibleColumns, id: &str) -> VisibleColumns {
    if let Some(index) = list.position(id) {
        if columns::is_mandatory(id) || list.len() <= VisibleColumns::MIN_LEN {
            return list.clone();
        }
        let mut ids = list.0.clone();
        ids.remove(index);
        VisibleColumns(ids)
    } else if columns::is_known(id) {
        let mut ids = list.0.clone();
        ids.push(id.to_string());
        VisibleColumns(ids)
    } else {
        list.clone()
    }
}

/// Move the element at `from` so that it ends up at index `to`.
///
/// An out-of-range `from` leaves the list unchanged; `to` is clamped to the
/// last index. The result is always a permutation of the input.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if from >= out.len() {
        return out;
    }
    let to = to.min(out.len() - 1);
    let item = out.remove(from);
    out.insert(to, item);
    out
}

/// Where a drag started
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSurface {
    /// The column list in the configuration panel
    ConfigPanel,
    /// The live table header row
    TableHeader,
}

/// End of a drag on either surface. Indices are positions in the visible list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub surface: DragSurface,
    pub source: usize,
    /// `None` when the drag was cancelled or dropped outside a target
    pub destination: Option<usize>,
}

impl DragEnd {
    pub fn new(surface: DragSurface, source: usize, destination: Option<usize>) -> Self {
        Self {
            surface,
            source,
            destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::*;
    use pretty_assertions::assert_eq;

    fn list(ids: &[&str]) -> VisibleColumns {
        VisibleColumns::from_ids(ids)
    }

    #[test]
    fn default_set_matches_catalog_defaults() {
        let ids: Vec<_> = VisibleColumns::default_set().iter().map(str::to_string).collect();
        assert_eq!(
            ids,
            vec!["numero", "nome", "duracao", "inicio", "termino", "progresso", "responsavel"]
        );
    }

    #[test]
    fn from_ids_normalizes() {
        let cols = list(&["inicio", "legacy", "nome", "inicio"]);
        assert_eq!(cols.ids(), &["numero", "inicio", "nome"]);
    }

    #[test]
    fn remove_then_reorder_scenario() {
        let cols = VisibleColumns::default_set().toggle(DURACAO);
        let from = cols.position(RESPONSAVEL).unwrap();
        let to = cols.position(PROGRESSO).unwrap();
        let cols = cols.reorder(from, to);
        assert_eq!(
            cols.ids(),
            &["numero", "nome", "inicio", "termino", "responsavel", "progresso"]
        );
    }

    #[test]
    fn toggle_never_drops_below_minimum() {
        let minimal = list(&[NUMERO, NOME]);
        assert_eq!(minimal.toggle(NOME), minimal);
        assert_eq!(minimal.toggle(NUMERO), minimal);

        let mut cols = VisibleColumns::default_set();
        for id in DEFAULT_VISIBLE {
            cols = cols.toggle(id);
            assert!(cols.len() >= VisibleColumns::MIN_LEN);
        }
        assert_eq!(cols.ids(), &["numero", "nome"]);
    }

    #[test]
    fn mandatory_columns_cannot_be_hidden() {
        let cols = VisibleColumns::default_set();
        assert_eq!(cols.toggle(NUMERO), cols);
        assert_eq!(cols.toggle(NOME), cols);
    }

    #[test]
    fn toggle_round_trip_for_hidden_column() {
        let cols = VisibleColumns::default_set();
        let shown = cols.toggle(EQUIPE);
        assert_eq!(shown.ids().last().map(String::as_str), Some(EQUIPE));
        assert_eq!(shown.toggle(EQUIPE), cols);
    }

    #[test]
    fn toggle_round_trip_for_last_visible_column() {
        let cols = VisibleColumns::default_set();
        assert_eq!(cols.toggle(RESPONSAVEL).toggle(RESPONSAVEL), cols);
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let cols = VisibleColumns::default_set();
        assert_eq!(cols.toggle("custo_real"), cols);
    }

    #[test]
    fn reorder_is_a_permutation() {
        let base: Vec<u32> = (0..6).collect();
        for from in 0..8 {
            for to in 0..8 {
                let mut moved = reorder(&base, from, to);
                assert_eq!(moved.len(), base.len());
                moved.sort_unstable();
                assert_eq!(moved, base);
            }
        }
    }

    #[test]
    fn reorder_moves_forward_and_backward() {
        assert_eq!(reorder(&['a', 'b', 'c', 'd'], 0, 2), vec!['b', 'c', 'a', 'd']);
        assert_eq!(reorder(&['a', 'b', 'c', 'd'], 3, 1), vec!['a', 'd', 'b', 'c']);
        assert_eq!(reorder(&['a', 'b', 'c'], 1, 1), vec!['a', 'b', 'c']);
        assert_eq!(reorder(&['a', 'b', 'c'], 0, 99), vec!['b', 'c', 'a']);
        assert_eq!(reorder(&['a', 'b', 'c'], 5, 0), vec!['a', 'b', 'c']);
    }

    #[test]
    fn drag_without_destination_is_noop() {
        let cols = VisibleColumns::default_set();
        let cancelled = DragEnd::new(DragSurface::TableHeader, 3, None);
        assert_eq!(cols.apply_drag(&cancelled), cols);
    }

    #[test]
    fn both_surfaces_apply_the_same_mutation() {
        let cols = VisibleColumns::default_set();
        let from_panel = cols.apply_drag(&DragEnd::new(DragSurface::ConfigPanel, 6, Some(2)));
        let from_header = cols.apply_drag(&DragEnd::new(DragSurface::TableHeader, 6, Some(2)));
        assert_eq!(from_panel, from_header);
        assert_eq!(from_panel.ids()[2], RESPONSAVEL);
    }

    #[test]
    fn total_width_follows_visible_columns() {
        let cols = list(&[NUMERO, NOME, STATUS]);
        assert_eq!(cols.total_width(), 50 + 250 + 120);
        assert_eq!(cols.definitions().len(), 3);
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&list(&[NUMERO, NOME])).unwrap();
        assert_eq!(json, r#"["numero","nome"]"#);
    }
}
