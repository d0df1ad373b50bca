// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::listing::ListEntity;

/// Page-level ownership: the catalog fetched from the backend, the single
/// selected entity, and the save-in-flight guard. The list component only
/// ever borrows from here.
///
/// Invariants:
/// - the catalog is replaced wholesale on refetch, never patched in place;
/// - after a successful create/update/delete the caller refetches and hands
///   the new catalog in through [`PageFlow::apply_saved`] before rendering;
/// - at most one save is in flight per form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFlow<T> {
    catalog: Vec<T>,
    selection: Option<T>,
    save_in_flight: bool,
}

impl<T> Default for PageFlow<T> {
    fn default() -> Self {
        Self {
            catalog: Vec::new(),
            selection: None,
            save_in_flight: false,
        }
    }
}

impl<T: ListEntity + Clone> PageFlow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &[T] {
        &self.catalog
    }

    pub fn selection(&self) -> Option<&T> {
        self.selection.as_ref()
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Replace the catalog after a plain refetch (mount, scope change). The
    /// selection is re-pointed at the fresh copy of the same entity so the
    /// view never renders stale fields.
    pub fn replace_catalog(&mut self, catalog: Vec<T>) {
        self.catalog = catalog;
        if let Some(selected) = &self.selection {
            let id = selected.list_id();
            self.selection = self
                .catalog
                .iter()
                .find(|entity| entity.list_id() == id)
                .cloned();
        }
    }

    pub fn select(&mut self, id: i64) -> Option<&T> {
        self.selection = self
            .catalog
            .iter()
            .find(|entity| entity.list_id() == id)
            .cloned();
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Arm the save guard. Returns false when a save is already pending, in
    /// which case the submission must be ignored.
    pub fn begin_save(&mut self) -> bool {
        if self.save_in_flight {
            return false;
        }
        self.save_in_flight = true;
        true
    }

    /// Disarm the guard after a failed save; catalog and selection are left
    /// exactly as they were before the call.
    pub fn abort_save(&mut self) {
        self.save_in_flight = false;
    }

    /// Successful mutation: install the refetched catalog, point the
    /// selection at the just-saved entity (or clear it after a delete), and
    /// disarm the guard.
    pub fn apply_saved(&mut self, catalog: Vec<T>, saved_id: Option<i64>) {
        self.catalog = catalog;
        self.selection = saved_id.and_then(|id| {
            self.catalog
                .iter()
                .find(|entity| entity.list_id() == id)
                .cloned()
        });
        self.save_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::PageFlow;
    use crate::{Proyecto, ClienteId, ProyectoId};

    fn proyecto(id: i64, nombre: &str) -> Proyecto {
        Proyecto {
            id: ProyectoId::new(id),
            id_tenant: 1,
            id_cliente: ClienteId::new(1),
            nombre_proyecto: nombre.to_owned(),
            ubicacion: String::new(),
            descripcion: String::new(),
            activo: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn select_finds_entity_in_catalog() {
        let mut page = PageFlow::new();
        page.replace_catalog(vec![proyecto(1, "Nave"), proyecto(2, "Torre")]);

        assert!(page.select(2).is_some());
        assert_eq!(page.selection().map(|p| p.id.get()), Some(2));
        assert!(page.select(9).is_none());
        assert!(page.selection().is_none());
    }

    #[test]
    fn refetch_repoints_selection_at_fresh_copy() {
        let mut page = PageFlow::new();
        page.replace_catalog(vec![proyecto(1, "Nave")]);
        page.select(1);

        page.replace_catalog(vec![proyecto(1, "Nave ampliada"), proyecto(2, "Torre")]);
        assert_eq!(
            page.selection().map(|p| p.nombre_proyecto.as_str()),
            Some("Nave ampliada")
        );

        // Entity gone from the refetched scope: selection drops.
        page.replace_catalog(vec![proyecto(2, "Torre")]);
        assert!(page.selection().is_none());
    }

    #[test]
    fn second_submission_is_refused_while_save_pending() {
        let mut page: PageFlow<Proyecto> = PageFlow::new();
        assert!(page.begin_save());
        assert!(!page.begin_save());

        page.abort_save();
        assert!(page.begin_save());
    }

    #[test]
    fn failed_save_leaves_state_unchanged() {
        let mut page = PageFlow::new();
        page.replace_catalog(vec![proyecto(1, "Nave")]);
        page.select(1);
        let before = page.clone();

        assert!(page.begin_save());
        page.abort_save();
        assert_eq!(page, before);
    }

    #[test]
    fn apply_saved_installs_catalog_and_selection() {
        let mut page = PageFlow::new();
        page.replace_catalog(vec![proyecto(1, "Nave")]);
        assert!(page.begin_save());

        page.apply_saved(vec![proyecto(1, "Nave"), proyecto(2, "Torre")], Some(2));
        assert!(!page.save_in_flight());
        assert_eq!(page.catalog().len(), 2);
        assert_eq!(page.selection().map(|p| p.id.get()), Some(2));

        // Delete path: refetch with no surviving selection.
        assert!(page.begin_save());
        page.apply_saved(vec![proyecto(1, "Nave")], None);
        assert!(page.selection().is_none());
        assert!(!page.save_in_flight());
    }
}
