// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Cliente, Cotizacion, Proyecto};

/// Row contract for the filterable list. Every searchable column of an
/// entity family is exposed as a haystack; ids come from the backend and
/// are unique within a catalog.
pub trait ListEntity {
    fn list_id(&self) -> i64;
    fn search_haystacks(&self) -> Vec<&str>;
}

impl ListEntity for Cliente {
    fn list_id(&self) -> i64 {
        self.id.get()
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.nombre, &self.numero, &self.nombre_comercial]
    }
}

impl ListEntity for Proyecto {
    fn list_id(&self) -> i64 {
        self.id.get()
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.nombre_proyecto, &self.ubicacion, &self.descripcion]
    }
}

impl ListEntity for Cotizacion {
    fn list_id(&self) -> i64 {
        self.id.get()
    }

    fn search_haystacks(&self) -> Vec<&str> {
        let mut haystacks = Vec::with_capacity(4);
        if let Some(cliente) = &self.cliente_nombre {
            haystacks.push(cliente.as_str());
        }
        if let Some(proyecto) = &self.proyecto_nombre {
            haystacks.push(proyecto.as_str());
        }
        if let Some(servicio) = &self.servicio_nombre {
            haystacks.push(servicio.as_str());
        }
        haystacks.push(&self.descripcion);
        haystacks
    }
}

/// Filter state owned by a list component. `include_inactive` is respected
/// server-side; changing it asks the owning page for a refetch, the list
/// never re-checks `activo` locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub text_term: String,
    pub id_term: String,
    pub include_inactive: bool,
}

impl ListFilter {
    /// The id filter only applies when the term parses as an integer; any
    /// other content means "no id filter", never an error.
    pub fn id_value(&self) -> Option<i64> {
        self.id_term.trim().parse().ok()
    }

    /// Whether the user has typed anything into either filter field. Drives
    /// the choice of empty-view placeholder, not the derivation itself.
    pub fn is_filtering(&self) -> bool {
        !self.text_term.is_empty() || !self.id_term.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    SetTextTerm(String),
    SetIdTerm(String),
    SelectRow(i64),
    RequestNew,
    SetIncludeInactive(bool),
}

/// Outward notifications; the list owns no selection and no catalog, so
/// every mutation is delegated to the owning page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    SelectionRequested(i64),
    CreateRequested,
    ScopeChanged { include_inactive: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    pub filter: ListFilter,
}

impl ListState {
    pub fn dispatch<T: ListEntity>(&mut self, catalog: &[T], command: ListCommand) -> Vec<ListEvent> {
        match command {
            ListCommand::SetTextTerm(term) => {
                self.filter.text_term = term;
                Vec::new()
            }
            ListCommand::SetIdTerm(term) => {
                self.filter.id_term = term;
                let Some(id) = self.filter.id_value() else {
                    return Vec::new();
                };
                // Typing an id that names exactly one catalog row selects it
                // outright, matching the historical UI behavior.
                let mut hits = catalog.iter().filter(|entity| entity.list_id() == id);
                match (hits.next(), hits.next()) {
                    (Some(only), None) => vec![ListEvent::SelectionRequested(only.list_id())],
                    _ => Vec::new(),
                }
            }
            ListCommand::SelectRow(id) => vec![ListEvent::SelectionRequested(id)],
            ListCommand::RequestNew => vec![ListEvent::CreateRequested],
            ListCommand::SetIncludeInactive(include_inactive) => {
                self.filter.include_inactive = include_inactive;
                vec![ListEvent::ScopeChanged { include_inactive }]
            }
        }
    }
}

/// Message shown when the derived view is empty. The two variants must stay
/// distinct: an empty catalog without filters reads differently from a
/// search that matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPlaceholder {
    NoRecords,
    NoMatches,
}

pub fn placeholder(filter: &ListFilter) -> ListPlaceholder {
    if filter.is_filtering() {
        ListPlaceholder::NoMatches
    } else {
        ListPlaceholder::NoRecords
    }
}

/// Pure projection of the catalog: selection override, then text filter,
/// then id filter, then a stable ascending sort by id. Recomputed after any
/// input change; no implicit dependency tracking.
pub fn derive_view<'a, T: ListEntity>(
    catalog: &'a [T],
    filter: &ListFilter,
    selection: Option<&'a T>,
) -> Vec<&'a T> {
    if let Some(selected) = selection {
        return vec![selected];
    }

    let needle = filter.text_term.to_lowercase();
    let id_filter = filter.id_value();

    let mut view: Vec<&T> = catalog
        .iter()
        .filter(|entity| {
            needle.is_empty()
                || entity
                    .search_haystacks()
                    .iter()
                    .any(|haystack| haystack.to_lowercase().contains(&needle))
        })
        .filter(|entity| id_filter.is_none_or(|id| entity.list_id() == id))
        .collect();
    view.sort_by_key(|entity| entity.list_id());
    view
}
