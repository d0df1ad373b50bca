// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FormKind, SectionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    IdFilter,
    Form(FormKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_section: SectionKind,
    pub include_inactive: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_section: SectionKind::Clientes,
            include_inactive: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    NextSection,
    PrevSection,
    EnterSearch,
    EnterIdFilter,
    ExitToNav,
    OpenForm(FormKind),
    ToggleInactive,
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    SectionChanged(SectionKind),
    InactiveScopeChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::EnterIdFilter => {
                self.mode = AppMode::IdFilter;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::OpenForm(kind) => {
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleInactive => {
                self.include_inactive = !self.include_inactive;
                let label = if self.include_inactive {
                    "inactivos visibles"
                } else {
                    "inactivos ocultos"
                };
                vec![
                    AppEvent::InactiveScopeChanged(self.include_inactive),
                    self.set_status(label),
                ]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let sections = SectionKind::ALL;
        let current = sections
            .iter()
            .position(|section| *section == self.active_section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_section = sections[next];
        vec![AppEvent::SectionChanged(self.active_section)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppMode, AppState};
    use crate::{FormKind, SectionKind};

    #[test]
    fn section_rotation_wraps() {
        let mut state = AppState {
            active_section: SectionKind::Cotizaciones,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextSection);
        assert_eq!(state.active_section, SectionKind::Clientes);
        assert_eq!(
            events,
            vec![AppEvent::SectionChanged(SectionKind::Clientes)]
        );

        state.dispatch(AppCommand::PrevSection);
        assert_eq!(state.active_section, SectionKind::Cotizaciones);
    }

    #[test]
    fn toggle_inactive_updates_status() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::ToggleInactive);
        assert!(state.include_inactive);
        assert_eq!(
            events,
            vec![
                AppEvent::InactiveScopeChanged(true),
                AppEvent::StatusUpdated("inactivos visibles".to_owned()),
            ],
        );

        state.dispatch(AppCommand::ToggleInactive);
        assert!(!state.include_inactive);
    }

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::EnterSearch);
        assert_eq!(state.mode, AppMode::Search);

        state.dispatch(AppCommand::EnterIdFilter);
        assert_eq!(state.mode, AppMode::IdFilter);

        state.dispatch(AppCommand::OpenForm(FormKind::Cotizacion));
        assert_eq!(state.mode, AppMode::Form(FormKind::Cotizacion));

        state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn clear_status_drops_the_banner() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::ToggleInactive);
        assert!(state.status_line.is_some());

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
        assert!(state.status_line.is_none());
    }
}
