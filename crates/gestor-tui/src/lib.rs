// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gestor_app::{
    AppCommand, AppMode, AppState, Cliente, ClienteFormInput, ClienteId, Cotizacion,
    CotizacionFormInput, CotizacionId, EstadoCotizacion, FormKind, FormPayload, Idioma,
    ListCommand, ListEntity, ListEvent, ListPlaceholder, ListState, PageFlow, Proyecto,
    ProyectoFormInput, ProyectoId, Retencion, SectionKind, TipoFactura, Totales,
    ValidationErrors, derive_view, placeholder,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Banner lifetime for save/delete/download feedback.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Seam between the TUI and the backend bridge. The binary implements this
/// over the HTTP client; tests substitute an in-memory double.
pub trait AppRuntime {
    fn load_clientes(&mut self, include_inactive: bool) -> Result<Vec<Cliente>>;
    fn load_proyectos(
        &mut self,
        id_cliente: ClienteId,
        include_inactive: bool,
    ) -> Result<Vec<Proyecto>>;
    fn load_cotizaciones(&mut self) -> Result<Vec<Cotizacion>>;
    fn save_cliente(&mut self, input: &ClienteFormInput) -> Result<Cliente>;
    fn save_proyecto(&mut self, input: &ProyectoFormInput) -> Result<Proyecto>;
    fn save_cotizacion(&mut self, input: &CotizacionFormInput) -> Result<Cotizacion>;
    fn delete_cliente(&mut self, id: ClienteId) -> Result<()>;
    fn delete_proyecto(&mut self, id: ProyectoId) -> Result<()>;
    fn delete_cotizacion(&mut self, id: CotizacionId) -> Result<()>;
    fn restore_cliente(&mut self, id: ClienteId) -> Result<()>;
    fn restore_proyecto(&mut self, id: ProyectoId) -> Result<()>;
    fn calcular_totales(
        &mut self,
        id: CotizacionId,
        descuentop: f64,
        retencionp: f64,
        itbisp: f64,
    ) -> Result<Totales>;
    fn download_pdf(&mut self, id: CotizacionId, idioma: Idioma) -> Result<PathBuf>;
    fn upload_logo(&mut self, id: ClienteId, file_path: &Path) -> Result<()>;
    /// Best effort; a missing logo is not an error worth surfacing.
    fn logo_preview(&mut self, id: ClienteId) -> Result<Option<PathBuf>>;
    /// Today's date as `AAAA-MM-DD`, used to seed new quotation forms.
    fn today(&mut self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    raised_at: Instant,
}

/// Dismissible banner that expires on its own after [`NOTICE_TTL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeState {
    current: Option<Notice>,
}

impl NoticeState {
    pub fn show(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            message: message.into(),
            level,
            raised_at: now,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn active(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| now.duration_since(notice.raised_at) < NOTICE_TTL)
    }

    pub fn expire(&mut self, now: Instant) {
        if self.active(now).is_none() {
            self.current = None;
        }
    }
}

/// One list section: the page-owned catalog/selection plus the component's
/// own filter state and row cursor.
#[derive(Debug, Clone)]
pub struct SectionView<T> {
    pub page: PageFlow<T>,
    pub list: ListState,
    pub cursor: usize,
}

impl<T> Default for SectionView<T> {
    fn default() -> Self {
        Self {
            page: PageFlow::default(),
            list: ListState::default(),
            cursor: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormUiState {
    pub payload: FormPayload,
    pub errors: ValidationErrors,
    pub cursor: usize,
    pub editing: Option<String>,
    pub logo_entry: Option<String>,
}

impl FormUiState {
    fn new(payload: FormPayload) -> Self {
        Self {
            payload,
            errors: ValidationErrors::default(),
            cursor: 0,
            editing: None,
            logo_entry: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewData {
    pub clientes: SectionView<Cliente>,
    pub proyectos: SectionView<Proyecto>,
    pub cotizaciones: SectionView<Cotizacion>,
    pub form: Option<FormUiState>,
    pub notice: NoticeState,
    pub totales: Option<Totales>,
    pub logo_preview: Option<PathBuf>,
}

/// Label/value pair for the generic form editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

fn field(name: &'static str, value: impl Into<String>) -> FormField {
    FormField {
        name,
        value: value.into(),
    }
}

pub fn form_fields(payload: &FormPayload) -> Vec<FormField> {
    match payload {
        FormPayload::Cliente(c) => vec![
            field("nombre", &c.nombre),
            field("nombre_comercial", &c.nombre_comercial),
            field("numero", &c.numero),
            field("correo", &c.correo),
            field("direccion", &c.direccion),
            field("ciudad", &c.ciudad),
            field("provincia", &c.provincia),
            field("telefono", &c.telefono),
            field("representante", &c.representante),
            field("correo_representante", &c.correo_representante),
            field("tipo_factura", c.tipo_factura.as_str()),
        ],
        FormPayload::Proyecto(p) => vec![
            field("id_cliente", p.id_cliente.get().to_string()),
            field("nombre_proyecto", &p.nombre_proyecto),
            field("ubicacion", &p.ubicacion),
            field("descripcion", &p.descripcion),
        ],
        FormPayload::Cotizacion(c) => vec![
            field("id_cliente", c.id_cliente.get().to_string()),
            field("id_proyecto", c.id_proyecto.get().to_string()),
            field("id_servicio", c.id_servicio.get().to_string()),
            field("moneda", &c.moneda),
            field("fecha", &c.fecha),
            field("tasa_moneda", c.tasa_moneda.to_string()),
            field("tiempo_entrega", &c.tiempo_entrega),
            field("avance", &c.avance),
            field("validez", c.validez.to_string()),
            field("estado", c.estado.as_str()),
            field("idioma", c.idioma.as_str()),
            field("descripcion", &c.descripcion),
            field("retencion", c.retencion.as_str()),
            field("descuentop", c.descuentop.to_string()),
            field("retencionp", c.retencionp.to_string()),
            field("itbisp", c.itbisp.to_string()),
        ],
    }
}

/// Write one edited field back into the typed payload. Returns the message
/// to show inline when the raw text does not parse.
pub fn apply_form_field(payload: &mut FormPayload, name: &str, raw: &str) -> Result<(), String> {
    fn parse_id(raw: &str) -> Result<i64, String> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| "debe ser un número entero".to_owned())
    }
    fn parse_f64(raw: &str) -> Result<f64, String> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| "debe ser un número".to_owned())
    }

    match payload {
        FormPayload::Cliente(c) => match name {
            "nombre" => c.nombre = raw.to_owned(),
            "nombre_comercial" => c.nombre_comercial = raw.to_owned(),
            "numero" => c.numero = raw.to_owned(),
            "correo" => c.correo = raw.to_owned(),
            "direccion" => c.direccion = raw.to_owned(),
            "ciudad" => c.ciudad = raw.to_owned(),
            "provincia" => c.provincia = raw.to_owned(),
            "telefono" => c.telefono = raw.to_owned(),
            "representante" => c.representante = raw.to_owned(),
            "correo_representante" => c.correo_representante = raw.to_owned(),
            "tipo_factura" => {
                c.tipo_factura = TipoFactura::parse(raw.trim())
                    .ok_or_else(|| "use NCFC, NCF, NCG, NCRE, NDC o NDD".to_owned())?;
            }
            _ => return Err(format!("campo desconocido {name}")),
        },
        FormPayload::Proyecto(p) => match name {
            "id_cliente" => p.id_cliente = ClienteId::new(parse_id(raw)?),
            "nombre_proyecto" => p.nombre_proyecto = raw.to_owned(),
            "ubicacion" => p.ubicacion = raw.to_owned(),
            "descripcion" => p.descripcion = raw.to_owned(),
            _ => return Err(format!("campo desconocido {name}")),
        },
        FormPayload::Cotizacion(c) => match name {
            "id_cliente" => c.id_cliente = ClienteId::new(parse_id(raw)?),
            "id_proyecto" => c.id_proyecto = ProyectoId::new(parse_id(raw)?),
            "id_servicio" => c.id_servicio = gestor_app::ServicioId::new(parse_id(raw)?),
            "moneda" => c.moneda = raw.to_owned(),
            "fecha" => c.fecha = raw.trim().to_owned(),
            "tasa_moneda" => c.tasa_moneda = parse_f64(raw)?,
            "tiempo_entrega" => c.tiempo_entrega = raw.to_owned(),
            "avance" => c.avance = raw.to_owned(),
            "validez" => {
                c.validez = raw
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| "debe ser un número entero".to_owned())?;
            }
            "estado" => {
                c.estado = EstadoCotizacion::parse(raw.trim())
                    .ok_or_else(|| "use GENERADA, APROBADA, RECHAZADA o CANCELADA".to_owned())?;
            }
            "idioma" => {
                c.idioma =
                    Idioma::parse(raw.trim()).ok_or_else(|| "use ES o EN".to_owned())?;
            }
            "descripcion" => c.descripcion = raw.to_owned(),
            "retencion" => {
                c.retencion = Retencion::parse(raw.trim())
                    .ok_or_else(|| "use NINGUNA, 10%, 5% o 2%".to_owned())?;
            }
            "descuentop" => c.descuentop = parse_f64(raw)?,
            "retencionp" => c.retencionp = parse_f64(raw)?,
            "itbisp" => c.itbisp = parse_f64(raw)?,
            _ => return Err(format!("campo desconocido {name}")),
        },
    }
    Ok(())
}

fn percentage_field(name: &str) -> bool {
    matches!(name, "descuentop" | "retencionp" | "itbisp")
}

pub fn section_columns(section: SectionKind) -> &'static [&'static str] {
    match section {
        SectionKind::Clientes => &["ID", "Nombre", "RNC", "Nombre Comercial", "Representante"],
        SectionKind::Proyectos => &["ID", "Nombre Proyecto", "Ubicación"],
        SectionKind::Cotizaciones => &[
            "ID",
            "Cliente",
            "Proyecto",
            "Servicio",
            "Estado",
            "Moneda",
            "Fecha",
        ],
    }
}

fn cliente_cells(cliente: &Cliente) -> Vec<String> {
    vec![
        cliente.id.get().to_string(),
        cliente.nombre.clone(),
        cliente.numero.clone(),
        cliente.nombre_comercial.clone(),
        cliente.representante.clone(),
    ]
}

fn proyecto_cells(proyecto: &Proyecto) -> Vec<String> {
    vec![
        proyecto.id.get().to_string(),
        proyecto.nombre_proyecto.clone(),
        proyecto.ubicacion.clone(),
    ]
}

fn cotizacion_cells(cotizacion: &Cotizacion) -> Vec<String> {
    let name_or_na =
        |name: &Option<String>| name.clone().unwrap_or_else(|| "N/A".to_owned());
    vec![
        cotizacion.id.get().to_string(),
        name_or_na(&cotizacion.cliente_nombre),
        name_or_na(&cotizacion.proyecto_nombre),
        name_or_na(&cotizacion.servicio_nombre),
        cotizacion.estado.as_str().to_owned(),
        cotizacion.moneda.clone(),
        cotizacion.fecha.clone(),
    ]
}

/// Empty-view message. The "no records" and "no matches" variants must stay
/// distinct per section; proyectos additionally reads differently while no
/// client is selected, because its catalog is scoped to one.
pub fn placeholder_text(
    section: SectionKind,
    variant: ListPlaceholder,
    cliente_selected: bool,
) -> &'static str {
    match (section, variant) {
        (SectionKind::Clientes, ListPlaceholder::NoRecords) => "No hay clientes registrados",
        (SectionKind::Clientes, ListPlaceholder::NoMatches) => {
            "No se encontraron clientes con los criterios de búsqueda"
        }
        (SectionKind::Proyectos, ListPlaceholder::NoRecords) => {
            if cliente_selected {
                "No hay proyectos registrados"
            } else {
                "Seleccione un cliente para ver sus proyectos"
            }
        }
        (SectionKind::Proyectos, ListPlaceholder::NoMatches) => {
            "No se encontraron proyectos con los filtros aplicados"
        }
        (SectionKind::Cotizaciones, ListPlaceholder::NoRecords) => {
            "No hay cotizaciones disponibles"
        }
        (SectionKind::Cotizaciones, ListPlaceholder::NoMatches) => {
            "No se encontraron cotizaciones con los filtros aplicados"
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    initial_load(state, runtime, &mut view_data, Instant::now());

    let mut result = Ok(());
    loop {
        let now = Instant::now();
        view_data.notice.expire(now);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data, now)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, key, Instant::now()) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

pub fn initial_load<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    if let Err(error) = refresh_clientes(runtime, view_data, state.include_inactive) {
        view_data.notice.show(
            NoticeLevel::Error,
            format!("Error al cargar clientes: {error}"),
            now,
        );
    }
    if let Err(error) = refresh_cotizaciones(runtime, view_data) {
        view_data.notice.show(
            NoticeLevel::Error,
            format!("Error al cargar cotizaciones: {error}"),
            now,
        );
    }
}

fn refresh_clientes<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    include_inactive: bool,
) -> Result<()> {
    let catalog = runtime.load_clientes(include_inactive)?;
    view_data.clientes.page.replace_catalog(catalog);
    Ok(())
}

fn refresh_proyectos<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    include_inactive: bool,
) -> Result<()> {
    let catalog = match view_data.clientes.page.selection() {
        Some(cliente) => runtime.load_proyectos(cliente.id, include_inactive)?,
        None => Vec::new(),
    };
    view_data.proyectos.page.replace_catalog(catalog);
    Ok(())
}

fn refresh_cotizaciones<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let catalog = runtime.load_cotizaciones()?;
    view_data.cotizaciones.page.replace_catalog(catalog);
    Ok(())
}

fn refresh_active<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    match state.active_section {
        SectionKind::Clientes => refresh_clientes(runtime, view_data, state.include_inactive),
        SectionKind::Proyectos => refresh_proyectos(runtime, view_data, state.include_inactive),
        SectionKind::Cotizaciones => refresh_cotizaciones(runtime, view_data),
    }
}

fn active_view_len(state: &AppState, view_data: &ViewData) -> usize {
    match state.active_section {
        SectionKind::Clientes => derive_view(
            view_data.clientes.page.catalog(),
            &view_data.clientes.list.filter,
            view_data.clientes.page.selection(),
        )
        .len(),
        SectionKind::Proyectos => derive_view(
            view_data.proyectos.page.catalog(),
            &view_data.proyectos.list.filter,
            view_data.proyectos.page.selection(),
        )
        .len(),
        SectionKind::Cotizaciones => derive_view(
            view_data.cotizaciones.page.catalog(),
            &view_data.cotizaciones.list.filter,
            view_data.cotizaciones.page.selection(),
        )
        .len(),
    }
}

fn cursor_mut<'a>(state: &AppState, view_data: &'a mut ViewData) -> &'a mut usize {
    match state.active_section {
        SectionKind::Clientes => &mut view_data.clientes.cursor,
        SectionKind::Proyectos => &mut view_data.proyectos.cursor,
        SectionKind::Cotizaciones => &mut view_data.cotizaciones.cursor,
    }
}

fn move_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let len = active_view_len(state, view_data);
    let cursor = cursor_mut(state, view_data);
    if len == 0 {
        *cursor = 0;
        return;
    }
    let next = (*cursor as isize + delta).clamp(0, len as isize - 1);
    *cursor = next as usize;
}

fn row_id_under_cursor(state: &AppState, view_data: &ViewData) -> Option<i64> {
    let index = match state.active_section {
        SectionKind::Clientes => view_data.clientes.cursor,
        SectionKind::Proyectos => view_data.proyectos.cursor,
        SectionKind::Cotizaciones => view_data.cotizaciones.cursor,
    };
    match state.active_section {
        SectionKind::Clientes => derive_view(
            view_data.clientes.page.catalog(),
            &view_data.clientes.list.filter,
            view_data.clientes.page.selection(),
        )
        .get(index)
        .map(|c| c.list_id()),
        SectionKind::Proyectos => derive_view(
            view_data.proyectos.page.catalog(),
            &view_data.proyectos.list.filter,
            view_data.proyectos.page.selection(),
        )
        .get(index)
        .map(|p| p.list_id()),
        SectionKind::Cotizaciones => derive_view(
            view_data.cotizaciones.page.catalog(),
            &view_data.cotizaciones.list.filter,
            view_data.cotizaciones.page.selection(),
        )
        .get(index)
        .map(|c| c.list_id()),
    }
}

fn dispatch_list<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: ListCommand,
    now: Instant,
) {
    let events = match state.active_section {
        SectionKind::Clientes => view_data
            .clientes
            .list
            .dispatch(view_data.clientes.page.catalog(), command),
        SectionKind::Proyectos => view_data
            .proyectos
            .list
            .dispatch(view_data.proyectos.page.catalog(), command),
        SectionKind::Cotizaciones => view_data
            .cotizaciones
            .list
            .dispatch(view_data.cotizaciones.page.catalog(), command),
    };
    handle_list_events(state, runtime, view_data, events, now);
}

fn handle_list_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    events: Vec<ListEvent>,
    now: Instant,
) {
    for event in events {
        match event {
            ListEvent::SelectionRequested(id) => {
                apply_selection(state, runtime, view_data, id);
            }
            ListEvent::CreateRequested => open_blank_form(state, runtime, view_data, now),
            ListEvent::ScopeChanged { .. } => {
                if let Err(error) = refresh_active(state, runtime, view_data) {
                    view_data.notice.show(
                        NoticeLevel::Error,
                        format!("Error al recargar: {error}"),
                        now,
                    );
                }
            }
        }
    }
}

fn apply_selection<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    id: i64,
) {
    match state.active_section {
        SectionKind::Clientes => {
            let Some(cliente) = view_data.clientes.page.select(id).cloned() else {
                return;
            };
            view_data.form = Some(FormUiState::new(FormPayload::Cliente(
                ClienteFormInput::from_entity(&cliente),
            )));
            // Logo preview is best effort; absence stays silent.
            view_data.logo_preview = runtime.logo_preview(cliente.id).ok().flatten();
            state.dispatch(AppCommand::OpenForm(FormKind::Cliente));
        }
        SectionKind::Proyectos => {
            let Some(proyecto) = view_data.proyectos.page.select(id).cloned() else {
                return;
            };
            view_data.form = Some(FormUiState::new(FormPayload::Proyecto(
                ProyectoFormInput::from_entity(&proyecto),
            )));
            state.dispatch(AppCommand::OpenForm(FormKind::Proyecto));
        }
        SectionKind::Cotizaciones => {
            let Some(cotizacion) = view_data.cotizaciones.page.select(id).cloned() else {
                return;
            };
            view_data.form = Some(FormUiState::new(FormPayload::Cotizacion(
                CotizacionFormInput::from_entity(&cotizacion),
            )));
            view_data.totales = runtime
                .calcular_totales(
                    cotizacion.id,
                    cotizacion.descuentop,
                    cotizacion.retencionp,
                    cotizacion.itbisp,
                )
                .ok();
            state.dispatch(AppCommand::OpenForm(FormKind::Cotizacion));
        }
    }
}

fn open_blank_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let kind = match state.active_section {
        SectionKind::Clientes => FormKind::Cliente,
        SectionKind::Proyectos => FormKind::Proyecto,
        SectionKind::Cotizaciones => FormKind::Cotizacion,
    };

    if kind == FormKind::Proyecto && view_data.clientes.page.selection().is_none() {
        view_data.notice.show(
            NoticeLevel::Error,
            "Seleccione un cliente antes de crear un proyecto",
            now,
        );
        return;
    }

    clear_section_selection(state, view_data);
    let today = runtime.today();
    let mut payload = FormPayload::blank_for(kind, &today);
    if let (FormPayload::Proyecto(proyecto), Some(cliente)) =
        (&mut payload, view_data.clientes.page.selection())
    {
        proyecto.id_cliente = cliente.id;
    }
    if let (FormPayload::Cotizacion(cotizacion), Some(cliente)) =
        (&mut payload, view_data.clientes.page.selection())
    {
        cotizacion.id_cliente = cliente.id;
    }

    view_data.totales = None;
    view_data.logo_preview = None;
    view_data.form = Some(FormUiState::new(payload));
    state.dispatch(AppCommand::OpenForm(kind));
}

fn clear_section_selection(state: &AppState, view_data: &mut ViewData) {
    match state.active_section {
        SectionKind::Clientes => view_data.clientes.page.clear_selection(),
        SectionKind::Proyectos => view_data.proyectos.page.clear_selection(),
        SectionKind::Cotizaciones => view_data.cotizaciones.page.clear_selection(),
    }
}

fn close_form(state: &mut AppState, view_data: &mut ViewData) {
    view_data.form = None;
    view_data.totales = None;
    view_data.logo_preview = None;
    clear_section_selection(state, view_data);
    state.dispatch(AppCommand::ExitToNav);
}

pub fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let Some(payload) = view_data.form.as_ref().map(|form| form.payload.clone()) else {
        return;
    };

    let errors = payload.validate();
    if let Some(form) = view_data.form.as_mut() {
        form.errors = errors.clone();
    }
    if !errors.is_empty() {
        view_data
            .notice
            .show(NoticeLevel::Error, "Corrija los campos marcados", now);
        return;
    }

    match payload {
        FormPayload::Cliente(input) => {
            if !view_data.clientes.page.begin_save() {
                return;
            }
            let outcome = runtime
                .save_cliente(&input)
                .and_then(|saved| {
                    let catalog = runtime.load_clientes(state.include_inactive)?;
                    Ok((saved, catalog))
                });
            match outcome {
                Ok((saved, catalog)) => {
                    view_data
                        .clientes
                        .page
                        .apply_saved(catalog, Some(saved.id.get()));
                    if let (Some(form), Some(fresh)) =
                        (view_data.form.as_mut(), view_data.clientes.page.selection())
                    {
                        form.payload =
                            FormPayload::Cliente(ClienteFormInput::from_entity(fresh));
                    }
                    view_data.notice.show(
                        NoticeLevel::Success,
                        if input.id.is_none() {
                            "Cliente creado exitosamente"
                        } else {
                            "Cliente actualizado exitosamente"
                        },
                        now,
                    );
                }
                Err(error) => {
                    view_data.clientes.page.abort_save();
                    view_data.notice.show(
                        NoticeLevel::Error,
                        format!("Error al guardar: {error}"),
                        now,
                    );
                }
            }
        }
        FormPayload::Proyecto(input) => {
            if !view_data.proyectos.page.begin_save() {
                return;
            }
            let include_inactive = state.include_inactive;
            let outcome = runtime
                .save_proyecto(&input)
                .and_then(|saved| {
                    let catalog = runtime.load_proyectos(input.id_cliente, include_inactive)?;
                    Ok((saved, catalog))
                });
            match outcome {
                Ok((saved, catalog)) => {
                    view_data
                        .proyectos
                        .page
                        .apply_saved(catalog, Some(saved.id.get()));
                    if let (Some(form), Some(fresh)) = (
                        view_data.form.as_mut(),
                        view_data.proyectos.page.selection(),
                    ) {
                        form.payload =
                            FormPayload::Proyecto(ProyectoFormInput::from_entity(fresh));
                    }
                    view_data.notice.show(
                        NoticeLevel::Success,
                        if input.id.is_none() {
                            "Proyecto creado exitosamente"
                        } else {
                            "Proyecto actualizado exitosamente"
                        },
                        now,
                    );
                }
                Err(error) => {
                    view_data.proyectos.page.abort_save();
                    view_data.notice.show(
                        NoticeLevel::Error,
                        format!("Error al guardar: {error}"),
                        now,
                    );
                }
            }
        }
        FormPayload::Cotizacion(input) => {
            if !view_data.cotizaciones.page.begin_save() {
                return;
            }
            let outcome = runtime
                .save_cotizacion(&input)
                .and_then(|saved| {
                    let catalog = runtime.load_cotizaciones()?;
                    Ok((saved, catalog))
                });
            match outcome {
                Ok((saved, catalog)) => {
                    view_data
                        .cotizaciones
                        .page
                        .apply_saved(catalog, Some(saved.id.get()));
                    if let (Some(form), Some(fresh)) = (
                        view_data.form.as_mut(),
                        view_data.cotizaciones.page.selection(),
                    ) {
                        form.payload =
                            FormPayload::Cotizacion(CotizacionFormInput::from_entity(fresh));
                    }
                    view_data.notice.show(
                        NoticeLevel::Success,
                        if input.id.is_none() {
                            "Cotización creada exitosamente"
                        } else {
                            "Cotización actualizada exitosamente"
                        },
                        now,
                    );
                }
                Err(error) => {
                    view_data.cotizaciones.page.abort_save();
                    view_data.notice.show(
                        NoticeLevel::Error,
                        format!("Error al guardar: {error}"),
                        now,
                    );
                }
            }
        }
    }
}

fn delete_from_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let Some(payload) = view_data.form.as_ref().map(|form| form.payload.clone()) else {
        return;
    };

    let outcome = match &payload {
        FormPayload::Cliente(input) => {
            let Some(id) = input.id else { return };
            runtime.delete_cliente(id).and_then(|()| {
                let catalog = runtime.load_clientes(state.include_inactive)?;
                view_data.clientes.page.apply_saved(catalog, None);
                Ok("Cliente eliminado exitosamente")
            })
        }
        FormPayload::Proyecto(input) => {
            let Some(id) = input.id else { return };
            runtime.delete_proyecto(id).and_then(|()| {
                let catalog =
                    runtime.load_proyectos(input.id_cliente, state.include_inactive)?;
                view_data.proyectos.page.apply_saved(catalog, None);
                Ok("Proyecto eliminado exitosamente")
            })
        }
        FormPayload::Cotizacion(input) => {
            let Some(id) = input.id else { return };
            runtime.delete_cotizacion(id).and_then(|()| {
                let catalog = runtime.load_cotizaciones()?;
                view_data.cotizaciones.page.apply_saved(catalog, None);
                Ok("Cotización eliminada exitosamente")
            })
        }
    };

    match outcome {
        Ok(message) => {
            close_form(state, view_data);
            view_data.notice.show(NoticeLevel::Success, message, now);
        }
        Err(error) => {
            view_data.notice.show(
                NoticeLevel::Error,
                format!("Error al eliminar: {error}"),
                now,
            );
        }
    }
}

fn recalculate_totales<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
    surface_errors: bool,
) {
    let Some(FormPayload::Cotizacion(input)) =
        view_data.form.as_ref().map(|form| form.payload.clone())
    else {
        return;
    };
    let Some(id) = input.id else { return };

    match runtime.calcular_totales(id, input.descuentop, input.retencionp, input.itbisp) {
        Ok(totales) => view_data.totales = Some(totales),
        Err(error) if surface_errors => {
            view_data.notice.show(
                NoticeLevel::Error,
                format!("Error al calcular totales: {error}"),
                now,
            );
        }
        Err(_) => {}
    }
}

fn download_pdf_from_form<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let Some(FormPayload::Cotizacion(input)) =
        view_data.form.as_ref().map(|form| form.payload.clone())
    else {
        return;
    };
    let Some(id) = input.id else {
        view_data.notice.show(
            NoticeLevel::Error,
            "Guarde la cotización antes de generar el PDF",
            now,
        );
        return;
    };

    match runtime.download_pdf(id, input.idioma) {
        Ok(path) => view_data.notice.show(
            NoticeLevel::Success,
            format!("PDF descargado en {}", path.display()),
            now,
        ),
        Err(error) => view_data.notice.show(
            NoticeLevel::Error,
            format!("Error al generar PDF: {error}"),
            now,
        ),
    }
}

fn upload_logo_from_form<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    raw_path: &str,
    now: Instant,
) {
    let Some(FormPayload::Cliente(input)) =
        view_data.form.as_ref().map(|form| form.payload.clone())
    else {
        return;
    };
    let Some(id) = input.id else {
        view_data.notice.show(
            NoticeLevel::Error,
            "Guarde el cliente antes de subir un logo",
            now,
        );
        return;
    };

    let path = PathBuf::from(raw_path.trim());
    match runtime.upload_logo(id, &path) {
        Ok(()) => {
            view_data.logo_preview = runtime.logo_preview(id).ok().flatten();
            view_data
                .notice
                .show(NoticeLevel::Success, "Logo actualizado exitosamente", now);
        }
        Err(error) => view_data.notice.show(
            NoticeLevel::Error,
            format!("Error al subir logo: {error}"),
            now,
        ),
    }
}

/// Restore the soft-deleted row under the cursor. Only reachable while the
/// inactive scope is visible; quotations have no restore on the backend.
fn restore_under_cursor<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    now: Instant,
) {
    let Some(id) = row_id_under_cursor(state, view_data) else {
        return;
    };

    let outcome = match state.active_section {
        SectionKind::Clientes => {
            let inactive = view_data
                .clientes
                .page
                .catalog()
                .iter()
                .any(|c| c.id.get() == id && !c.activo);
            if !inactive {
                return;
            }
            runtime
                .restore_cliente(ClienteId::new(id))
                .map(|()| "Cliente restaurado exitosamente")
        }
        SectionKind::Proyectos => {
            let inactive = view_data
                .proyectos
                .page
                .catalog()
                .iter()
                .any(|p| p.id.get() == id && !p.activo);
            if !inactive {
                return;
            }
            runtime
                .restore_proyecto(ProyectoId::new(id))
                .map(|()| "Proyecto restaurado exitosamente")
        }
        SectionKind::Cotizaciones => return,
    };

    match outcome {
        Ok(message) => {
            if let Err(error) = refresh_active(state, runtime, view_data) {
                view_data.notice.show(
                    NoticeLevel::Error,
                    format!("Error al recargar: {error}"),
                    now,
                );
            } else {
                view_data.notice.show(NoticeLevel::Success, message, now);
            }
        }
        Err(error) => view_data.notice.show(
            NoticeLevel::Error,
            format!("Error al restaurar: {error}"),
            now,
        ),
    }
}

/// Top-level key dispatch. Returns true when the app should exit.
pub fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
    now: Instant,
) -> bool {
    match state.mode {
        AppMode::Nav => handle_nav_key(state, runtime, view_data, key, now),
        AppMode::Search => {
            handle_filter_key(state, runtime, view_data, key, now, false);
            false
        }
        AppMode::IdFilter => {
            handle_filter_key(state, runtime, view_data, key, now, true);
            false
        }
        AppMode::Form(_) => {
            handle_form_key(state, runtime, view_data, key, now);
            false
        }
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
    now: Instant,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab | KeyCode::Char('l') => {
            state.dispatch(AppCommand::NextSection);
            if let Err(error) = refresh_active(state, runtime, view_data) {
                view_data
                    .notice
                    .show(NoticeLevel::Error, format!("Error al cargar: {error}"), now);
            }
        }
        KeyCode::BackTab | KeyCode::Char('h') => {
            state.dispatch(AppCommand::PrevSection);
            if let Err(error) = refresh_active(state, runtime, view_data) {
                view_data
                    .notice
                    .show(NoticeLevel::Error, format!("Error al cargar: {error}"), now);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, view_data, -1),
        KeyCode::Enter => {
            if let Some(id) = row_id_under_cursor(state, view_data) {
                dispatch_list(state, runtime, view_data, ListCommand::SelectRow(id), now);
            }
        }
        KeyCode::Char('/') => {
            state.dispatch(AppCommand::EnterSearch);
        }
        KeyCode::Char('#') => {
            state.dispatch(AppCommand::EnterIdFilter);
        }
        KeyCode::Char('n') => {
            dispatch_list(state, runtime, view_data, ListCommand::RequestNew, now);
        }
        KeyCode::Char('r') => restore_under_cursor(state, runtime, view_data, now),
        KeyCode::Char('i') => {
            state.dispatch(AppCommand::ToggleInactive);
            let include = state.include_inactive;
            dispatch_list(
                state,
                runtime,
                view_data,
                ListCommand::SetIncludeInactive(include),
                now,
            );
        }
        KeyCode::Esc => {
            close_form(state, view_data);
            view_data.notice.dismiss();
        }
        _ => {}
    }
    false
}

fn handle_filter_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
    now: Instant,
    id_mode: bool,
) {
    let current = {
        let filter = match state.active_section {
            SectionKind::Clientes => &view_data.clientes.list.filter,
            SectionKind::Proyectos => &view_data.proyectos.list.filter,
            SectionKind::Cotizaciones => &view_data.cotizaciones.list.filter,
        };
        if id_mode {
            filter.id_term.clone()
        } else {
            filter.text_term.clone()
        }
    };

    let updated = match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
            return;
        }
        KeyCode::Backspace => {
            let mut term = current;
            term.pop();
            term
        }
        KeyCode::Char(c) => {
            let mut term = current;
            term.push(c);
            term
        }
        _ => return,
    };

    let command = if id_mode {
        ListCommand::SetIdTerm(updated)
    } else {
        ListCommand::SetTextTerm(updated)
    };
    // Every keystroke re-applies the filter; a unique id match selects the
    // row and jumps straight into its form.
    dispatch_list(state, runtime, view_data, command, now);
    *cursor_mut(state, view_data) = 0;
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
    now: Instant,
) {
    // Logo path entry has its own sub-mode.
    let logo_active = view_data
        .form
        .as_ref()
        .is_some_and(|form| form.logo_entry.is_some());
    if logo_active {
        let commit = {
            let Some(form) = view_data.form.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Esc => {
                    form.logo_entry = None;
                    None
                }
                KeyCode::Backspace => {
                    if let Some(entry) = form.logo_entry.as_mut() {
                        entry.pop();
                    }
                    None
                }
                KeyCode::Enter => form.logo_entry.take(),
                KeyCode::Char(c) => {
                    if let Some(entry) = form.logo_entry.as_mut() {
                        entry.push(c);
                    }
                    None
                }
                _ => None,
            }
        };
        if let Some(entry) = commit {
            upload_logo_from_form(runtime, view_data, &entry, now);
        }
        return;
    }

    let editing_active = view_data
        .form
        .as_ref()
        .is_some_and(|form| form.editing.is_some());
    if editing_active {
        let commit = {
            let Some(form) = view_data.form.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Esc => {
                    form.editing = None;
                    None
                }
                KeyCode::Backspace => {
                    if let Some(buffer) = form.editing.as_mut() {
                        buffer.pop();
                    }
                    None
                }
                KeyCode::Char(c) => {
                    if let Some(buffer) = form.editing.as_mut() {
                        buffer.push(c);
                    }
                    None
                }
                KeyCode::Enter => form.editing.take().map(|buffer| (form.cursor, buffer)),
                _ => None,
            }
        };

        if let Some((cursor, buffer)) = commit {
            commit_field_edit(runtime, view_data, cursor, &buffer, now);
        }
        return;
    }

    match key.code {
        KeyCode::Esc => close_form(state, view_data),
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(form) = view_data.form.as_mut() {
                let fields = form_fields(&form.payload).len();
                if fields > 0 && form.cursor + 1 < fields {
                    form.cursor += 1;
                }
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(form) = view_data.form.as_mut() {
                form.cursor = form.cursor.saturating_sub(1);
            }
        }
        KeyCode::Enter => {
            if let Some(form) = view_data.form.as_mut() {
                let fields = form_fields(&form.payload);
                if let Some(field) = fields.get(form.cursor) {
                    form.editing = Some(field.value.clone());
                }
            }
        }
        KeyCode::Char('s') => submit_form(state, runtime, view_data, now),
        KeyCode::Char('d') => delete_from_form(state, runtime, view_data, now),
        KeyCode::Char('p') => download_pdf_from_form(runtime, view_data, now),
        KeyCode::Char('t') => recalculate_totales(runtime, view_data, now, true),
        KeyCode::Char('u') => {
            if let Some(form) = view_data.form.as_mut()
                && matches!(form.payload, FormPayload::Cliente(_))
            {
                form.logo_entry = Some(String::new());
            }
        }
        _ => {}
    }
}

fn commit_field_edit<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    cursor: usize,
    buffer: &str,
    now: Instant,
) {
    let Some(form) = view_data.form.as_mut() else {
        return;
    };
    let fields = form_fields(&form.payload);
    let Some(field) = fields.get(cursor) else {
        return;
    };
    let name = field.name;

    match apply_form_field(&mut form.payload, name, buffer) {
        Ok(()) => {
            form.errors = form.payload.validate();
            // Editing a percentage on a saved quotation refreshes the
            // backend-computed totals, matching the historical live recalc.
            if percentage_field(name) {
                recalculate_totales(runtime, view_data, now, false);
            }
        }
        Err(message) => {
            view_data.notice.show(
                NoticeLevel::Error,
                format!("Campo {name}: {message}"),
                now,
            );
        }
    }
}

fn section_title(section: SectionKind, view_len: usize, catalog_len: usize) -> String {
    format!(" {} ({view_len}/{catalog_len}) ", section.label())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData, now: Instant) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = SectionKind::ALL
        .iter()
        .position(|section| *section == state.active_section)
        .unwrap_or(0);
    let titles = SectionKind::ALL
        .iter()
        .map(|section| format!(" {} ", section.label()))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("gestor").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    if view_data.form.is_some() {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);
        render_section_table(frame, body[0], state, view_data);
        render_form(frame, body[1], view_data);
    } else {
        render_section_table(frame, layout[1], state, view_data);
    }

    let status = status_text(state, view_data, now);
    let status_style = match view_data.notice.active(now).map(|notice| notice.level) {
        Some(NoticeLevel::Error) => Style::default().fg(Color::Red),
        Some(NoticeLevel::Success) => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::Yellow),
    };
    let status_widget = Paragraph::new(status)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);
}

fn render_section_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let (columns, rows, inactive_flags, view_len, catalog_len, filter, cursor) =
        match state.active_section {
            SectionKind::Clientes => {
                let view = derive_view(
                    view_data.clientes.page.catalog(),
                    &view_data.clientes.list.filter,
                    view_data.clientes.page.selection(),
                );
                let rows: Vec<Vec<String>> = view.iter().map(|c| cliente_cells(c)).collect();
                let inactive: Vec<bool> = view.iter().map(|c| !c.activo).collect();
                (
                    section_columns(SectionKind::Clientes),
                    rows,
                    inactive,
                    view.len(),
                    view_data.clientes.page.catalog().len(),
                    &view_data.clientes.list.filter,
                    view_data.clientes.cursor,
                )
            }
            SectionKind::Proyectos => {
                let view = derive_view(
                    view_data.proyectos.page.catalog(),
                    &view_data.proyectos.list.filter,
                    view_data.proyectos.page.selection(),
                );
                let rows: Vec<Vec<String>> = view.iter().map(|p| proyecto_cells(p)).collect();
                let inactive: Vec<bool> = view.iter().map(|p| !p.activo).collect();
                (
                    section_columns(SectionKind::Proyectos),
                    rows,
                    inactive,
                    view.len(),
                    view_data.proyectos.page.catalog().len(),
                    &view_data.proyectos.list.filter,
                    view_data.proyectos.cursor,
                )
            }
            SectionKind::Cotizaciones => {
                let view = derive_view(
                    view_data.cotizaciones.page.catalog(),
                    &view_data.cotizaciones.list.filter,
                    view_data.cotizaciones.page.selection(),
                );
                let rows: Vec<Vec<String>> = view.iter().map(|c| cotizacion_cells(c)).collect();
                let inactive: Vec<bool> = view.iter().map(|c| !c.activo).collect();
                (
                    section_columns(SectionKind::Cotizaciones),
                    rows,
                    inactive,
                    view.len(),
                    view_data.cotizaciones.page.catalog().len(),
                    &view_data.cotizaciones.list.filter,
                    view_data.cotizaciones.cursor,
                )
            }
        };

    let title = section_title(state.active_section, view_len, catalog_len);

    if rows.is_empty() {
        let cliente_selected = view_data.clientes.page.selection().is_some();
        let message =
            placeholder_text(state.active_section, placeholder(filter), cliente_selected);
        let empty = Paragraph::new(format!("\n  {message}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = columns.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let table_rows = rows.iter().enumerate().map(|(row_index, cells)| {
        let mut style = Style::default();
        if inactive_flags.get(row_index).copied().unwrap_or(false) {
            style = style
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT);
        }
        if row_index == cursor {
            style = style.bg(Color::DarkGray);
        }
        Row::new(cells.iter().map(|cell| Cell::from(cell.clone()))).style(style)
    });

    let widths = vec![Constraint::Min(8); columns.len().max(1)];
    let table = Table::new(table_rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_form(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let Some(form) = &view_data.form else {
        return;
    };

    let mut lines = Vec::new();
    for (index, field) in form_fields(&form.payload).iter().enumerate() {
        let marker = if index == form.cursor { ">" } else { " " };
        let value = if index == form.cursor {
            match &form.editing {
                Some(buffer) => format!("{buffer}_"),
                None => field.value.clone(),
            }
        } else {
            field.value.clone()
        };
        lines.push(format!("{marker} {}: {value}", field.name));
        if let Some(message) = form.errors.get(field.name) {
            lines.push(format!("    ! {message}"));
        }
    }

    if let Some(entry) = &form.logo_entry {
        lines.push(String::new());
        lines.push(format!("  ruta del logo: {entry}_"));
    } else if let Some(preview) = &view_data.logo_preview {
        lines.push(String::new());
        lines.push(format!("  logo: {}", preview.display()));
    }

    if let Some(totales) = &view_data.totales {
        lines.push(String::new());
        lines.push(format!("  subtotal:        {:>14.2}", totales.subtotal));
        lines.push(format!("  descuento:       {:>14.2}", totales.descuentom));
        lines.push(format!("  retención:       {:>14.2}", totales.retencionm));
        lines.push(format!("  ITBIS:           {:>14.2}", totales.itbism));
        lines.push(format!(
            "  total sin ITBIS: {:>14.2}",
            totales.total_sin_itbis
        ));
        lines.push(format!("  total:           {:>14.2}", totales.total));
    }

    let title = form_title(form);
    let widget = Paragraph::new(lines.join("\n"))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn form_title(form: &FormUiState) -> String {
    match &form.payload {
        FormPayload::Cliente(input) => match input.id {
            Some(id) => format!(" Editar Cliente {} ", id.get()),
            None => " Nuevo Cliente ".to_owned(),
        },
        FormPayload::Proyecto(input) => match input.id {
            Some(id) => format!(" Editar Proyecto {} ", id.get()),
            None => " Nuevo Proyecto ".to_owned(),
        },
        FormPayload::Cotizacion(input) => match input.id {
            Some(id) => format!(" Editar Cotización {} ", id.get()),
            None => " Nueva Cotización ".to_owned(),
        },
    }
}

fn status_text(state: &AppState, view_data: &ViewData, now: Instant) -> String {
    if let Some(notice) = view_data.notice.active(now) {
        return notice.message.clone();
    }
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    match state.mode {
        AppMode::Nav => {
            "tab secciones | j/k filas | enter abrir | / buscar | # id | n nuevo | i inactivos | r restaurar | q salir"
                .to_owned()
        }
        AppMode::Search => "buscar: escriba para filtrar | enter/esc volver".to_owned(),
        AppMode::IdFilter => "filtro por id: escriba un número | enter/esc volver".to_owned(),
        AppMode::Form(_) => {
            "j/k campo | enter editar | s guardar | d eliminar | p pdf | t totales | u logo | esc cerrar"
                .to_owned()
        }
    }
}
