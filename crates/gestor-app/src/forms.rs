// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use time::Date;
use time::macros::format_description;

use crate::{
    Cliente, ClienteId, Cotizacion, CotizacionId, EstadoCotizacion, FormKind, Idioma, Proyecto,
    ProyectoId, Retencion, ServicioId, TipoFactura,
};

const FECHA_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Field-indexed validation messages, rendered inline next to the offending
/// input. Never raised as an error; an empty map means the form may be
/// submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClienteFormInput {
    pub id: Option<ClienteId>,
    pub nombre: String,
    pub nombre_comercial: String,
    pub numero: String,
    pub correo: String,
    pub direccion: String,
    pub ciudad: String,
    pub provincia: String,
    pub telefono: String,
    pub representante: String,
    pub correo_representante: String,
    pub tipo_factura: TipoFactura,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProyectoFormInput {
    pub id: Option<ProyectoId>,
    pub id_cliente: ClienteId,
    pub nombre_proyecto: String,
    pub ubicacion: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CotizacionFormInput {
    pub id: Option<CotizacionId>,
    pub id_cliente: ClienteId,
    pub id_proyecto: ProyectoId,
    pub id_servicio: ServicioId,
    pub moneda: String,
    pub fecha: String,
    pub tasa_moneda: f64,
    pub tiempo_entrega: String,
    pub avance: String,
    pub validez: i32,
    pub estado: EstadoCotizacion,
    pub idioma: Idioma,
    pub descripcion: String,
    pub retencion: Retencion,
    pub descuentop: f64,
    pub retencionp: f64,
    pub itbisp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    Cliente(ClienteFormInput),
    Proyecto(ProyectoFormInput),
    Cotizacion(CotizacionFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Cliente(_) => FormKind::Cliente,
            Self::Proyecto(_) => FormKind::Proyecto,
            Self::Cotizacion(_) => FormKind::Cotizacion,
        }
    }

    /// Blank form for a "create new" request. `fecha` is the only field the
    /// caller must fill in (today's date); the state machines stay clock-free.
    pub fn blank_for(kind: FormKind, fecha: &str) -> Self {
        match kind {
            FormKind::Cliente => Self::Cliente(ClienteFormInput {
                id: None,
                nombre: String::new(),
                nombre_comercial: String::new(),
                numero: String::new(),
                correo: String::new(),
                direccion: String::new(),
                ciudad: String::new(),
                provincia: String::new(),
                telefono: String::new(),
                representante: String::new(),
                correo_representante: String::new(),
                tipo_factura: TipoFactura::Ncfc,
            }),
            FormKind::Proyecto => Self::Proyecto(ProyectoFormInput {
                id: None,
                id_cliente: ClienteId::new(0),
                nombre_proyecto: String::new(),
                ubicacion: String::new(),
                descripcion: String::new(),
            }),
            FormKind::Cotizacion => Self::Cotizacion(CotizacionFormInput {
                id: None,
                id_cliente: ClienteId::new(0),
                id_proyecto: ProyectoId::new(0),
                id_servicio: ServicioId::new(0),
                moneda: "RD$".to_owned(),
                fecha: fecha.to_owned(),
                tasa_moneda: 1.0,
                tiempo_entrega: "30".to_owned(),
                avance: "60".to_owned(),
                validez: 30,
                estado: EstadoCotizacion::Generada,
                idioma: Idioma::Es,
                descripcion: String::new(),
                retencion: Retencion::Ninguna,
                descuentop: 0.0,
                retencionp: 0.0,
                itbisp: 0.0,
            }),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        match self {
            Self::Cliente(cliente) => cliente.validate(),
            Self::Proyecto(proyecto) => proyecto.validate(),
            Self::Cotizacion(cotizacion) => cotizacion.validate(),
        }
    }
}

pub fn format_fecha(date: Date) -> String {
    date.format(FECHA_FORMAT)
        .unwrap_or_else(|_| String::new())
}

pub fn parse_fecha(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), FECHA_FORMAT).ok()
}

impl ClienteFormInput {
    pub fn from_entity(cliente: &Cliente) -> Self {
        Self {
            id: Some(cliente.id),
            nombre: cliente.nombre.clone(),
            nombre_comercial: cliente.nombre_comercial.clone(),
            numero: cliente.numero.clone(),
            correo: cliente.correo.clone(),
            direccion: cliente.direccion.clone(),
            ciudad: cliente.ciudad.clone(),
            provincia: cliente.provincia.clone(),
            telefono: cliente.telefono.clone(),
            representante: cliente.representante.clone(),
            correo_representante: cliente.correo_representante.clone(),
            tipo_factura: cliente.tipo_factura,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.nombre.trim().is_empty() {
            errors.push("nombre", "el nombre es requerido");
        }
        if self.numero.trim().is_empty() {
            errors.push("numero", "el RNC es requerido");
        }
        if !self.correo.trim().is_empty() && !self.correo.contains('@') {
            errors.push("correo", "correo no válido");
        }
        if !self.correo_representante.trim().is_empty() && !self.correo_representante.contains('@')
        {
            errors.push("correo_representante", "correo no válido");
        }
        errors
    }
}

impl ProyectoFormInput {
    pub fn from_entity(proyecto: &Proyecto) -> Self {
        Self {
            id: Some(proyecto.id),
            id_cliente: proyecto.id_cliente,
            nombre_proyecto: proyecto.nombre_proyecto.clone(),
            ubicacion: proyecto.ubicacion.clone(),
            descripcion: proyecto.descripcion.clone(),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.id_cliente.get() <= 0 {
            errors.push("id_cliente", "seleccione un cliente");
        }
        if self.nombre_proyecto.trim().is_empty() {
            errors.push("nombre_proyecto", "el nombre del proyecto es requerido");
        }
        errors
    }
}

impl CotizacionFormInput {
    pub fn from_entity(cotizacion: &Cotizacion) -> Self {
        Self {
            id: Some(cotizacion.id),
            id_cliente: cotizacion.id_cliente,
            id_proyecto: cotizacion.id_proyecto,
            id_servicio: cotizacion.id_servicio,
            moneda: cotizacion.moneda.clone(),
            fecha: cotizacion.fecha.clone(),
            tasa_moneda: cotizacion.tasa_moneda,
            tiempo_entrega: cotizacion.tiempo_entrega.clone(),
            avance: cotizacion.avance.clone(),
            validez: cotizacion.validez,
            estado: cotizacion.estado,
            idioma: cotizacion.idioma,
            descripcion: cotizacion.descripcion.clone(),
            retencion: cotizacion.retencion,
            descuentop: cotizacion.descuentop,
            retencionp: cotizacion.retencionp,
            itbisp: cotizacion.itbisp,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if self.id_cliente.get() <= 0 {
            errors.push("id_cliente", "seleccione un cliente");
        }
        if self.id_proyecto.get() <= 0 {
            errors.push("id_proyecto", "seleccione un proyecto");
        }
        if self.id_servicio.get() <= 0 {
            errors.push("id_servicio", "seleccione un servicio");
        }
        if self.moneda.trim().is_empty() {
            errors.push("moneda", "la moneda es requerida");
        }
        if parse_fecha(&self.fecha).is_none() {
            errors.push("fecha", "fecha inválida, use AAAA-MM-DD");
        }
        if self.tasa_moneda <= 0.0 {
            errors.push("tasa_moneda", "la tasa debe ser positiva");
        }
        if self.validez <= 0 {
            errors.push("validez", "la validez debe ser positiva");
        }
        for (field, value) in [
            ("descuentop", self.descuentop),
            ("retencionp", self.retencionp),
            ("itbisp", self.itbisp),
        ] {
            if !(0.0..=100.0).contains(&value) {
                errors.push(field, "porcentaje fuera de rango (0-100)");
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::{FormPayload, ValidationErrors, format_fecha, parse_fecha};
    use crate::{ClienteId, FormKind, ProyectoId, ServicioId};
    use time::{Date, Month};

    #[test]
    fn blank_cliente_defaults_to_ncfc() {
        let FormPayload::Cliente(cliente) = FormPayload::blank_for(FormKind::Cliente, "") else {
            panic!("cliente blank expected");
        };
        assert_eq!(cliente.tipo_factura.as_str(), "NCFC");
        assert!(cliente.id.is_none());
    }

    #[test]
    fn blank_cotizacion_carries_page_defaults() {
        let FormPayload::Cotizacion(cotizacion) =
            FormPayload::blank_for(FormKind::Cotizacion, "2026-03-15")
        else {
            panic!("cotizacion blank expected");
        };
        assert_eq!(cotizacion.moneda, "RD$");
        assert_eq!(cotizacion.fecha, "2026-03-15");
        assert_eq!(cotizacion.tasa_moneda, 1.0);
        assert_eq!(cotizacion.tiempo_entrega, "30");
        assert_eq!(cotizacion.avance, "60");
        assert_eq!(cotizacion.validez, 30);
        assert_eq!(cotizacion.estado.as_str(), "GENERADA");
        assert_eq!(cotizacion.idioma.as_str(), "ES");
        assert_eq!(cotizacion.retencion.as_str(), "NINGUNA");
    }

    #[test]
    fn cliente_validation_indexes_errors_by_field() {
        let FormPayload::Cliente(mut cliente) = FormPayload::blank_for(FormKind::Cliente, "")
        else {
            panic!("cliente blank expected");
        };
        cliente.correo = "sin-arroba".to_owned();

        let errors = cliente.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.get("nombre").is_some());
        assert!(errors.get("numero").is_some());
        assert_eq!(errors.get("correo"), Some("correo no válido"));
        assert!(errors.get("direccion").is_none());
    }

    #[test]
    fn cliente_validation_accepts_complete_input() {
        let FormPayload::Cliente(mut cliente) = FormPayload::blank_for(FormKind::Cliente, "")
        else {
            panic!("cliente blank expected");
        };
        cliente.nombre = "Acme SRL".to_owned();
        cliente.numero = "101-23456-7".to_owned();
        cliente.correo = "ventas@acme.do".to_owned();
        assert!(cliente.validate().is_empty());
    }

    #[test]
    fn proyecto_validation_requires_a_client() {
        let FormPayload::Proyecto(mut proyecto) = FormPayload::blank_for(FormKind::Proyecto, "")
        else {
            panic!("proyecto blank expected");
        };
        proyecto.nombre_proyecto = "Nave industrial".to_owned();

        let errors = proyecto.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("id_cliente").is_some());

        proyecto.id_cliente = ClienteId::new(4);
        assert!(proyecto.validate().is_empty());
    }

    #[test]
    fn cotizacion_validation_checks_dates_and_percentages() {
        let FormPayload::Cotizacion(mut cotizacion) =
            FormPayload::blank_for(FormKind::Cotizacion, "2026-03-15")
        else {
            panic!("cotizacion blank expected");
        };
        cotizacion.id_cliente = ClienteId::new(1);
        cotizacion.id_proyecto = ProyectoId::new(2);
        cotizacion.id_servicio = ServicioId::new(3);
        assert!(cotizacion.validate().is_empty());

        cotizacion.fecha = "15/03/2026".to_owned();
        cotizacion.descuentop = 130.0;
        let errors = cotizacion.validate();
        assert!(errors.get("fecha").is_some());
        assert_eq!(
            errors.get("descuentop"),
            Some("porcentaje fuera de rango (0-100)")
        );
    }

    #[test]
    fn fecha_helpers_round_trip() {
        let date = Date::from_calendar_date(2026, Month::March, 15).expect("valid date");
        let raw = format_fecha(date);
        assert_eq!(raw, "2026-03-15");
        assert_eq!(parse_fecha(&raw), Some(date));
        assert_eq!(parse_fecha("2026-3-15"), None);
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationErrors::default();
        errors.push("nombre", "primero");
        errors.push("nombre", "segundo");
        assert_eq!(errors.get("nombre"), Some("primero"));
        assert_eq!(errors.len(), 1);
    }
}
