// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoCotizacion {
    Generada,
    Aprobada,
    Rechazada,
    Cancelada,
}

impl EstadoCotizacion {
    pub const ALL: [Self; 4] = [
        Self::Generada,
        Self::Aprobada,
        Self::Rechazada,
        Self::Cancelada,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generada => "GENERADA",
            Self::Aprobada => "APROBADA",
            Self::Rechazada => "RECHAZADA",
            Self::Cancelada => "CANCELADA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "GENERADA" => Some(Self::Generada),
            "APROBADA" => Some(Self::Aprobada),
            "RECHAZADA" => Some(Self::Rechazada),
            "CANCELADA" => Some(Self::Cancelada),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Idioma {
    Es,
    En,
}

impl Idioma {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es => "ES",
            Self::En => "EN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ES" => Some(Self::Es),
            "EN" => Some(Self::En),
            _ => None,
        }
    }
}

/// Retention regime applied by the backend when computing totals. The wire
/// values are the literal option labels the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retencion {
    #[serde(rename = "NINGUNA")]
    Ninguna,
    #[serde(rename = "10%")]
    DiezPorciento,
    #[serde(rename = "5%")]
    CincoPorciento,
    #[serde(rename = "2%")]
    DosPorciento,
}

impl Retencion {
    pub const ALL: [Self; 4] = [
        Self::Ninguna,
        Self::DiezPorciento,
        Self::CincoPorciento,
        Self::DosPorciento,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ninguna => "NINGUNA",
            Self::DiezPorciento => "10%",
            Self::CincoPorciento => "5%",
            Self::DosPorciento => "2%",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NINGUNA" => Some(Self::Ninguna),
            "10%" => Some(Self::DiezPorciento),
            "5%" => Some(Self::CincoPorciento),
            "2%" => Some(Self::DosPorciento),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoFactura {
    Ncfc,
    Ncf,
    Ncg,
    Ncre,
    Ndc,
    Ndd,
}

impl TipoFactura {
    pub const ALL: [Self; 6] = [
        Self::Ncfc,
        Self::Ncf,
        Self::Ncg,
        Self::Ncre,
        Self::Ndc,
        Self::Ndd,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ncfc => "NCFC",
            Self::Ncf => "NCF",
            Self::Ncg => "NCG",
            Self::Ncre => "NCRE",
            Self::Ndc => "NDC",
            Self::Ndd => "NDD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NCFC" => Some(Self::Ncfc),
            "NCF" => Some(Self::Ncf),
            "NCG" => Some(Self::Ncg),
            "NCRE" => Some(Self::Ncre),
            "NDC" => Some(Self::Ndc),
            "NDD" => Some(Self::Ndd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Clientes,
    Proyectos,
    Cotizaciones,
}

impl SectionKind {
    pub const ALL: [Self; 3] = [Self::Clientes, Self::Proyectos, Self::Cotizaciones];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clientes => "clientes",
            Self::Proyectos => "proyectos",
            Self::Cotizaciones => "cotizaciones",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clientes" => Some(Self::Clientes),
            "proyectos" => Some(Self::Proyectos),
            "cotizaciones" => Some(Self::Cotizaciones),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Cliente,
    Proyecto,
    Cotizacion,
}

/// Client record as served by the backend. Field names mirror the wire JSON;
/// timestamps stay as the raw strings the API emits (it mixes fractional
/// precisions and omits timezones, so nothing downstream parses them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: ClienteId,
    #[serde(default)]
    pub id_tenant: i64,
    pub nombre: String,
    #[serde(default)]
    pub nombre_comercial: String,
    pub numero: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub ciudad: String,
    #[serde(default)]
    pub provincia: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub representante: String,
    #[serde(default)]
    pub correo_representante: String,
    pub tipo_factura: TipoFactura,
    pub activo: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proyecto {
    pub id: ProyectoId,
    #[serde(default)]
    pub id_tenant: i64,
    pub id_cliente: ClienteId,
    pub nombre_proyecto: String,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(default)]
    pub descripcion: String,
    pub activo: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cotizacion {
    pub id: CotizacionId,
    #[serde(default)]
    pub id_tenant: i64,
    pub id_cliente: ClienteId,
    pub id_proyecto: ProyectoId,
    pub id_servicio: ServicioId,
    pub moneda: String,
    pub fecha: String,
    pub tasa_moneda: f64,
    #[serde(default)]
    pub tiempo_entrega: String,
    #[serde(default)]
    pub avance: String,
    pub validez: i32,
    pub estado: EstadoCotizacion,
    pub idioma: Idioma,
    #[serde(default)]
    pub descripcion: String,
    pub retencion: Retencion,
    pub descuentop: f64,
    pub retencionp: f64,
    pub itbisp: f64,
    pub activo: bool,
    // Joined display names; the list endpoint includes them, detail
    // endpoints may not.
    #[serde(default)]
    pub cliente_nombre: Option<String>,
    #[serde(default)]
    pub proyecto_nombre: Option<String>,
    #[serde(default)]
    pub servicio_nombre: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Backend-computed money breakdown for a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Totales {
    pub subtotal: f64,
    pub descuentom: f64,
    pub retencionm: f64,
    pub itbism: f64,
    pub total_sin_itbis: f64,
    pub total: f64,
}
