// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod files;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use gestor_app::{
    Cliente, ClienteId, Cotizacion, CotizacionId, Idioma, Proyecto, ProyectoId, ServicioId,
    Totales,
};

/// Uniform wrapper every backend call returns. Decoded into a typed
/// `Result` at the call site; the free-text `error` string is the only
/// failure detail the backend provides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T> {
        if self.success {
            self.data
                .ok_or_else(|| anyhow!("el backend respondió success sin datos"))
        } else {
            Err(anyhow!(self.backend_error()))
        }
    }

    /// For operations that return no payload (delete, restore).
    pub fn into_unit_result(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(anyhow!(self.backend_error()))
        }
    }

    fn backend_error(self) -> String {
        self.error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "error desconocido del backend".to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoRef {
    #[serde(default)]
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClienteRequest {
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
    pub tipo_factura: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProyecto {
    pub id_cliente: ClienteId,
    pub nombre_proyecto: String,
    pub ubicacion: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProyecto {
    pub nombre_proyecto: String,
    pub ubicacion: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCotizacion {
    pub id_cliente: ClienteId,
    pub id_proyecto: ProyectoId,
    pub id_servicio: ServicioId,
    pub moneda: String,
    pub fecha: String,
    pub tasa_moneda: f64,
    pub tiempo_entrega: String,
    pub avance: String,
    pub validez: i32,
    pub estado: String,
    pub idioma: String,
    pub descripcion: String,
    pub retencion: String,
    pub descuentop: f64,
    pub retencionp: f64,
    pub itbisp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateCotizacion {
    pub moneda: String,
    pub fecha: String,
    pub tasa_moneda: f64,
    pub tiempo_entrega: String,
    pub avance: String,
    pub validez: i32,
    pub estado: String,
    pub idioma: String,
    pub descripcion: String,
    pub retencion: String,
    pub descuentop: f64,
    pub retencionp: f64,
    pub itbisp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct TotalesRequest {
    descuentop: f64,
    retencionp: f64,
    itbisp: f64,
}

/// Blocking bridge client for the admin backend. One instance per app run;
/// every method maps to a single backend operation and decodes the uniform
/// envelope.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    tenant: i64,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, token: Option<&str>, tenant: i64, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        url::Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if tenant <= 0 {
            bail!("api.tenant must be positive, got {tenant}");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            token: token
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_owned),
            tenant,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tenant(&self) -> i64 {
        self.tenant
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Tenant-Id", self.tenant.to_string());
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get_envelope<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        let response = self
            .decorate(self.http.get(format!("{}{path}", self.base_url)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_envelope(response)
    }

    fn send_envelope<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>> {
        let response = self
            .decorate(
                self.http
                    .request(method, format!("{}{path}", self.base_url))
                    .json(body),
            )
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_envelope(response)
    }

    fn delete_envelope(&self, path: &str) -> Result<Envelope<serde_json::Value>> {
        let response = self
            .decorate(
                self.http
                    .delete(format!("{}{path}", self.base_url)),
            )
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_envelope(response)
    }

    /// Startup dependency check used by `gestor --check`.
    pub fn ping(&self) -> Result<()> {
        let _clientes = self.list_clientes(false)?;
        Ok(())
    }

    // --- clientes ---

    pub fn list_clientes(&self, incluir_inactivos: bool) -> Result<Vec<Cliente>> {
        let mut path = String::from("/api/clientes");
        if incluir_inactivos {
            path.push_str("?incluir_inactivos=true");
        }
        self.get_envelope(&path)?.into_result()
    }

    pub fn get_cliente(&self, id: ClienteId) -> Result<Cliente> {
        self.get_envelope(&format!("/api/clientes/{}", id.get()))?
            .into_result()
    }

    pub fn create_cliente(&self, request: &ClienteRequest) -> Result<Cliente> {
        self.send_envelope(reqwest::Method::POST, "/api/clientes", request)?
            .into_result()
    }

    pub fn update_cliente(&self, id: ClienteId, request: &ClienteRequest) -> Result<Cliente> {
        self.send_envelope(
            reqwest::Method::PUT,
            &format!("/api/clientes/{}", id.get()),
            request,
        )?
        .into_result()
    }

    pub fn delete_cliente(&self, id: ClienteId) -> Result<()> {
        self.delete_envelope(&format!("/api/clientes/{}", id.get()))?
            .into_unit_result()
    }

    pub fn restore_cliente(&self, id: ClienteId) -> Result<()> {
        self.send_envelope::<serde_json::Value, _>(
            reqwest::Method::POST,
            &format!("/api/clientes/{}/restaurar", id.get()),
            &serde_json::json!({}),
        )?
        .into_unit_result()
    }

    /// Upload a logo image read from `file_path`. The picker collaborator
    /// hands us a filesystem path; the bytes travel as the request body with
    /// a MIME type inferred from the extension.
    pub fn upload_logo(&self, id: ClienteId, file_path: &Path) -> Result<LogoRef> {
        let bytes = std::fs::read(file_path)
            .with_context(|| format!("read logo file {}", file_path.display()))?;
        if bytes.is_empty() {
            bail!("logo file {} is empty", file_path.display());
        }
        let mime = logo_mime_type(file_path)?;

        let response = self
            .decorate(
                self.http
                    .post(format!(
                        "{}/api/clientes/{}/logo",
                        self.base_url,
                        id.get()
                    ))
                    .header("Content-Type", mime)
                    .body(bytes),
            )
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        decode_envelope::<LogoRef>(response)?.into_result()
    }

    pub fn logo_url(&self, id: ClienteId) -> Result<LogoRef> {
        self.get_envelope(&format!("/api/clientes/{}/logo", id.get()))?
            .into_result()
    }

    /// Fetch the logo for a client into the local cache, reusing a cached
    /// copy when present. Returns the local path.
    pub fn fetch_logo(&self, cache_dir: &Path, id: ClienteId) -> Result<std::path::PathBuf> {
        let cached = files::cached_logo_path(cache_dir, id);
        if cached.exists() {
            return Ok(cached);
        }

        let logo = self.logo_url(id)?;
        let response = self
            .http
            .get(&logo.url)
            .send()
            .map_err(|error| connection_error(&logo.url, error))?;
        let status = response.status();
        if !status.is_success() {
            bail!("descarga de logo falló (HTTP {})", status.as_u16());
        }
        let bytes = response.bytes().context("read logo body")?;
        files::store_logo(cache_dir, id, &bytes)
    }

    // --- proyectos ---

    pub fn list_proyectos(
        &self,
        id_cliente: ClienteId,
        incluir_inactivos: bool,
    ) -> Result<Vec<Proyecto>> {
        let mut path = format!("/api/proyectos?id_cliente={}", id_cliente.get());
        if incluir_inactivos {
            path.push_str("&incluir_inactivos=true");
        }
        self.get_envelope(&path)?.into_result()
    }

    pub fn get_proyecto(&self, id: ProyectoId) -> Result<Proyecto> {
        self.get_envelope(&format!("/api/proyectos/{}", id.get()))?
            .into_result()
    }

    pub fn create_proyecto(&self, request: &NewProyecto) -> Result<Proyecto> {
        self.send_envelope(reqwest::Method::POST, "/api/proyectos", request)?
            .into_result()
    }

    pub fn update_proyecto(&self, id: ProyectoId, request: &UpdateProyecto) -> Result<Proyecto> {
        self.send_envelope(
            reqwest::Method::PUT,
            &format!("/api/proyectos/{}", id.get()),
            request,
        )?
        .into_result()
    }

    pub fn delete_proyecto(&self, id: ProyectoId) -> Result<()> {
        self.delete_envelope(&format!("/api/proyectos/{}", id.get()))?
            .into_unit_result()
    }

    pub fn restore_proyecto(&self, id: ProyectoId) -> Result<()> {
        self.send_envelope::<serde_json::Value, _>(
            reqwest::Method::POST,
            &format!("/api/proyectos/{}/restaurar", id.get()),
            &serde_json::json!({}),
        )?
        .into_unit_result()
    }

    // --- cotizaciones ---

    pub fn recent_cotizaciones(&self, limit: usize) -> Result<Vec<Cotizacion>> {
        self.get_envelope(&format!("/api/cotizaciones/recientes?limit={limit}"))?
            .into_result()
    }

    pub fn search_cotizaciones(&self, query: &str) -> Result<Vec<Cotizacion>> {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.get_envelope(&format!("/api/cotizaciones/buscar?q={encoded}"))?
            .into_result()
    }

    pub fn get_cotizacion(&self, id: CotizacionId) -> Result<Cotizacion> {
        self.get_envelope(&format!("/api/cotizaciones/{}", id.get()))?
            .into_result()
    }

    pub fn create_cotizacion(&self, request: &NewCotizacion) -> Result<Cotizacion> {
        self.send_envelope(reqwest::Method::POST, "/api/cotizaciones", request)?
            .into_result()
    }

    pub fn update_cotizacion(
        &self,
        id: CotizacionId,
        request: &UpdateCotizacion,
    ) -> Result<Cotizacion> {
        self.send_envelope(
            reqwest::Method::PUT,
            &format!("/api/cotizaciones/{}", id.get()),
            request,
        )?
        .into_result()
    }

    pub fn delete_cotizacion(&self, id: CotizacionId) -> Result<()> {
        self.delete_envelope(&format!("/api/cotizaciones/{}", id.get()))?
            .into_unit_result()
    }

    pub fn calcular_totales(
        &self,
        id: CotizacionId,
        descuentop: f64,
        retencionp: f64,
        itbisp: f64,
    ) -> Result<Totales> {
        self.send_envelope(
            reqwest::Method::POST,
            &format!("/api/cotizaciones/{}/totales", id.get()),
            &TotalesRequest {
                descuentop,
                retencionp,
                itbisp,
            },
        )?
        .into_result()
    }

    /// Fetch the rendered quotation PDF. The backend ships the bytes as a
    /// base64 string inside the envelope.
    pub fn download_pdf(&self, id: CotizacionId, idioma: Idioma) -> Result<Vec<u8>> {
        let payload: String = self
            .get_envelope(&format!(
                "/api/cotizaciones/{}/pdf?idioma={}",
                id.get(),
                idioma.as_str()
            ))?
            .into_result()?;
        let bytes = BASE64
            .decode(payload.trim())
            .context("decode PDF payload as base64")?;
        if bytes.is_empty() {
            bail!("el backend devolvió un PDF vacío");
        }
        Ok(bytes)
    }
}

fn decode_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<Envelope<T>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(clean_error_response(status, &body));
    }
    response.json().context("decode backend envelope")
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        anyhow!("la API en {base_url} no respondió a tiempo; revise api.timeout o la conexión")
    } else if error.is_connect() {
        anyhow!("no se pudo conectar a la API en {base_url}; revise api.base_url y el servicio")
    } else {
        anyhow!("fallo de red contra {base_url}: {error}")
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    // Error bodies may themselves be envelopes; prefer their message.
    if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        && let Some(message) = envelope.error
        && !message.trim().is_empty()
    {
        return anyhow!("{message} (HTTP {})", status.as_u16());
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        anyhow!("el backend respondió HTTP {}", status.as_u16())
    } else {
        let mut snippet = trimmed.chars().take(200).collect::<String>();
        if snippet.len() < trimmed.len() {
            snippet.push('…');
        }
        anyhow!("el backend respondió HTTP {}: {snippet}", status.as_u16())
    }
}

fn logo_mime_type(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        _ => bail!(
            "tipo de archivo no soportado para logo: {} (use png, jpg o gif)",
            path.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Envelope, logo_mime_type};
    use gestor_app::Cliente;
    use std::path::Path;

    #[test]
    fn envelope_success_yields_data() {
        let envelope: Envelope<Vec<i64>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2,3]}"#).expect("decode");
        assert_eq!(envelope.into_result().expect("data"), vec![1, 2, 3]);
    }

    #[test]
    fn envelope_failure_carries_backend_message() {
        let envelope: Envelope<Vec<Cliente>> =
            serde_json::from_str(r#"{"success":false,"error":"sin permisos"}"#).expect("decode");
        let error = envelope.into_result().expect_err("failure expected");
        assert!(error.to_string().contains("sin permisos"));
    }

    #[test]
    fn envelope_success_without_data_is_an_error_for_typed_calls() {
        let envelope: Envelope<Vec<Cliente>> =
            serde_json::from_str(r#"{"success":true}"#).expect("decode");
        assert!(envelope.into_result().is_err());
    }

    #[test]
    fn envelope_unit_result_ignores_missing_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true}"#).expect("decode");
        assert!(envelope.into_unit_result().is_ok());
    }

    #[test]
    fn logo_mime_type_covers_picker_filters() {
        assert_eq!(
            logo_mime_type(Path::new("/tmp/logo.PNG")).expect("png"),
            "image/png"
        );
        assert_eq!(
            logo_mime_type(Path::new("logo.jpeg")).expect("jpeg"),
            "image/jpeg"
        );
        assert!(logo_mime_type(Path::new("logo.webp")).is_err());
    }
}
