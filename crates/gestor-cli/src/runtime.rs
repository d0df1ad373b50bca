// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use gestor_api::{
    Client, ClienteRequest, NewCotizacion, NewProyecto, UpdateCotizacion, UpdateProyecto, files,
};
use gestor_app::{
    Cliente, ClienteFormInput, ClienteId, Cotizacion, CotizacionFormInput, CotizacionId, Idioma,
    Proyecto, ProyectoFormInput, ProyectoId, Totales, format_fecha,
};
use gestor_tui::AppRuntime;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Production runtime: every operation goes through the backend bridge.
pub struct ApiRuntime {
    client: Client,
    cache_dir: PathBuf,
    download_dir: PathBuf,
    recent_limit: usize,
}

impl ApiRuntime {
    pub fn new(
        client: Client,
        cache_dir: PathBuf,
        download_dir: PathBuf,
        recent_limit: usize,
    ) -> Self {
        Self {
            client,
            cache_dir,
            download_dir,
            recent_limit,
        }
    }
}

fn cliente_request(input: &ClienteFormInput) -> ClienteRequest {
    ClienteRequest {
        nombre: input.nombre.clone(),
        nombre_comercial: input.nombre_comercial.clone(),
        numero: input.numero.clone(),
        correo: input.correo.clone(),
        direccion: input.direccion.clone(),
        ciudad: input.ciudad.clone(),
        provincia: input.provincia.clone(),
        telefono: input.telefono.clone(),
        representante: input.representante.clone(),
        correo_representante: input.correo_representante.clone(),
        tipo_factura: input.tipo_factura.as_str().to_owned(),
    }
}

impl AppRuntime for ApiRuntime {
    fn load_clientes(&mut self, include_inactive: bool) -> Result<Vec<Cliente>> {
        self.client.list_clientes(include_inactive)
    }

    fn load_proyectos(
        &mut self,
        id_cliente: ClienteId,
        include_inactive: bool,
    ) -> Result<Vec<Proyecto>> {
        self.client.list_proyectos(id_cliente, include_inactive)
    }

    fn load_cotizaciones(&mut self) -> Result<Vec<Cotizacion>> {
        self.client.recent_cotizaciones(self.recent_limit)
    }

    fn save_cliente(&mut self, input: &ClienteFormInput) -> Result<Cliente> {
        let request = cliente_request(input);
        match input.id {
            Some(id) => self.client.update_cliente(id, &request),
            None => self.client.create_cliente(&request),
        }
    }

    fn save_proyecto(&mut self, input: &ProyectoFormInput) -> Result<Proyecto> {
        match input.id {
            Some(id) => self.client.update_proyecto(
                id,
                &UpdateProyecto {
                    nombre_proyecto: input.nombre_proyecto.clone(),
                    ubicacion: input.ubicacion.clone(),
                    descripcion: input.descripcion.clone(),
                },
            ),
            None => self.client.create_proyecto(&NewProyecto {
                id_cliente: input.id_cliente,
                nombre_proyecto: input.nombre_proyecto.clone(),
                ubicacion: input.ubicacion.clone(),
                descripcion: input.descripcion.clone(),
            }),
        }
    }

    fn save_cotizacion(&mut self, input: &CotizacionFormInput) -> Result<Cotizacion> {
        match input.id {
            Some(id) => self.client.update_cotizacion(
                id,
                &UpdateCotizacion {
                    moneda: input.moneda.clone(),
                    fecha: input.fecha.clone(),
                    tasa_moneda: input.tasa_moneda,
                    tiempo_entrega: input.tiempo_entrega.clone(),
                    avance: input.avance.clone(),
                    validez: input.validez,
                    estado: input.estado.as_str().to_owned(),
                    idioma: input.idioma.as_str().to_owned(),
                    descripcion: input.descripcion.clone(),
                    retencion: input.retencion.as_str().to_owned(),
                    descuentop: input.descuentop,
                    retencionp: input.retencionp,
                    itbisp: input.itbisp,
                },
            ),
            None => self.client.create_cotizacion(&NewCotizacion {
                id_cliente: input.id_cliente,
                id_proyecto: input.id_proyecto,
                id_servicio: input.id_servicio,
                moneda: input.moneda.clone(),
                fecha: input.fecha.clone(),
                tasa_moneda: input.tasa_moneda,
                tiempo_entrega: input.tiempo_entrega.clone(),
                avance: input.avance.clone(),
                validez: input.validez,
                estado: input.estado.as_str().to_owned(),
                idioma: input.idioma.as_str().to_owned(),
                descripcion: input.descripcion.clone(),
                retencion: input.retencion.as_str().to_owned(),
                descuentop: input.descuentop,
                retencionp: input.retencionp,
                itbisp: input.itbisp,
            }),
        }
    }

    fn delete_cliente(&mut self, id: ClienteId) -> Result<()> {
        self.client.delete_cliente(id)
    }

    fn delete_proyecto(&mut self, id: ProyectoId) -> Result<()> {
        self.client.delete_proyecto(id)
    }

    fn delete_cotizacion(&mut self, id: CotizacionId) -> Result<()> {
        self.client.delete_cotizacion(id)
    }

    fn restore_cliente(&mut self, id: ClienteId) -> Result<()> {
        self.client.restore_cliente(id)
    }

    fn restore_proyecto(&mut self, id: ProyectoId) -> Result<()> {
        self.client.restore_proyecto(id)
    }

    fn calcular_totales(
        &mut self,
        id: CotizacionId,
        descuentop: f64,
        retencionp: f64,
        itbisp: f64,
    ) -> Result<Totales> {
        self.client
            .calcular_totales(id, descuentop, retencionp, itbisp)
    }

    fn download_pdf(&mut self, id: CotizacionId, idioma: Idioma) -> Result<PathBuf> {
        let bytes = self.client.download_pdf(id, idioma)?;
        files::write_pdf(&self.download_dir, id, &bytes)
    }

    fn upload_logo(&mut self, id: ClienteId, file_path: &Path) -> Result<()> {
        self.client.upload_logo(id, file_path)?;
        // Invalidate the cached copy so the next preview refetches.
        let cached = files::cached_logo_path(&self.cache_dir, id);
        let _ = std::fs::remove_file(cached);
        Ok(())
    }

    fn logo_preview(&mut self, id: ClienteId) -> Result<Option<PathBuf>> {
        match self.client.fetch_logo(&self.cache_dir, id) {
            Ok(path) => Ok(Some(path)),
            Err(_) => Ok(None),
        }
    }

    fn today(&mut self) -> String {
        format_fecha(OffsetDateTime::now_utc().date())
    }
}

/// `--demo` runtime: a seeded in-memory catalog, no network. Deletes are
/// soft, mirroring the backend's `activo` flag.
pub struct DemoRuntime {
    clientes: Vec<Cliente>,
    proyectos: Vec<Proyecto>,
    cotizaciones: Vec<Cotizacion>,
    next_cliente: i64,
    next_proyecto: i64,
    next_cotizacion: i64,
    download_dir: PathBuf,
}

impl DemoRuntime {
    pub fn seeded(seed: u64, download_dir: PathBuf) -> Self {
        let mut faker = gestor_testkit::AdmFaker::new(seed);
        let (clientes, proyectos, cotizaciones) = faker.catalogo_demo(6, 2);
        let next_cliente = clientes.iter().map(|c| c.id.get()).max().unwrap_or(0);
        let next_proyecto = proyectos.iter().map(|p| p.id.get()).max().unwrap_or(0);
        let next_cotizacion = cotizaciones.iter().map(|c| c.id.get()).max().unwrap_or(0);
        Self {
            clientes,
            proyectos,
            cotizaciones,
            next_cliente,
            next_proyecto,
            next_cotizacion,
            download_dir,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Same money breakdown the backend computes, over a per-quotation demo
/// subtotal. Retention applies over the ITBIS amount.
fn demo_totales(id: CotizacionId, descuentop: f64, retencionp: f64, itbisp: f64) -> Totales {
    let subtotal = 50_000.0 + (id.get() as f64) * 12_500.0;
    let descuentom = round2(subtotal * descuentop / 100.0);
    let base = subtotal - descuentom;
    let itbism = round2(base * itbisp / 100.0);
    let retencionm = round2(retencionp * itbism / 100.0);
    Totales {
        subtotal,
        descuentom,
        retencionm,
        itbism,
        total_sin_itbis: base,
        total: round2(base + itbism - retencionm),
    }
}

impl AppRuntime for DemoRuntime {
    fn load_clientes(&mut self, include_inactive: bool) -> Result<Vec<Cliente>> {
        Ok(self
            .clientes
            .iter()
            .filter(|c| include_inactive || c.activo)
            .cloned()
            .collect())
    }

    fn load_proyectos(
        &mut self,
        id_cliente: ClienteId,
        include_inactive: bool,
    ) -> Result<Vec<Proyecto>> {
        Ok(self
            .proyectos
            .iter()
            .filter(|p| p.id_cliente == id_cliente)
            .filter(|p| include_inactive || p.activo)
            .cloned()
            .collect())
    }

    fn load_cotizaciones(&mut self) -> Result<Vec<Cotizacion>> {
        Ok(self
            .cotizaciones
            .iter()
            .filter(|c| c.activo)
            .cloned()
            .collect())
    }

    fn save_cliente(&mut self, input: &ClienteFormInput) -> Result<Cliente> {
        let fecha = gestor_testkit::fixture_fecha();
        let id = match input.id {
            Some(id) => id,
            None => {
                self.next_cliente += 1;
                ClienteId::new(self.next_cliente)
            }
        };
        let cliente = Cliente {
            id,
            id_tenant: 1,
            nombre: input.nombre.clone(),
            nombre_comercial: input.nombre_comercial.clone(),
            numero: input.numero.clone(),
            correo: input.correo.clone(),
            direccion: input.direccion.clone(),
            ciudad: input.ciudad.clone(),
            provincia: input.provincia.clone(),
            telefono: input.telefono.clone(),
            representante: input.representante.clone(),
            correo_representante: input.correo_representante.clone(),
            tipo_factura: input.tipo_factura,
            activo: true,
            created_at: format!("{fecha}T08:00:00"),
            updated_at: format!("{fecha}T08:00:00"),
        };
        self.clientes.retain(|c| c.id != id);
        self.clientes.push(cliente.clone());
        Ok(cliente)
    }

    fn save_proyecto(&mut self, input: &ProyectoFormInput) -> Result<Proyecto> {
        let fecha = gestor_testkit::fixture_fecha();
        let id = match input.id {
            Some(id) => id,
            None => {
                self.next_proyecto += 1;
                ProyectoId::new(self.next_proyecto)
            }
        };
        let proyecto = Proyecto {
            id,
            id_tenant: 1,
            id_cliente: input.id_cliente,
            nombre_proyecto: input.nombre_proyecto.clone(),
            ubicacion: input.ubicacion.clone(),
            descripcion: input.descripcion.clone(),
            activo: true,
            created_at: format!("{fecha}T09:00:00"),
            updated_at: format!("{fecha}T09:00:00"),
        };
        self.proyectos.retain(|p| p.id != id);
        self.proyectos.push(proyecto.clone());
        Ok(proyecto)
    }

    fn save_cotizacion(&mut self, input: &CotizacionFormInput) -> Result<Cotizacion> {
        let fecha = gestor_testkit::fixture_fecha();
        let id = match input.id {
            Some(id) => id,
            None => {
                self.next_cotizacion += 1;
                CotizacionId::new(self.next_cotizacion)
            }
        };
        let cliente_nombre = self
            .clientes
            .iter()
            .find(|c| c.id == input.id_cliente)
            .map(|c| c.nombre.clone());
        let proyecto_nombre = self
            .proyectos
            .iter()
            .find(|p| p.id == input.id_proyecto)
            .map(|p| p.nombre_proyecto.clone());
        let cotizacion = Cotizacion {
            id,
            id_tenant: 1,
            id_cliente: input.id_cliente,
            id_proyecto: input.id_proyecto,
            id_servicio: input.id_servicio,
            moneda: input.moneda.clone(),
            fecha: input.fecha.clone(),
            tasa_moneda: input.tasa_moneda,
            tiempo_entrega: input.tiempo_entrega.clone(),
            avance: input.avance.clone(),
            validez: input.validez,
            estado: input.estado,
            idioma: input.idioma,
            descripcion: input.descripcion.clone(),
            retencion: input.retencion,
            descuentop: input.descuentop,
            retencionp: input.retencionp,
            itbisp: input.itbisp,
            activo: true,
            cliente_nombre,
            proyecto_nombre,
            servicio_nombre: None,
            created_at: format!("{fecha}T10:00:00"),
            updated_at: format!("{fecha}T10:00:00"),
        };
        self.cotizaciones.retain(|c| c.id != id);
        self.cotizaciones.push(cotizacion.clone());
        Ok(cotizacion)
    }

    fn delete_cliente(&mut self, id: ClienteId) -> Result<()> {
        for cliente in &mut self.clientes {
            if cliente.id == id {
                cliente.activo = false;
            }
        }
        Ok(())
    }

    fn delete_proyecto(&mut self, id: ProyectoId) -> Result<()> {
        for proyecto in &mut self.proyectos {
            if proyecto.id == id {
                proyecto.activo = false;
            }
        }
        Ok(())
    }

    fn delete_cotizacion(&mut self, id: CotizacionId) -> Result<()> {
        for cotizacion in &mut self.cotizaciones {
            if cotizacion.id == id {
                cotizacion.activo = false;
            }
        }
        Ok(())
    }

    fn restore_cliente(&mut self, id: ClienteId) -> Result<()> {
        for cliente in &mut self.clientes {
            if cliente.id == id {
                cliente.activo = true;
            }
        }
        Ok(())
    }

    fn restore_proyecto(&mut self, id: ProyectoId) -> Result<()> {
        for proyecto in &mut self.proyectos {
            if proyecto.id == id {
                proyecto.activo = true;
            }
        }
        Ok(())
    }

    fn calcular_totales(
        &mut self,
        id: CotizacionId,
        descuentop: f64,
        retencionp: f64,
        itbisp: f64,
    ) -> Result<Totales> {
        Ok(demo_totales(id, descuentop, retencionp, itbisp))
    }

    fn download_pdf(&mut self, id: CotizacionId, _idioma: Idioma) -> Result<PathBuf> {
        files::write_pdf(&self.download_dir, id, b"%PDF-1.4\n% demo\n")
    }

    fn upload_logo(&mut self, _id: ClienteId, file_path: &Path) -> Result<()> {
        std::fs::metadata(file_path)
            .map(|_| ())
            .map_err(|error| anyhow::anyhow!("no se pudo leer {}: {error}", file_path.display()))
    }

    fn logo_preview(&mut self, _id: ClienteId) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    fn today(&mut self) -> String {
        gestor_testkit::fixture_fecha().to_owned()
    }
}
