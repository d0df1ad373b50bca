// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use gestor_app::{
    Cliente, ClienteId, Cotizacion, CotizacionId, EstadoCotizacion, Idioma, Proyecto, ProyectoId,
    Retencion, ServicioId, TipoFactura,
};

const NOMBRES_EMPRESA: [&str; 12] = [
    "Constructora del Este",
    "Inversiones Caonabo",
    "Grupo Yaque",
    "Ferretería La Rotonda",
    "Distribuidora Ozama",
    "Ingeniería Cibao",
    "Almacenes Duarte",
    "Servicios Técnicos Macorís",
    "Agroindustria del Valle",
    "Transporte Higüamo",
    "Soluciones Urbanas Colonial",
    "Energía del Caribe",
];

const NOMBRES_COMERCIALES: [&str; 8] = [
    "CDE", "Caonabo", "Yaque", "La Rotonda", "Ozama", "Cibao", "Duarte", "STM",
];

const CIUDADES: [&str; 10] = [
    "Santo Domingo",
    "Santiago",
    "La Romana",
    "San Pedro de Macorís",
    "Puerto Plata",
    "Higüey",
    "La Vega",
    "San Cristóbal",
    "Moca",
    "Baní",
];

const PROVINCIAS: [&str; 10] = [
    "Distrito Nacional",
    "Santiago",
    "La Romana",
    "San Pedro de Macorís",
    "Puerto Plata",
    "La Altagracia",
    "La Vega",
    "San Cristóbal",
    "Espaillat",
    "Peravia",
];

const NOMBRES_PERSONA: [&str; 12] = [
    "José Rodríguez",
    "María Fernández",
    "Pedro Guzmán",
    "Ana Castillo",
    "Luis Peña",
    "Carmen Reyes",
    "Rafael Santana",
    "Laura Mejía",
    "Miguel Tavárez",
    "Rosa Núñez",
    "Juan de la Cruz",
    "Patricia Vargas",
];

const NOMBRES_PROYECTO: [&str; 10] = [
    "Nave industrial Haina",
    "Edificio residencial Bella Vista",
    "Remodelación de oficinas corporativas",
    "Subestación eléctrica zona franca",
    "Planta de tratamiento La Caleta",
    "Centro comercial Av. España",
    "Ampliación de almacén logístico",
    "Torre de apartamentos Naco",
    "Estación de bombeo Los Alcarrizos",
    "Parqueo en estructura Piantini",
];

const UBICACIONES: [&str; 8] = [
    "Haina, San Cristóbal",
    "Bella Vista, Santo Domingo",
    "Zona Franca Las Américas",
    "La Caleta, Boca Chica",
    "Av. España, Santo Domingo Este",
    "Naco, Distrito Nacional",
    "Los Alcarrizos",
    "Piantini, Distrito Nacional",
];

const SERVICIOS: [&str; 6] = [
    "Diseño eléctrico",
    "Diseño estructural",
    "Supervisión de obra",
    "Levantamiento topográfico",
    "Estudio de suelos",
    "Diseño hidrosanitario",
];

const FECHA_REFERENCIA: &str = "2026-02-19";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic fixture generator for the three entity families. Seeded, so
/// two fakers with the same seed produce the same records.
#[derive(Debug, Clone)]
pub struct AdmFaker {
    rng: DeterministicRng,
}

impl AdmFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn cliente(&mut self, id: i64) -> Cliente {
        let nombre = self.pick(&NOMBRES_EMPRESA);
        let index = self.rng.int_n(CIUDADES.len());
        let representante = self.pick(&NOMBRES_PERSONA);
        let slug = nombre
            .split_whitespace()
            .next()
            .unwrap_or("empresa")
            .to_lowercase();
        Cliente {
            id: ClienteId::new(id),
            id_tenant: 1,
            nombre: nombre.to_owned(),
            nombre_comercial: self.pick(&NOMBRES_COMERCIALES).to_owned(),
            numero: format!(
                "1-{:02}-{:05}-{}",
                self.int_range(10, 99),
                self.int_range(10_000, 99_999),
                self.int_range(1, 9),
            ),
            correo: format!("info@{slug}.com.do"),
            direccion: format!("Calle {} #{}", self.pick(&NOMBRES_COMERCIALES), id),
            ciudad: CIUDADES[index].to_owned(),
            provincia: PROVINCIAS[index].to_owned(),
            telefono: format!(
                "(809) {:03}-{:04}",
                self.int_range(200, 999),
                self.int_range(0, 9_999),
            ),
            representante: representante.to_owned(),
            correo_representante: format!(
                "{}@{slug}.com.do",
                representante
                    .split_whitespace()
                    .next()
                    .unwrap_or("contacto")
                    .to_lowercase()
            ),
            tipo_factura: TipoFactura::ALL[self.rng.int_n(TipoFactura::ALL.len())],
            activo: true,
            created_at: format!("{FECHA_REFERENCIA}T08:00:00"),
            updated_at: format!("{FECHA_REFERENCIA}T08:00:00"),
        }
    }

    pub fn proyecto(&mut self, id: i64, id_cliente: ClienteId) -> Proyecto {
        Proyecto {
            id: ProyectoId::new(id),
            id_tenant: 1,
            id_cliente,
            nombre_proyecto: self.pick(&NOMBRES_PROYECTO).to_owned(),
            ubicacion: self.pick(&UBICACIONES).to_owned(),
            descripcion: format!(
                "Alcance: {} y {}",
                SERVICIOS[self.rng.int_n(SERVICIOS.len())].to_lowercase(),
                SERVICIOS[self.rng.int_n(SERVICIOS.len())].to_lowercase(),
            ),
            activo: true,
            created_at: format!("{FECHA_REFERENCIA}T09:00:00"),
            updated_at: format!("{FECHA_REFERENCIA}T09:00:00"),
        }
    }

    pub fn cotizacion(
        &mut self,
        id: i64,
        cliente: &Cliente,
        proyecto: &Proyecto,
    ) -> Cotizacion {
        let servicio = self.pick(&SERVICIOS);
        let estado = EstadoCotizacion::ALL[self.rng.int_n(EstadoCotizacion::ALL.len())];
        Cotizacion {
            id: CotizacionId::new(id),
            id_tenant: 1,
            id_cliente: cliente.id,
            id_proyecto: proyecto.id,
            id_servicio: ServicioId::new((self.rng.int_n(SERVICIOS.len()) + 1) as i64),
            moneda: "RD$".to_owned(),
            fecha: FECHA_REFERENCIA.to_owned(),
            tasa_moneda: 1.0,
            tiempo_entrega: "30".to_owned(),
            avance: "60".to_owned(),
            validez: 30,
            estado,
            idioma: Idioma::Es,
            descripcion: format!("{servicio} para {}", proyecto.nombre_proyecto),
            retencion: Retencion::Ninguna,
            descuentop: 0.0,
            retencionp: 0.0,
            itbisp: 18.0,
            activo: true,
            cliente_nombre: Some(cliente.nombre.clone()),
            proyecto_nombre: Some(proyecto.nombre_proyecto.clone()),
            servicio_nombre: Some(servicio.to_owned()),
            created_at: format!("{FECHA_REFERENCIA}T10:00:00"),
            updated_at: format!("{FECHA_REFERENCIA}T10:00:00"),
        }
    }

    /// A small, internally consistent catalog triple for page-level tests
    /// and the demo runtime.
    pub fn catalogo_demo(
        &mut self,
        clientes: usize,
        proyectos_por_cliente: usize,
    ) -> (Vec<Cliente>, Vec<Proyecto>, Vec<Cotizacion>) {
        let mut lista_clientes = Vec::with_capacity(clientes);
        let mut lista_proyectos = Vec::new();
        let mut lista_cotizaciones = Vec::new();

        let mut proyecto_id = 0;
        let mut cotizacion_id = 0;
        for cliente_index in 0..clientes {
            let cliente = self.cliente((cliente_index + 1) as i64);
            for _ in 0..proyectos_por_cliente {
                proyecto_id += 1;
                let proyecto = self.proyecto(proyecto_id, cliente.id);
                cotizacion_id += 1;
                let cotizacion = self.cotizacion(cotizacion_id, &cliente, &proyecto);
                lista_proyectos.push(proyecto);
                lista_cotizaciones.push(cotizacion);
            }
            lista_clientes.push(cliente);
        }

        (lista_clientes, lista_proyectos, lista_cotizaciones)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn fixture_fecha() -> &'static str {
    FECHA_REFERENCIA
}
