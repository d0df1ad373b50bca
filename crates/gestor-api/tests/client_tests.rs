// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use gestor_api::{Client, ClienteRequest};
use gestor_app::{ClienteId, CotizacionId, Idioma};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

fn test_client(addr: &str) -> Result<Client> {
    Client::new(addr, Some("token-abc"), 1, Duration::from_secs(1))
}

#[test]
fn connection_error_is_actionable() {
    let client = Client::new(
        "http://127.0.0.1:1",
        None,
        1,
        Duration::from_millis(50),
    )
    .expect("client should initialize");

    let error = client
        .list_clientes(false)
        .expect_err("unreachable endpoint should fail");
    let message = error.to_string();
    assert!(message.contains("api.base_url"), "got: {message}");
}

#[test]
fn client_rejects_invalid_configuration() {
    assert!(Client::new("", None, 1, Duration::from_secs(1)).is_err());
    assert!(Client::new("not a url", None, 1, Duration::from_secs(1)).is_err());
    assert!(Client::new("http://localhost:8000", None, 0, Duration::from_secs(1)).is_err());
}

#[test]
fn list_clientes_sends_scope_and_auth_headers() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/clientes?incluir_inactivos=true");
        let auth = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Authorization"))
            .map(|header| header.value.as_str().to_owned());
        assert_eq!(auth.as_deref(), Some("Bearer token-abc"));
        let tenant = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("X-Tenant-Id"))
            .map(|header| header.value.as_str().to_owned());
        assert_eq!(tenant.as_deref(), Some("1"));

        let body = r#"{"success":true,"data":[
            {"id":3,"id_tenant":1,"nombre":"Acme","numero":"101-1","tipo_factura":"NCFC","activo":true},
            {"id":1,"id_tenant":1,"nombre":"Beta","numero":"101-2","tipo_factura":"NCF","activo":false}
        ]}"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let clientes = client.list_clientes(true)?;
    assert_eq!(clientes.len(), 2);
    assert_eq!(clientes[0].id, ClienteId::new(3));
    assert!(!clientes[1].activo);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn failure_envelope_surfaces_backend_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"success":false,"error":"cliente 9 no existe"}"#,
                200,
            ))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let error = client
        .get_cliente(ClienteId::new(9))
        .expect_err("failure envelope expected");
    assert!(error.to_string().contains("cliente 9 no existe"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_cliente_posts_request_body() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/clientes");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should read");
        let sent: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(sent["nombre"], "Acme SRL");
        assert_eq!(sent["tipo_factura"], "NCFC");

        let body = r#"{"success":true,"data":
            {"id":11,"id_tenant":1,"nombre":"Acme SRL","numero":"101-1","tipo_factura":"NCFC","activo":true}
        }"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let creado = client.create_cliente(&ClienteRequest {
        nombre: "Acme SRL".to_owned(),
        nombre_comercial: String::new(),
        numero: "101-1".to_owned(),
        correo: String::new(),
        direccion: String::new(),
        ciudad: String::new(),
        provincia: String::new(),
        telefono: String::new(),
        representante: String::new(),
        correo_representante: String::new(),
        tipo_factura: "NCFC".to_owned(),
    })?;
    assert_eq!(creado.id, ClienteId::new(11));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn delete_cliente_accepts_payloadless_success() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/clientes/4");
        assert_eq!(request.method(), &tiny_http::Method::Delete);
        request
            .respond(json_response(r#"{"success":true}"#, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    client.delete_cliente(ClienteId::new(4))?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn restore_cliente_posts_to_restaurar() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/clientes/6/restaurar");
        assert_eq!(request.method(), &tiny_http::Method::Post);
        request
            .respond(json_response(r#"{"success":true}"#, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    client.restore_cliente(ClienteId::new(6))?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn search_cotizaciones_encodes_query_and_decodes_rows() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/cotizaciones/buscar?q=nave+industrial");

        let body = r#"{"success":true,"data":[{
            "id":9,"id_cliente":1,"id_proyecto":2,"id_servicio":3,
            "moneda":"RD$","fecha":"2026-01-20","tasa_moneda":1.0,
            "validez":30,"estado":"APROBADA","idioma":"ES","retencion":"NINGUNA",
            "descuentop":0.0,"retencionp":0.0,"itbisp":18.0,"activo":true,
            "cliente_nombre":"Constructora del Este",
            "proyecto_nombre":"Nave industrial Haina"
        }]}"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let cotizaciones = client.search_cotizaciones("nave industrial")?;
    assert_eq!(cotizaciones.len(), 1);
    assert_eq!(cotizaciones[0].id, CotizacionId::new(9));
    assert_eq!(
        cotizaciones[0].proyecto_nombre.as_deref(),
        Some("Nave industrial Haina")
    );

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn calcular_totales_posts_percentages_and_decodes_breakdown() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/cotizaciones/7/totales");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should read");
        let sent: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(sent["descuentop"], 10.0);
        assert_eq!(sent["itbisp"], 18.0);

        let body = r#"{"success":true,"data":{
            "subtotal":1000.0,"descuentom":100.0,"retencionm":0.0,
            "itbism":162.0,"total_sin_itbis":900.0,"total":1062.0
        }}"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let totales = client.calcular_totales(CotizacionId::new(7), 10.0, 0.0, 18.0)?;
    assert_eq!(totales.subtotal, 1000.0);
    assert_eq!(totales.total, 1062.0);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn download_pdf_decodes_base64_payload() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/cotizaciones/5/pdf?idioma=ES");
        // "JVBERi0xLjQ=" is "%PDF-1.4" in base64.
        request
            .respond(json_response(
                r#"{"success":true,"data":"JVBERi0xLjQ="}"#,
                200,
            ))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let bytes = client.download_pdf(CotizacionId::new(5), Idioma::Es)?;
    assert_eq!(bytes, b"%PDF-1.4");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn http_error_with_envelope_body_prefers_backend_message() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start stub server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"success":false,"error":"token vencido"}"#,
                401,
            ))
            .expect("response should succeed");
    });

    let client = test_client(&addr)?;
    let error = client
        .list_clientes(false)
        .expect_err("HTTP 401 should fail");
    let message = error.to_string();
    assert!(message.contains("token vencido"), "got: {message}");
    assert!(message.contains("401"), "got: {message}");

    handle.join().expect("server thread should join");
    Ok(())
}
