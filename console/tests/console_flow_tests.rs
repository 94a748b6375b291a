// End-to-end console flows against a mocked report query service

use chrono::NaiveDate;
use common::export::{Branding, ExportFormat};
use console::{messages, ClientError, ConsoleController, ConsoleState, ReportClient, UserDirectory};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERS: &str = r#"[
    {"usr": "admin1", "perfil": "administrador", "organizacion": "BRC"},
    {"usr": "colab1", "perfil": "colaborador", "organizacion": "Banco Uno"}
]"#;

fn controller() -> ConsoleController {
    ConsoleController::new(UserDirectory::from_json(USERS).unwrap())
}

async fn mount_dates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/report-dates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"EjecucionID": 7, "EjecucionID_Fecha": "007 2024-05-01"},
            {"EjecucionID": 3, "EjecucionID_Fecha": "003 2024-03-01"},
        ])))
        .mount(server)
        .await;
}

/// Admin controller with "Usuarios por Rol" on PROD and execution 7 selected
async fn ready(server: &MockServer, client: &ReportClient) -> ConsoleController {
    mount_dates(server).await;
    let mut controller = controller();
    controller.select_report("Usuarios por Rol").unwrap();
    controller.select_environment("PROD").unwrap();
    controller.lookup_dates(client).await.unwrap();
    controller.select_date(7).unwrap();
    controller
}

#[tokio::test]
async fn test_collaborator_dates_use_own_organization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/report-dates"))
        .and(query_param("entidad", "Banco Uno"))
        .and(query_param("reporte", "Reporte de Entidad"))
        .and(query_param("ambiente", "QA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"EjecucionID": 12, "EjecucionID_Fecha": "012 2024-06-30"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = controller();
    controller.switch_user("colab1").unwrap();
    controller.select_environment("QA").unwrap();

    let dates = controller.lookup_dates(&client).await.unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].label, "012 2024-06-30");
    assert_eq!(controller.state(), ConsoleState::DatesLoaded);
}

#[tokio::test]
async fn test_generate_renders_table() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"Usuario":"ana","Rol":"admin"},{"Usuario":"luis","Rol":"lectura"}]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let state = controller.generate(&client).await.unwrap();
    assert_eq!(state, ConsoleState::Rendered);
    assert_eq!(controller.title(), "Usuarios por Rol");

    let html = controller.render_html().unwrap().unwrap();
    assert!(html.contains("<tr><th>Usuario</th><th>Rol</th></tr>"));
    assert!(html.contains("<tr><td>luis</td><td>lectura</td></tr>"));
}

#[tokio::test]
async fn test_empty_result_shows_no_data_message() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    controller.generate(&client).await.unwrap();
    let html = controller.render_html().unwrap().unwrap();
    assert!(html.contains(messages::NO_DATA));
    assert!(!html.contains("<table"));
    assert!(!controller.controls().exports_available);
}

#[tokio::test]
async fn test_cancel_aborts_pending_request() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"a": "1"}]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let ticket = controller.begin_generation().unwrap();
    assert!(controller.controls().loading_overlay);

    let abort = ticket.abort_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        abort.abort();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        client.fetch_rows(&ticket.execution_id, ticket.registration),
    )
    .await
    .expect("abort should end the request before the delay");
    assert_eq!(outcome, Err(ClientError::Canceled));

    controller.complete_generation(ticket.id, outcome);
    assert_eq!(controller.state(), ConsoleState::Canceled);
    assert_eq!(controller.title(), messages::GENERATION_CANCELED);
    assert!(controller.status_message().is_none());
    assert!(controller.controls().generate_enabled);
}

#[tokio::test]
async fn test_server_error_marks_generation_failed() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connection refused"))
        .mount(&server)
        .await;

    let state = controller.generate(&client).await.unwrap();
    assert_eq!(state, ConsoleState::Failed);
    assert_eq!(controller.status_message(), Some(messages::GENERATION_FAILED));
    assert!(controller.results().is_none());
    assert!(controller.controls().generate_enabled);
}

#[tokio::test]
async fn test_status_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/report-dates"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("Missing required query parameters: entidad, reporte, ambiente"),
        )
        .mount(&server)
        .await;

    let client = ReportClient::new(&server.uri()).unwrap();
    let filter = common::models::ReportFilter {
        entidad: "BRC".to_string(),
        reporte: "R".to_string(),
        ambiente: "PROD".to_string(),
    };

    assert_eq!(
        client.fetch_dates(&filter).await,
        Err(ClientError::Status {
            status: 400,
            body: "Missing required query parameters: entidad, reporte, ambiente".to_string(),
        })
    );
}

#[tokio::test]
async fn test_date_lookup_failure_leaves_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/report-dates"))
        .respond_with(ResponseTemplate::new(500).set_body_string("timeout"))
        .mount(&server)
        .await;

    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = controller();
    controller.select_report("Cobro Tarifa SEBRA").unwrap();
    controller.select_environment("PROD").unwrap();

    let dates = controller.lookup_dates(&client).await.unwrap();
    assert!(dates.is_empty());
    assert_eq!(controller.status_message(), Some(messages::DATES_LOOKUP_FAILED));
}

#[tokio::test]
async fn test_switch_user_after_render_clears_everything() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"a": "1"}])))
        .mount(&server)
        .await;
    controller.generate(&client).await.unwrap();

    controller.switch_user("colab1").unwrap();
    assert!(controller.dates().is_empty());
    assert!(controller.selected_date().is_none());
    assert!(controller.render_html().unwrap().is_none());
    assert_eq!(controller.title(), "");
    assert!(!controller.controls().generate_enabled);
}

#[tokio::test]
async fn test_exports_written_with_deterministic_names() {
    let server = MockServer::start().await;
    let client = ReportClient::new(&server.uri()).unwrap();
    let mut controller = ready(&server, &client).await;

    Mock::given(method("GET"))
        .and(path("/api/report-data/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Usuario": "ana", "Correo": "", "Rol": "admin"},
        ])))
        .mount(&server)
        .await;
    controller.generate(&client).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let branding = Branding::text("BRC");

    let csv = controller.export(ExportFormat::Csv, dir.path(), day, &branding).unwrap();
    assert_eq!(csv.file_name().unwrap(), "Usuarios_por_Rol-7-2024-05-01.csv");
    assert_eq!(
        std::fs::read_to_string(&csv).unwrap(),
        "Usuario,Correo,Rol\n\"ana\",\"\",\"admin\"\n"
    );

    let xlsx = controller.export(ExportFormat::Xlsx, dir.path(), day, &branding).unwrap();
    assert!(std::fs::read(&xlsx).unwrap().starts_with(b"PK"));

    let pdf = controller.export(ExportFormat::Pdf, dir.path(), day, &branding).unwrap();
    assert_eq!(pdf.file_name().unwrap(), "Usuarios_por_Rol-7-2024-05-01.pdf");
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_current_time_reads_database_clock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"currentTime": "2024-05-01T08:30:00Z"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ReportClient::new(&server.uri()).unwrap();
    let now = client.current_time().await.unwrap();

    assert_eq!(now.len(), 1);
    assert_eq!(now[0].current_time.to_rfc3339(), "2024-05-01T08:30:00+00:00");
}

#[tokio::test]
async fn test_current_time_reports_unavailable_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Database query failed"))
        .mount(&server)
        .await;

    let client = ReportClient::new(&server.uri()).unwrap();
    match client.current_time().await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Database query failed");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
