#![cfg(feature = "db-tests")]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    agregar_miembro, crear_borrador, crear_docente, crear_estudiante, crear_grupo, crear_informe,
    token_para,
};
use evalproy::config::cors::CorsConfig;
use evalproy::config::email::EmailConfig;
use evalproy::config::jwt::JwtConfig;
use evalproy::router::init_router;
use evalproy::state::AppState;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        email_config: EmailConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

async fn leer_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn agregar_request(token: &str, grupo_id: i32, estudiante_id: i32) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/grupos/{}/estudiantes", grupo_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({"estudiante_id": estudiante_id})).unwrap(),
        ))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_grupo_con_docente(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("POST")
        .uri("/api/grupos/create")
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombre_proyecto": "Sistema de Riego Automatizado",
                "materia": "Programación II",
                "carrera": "Sistemas",
                "semestre": "5",
                "docente_id": docente.id
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert_eq!(body["nombre_proyecto"], "Sistema de Riego Automatizado");
    assert_eq!(body["semestre"], 5);
    assert_eq!(body["docente_id"], docente.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_grupo_con_docente_inexistente_devuelve_400(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente que Consulta").await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("POST")
        .uri("/api/grupos/create")
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombre_proyecto": "Proyecto Fantasma",
                "materia": "Física I",
                "carrera": "Sistemas",
                "semestre": 5,
                "docente_id": 99999
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_grupos_filtra_por_docente_e_incluye_su_nombre(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let otro = crear_docente(&mut tx, "Otro Docente").await;
    crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    crear_grupo(&mut tx, "Proyecto B", "Sistemas", 5, None, Some(otro.id)).await;
    crear_grupo(&mut tx, "Proyecto Huérfano", "Sistemas", 5, None, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/grupos/get?docente_id={}", docente.id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    let grupos = body.as_array().unwrap();
    assert_eq!(grupos.len(), 1);
    assert_eq!(grupos[0]["nombre_proyecto"], "Proyecto A");
    assert_eq!(grupos[0]["docente_nombre"], "Docente Responsable");

    let request = Request::builder()
        .method("GET")
        .uri("/api/grupos/get")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = leer_json(response).await;
    let grupos = body.as_array().unwrap();
    assert_eq!(grupos.len(), 3);
    let huerfano = grupos
        .iter()
        .find(|g| g["nombre_proyecto"] == "Proyecto Huérfano")
        .unwrap();
    assert!(huerfano["docente_nombre"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_grupo_incluye_miembros(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    agregar_miembro(&mut tx, estudiante.id, grupo).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/grupos/get/{}", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert_eq!(body["id"], grupo);
    assert_eq!(body["nombre_proyecto"], "Proyecto A");
    let miembros = body["miembros"].as_array().unwrap();
    assert_eq!(miembros.len(), 1);
    assert_eq!(miembros[0]["estudiante_id"], estudiante.id);
    assert_eq!(miembros[0]["codigo"], estudiante.codigo.as_str());
    assert_eq!(miembros[0]["activo"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_agregar_estudiante_compatible(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let response = app
        .oneshot(agregar_request(&token, grupo, estudiante.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert_eq!(body["estudiante_id"], estudiante.id);
    assert_eq!(body["activo"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_agregar_estudiante_de_otra_carrera_devuelve_400(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Industrial", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let response = app
        .oneshot(agregar_request(&token, grupo, estudiante.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = leer_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("carrera"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_agregar_estudiante_de_otro_semestre_devuelve_400(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 3, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let response = app
        .oneshot(agregar_request(&token, grupo, estudiante.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = leer_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("semestre"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_paralelo_solo_restringe_en_ciencias_basicas(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let basicas_b = crear_estudiante(&mut tx, "Ciencias Básicas", 1, Some("B")).await;
    let basicas_a = crear_estudiante(&mut tx, "Ciencias Básicas", 1, Some("A")).await;
    let sistemas_b = crear_estudiante(&mut tx, "Sistemas", 5, Some("B")).await;
    let grupo_basicas =
        crear_grupo(&mut tx, "Laboratorio", "Ciencias Básicas", 1, Some("A"), Some(docente.id))
            .await;
    let grupo_sistemas =
        crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, Some("A"), Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    // En Ciencias Básicas el paralelo debe coincidir.
    let response = app
        .clone()
        .oneshot(agregar_request(&token, grupo_basicas, basicas_b.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = leer_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("paralelo"));

    let response = app
        .clone()
        .oneshot(agregar_request(&token, grupo_basicas, basicas_a.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Fuera de Ciencias Básicas el paralelo no se compara.
    let response = app
        .oneshot(agregar_request(&token, grupo_sistemas, sistemas_b.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cupo_maximo_de_cinco_miembros_activos(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    let primero = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    agregar_miembro(&mut tx, primero.id, grupo).await;
    for _ in 0..4 {
        let relleno = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
        agregar_miembro(&mut tx, relleno.id, grupo).await;
    }
    let sexto = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let response = app
        .clone()
        .oneshot(agregar_request(&token, grupo, sexto.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = leer_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("máximo"));

    // Retirar a un miembro libera el cupo.
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/grupos/{}/estudiantes/{}", grupo, primero.id))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(agregar_request(&token, grupo, sexto.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reincorporar_reactiva_la_misma_membresia(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let response = app
        .clone()
        .oneshot(agregar_request(&token, grupo, estudiante.id))
        .await
        .unwrap();
    let primera = leer_json(response).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!(
            "/api/grupos/{}/estudiantes/{}",
            grupo, estudiante.id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let activo: bool = sqlx::query_scalar(
        "SELECT activo FROM estudiante_grupo WHERE estudiante_id = $1 AND grupo_id = $2",
    )
    .bind(estudiante.id)
    .bind(grupo)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!activo);

    let response = app
        .oneshot(agregar_request(&token, grupo, estudiante.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let segunda = leer_json(response).await;
    assert_eq!(primera["id"], segunda["id"]);
    assert_eq!(segunda["activo"], true);

    // La reincorporación reutiliza la fila: no hay duplicados.
    let filas: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM estudiante_grupo WHERE estudiante_id = $1 AND grupo_id = $2",
    )
    .bind(estudiante.id)
    .bind(grupo)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(filas, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_quitar_a_quien_no_es_miembro_devuelve_404(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!(
            "/api/grupos/{}/estudiantes/{}",
            grupo, estudiante.id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = leer_json(response).await;
    assert_eq!(body["error"], "El estudiante no es miembro del grupo");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_grupo_cambia_nombre_y_docente(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Original").await;
    let relevo = crear_docente(&mut tx, "Docente de Relevo").await;
    let grupo = crear_grupo(&mut tx, "Nombre Provisorio", "Sistemas", 5, None, Some(docente.id))
        .await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/grupos/update/{}", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "nombre_proyecto": "Nombre Definitivo",
                "docente_id": relevo.id
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert_eq!(body["nombre_proyecto"], "Nombre Definitivo");
    assert_eq!(body["materia"], "Proyecto Integrador");
    assert_eq!(body["docente_id"], relevo.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verificar_dependencias_grupo(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    agregar_miembro(&mut tx, estudiante.id, grupo).await;
    crear_borrador(&mut tx, docente.id, grupo).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/grupos/verificar-dependencias/{}", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert_eq!(body["tieneDependencias"], true);
    assert_eq!(body["dependencias"]["estudiantes"]["cantidad"], 1);
    assert_eq!(body["dependencias"]["borradores"]["cantidad"], 1);
    assert_eq!(body["dependencias"]["informes"]["cantidad"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_grupo_sin_confirmar_devuelve_409(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    agregar_miembro(&mut tx, estudiante.id, grupo).await;
    crear_informe(&mut tx, estudiante.id, grupo, docente.id, "finalizado").await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/grupos/delete/{}", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = leer_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("grupo"));
    assert_eq!(body["dependencias"]["estudiantes"]["cantidad"], 1);
    assert_eq!(body["dependencias"]["informes"]["cantidad"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_grupo_confirmado_conserva_estudiantes(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let docente = crear_docente(&mut tx, "Docente Responsable").await;
    let estudiante = crear_estudiante(&mut tx, "Sistemas", 5, None).await;
    let grupo = crear_grupo(&mut tx, "Proyecto A", "Sistemas", 5, None, Some(docente.id)).await;
    agregar_miembro(&mut tx, estudiante.id, grupo).await;
    crear_informe(&mut tx, estudiante.id, grupo, docente.id, "finalizado").await;
    crear_borrador(&mut tx, docente.id, grupo).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = token_para(&docente);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/grupos/delete/{}?confirmar=true", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = leer_json(response).await;
    assert!(body["mensaje"].as_str().unwrap().contains("eliminado"));
    assert_eq!(body["dependenciasEliminadas"]["estudiantes"], 1);
    assert_eq!(body["dependenciasEliminadas"]["informes"], 1);
    assert_eq!(body["dependenciasEliminadas"]["borradores"], 1);

    // Cae la membresía, no el estudiante.
    let sigue: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estudiantes WHERE id = $1")
        .bind(estudiante.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sigue, 1);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/grupos/get/{}", grupo))
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
