use evalproy::config::jwt::JwtConfig;
use evalproy::utils::jwt::create_access_token;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestDocente {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub rol: String,
}

#[allow(dead_code)]
pub struct TestEstudiante {
    pub id: i32,
    pub codigo: String,
}

/// Emite un token válido para el docente sin pasar por el flujo de
/// códigos por correo. Usa la misma configuración que la aplicación.
pub fn token_para(docente: &TestDocente) -> String {
    dotenvy::dotenv().ok();
    create_access_token(
        docente.id,
        &docente.correo,
        &docente.rol,
        &JwtConfig::from_env(),
    )
    .unwrap()
}

pub fn correo_unico() -> String {
    format!("test-{}@univ.edu", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn codigo_unico() -> String {
    // EST- + 26 hex = 30 caracteres, el máximo que admite la validación
    // de `codigo` en los DTOs de estudiantes.
    format!("EST-{}", &Uuid::new_v4().simple().to_string()[..26])
}

#[allow(dead_code)]
pub async fn crear_docente(tx: &mut Transaction<'_, Postgres>, nombre: &str) -> TestDocente {
    crear_docente_con_rol(tx, nombre, "docente").await
}

#[allow(dead_code)]
pub async fn crear_supervisor(tx: &mut Transaction<'_, Postgres>, nombre: &str) -> TestDocente {
    crear_docente_con_rol(tx, nombre, "supervisor").await
}

pub async fn crear_docente_con_rol(
    tx: &mut Transaction<'_, Postgres>,
    nombre: &str,
    rol: &str,
) -> TestDocente {
    let correo = correo_unico();
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO docentes (nombre, correo, rol) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(nombre)
    .bind(&correo)
    .bind(rol)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestDocente {
        id,
        nombre: nombre.to_string(),
        correo,
        rol: rol.to_string(),
    }
}

#[allow(dead_code)]
pub async fn crear_estudiante(
    tx: &mut Transaction<'_, Postgres>,
    carrera: &str,
    semestre: i32,
    paralelo: Option<&str>,
) -> TestEstudiante {
    let codigo = codigo_unico();
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO estudiantes (nombre, apellido, codigo, carrera, semestre, paralelo) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind("Ana")
    .bind("Mamani")
    .bind(&codigo)
    .bind(carrera)
    .bind(semestre)
    .bind(paralelo)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestEstudiante { id, codigo }
}

#[allow(dead_code)]
pub async fn crear_grupo(
    tx: &mut Transaction<'_, Postgres>,
    nombre_proyecto: &str,
    carrera: &str,
    semestre: i32,
    paralelo: Option<&str>,
    docente_id: Option<i32>,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO grupos (nombre_proyecto, materia, carrera, semestre, paralelo, docente_id) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(nombre_proyecto)
    .bind("Proyecto Integrador")
    .bind(carrera)
    .bind(semestre)
    .bind(paralelo)
    .bind(docente_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn agregar_miembro(
    tx: &mut Transaction<'_, Postgres>,
    estudiante_id: i32,
    grupo_id: i32,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO estudiante_grupo (estudiante_id, grupo_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(estudiante_id)
    .bind(grupo_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn crear_rubrica(tx: &mut Transaction<'_, Postgres>, docente_id: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO rubricas (docente_id, nombre) VALUES ($1, 'Rúbrica de defensa') RETURNING id",
    )
    .bind(docente_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn crear_calificacion(
    tx: &mut Transaction<'_, Postgres>,
    estudiante_id: i32,
    grupo_id: i32,
    docente_id: i32,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO calificaciones (estudiante_id, grupo_id, docente_id, nota) \
         VALUES ($1, $2, $3, 85.50) RETURNING id",
    )
    .bind(estudiante_id)
    .bind(grupo_id)
    .bind(docente_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn crear_informe(
    tx: &mut Transaction<'_, Postgres>,
    estudiante_id: i32,
    grupo_id: i32,
    docente_id: i32,
    estado: &str,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO informes (estudiante_id, grupo_id, docente_id, estado) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(estudiante_id)
    .bind(grupo_id)
    .bind(docente_id)
    .bind(estado)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn crear_borrador(
    tx: &mut Transaction<'_, Postgres>,
    docente_id: i32,
    grupo_id: i32,
) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO borradores (docente_id, grupo_id, contenido) \
         VALUES ($1, $2, '{\"notas\": []}') RETURNING id",
    )
    .bind(docente_id)
    .bind(grupo_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}
