use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::dependencias::model::{
    CamposAfectados, ConfirmacionEliminar, ConfirmacionLimpieza, OpcionesEliminacion, RelationKind,
    SampleRow,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginResponse, MensajeResponse, SolicitarCodigoDto, VerificarCodigoDto,
};
use crate::modules::borradores::model::{Borrador, GuardarBorradorDto};
use crate::modules::docentes::model::{
    AccionGrupos, CreateDocenteDto, Docente, DocenteConCarreras, DocenteEliminado, DocenteResumen,
    UpdateDocenteDto, VerificacionDocente,
};
use crate::modules::estudiantes::model::{
    CreateEstudianteDto, Estudiante, EstudianteActualizado, EstudianteEliminado,
    PaginatedEstudiantesResponse, PaginationMeta, UpdateEstudianteDto, VerificacionEstudiante,
};
use crate::modules::grupos::model::{
    AgregarEstudianteDto, CreateGrupoDto, Grupo, GrupoConDocente, GrupoConMiembros, GrupoEliminado,
    MiembroGrupo, UpdateGrupoDto, VerificacionGrupo,
};
use crate::modules::supervision::model::{Informe, InformeDetalle, InformeReabierto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::solicitar_codigo,
        crate::modules::auth::controller::verificar_codigo,
        crate::modules::auth::controller::perfil,
        crate::modules::docentes::controller::create_docente,
        crate::modules::docentes::controller::get_docentes,
        crate::modules::docentes::controller::get_docente,
        crate::modules::docentes::controller::update_docente,
        crate::modules::docentes::controller::verificar_dependencias,
        crate::modules::docentes::controller::delete_docente,
        crate::modules::estudiantes::controller::create_estudiante,
        crate::modules::estudiantes::controller::get_estudiantes,
        crate::modules::estudiantes::controller::get_estudiante,
        crate::modules::estudiantes::controller::update_estudiante,
        crate::modules::estudiantes::controller::verificar_dependencias,
        crate::modules::estudiantes::controller::delete_estudiante,
        crate::modules::grupos::controller::create_grupo,
        crate::modules::grupos::controller::get_grupos,
        crate::modules::grupos::controller::get_grupo,
        crate::modules::grupos::controller::update_grupo,
        crate::modules::grupos::controller::agregar_estudiante,
        crate::modules::grupos::controller::quitar_estudiante,
        crate::modules::grupos::controller::verificar_dependencias,
        crate::modules::grupos::controller::delete_grupo,
        crate::modules::borradores::controller::guardar_borrador,
        crate::modules::borradores::controller::get_borrador,
        crate::modules::supervision::controller::get_informes,
        crate::modules::supervision::controller::reabrir_informe,
    ),
    components(
        schemas(
            Docente,
            DocenteConCarreras,
            DocenteResumen,
            CreateDocenteDto,
            UpdateDocenteDto,
            VerificacionDocente,
            AccionGrupos,
            DocenteEliminado,
            Estudiante,
            CreateEstudianteDto,
            UpdateEstudianteDto,
            PaginationMeta,
            PaginatedEstudiantesResponse,
            VerificacionEstudiante,
            EstudianteActualizado,
            EstudianteEliminado,
            Grupo,
            GrupoConDocente,
            GrupoConMiembros,
            MiembroGrupo,
            CreateGrupoDto,
            UpdateGrupoDto,
            AgregarEstudianteDto,
            VerificacionGrupo,
            GrupoEliminado,
            Borrador,
            GuardarBorradorDto,
            Informe,
            InformeDetalle,
            InformeReabierto,
            SolicitarCodigoDto,
            VerificarCodigoDto,
            MensajeResponse,
            LoginResponse,
            ErrorResponse,
            RelationKind,
            SampleRow,
            OpcionesEliminacion,
            ConfirmacionEliminar,
            CamposAfectados,
            ConfirmacionLimpieza,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Autenticación", description = "Acceso por código de un solo uso y emisión de JWT"),
        (name = "Docentes", description = "Gestión de docentes y su eliminación guiada"),
        (name = "Estudiantes", description = "Gestión de estudiantes y cambios de campos críticos"),
        (name = "Grupos", description = "Grupos de proyecto y sus miembros"),
        (name = "Borradores", description = "Borradores de calificación por docente y grupo"),
        (name = "Supervisión", description = "Auditoría y reapertura de informes")
    ),
    info(
        title = "EvalProy API",
        version = "0.1.0",
        description = "API REST para la evaluación de proyectos académicos: docentes, estudiantes, grupos y el protocolo de eliminación guiada con confirmación explícita.",
        contact(
            name = "API Support",
            email = "soporte@evalproy.edu"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
