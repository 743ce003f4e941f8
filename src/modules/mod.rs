pub mod auth;
pub mod borradores;
pub mod docentes;
pub mod estudiantes;
pub mod grupos;
pub mod supervision;
