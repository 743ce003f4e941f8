use evalproy::config::jwt::JwtConfig;
use evalproy::utils::jwt::{create_access_token, verify_token};

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "clave_de_prueba_solo_para_tests".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();

    let result = create_access_token(7, "mquispe@univ.edu", "docente", &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(7, "mquispe@univ.edu", "docente", &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_ok());
    let claims = result.unwrap();
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.correo, "mquispe@univ.edu");
    assert_eq!(claims.rol, "docente");
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("token.no.valido", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(7, "mquispe@univ.edu", "docente", &jwt_config).unwrap();

    let wrong_jwt_config = JwtConfig {
        secret: "otra_clave_distinta".to_string(),
        access_token_expiry: 3600,
    };

    let result = verify_token(&token, &wrong_jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_empty() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_token_contains_rol_supervisor() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(3, "coordinadora@univ.edu", "supervisor", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.rol, "supervisor");
}

#[test]
fn test_token_expiry_is_set() {
    let jwt_config = get_test_jwt_config();

    let token = create_access_token(7, "mquispe@univ.edu", "docente", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert!(claims.exp > claims.iat);
    assert_eq!(
        claims.exp - claims.iat,
        jwt_config.access_token_expiry as usize
    );
}

#[test]
fn test_token_preserves_correo_con_subdireccion() {
    let jwt_config = get_test_jwt_config();
    let correo = "m.quispe+proyectos@univ.edu.bo";

    let token = create_access_token(7, correo, "docente", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.correo, correo);
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    let malformed_tokens = vec![
        "sin.partes",
        "demasiadas.partes.en.este.token",
        "!!!.caracteres.invalidos",
        "cabecera.cuerpo.",
        ".cuerpo.firma",
    ];

    for token in malformed_tokens {
        let result = verify_token(token, &jwt_config);
        assert!(result.is_err());
    }
}

#[test]
fn test_create_token_different_docentes_different_tokens() {
    let jwt_config = get_test_jwt_config();

    let token1 = create_access_token(1, "docente1@univ.edu", "docente", &jwt_config).unwrap();
    let token2 = create_access_token(2, "docente2@univ.edu", "docente", &jwt_config).unwrap();

    assert_ne!(token1, token2);

    let claims1 = verify_token(&token1, &jwt_config).unwrap();
    let claims2 = verify_token(&token2, &jwt_config).unwrap();

    assert_eq!(claims1.sub, "1");
    assert_eq!(claims2.sub, "2");
    assert_eq!(claims1.correo, "docente1@univ.edu");
    assert_eq!(claims2.correo, "docente2@univ.edu");
}
