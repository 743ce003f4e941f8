use bcrypt::{DEFAULT_COST, hash, verify};

use crate::utils::errors::AppError;

/// Generates a 6-digit one-time login code, zero-padded.
///
/// The rng lives only inside this call, so async callers keep their
/// `Send` bound.
pub fn generar_codigo() -> String {
    use rand::Rng as _;
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

pub fn hash_codigo(codigo: &str) -> Result<String, AppError> {
    hash(codigo, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to hash code: {}", e)))
}

pub fn codigo_coincide(codigo: &str, codigo_hash: &str) -> Result<bool, AppError> {
    verify(codigo, codigo_hash)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to verify code: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generar_codigo_seis_digitos() {
        for _ in 0..50 {
            let codigo = generar_codigo();
            assert_eq!(codigo.len(), 6);
            assert!(codigo.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hash_y_comparacion() {
        let codigo = "042917";
        let hash = hash_codigo(codigo).unwrap();
        assert_ne!(hash, codigo);
        assert!(codigo_coincide(codigo, &hash).unwrap());
        assert!(!codigo_coincide("000000", &hash).unwrap());
    }
}
