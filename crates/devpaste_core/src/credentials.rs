//! Password hashing for protected pastes.

use crate::{error::AppError, Config};
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;

const SALT_LEN: usize = 16;

/// One-way password hashing and verification.
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` into a self-describing, salted digest.
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// Check `password` against a digest produced by [`CredentialHasher::hash`].
    ///
    /// # Returns
    /// `Ok(false)` on mismatch.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when `credential_hash` is malformed.
    fn verify(&self, password: &str, credential_hash: &str) -> Result<bool, AppError>;
}

/// Argon2id hasher emitting PHC strings.
///
/// Verification reads cost parameters from the stored string, so changing the
/// configured costs only affects newly created pastes.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Build a hasher with explicit cost parameters.
    ///
    /// # Arguments
    /// - `memory_kib`: Memory cost in KiB.
    /// - `iterations`: Number of passes.
    /// - `parallelism`: Degree of parallelism.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when Argon2 rejects the parameters.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| AppError::Credential(format!("invalid hash parameters: {}", err)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Build a hasher from the configured cost parameters.
    ///
    /// # Errors
    /// Returns [`AppError::Credential`] when the configured costs are invalid.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::with_cost(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| AppError::Credential(format!("salt encoding failed: {}", err)))?;
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| AppError::Credential(format!("hashing failed: {}", err)))?;
        Ok(digest.to_string())
    }

    fn verify(&self, password: &str, credential_hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(credential_hash)
            .map_err(|err| AppError::Credential(format!("stored hash is malformed: {}", err)))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(AppError::Credential(format!(
                "verification failed: {}",
                err
            ))),
        }
    }
}
