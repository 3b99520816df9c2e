//! remote::factory
//!
//! Construction of identity collaborators from configuration.

use std::sync::Arc;

use async_trait::async_trait;

use super::http::{HttpDirectory, HttpValidator};
use super::traits::{unknown_label, CallerDirectory, IdentityValidator, RemoteError};
use crate::core::config::{Config, ValidatorKind};
use crate::core::types::{CallerId, ExternalId};

/// Validator that accepts every syntactically valid identifier.
///
/// For offline and development use; syntactic validation already
/// happened when the [`ExternalId`] was constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowValidator;

#[async_trait]
impl IdentityValidator for AllowValidator {
    async fn is_valid(&self, _id: ExternalId) -> bool {
        true
    }
}

/// Directory used when no directory service is configured; always
/// produces the unknown label.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDirectory;

#[async_trait]
impl CallerDirectory for FallbackDirectory {
    async fn display(&self, caller: &CallerId) -> String {
        unknown_label(caller)
    }
}

/// Build the identity validator selected by configuration.
pub fn create_validator(config: &Config) -> Result<Arc<dyn IdentityValidator>, RemoteError> {
    match config.validator {
        ValidatorKind::Http => Ok(Arc::new(HttpValidator::new(
            config.api_base.clone(),
            config.timeout,
        )?)),
        ValidatorKind::Allow => Ok(Arc::new(AllowValidator)),
    }
}

/// Build the caller directory selected by configuration.
pub fn create_directory(config: &Config) -> Result<Arc<dyn CallerDirectory>, RemoteError> {
    match &config.directory_base {
        Some(base) => Ok(Arc::new(HttpDirectory::new(base.clone(), config.timeout)?)),
        None => Ok(Arc::new(FallbackDirectory)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_validator_accepts_everything() {
        tokio_test::block_on(async {
            assert!(AllowValidator.is_valid(ExternalId::new(0)).await);
            assert!(AllowValidator.is_valid(ExternalId::new(u64::MAX)).await);
        });
    }

    #[test]
    fn fallback_directory_uses_unknown_label() {
        tokio_test::block_on(async {
            let caller = CallerId::new("9").unwrap();
            assert_eq!(FallbackDirectory.display(&caller).await, "Unknown User (9)");
        });
    }

    #[test]
    fn factory_respects_validator_kind() {
        let mut config = Config::default();
        config.validator = ValidatorKind::Allow;
        assert!(create_validator(&config).is_ok());

        config.validator = ValidatorKind::Http;
        assert!(create_validator(&config).is_ok());
    }
}
