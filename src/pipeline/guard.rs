use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::PipelineError;

type HmacSha256 = Hmac<Sha256>;

/// Shared-secret check for the scheduled trigger.
///
/// Credentials are compared through an HMAC tag so the comparison runs in
/// constant time.
pub struct TriggerGuard {
    expected: Option<(String, Vec<u8>)>,
}

impl TriggerGuard {
    pub fn new(secret: Option<String>) -> Self {
        let expected = secret
            .filter(|s| !s.is_empty())
            .and_then(|s| tag(&s, &s).map(|t| (s, t)));
        Self { expected }
    }

    pub fn is_enforced(&self) -> bool {
        self.expected.is_some()
    }

    pub fn authorize(&self, credential: Option<&str>) -> Result<(), PipelineError> {
        let Some((secret, expected)) = &self.expected else {
            return Ok(());
        };
        let Some(credential) = credential else {
            tracing::warn!("🚫 Scheduled trigger rejected: no credential");
            return Err(PipelineError::Unauthorized);
        };

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| PipelineError::Unauthorized)?;
        mac.update(credential.as_bytes());

        mac.verify_slice(expected).map_err(|_| {
            tracing::warn!("🚫 Scheduled trigger rejected: credential mismatch");
            PipelineError::Unauthorized
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

fn tag(key: &str, message: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).ok()?;
    mac.update(message.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}
