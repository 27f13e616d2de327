//! C6: bearer-JWT authorisation on the read path.
//!
//! The authorised-keys mapping is re-read from disk on every call — there is
//! no in-process cache beyond the request, matching the design's explicit
//! choice to keep this coupling simple rather than fast.

use {
    crate::error::{ServiceError, ServiceResult},
    jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation},
    serde::Deserialize,
    std::{collections::HashMap, path::Path},
};

#[derive(Debug, Deserialize)]
struct AuthorisedKeyEntry {
    #[serde(rename = "publicKey")]
    public_key: String,
    tags: Vec<String>,
}

/// `sub`/`exp` are the only claims the design calls out; both are optional and
/// `exp`, if present, is enforced by the JWT library itself.
#[derive(Debug, Deserialize)]
struct Claims {
    #[allow(dead_code)]
    sub: Option<String>,
    #[allow(dead_code)]
    exp: Option<usize>,
}

/// Extract the bearer token from an `Authorization` header value.
///
/// Returns `None` for a missing or malformed scheme — the caller maps that
/// straight to 401 without distinguishing the reason (per the design, a 401
/// body never leaks which check failed).
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").map(str::trim)
}

/// Validate `token` against the authorised-keys file at `keys_file_path` and
/// return the caller's authorised tags.
///
/// Fails closed (`Unauthorized`) on any of: a malformed token, a missing or
/// unknown `kid`, an unreadable or malformed keys file, a signature that does
/// not verify against the `kid`'s public key, or an empty `tags` list.
pub async fn authorise(token: &str, keys_file_path: &Path) -> ServiceResult<Vec<String>> {
    let header = decode_header(token).map_err(|_| ServiceError::Unauthorized)?;
    if header.alg != Algorithm::RS256 {
        return Err(ServiceError::Unauthorized);
    }
    let kid = header.kid.filter(|k| !k.is_empty()).ok_or(ServiceError::Unauthorized)?;

    let raw = tokio::fs::read_to_string(keys_file_path)
        .await
        .map_err(|_| ServiceError::Unauthorized)?;
    let keys: HashMap<String, AuthorisedKeyEntry> =
        serde_json::from_str(&raw).map_err(|_| ServiceError::Unauthorized)?;

    let entry = keys.get(&kid).ok_or(ServiceError::Unauthorized)?;
    if entry.tags.is_empty() {
        return Err(ServiceError::Unauthorized);
    }

    let decoding_key = DecodingKey::from_rsa_pem(entry.public_key.as_bytes())
        .map_err(|_| ServiceError::Unauthorized)?;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = true;
    // jsonwebtoken defaults to requiring `exp`; the design makes it optional
    // (matching the original service's golang-jwt `jwt.Parse`, which never
    // required it), so the claim is validated only when present.
    validation.required_spec_claims = std::collections::HashSet::new();
    decode::<Claims>(token, &decoding_key, &validation).map_err(|_| ServiceError::Unauthorized)?;

    Ok(entry.tags.clone())
}

#[cfg(test)]
mod tests {
    use {super::*, jsonwebtoken::EncodingKey, serde_json::json};

    const TEST_PRIVATE_KEY: &str = include_str!("../testdata/test_rsa.pem");
    const TEST_PUBLIC_KEY: &str = include_str!("../testdata/test_rsa_pub.pem");
    const OTHER_PUBLIC_KEY: &str = include_str!("../testdata/test_rsa_other_pub.pem");

    fn write_keys_file(dir: &tempfile::TempDir, contents: &serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join("jwt-users.json");
        std::fs::write(&path, serde_json::to_vec(contents).unwrap()).unwrap();
        path
    }

    fn sign(kid: &str, claims: &serde_json::Value) -> String {
        let mut header = jsonwebtoken::Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
        jsonwebtoken::encode(&header, claims, &key).unwrap()
    }

    #[test]
    fn extracts_token_from_bearer_scheme() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[tokio::test]
    async fn valid_token_resolves_to_authorised_tags() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": ["solo", "ssv"] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-1", &json!({}));
        let tags = authorise(&token, &path).await.unwrap();
        assert_eq!(tags, vec!["solo".to_string(), "ssv".to_string()]);
    }

    #[tokio::test]
    async fn unknown_kid_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": ["solo"] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-does-not-exist", &json!({}));
        assert!(matches!(
            authorise(&token, &path).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn kid_mapping_to_zero_tags_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": [] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-1", &json!({}));
        assert!(matches!(
            authorise(&token, &path).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn token_signed_by_wrong_key_for_its_kid_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        // "key-1" maps to a *different* public key than the one that actually signed the token.
        let keys = json!({
            "key-1": { "publicKey": OTHER_PUBLIC_KEY, "tags": ["solo"] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-1", &json!({}));
        assert!(matches!(
            authorise(&token, &path).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn missing_kid_header_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": ["solo"] }
        });
        let path = write_keys_file(&dir, &keys);

        let header = jsonwebtoken::Header::new(Algorithm::RS256); // no kid set
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_KEY.as_bytes()).unwrap();
        let token = jsonwebtoken::encode(&header, &json!({}), &key).unwrap();

        assert!(matches!(
            authorise(&token, &path).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn token_without_exp_claim_is_still_authorised() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": ["solo"] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-1", &json!({})); // no `exp` claim at all
        let tags = authorise(&token, &path).await.unwrap();
        assert_eq!(tags, vec!["solo".to_string()]);
    }

    #[tokio::test]
    async fn token_with_an_expired_exp_claim_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let keys = json!({
            "key-1": { "publicKey": TEST_PUBLIC_KEY, "tags": ["solo"] }
        });
        let path = write_keys_file(&dir, &keys);

        let token = sign("key-1", &json!({ "exp": 1 })); // 1970, long expired
        assert!(matches!(
            authorise(&token, &path).await,
            Err(ServiceError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn missing_keys_file_is_unauthorized() {
        let token = sign("key-1", &json!({}));
        let missing = std::path::Path::new("/nonexistent/jwt-users.json");
        assert!(matches!(
            authorise(&token, missing).await,
            Err(ServiceError::Unauthorized)
        ));
    }
}
