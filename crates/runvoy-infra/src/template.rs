use crate::error::{InfraError, Result};

/// Where a CloudFormation-equivalent template body comes from, resolved
/// from the raw `--template` input by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Passed to the provider as a URL it fetches itself.
    Url(String),
    /// Read from disk and sent inline.
    Inline(String),
}

const DEFAULT_RELEASE_BASE: &str = "https://releases.runvoy.dev";

/// Resolves the `--template` flag: empty uses the default release URL for
/// `cli_version`, `http(s)://` passes through, `s3://bucket/key` is
/// rewritten to its public HTTPS form, anything else is read as a local
/// file path.
pub async fn resolve_template_source(raw: &str, cli_version: &str) -> Result<TemplateSource> {
    if raw.is_empty() {
        return Ok(TemplateSource::Url(format!(
            "{DEFAULT_RELEASE_BASE}/{cli_version}/template.yaml"
        )));
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        url::Url::parse(raw).map_err(|_| InfraError::InvalidInput(format!("malformed template URL: {raw}")))?;
        return Ok(TemplateSource::Url(raw.to_string()));
    }

    if let Some(rest) = raw.strip_prefix("s3://") {
        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| InfraError::InvalidInput(format!("malformed s3 URI: {raw}")))?;
        return Ok(TemplateSource::Url(format!("https://{bucket}.s3.amazonaws.com/{key}")));
    }

    let body = tokio::fs::read_to_string(raw)
        .await
        .map_err(|source| InfraError::TemplateRead { path: raw.to_string(), source })?;
    Ok(TemplateSource::Inline(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_input_uses_default_release_url() {
        let src = resolve_template_source("", "1.2.3").await.unwrap();
        assert_eq!(src, TemplateSource::Url("https://releases.runvoy.dev/1.2.3/template.yaml".to_string()));
    }

    #[tokio::test]
    async fn http_url_passes_through() {
        let src = resolve_template_source("https://example.com/t.yaml", "1.2.3").await.unwrap();
        assert_eq!(src, TemplateSource::Url("https://example.com/t.yaml".to_string()));
    }

    #[tokio::test]
    async fn s3_uri_rewritten_to_https() {
        let src = resolve_template_source("s3://my-bucket/path/to/template.yaml", "1.2.3").await.unwrap();
        assert_eq!(
            src,
            TemplateSource::Url("https://my-bucket.s3.amazonaws.com/path/to/template.yaml".to_string())
        );
    }

    #[tokio::test]
    async fn local_path_read_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.yaml");
        std::fs::write(&path, "Resources: {}\n").unwrap();
        let src = resolve_template_source(path.to_str().unwrap(), "1.2.3").await.unwrap();
        assert_eq!(src, TemplateSource::Inline("Resources: {}\n".to_string()));
    }

    #[tokio::test]
    async fn malformed_http_url_is_rejected() {
        let err = resolve_template_source("https://", "1.2.3").await.unwrap_err();
        assert!(matches!(err, InfraError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn missing_local_path_is_an_error() {
        let err = resolve_template_source("/no/such/file.yaml", "1.2.3").await.unwrap_err();
        assert!(matches!(err, InfraError::TemplateRead { .. }));
    }
}
