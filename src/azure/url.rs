//! Azure DevOps build URL parsing.
//!
//! Pure string work, no side effects. Recognized shapes:
//!
//! ```text
//! https://dev.azure.com/{org}/{project}/_build/results?buildId={id}
//! https://{org}.visualstudio.com/{project}/_build/results?buildId={id}
//! https://{host}/tfs/{collection}/{project}/_build/results?buildId={id}
//! ```
//!
//! A scheme-less URL gets `https://` prepended before parsing; a leading
//! `@` (pasted from chat clients) is stripped. Release URLs are a distinct
//! capability and are rejected with [`ParseError::ReleaseUnsupported`]
//! rather than misread as builds.

use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("not a recognized Azure DevOps build URL: {0}")]
    UnrecognizedShape(String),

    #[error("missing buildId parameter in URL")]
    MissingBuildId,

    #[error("buildId is not numeric: {0}")]
    NonNumericBuildId(String),

    #[error("release pipeline URLs are not supported, only build URLs")]
    ReleaseUnsupported,
}

// ── BuildReference ────────────────────────────────────────────────────────────

/// Identifies one build within an organization/project, plus the API base
/// URL it was parsed from (needed for on-prem TFS collections, where the
/// host is not `dev.azure.com`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReference {
    pub organization: String,
    pub project: String,
    pub build_id: u64,
    api_base: String,
}

impl BuildReference {
    /// Base URL for `_apis` calls, without a trailing slash.
    /// E.g. `https://dev.azure.com/acme` or `https://tfs.corp.example/tfs/Main`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse an Azure DevOps web URL into a [`BuildReference`].
///
/// Returns an error for anything that is not a recognized build URL; never
/// a partial reference.
pub fn parse(url: &str) -> Result<BuildReference, ParseError> {
    let raw = url.trim().trim_start_matches('@');
    if raw.is_empty() {
        return Err(ParseError::UnrecognizedShape("<empty>".into()));
    }

    let normalized = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    let (scheme, rest) = normalized
        .split_once("://")
        .ok_or_else(|| ParseError::UnrecognizedShape(raw.into()))?;

    let (host_and_path, query) = match rest.split_once('?') {
        Some((hp, q)) => (hp, Some(q)),
        None => (rest, None),
    };

    let mut segments = host_and_path.split('/');
    let host = segments.next().unwrap_or_default();
    let path: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();

    if host.is_empty() {
        return Err(ParseError::UnrecognizedShape(raw.into()));
    }

    // Release URLs use a different shape and a different log API; reject
    // them explicitly instead of guessing.
    let is_release = path.iter().any(|s| s.starts_with("_release"))
        || query_param(query, "releaseId").is_some();
    if is_release {
        return Err(ParseError::ReleaseUnsupported);
    }

    let (organization, project, api_base) = if host.eq_ignore_ascii_case("dev.azure.com") {
        // dev.azure.com/{org}/{project}/_build/...
        match path.as_slice() {
            [org, project, tail @ ..] if tail.first() == Some(&"_build") => (
                (*org).to_string(),
                (*project).to_string(),
                format!("{scheme}://{host}/{org}"),
            ),
            _ => return Err(ParseError::UnrecognizedShape(raw.into())),
        }
    } else if let Some(org) = host
        .strip_suffix(".visualstudio.com")
        .filter(|o| !o.is_empty() && !o.contains('.'))
    {
        // {org}.visualstudio.com/{project}/_build/...
        match path.as_slice() {
            [project, tail @ ..] if tail.first() == Some(&"_build") => (
                org.to_string(),
                (*project).to_string(),
                format!("{scheme}://{host}"),
            ),
            _ => return Err(ParseError::UnrecognizedShape(raw.into())),
        }
    } else if path.first().is_some_and(|s| s.eq_ignore_ascii_case("tfs")) {
        // {host}/tfs/{collection}/{project}/_build/...
        match path.as_slice() {
            [tfs, collection, project, tail @ ..] if tail.first() == Some(&"_build") => (
                (*collection).to_string(),
                (*project).to_string(),
                format!("{scheme}://{host}/{tfs}/{collection}"),
            ),
            _ => return Err(ParseError::UnrecognizedShape(raw.into())),
        }
    } else {
        return Err(ParseError::UnrecognizedShape(raw.into()));
    };

    let build_id = match query_param(query, "buildId") {
        None => return Err(ParseError::MissingBuildId),
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| ParseError::NonNumericBuildId(v.to_string()))?,
    };

    Ok(BuildReference {
        organization,
        project,
        build_id,
        api_base,
    })
}

/// Extract a query parameter value by exact key.
fn query_param<'a>(query: Option<&'a str>, key: &str) -> Option<&'a str> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dev_azure_com_build_url() {
        let r = parse("https://dev.azure.com/acme/widgets/_build/results?buildId=42").unwrap();
        assert_eq!(r.organization, "acme");
        assert_eq!(r.project, "widgets");
        assert_eq!(r.build_id, 42);
        assert_eq!(r.api_base(), "https://dev.azure.com/acme");
    }

    #[test]
    fn parses_extra_query_params() {
        let r = parse(
            "https://dev.azure.com/acme/widgets/_build/results?buildId=7&view=logs&j=abc&t=def",
        )
        .unwrap();
        assert_eq!(r.build_id, 7);
    }

    #[test]
    fn parses_legacy_visualstudio_url() {
        let r = parse("https://acme.visualstudio.com/widgets/_build/results?buildId=9").unwrap();
        assert_eq!(r.organization, "acme");
        assert_eq!(r.project, "widgets");
        assert_eq!(r.api_base(), "https://acme.visualstudio.com");
    }

    #[test]
    fn parses_on_prem_tfs_url() {
        let r = parse(
            "https://tfs.corp.example/tfs/MainCollection/Financial/_build/results?buildId=1234",
        )
        .unwrap();
        assert_eq!(r.organization, "MainCollection");
        assert_eq!(r.project, "Financial");
        assert_eq!(r.api_base(), "https://tfs.corp.example/tfs/MainCollection");
    }

    #[test]
    fn prepends_scheme_when_missing() {
        let r = parse("dev.azure.com/acme/widgets/_build/results?buildId=3").unwrap();
        assert_eq!(r.api_base(), "https://dev.azure.com/acme");
    }

    #[test]
    fn strips_leading_at_sign() {
        let r = parse("@https://dev.azure.com/acme/widgets/_build/results?buildId=3").unwrap();
        assert_eq!(r.build_id, 3);
    }

    #[test]
    fn rejects_unrelated_urls() {
        for url in [
            "https://example.com/foo/bar",
            "https://github.com/acme/widgets/actions/runs/42",
            "not a url at all",
            "",
        ] {
            let err = parse(url).unwrap_err();
            assert!(
                matches!(err, ParseError::UnrecognizedShape(_)),
                "expected UnrecognizedShape for {url:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_build_url_without_build_id() {
        let err = parse("https://dev.azure.com/acme/widgets/_build/results?view=logs").unwrap_err();
        assert_eq!(err, ParseError::MissingBuildId);
    }

    #[test]
    fn rejects_non_numeric_build_id() {
        let err = parse("https://dev.azure.com/acme/widgets/_build/results?buildId=abc").unwrap_err();
        assert_eq!(err, ParseError::NonNumericBuildId("abc".into()));
    }

    #[test]
    fn rejects_release_urls() {
        let err = parse(
            "https://dev.azure.com/acme/widgets/_releaseProgress?_a=release-pipeline-progress&releaseId=55",
        )
        .unwrap_err();
        assert_eq!(err, ParseError::ReleaseUnsupported);
    }

    #[test]
    fn rejects_visualstudio_without_project() {
        let err = parse("https://acme.visualstudio.com/_build/results?buildId=1").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedShape(_)));
    }
}
