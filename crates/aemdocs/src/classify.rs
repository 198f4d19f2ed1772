//! URL allow-list validation and classification
//!
//! Everything here is a pure function of the URL string: no network access.
//! Classification yields a [`UrlCategory`] plus an orthogonal
//! `preserve_fragment` flag, because conference pages keep their `#day-N`
//! anchors without being search pages.

use crate::error::DocError;
use crate::types::SessionId;
use url::Url;

/// Community conference host (adaptTo())
pub const CONFERENCE_HOST: &str = "adapt.to";

/// Documentation hosts accepted by exact match
const DOC_HOSTS: &[&str] = &[
    "experienceleague.adobe.com",
    "developer.adobe.com",
    "helpx.adobe.com",
    "docs.adobe.com",
    "business.adobe.com",
    "sling.apache.org",
    CONFERENCE_HOST,
];

const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "youtu.be", "www.youtu.be"];

const GITHUB_HOST: &str = "github.com";
const GITHUB_PAGES_SUFFIX: &str = ".github.io";

/// Query parameter carrying the session identifier
const SESSION_PARAM: &str = "session";

/// Kind of content a URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlCategory {
    /// Regular documentation page
    Ordinary,
    /// YouTube video
    Youtube,
    /// PDF document
    Pdf,
    /// Search results page (state lives in the fragment)
    SearchLike,
}

/// Category plus fragment policy for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedUrl {
    pub category: UrlCategory,
    /// Keep the `#...` suffix when deriving the fetch URL
    pub preserve_fragment: bool,
}

/// Validate a URL against the documentation allow-list
///
/// `extra_hosts` are additional hosts accepted by exact match.
pub fn validate_url(url: &str, extra_hosts: &[String]) -> Result<Url, DocError> {
    let invalid = || DocError::InvalidUrl(url.to_string());

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = parsed.host_str().ok_or_else(invalid)?;
    let extra = extra_hosts.iter().any(|h| h.eq_ignore_ascii_case(host));

    if extra || is_allowed_host(&parsed, host) {
        Ok(parsed)
    } else {
        Err(invalid())
    }
}

fn is_allowed_host(url: &Url, host: &str) -> bool {
    if DOC_HOSTS.contains(&host) || is_youtube_host(host) {
        return true;
    }
    if host == GITHUB_HOST {
        // Any organization, but the organization segment is required
        return first_path_segment(url).is_some();
    }
    host.strip_suffix(GITHUB_PAGES_SUFFIX)
        .is_some_and(|site| !site.is_empty())
}

/// Check whether a host is one of the YouTube hosts
pub fn is_youtube_host(host: &str) -> bool {
    YOUTUBE_HOSTS.contains(&host)
}

/// Classify a parsed URL
///
/// Order matters: YouTube, then PDF, then search pages.
pub fn classify(url: &Url) -> ClassifiedUrl {
    let host = url.host_str().unwrap_or_default();
    let path = url.path();

    let category = if is_youtube_host(host) {
        UrlCategory::Youtube
    } else if path.to_ascii_lowercase().ends_with(".pdf") {
        UrlCategory::Pdf
    } else if path.contains("/search") || url.fragment().is_some_and(|f| f.starts_with("q=")) {
        UrlCategory::SearchLike
    } else {
        UrlCategory::Ordinary
    };

    ClassifiedUrl {
        category,
        preserve_fragment: category == UrlCategory::SearchLike || host == CONFERENCE_HOST,
    }
}

/// Extract the video ID from a YouTube URL
pub fn extract_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let id = match host {
        "youtube.com" | "www.youtube.com" => {
            let path = url.path();
            if path == "/watch" {
                url.query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())
            } else if path.starts_with("/embed/") || path.starts_with("/v/") {
                url.path_segments()
                    .and_then(|mut segments| segments.nth(1))
                    .map(str::to_string)
            } else {
                None
            }
        }
        "youtu.be" | "www.youtu.be" => first_path_segment(url),
        _ => None,
    };
    id.filter(|id| !id.is_empty())
}

/// Derive the URL actually requested from the server
///
/// Drops the fragment unless it must be preserved, replaces any previous
/// `session` query pair and appends the current one before the fragment.
/// Deriving twice yields the same URL up to the session value.
pub fn effective_fetch_url(url: &str, preserve_fragment: bool, session: &SessionId) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };
    let (path, query) = match base.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (base, None),
    };

    let kept: Vec<&str> = query
        .map(|q| {
            q.split('&')
                .filter(|pair| !pair.is_empty() && !is_session_pair(pair))
                .collect()
        })
        .unwrap_or_default();

    let mut out = String::with_capacity(url.len() + 48);
    out.push_str(path);
    out.push('?');
    for pair in &kept {
        out.push_str(pair);
        out.push('&');
    }
    out.push_str(SESSION_PARAM);
    out.push('=');
    out.push_str(session.as_str());

    if preserve_fragment {
        if let Some(fragment) = fragment {
            out.push('#');
            out.push_str(fragment);
        }
    }
    out
}

fn is_session_pair(pair: &str) -> bool {
    let key = pair.split_once('=').map_or(pair, |(key, _)| key);
    key == SESSION_PARAM
}

/// Last path segment, used as the filename of PDF links
pub fn last_path_segment(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_validate_documentation_hosts() {
        for url in [
            "https://experienceleague.adobe.com/en/docs/experience-manager-cloud-service",
            "https://developer.adobe.com/experience-cloud/experience-manager-apis/",
            "https://helpx.adobe.com/experience-manager/kb/index.html",
            "https://docs.adobe.com/content/help/en/experience-manager.html",
            "https://business.adobe.com/summit/adobe-summit.html",
            "https://sling.apache.org/documentation/bundles/models.html",
            "https://adapt.to/2025/schedule",
            "http://adapt.to/2025/presentations/talk.pdf",
        ] {
            assert!(validate_url(url, &[]).is_ok(), "{url}");
        }
    }

    #[test]
    fn test_validate_github() {
        assert!(validate_url("https://github.com/anyorg/anyrepo", &[]).is_ok());
        assert!(validate_url("https://github.com/Netcentric", &[]).is_ok());
        assert!(validate_url("https://github.com/", &[]).is_err());
        assert!(validate_url(
            "https://adobe-consulting-services.github.io/acs-aem-commons/",
            &[]
        )
        .is_ok());
        assert!(validate_url("https://github.io/", &[]).is_err());
    }

    #[test]
    fn test_validate_youtube() {
        assert!(validate_url("https://www.youtube.com/watch?v=nJ8QTNQEkD8", &[]).is_ok());
        assert!(validate_url("https://youtube.com/@AdobeDevelopers", &[]).is_ok());
        assert!(validate_url("https://youtu.be/nJ8QTNQEkD8", &[]).is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let err = validate_url("https://example.com/docs", &[]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/docs"));
        assert!(msg.contains("Adobe domains"));
        assert!(msg.contains("GitHub"));

        assert!(validate_url("ftp://experienceleague.adobe.com/en", &[]).is_err());
        assert!(validate_url("not a url", &[]).is_err());
        assert!(validate_url("https://evil-adobe.com/", &[]).is_err());
        assert!(validate_url("https://experienceleague.adobe.com.evil.com/", &[]).is_err());
    }

    #[test]
    fn test_validate_extra_hosts() {
        let extra = vec!["127.0.0.1".to_string()];
        assert!(validate_url("http://127.0.0.1:8080/page", &extra).is_ok());
        assert!(validate_url("http://127.0.0.1:8080/page", &[]).is_err());
    }

    #[test]
    fn test_classify_order() {
        let c = classify(&parse("https://www.youtube.com/watch?v=abc"));
        assert_eq!(c.category, UrlCategory::Youtube);

        let c = classify(&parse("https://adapt.to/2025/presentations/talk.PDF"));
        assert_eq!(c.category, UrlCategory::Pdf);
        assert!(c.preserve_fragment);

        let c = classify(&parse("https://experienceleague.adobe.com/en/search#q=sling"));
        assert_eq!(c.category, UrlCategory::SearchLike);
        assert!(c.preserve_fragment);

        let c = classify(&parse("https://experienceleague.adobe.com/en/docs#q=x"));
        assert_eq!(c.category, UrlCategory::SearchLike);

        let c = classify(&parse("https://adapt.to/2025/schedule#day-2"));
        assert_eq!(c.category, UrlCategory::Ordinary);
        assert!(c.preserve_fragment);

        let c = classify(&parse("https://sling.apache.org/documentation.html#models"));
        assert_eq!(c.category, UrlCategory::Ordinary);
        assert!(!c.preserve_fragment);
    }

    #[test]
    fn test_classify_is_pure() {
        let url = parse("https://experienceleague.adobe.com/en/search#q=dispatcher");
        assert_eq!(classify(&url), classify(&url));
    }

    #[test]
    fn test_extract_video_id() {
        let cases = [
            ("https://www.youtube.com/watch?v=nJ8QTNQEkD8", Some("nJ8QTNQEkD8")),
            ("https://youtube.com/watch?list=x&v=abc123", Some("abc123")),
            ("https://www.youtube.com/embed/xyz789", Some("xyz789")),
            ("https://www.youtube.com/v/qwe456", Some("qwe456")),
            ("https://youtu.be/short1", Some("short1")),
            ("https://www.youtube.com/watch", None),
            ("https://www.youtube.com/@AdobeDevelopers", None),
            ("https://youtu.be/", None),
            ("https://helpx.adobe.com/watch?v=abc", None),
        ];
        for (url, expected) in cases {
            assert_eq!(
                extract_video_id(&parse(url)).as_deref(),
                expected,
                "{url}"
            );
        }
    }

    #[test]
    fn test_effective_url_strips_fragment() {
        let session = SessionId::from("s1");
        assert_eq!(
            effective_fetch_url("https://sling.apache.org/docs.html#models", false, &session),
            "https://sling.apache.org/docs.html?session=s1"
        );
        assert_eq!(
            effective_fetch_url("https://helpx.adobe.com/a?x=1#top", false, &session),
            "https://helpx.adobe.com/a?x=1&session=s1"
        );
    }

    #[test]
    fn test_effective_url_preserves_fragment() {
        let session = SessionId::from("s1");
        assert_eq!(
            effective_fetch_url(
                "https://experienceleague.adobe.com/en/search#q=sling&f-el_role=Developer",
                true,
                &session
            ),
            "https://experienceleague.adobe.com/en/search?session=s1#q=sling&f-el_role=Developer"
        );
    }

    #[test]
    fn test_effective_url_idempotent() {
        let first = SessionId::from("first");
        let second = SessionId::from("second");
        for (url, preserve) in [
            ("https://helpx.adobe.com/a?x=1&y=2#frag", false),
            ("https://adapt.to/2025/schedule#day-1", true),
            ("https://developer.adobe.com/guide/", false),
        ] {
            let once = effective_fetch_url(url, preserve, &first);
            let twice = effective_fetch_url(&once, preserve, &second);
            assert_eq!(twice, effective_fetch_url(url, preserve, &second));
            assert_eq!(
                effective_fetch_url(&twice, preserve, &first),
                once,
                "{url}"
            );
        }
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment(&parse("https://adapt.to/2025/presentations/talk.pdf")),
            "talk.pdf"
        );
    }
}
