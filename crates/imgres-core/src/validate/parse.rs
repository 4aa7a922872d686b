//! Parse HEAD response header lines for reachability checks.

/// The headers a reachability verdict depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHeaders {
    /// `Content-Type`, lowercased, without parameters.
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

impl ProbeHeaders {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Parse collected header lines into [`ProbeHeaders`]. Unknown lines are ignored.
pub fn parse_headers(lines: &[String]) -> ProbeHeaders {
    let mut out = ProbeHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                let mime = value.split(';').next().unwrap_or("").trim();
                if !mime.is_empty() {
                    out.content_type = Some(mime.to_ascii_lowercase());
                }
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    out.content_length = Some(n);
                }
            }
        }
    }

    out
}
