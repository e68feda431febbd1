use std::path::Path;
use std::time::Duration;

pub(crate) fn retriable_status(code: u16) -> bool {
    matches!(code, 500 | 502 | 503 | 504 | 429 | 408)
}

pub(crate) fn backoff(current: Duration, max: Duration) -> Duration {
    let next = Duration::from_secs_f64((current.as_secs_f64() * 1.5).max(1.0));
    if next > max { max } else { next }
}

/// Turns a bare host (`earthquake.usgs.gov`) into an https base URL, leaving
/// explicit `http://`/`https://` URLs alone.
pub(crate) fn host_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn append_query(url: &str, params: &[(&str, &str)]) -> String {
    let mut out = url.to_string();
    let sep = if url.contains('?') { '&' } else { '?' };
    out.push(sep);
    let mut first = true;
    for (k, v) in params {
        if !first {
            out.push('&');
        }
        first = false;
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

/// Last path component of a ComCat content name (`shakemap/grid.xml` -> `grid.xml`).
pub(crate) fn base_filename(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}

/// Counts regular files below `dir`, descending into subdirectories.
pub(crate) fn count_files(dir: &Path) -> std::io::Result<usize> {
    let mut n = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let kind = entry.file_type()?;
        if kind.is_dir() {
            n += count_files(&entry.path())?;
        } else if kind.is_file() {
            n += 1;
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        assert_eq!(host_base_url("earthquake.usgs.gov"), "https://earthquake.usgs.gov");
        assert_eq!(host_base_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080");
    }

    #[test]
    fn query_is_appended() {
        let url = append_query("https://h/q", &[("eventid", "us1"), ("format", "geojson")]);
        assert_eq!(url, "https://h/q?eventid=us1&format=geojson");
        assert_eq!(append_query("https://h/q?a=1", &[("b", "2")]), "https://h/q?a=1&b=2");
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(urljoin("https://h/", "/fdsnws"), "https://h/fdsnws");
        assert_eq!(urljoin("https://h", "fdsnws"), "https://h/fdsnws");
        assert_eq!(urljoin("https://h", "http://other/x"), "http://other/x");
    }

    #[test]
    fn base_filename_strips_directories() {
        assert_eq!(base_filename("shakemap/grid.xml"), Some("grid.xml"));
        assert_eq!(base_filename("FFM.geojson"), Some("FFM.geojson"));
        assert_eq!(base_filename(""), None);
    }

    #[test]
    fn backoff_is_capped() {
        let max = Duration::from_secs(5);
        assert_eq!(backoff(Duration::from_secs(0), max), Duration::from_secs(1));
        assert_eq!(backoff(Duration::from_secs(4), max), max);
    }

    #[test]
    fn counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("b.txt"), "b").unwrap();
        assert_eq!(count_files(dir.path()).unwrap(), 2);
    }
}
