//! Paginated catalog download from data-starcloud.pcl.ac.cn.

use crate::catalog::{Catalog, CatalogEntry};
use crate::http::HttpClient;
use crate::source::{HeaderProfile, SourceId};
use crate::{Result, SourceError};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Directory listing endpoint; the directory id is appended.
pub const DIR_API_URL: &str = "https://data-starcloud.pcl.ac.cn/api/en/resource/3/dir";

/// Entries requested per page.
pub const PAGE_SIZE: u32 = 100;

/// A FROM_GLC product whose file list lives in the directory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// Landsat scenes, spread over many directories listed in a dir-id file.
    FromGlc2010,
    /// 10° tiles.
    FromGlc2015,
    /// 2° tiles.
    FromGlc2017,
}

impl CatalogKind {
    /// All catalog-backed products.
    pub const ALL: [CatalogKind; 3] = [
        CatalogKind::FromGlc2010,
        CatalogKind::FromGlc2015,
        CatalogKind::FromGlc2017,
    ];

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            CatalogKind::FromGlc2010 => "from-glc-2010",
            CatalogKind::FromGlc2015 => "from-glc-2015",
            CatalogKind::FromGlc2017 => "from-glc-2017",
        }
    }

    /// Source whose resolver reads this catalog.
    pub const fn source(self) -> SourceId {
        match self {
            CatalogKind::FromGlc2010 => SourceId::FromGlc2010,
            CatalogKind::FromGlc2015 => SourceId::FromGlc2015,
            CatalogKind::FromGlc2017 => SourceId::FromGlc2017,
        }
    }

    /// Referer the API expects for this product.
    pub const fn referer(self) -> &'static str {
        match self {
            CatalogKind::FromGlc2010 => "https://data-starcloud.pcl.ac.cn/resource/4",
            CatalogKind::FromGlc2015 => "https://data-starcloud.pcl.ac.cn/resource/3",
            CatalogKind::FromGlc2017 => "https://data-starcloud.pcl.ac.cn/resource/1",
        }
    }

    /// Built-in directory id, for products stored in a single directory.
    pub const fn builtin_dir_id(self) -> Option<&'static str> {
        match self {
            CatalogKind::FromGlc2010 => None,
            CatalogKind::FromGlc2015 => Some("1714118541720240133"),
            CatalogKind::FromGlc2017 => Some("1714157507660038144"),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CatalogKind {
    type Err = SourceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| SourceError::UnknownSource(s.to_string()))
    }
}

/// Read a JSON array of directory ids (strings or numbers).
pub fn load_dir_ids(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&text)?;
    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(SourceError::CatalogFormat {
                path: path.to_path_buf(),
                reason: format!("directory id must be a string or a number, got {other}"),
            }),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirPage {
    success: bool,
    #[serde(default)]
    fail_reason: Option<String>,
    #[serde(default)]
    data: Option<DirPageData>,
}

#[derive(Debug, Deserialize)]
struct DirPageData {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    list: Vec<CatalogEntry>,
}

/// Walks the paginated directory listing.
pub struct CatalogFetcher<'a> {
    client: &'a dyn HttpClient,
    page_size: u32,
}

impl<'a> CatalogFetcher<'a> {
    /// Create a fetcher using the default page size.
    pub fn new(client: &'a dyn HttpClient) -> Self {
        Self {
            client,
            page_size: PAGE_SIZE,
        }
    }

    /// Override the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetch every entry of the given directories.
    ///
    /// Never fails: a transport or decoding error stops the walk, is logged,
    /// and the entries collected so far are returned.
    pub fn fetch(&self, kind: CatalogKind, dir_ids: &[String]) -> Catalog {
        let mut entries = Vec::new();
        for dir_id in dir_ids {
            if let Err(e) = self.fetch_dir(kind, dir_id, &mut entries) {
                warn!(catalog = %kind, dir_id = %dir_id, error = %e, "catalog fetch stopped early");
                break;
            }
        }
        info!(catalog = %kind, entries = entries.len(), "catalog fetch finished");
        Catalog::new(entries)
    }

    fn fetch_dir(&self, kind: CatalogKind, dir_id: &str, entries: &mut Vec<CatalogEntry>) -> Result<()> {
        let profile = HeaderProfile::FromGlc;
        let mut headers: Vec<(&str, &str)> = profile.headers().to_vec();
        headers.push(("Referer", kind.referer()));
        headers.push(("Cookie", profile.cookie()));

        let mut page_num: u64 = 1;
        loop {
            let url = format!(
                "{DIR_API_URL}/{dir_id}?pageNum={page_num}&pageSize={}",
                self.page_size
            );
            let body = self.client.post_json(&url, &headers, r#"{"name": ""}"#)?;
            let page: DirPage = serde_json::from_slice(&body)?;

            if !page.success {
                warn!(
                    catalog = %kind,
                    reason = page.fail_reason.as_deref().unwrap_or("unknown"),
                    "catalog API reported failure"
                );
                return Ok(());
            }

            let Some(data) = page.data else {
                return Ok(());
            };
            debug!(catalog = %kind, page_num, total = data.total, "fetched catalog page");

            if data.list.is_empty() {
                return Ok(());
            }
            entries.extend(data.list);

            if page_num * u64::from(self.page_size) >= data.total {
                return Ok(());
            }
            page_num += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves canned responses in order and records the requested URLs.
    struct ScriptedClient {
        responses: Mutex<Vec<Result<Vec<u8>>>>,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<Vec<u8>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                urls: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for ScriptedClient {
        fn get(&self, _url: &str) -> Result<Vec<u8>> {
            unreachable!("catalog fetch only posts")
        }

        fn post_json(&self, url: &str, headers: &[(&str, &str)], json_body: &str) -> Result<Vec<u8>> {
            assert_eq!(json_body, r#"{"name": ""}"#);
            assert!(headers.iter().any(|(k, v)| *k == "Cookie" && *v == "i18n_redirected=en"));
            self.urls.lock().unwrap().push(url.to_string());
            self.responses.lock().unwrap().pop().unwrap_or_else(|| Ok(b"{}".to_vec()))
        }
    }

    fn page(total: u64, names: &[&str]) -> Result<Vec<u8>> {
        let list: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| serde_json::json!({"id": i, "name": n}))
            .collect();
        Ok(serde_json::json!({"success": true, "data": {"total": total, "list": list}})
            .to_string()
            .into_bytes())
    }

    #[test]
    fn test_stops_when_total_reached() {
        let client = ScriptedClient::new(vec![page(3, &["a", "b"]), page(3, &["c"])]);
        let catalog = CatalogFetcher::new(&client)
            .with_page_size(2)
            .fetch(CatalogKind::FromGlc2015, &["1714118541720240133".to_string()]);

        assert_eq!(catalog.len(), 3);
        let urls = client.urls.lock().unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].ends_with("/1714118541720240133?pageNum=2&pageSize=2"));
    }

    #[test]
    fn test_failure_and_transport_error_keep_partial_results() {
        let failure = Ok(br#"{"success": false, "failReason": "busy", "data": null}"#.to_vec());
        let client = ScriptedClient::new(vec![page(10, &["a"]), failure]);
        let catalog = CatalogFetcher::new(&client)
            .with_page_size(1)
            .fetch(CatalogKind::FromGlc2017, &["d".to_string()]);
        assert_eq!(catalog.len(), 1);

        let broken = Err(SourceError::RemoteQueryFailed {
            service: "http",
            reason: "timeout".into(),
        });
        let client = ScriptedClient::new(vec![page(10, &["a", "b"]), broken]);
        let catalog = CatalogFetcher::new(&client)
            .with_page_size(2)
            .fetch(CatalogKind::FromGlc2017, &["d".to_string()]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_empty_page_ends_directory() {
        let client = ScriptedClient::new(vec![page(500, &[]), page(1, &["x"])]);
        let catalog = CatalogFetcher::new(&client)
            .fetch(CatalogKind::FromGlc2010, &["d1".to_string(), "d2".to_string()]);
        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.entries()[0].name, "x");
    }

    #[test]
    fn test_kind_names_and_dir_ids() {
        assert_eq!("from_glc_2015".parse::<CatalogKind>().unwrap(), CatalogKind::FromGlc2015);
        assert_eq!("FROM-GLC-2010".parse::<CatalogKind>().unwrap(), CatalogKind::FromGlc2010);
        assert!("from-glc-2020".parse::<CatalogKind>().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");
        std::fs::write(&path, r#"["1700", 1701]"#).unwrap();
        assert_eq!(load_dir_ids(&path).unwrap(), vec!["1700", "1701"]);
    }
}
