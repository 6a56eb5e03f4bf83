use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("nfl_gamelog/", env!("CARGO_PKG_VERSION"));

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "nfl_gamelog";
const INDEX_FILE: &str = "pages.json";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")
    })
}

pub fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }
    resp.text().context("failed reading body")
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheIndex {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    file: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

pub struct PageCache {
    dir: PathBuf,
    index: CacheIndex,
}

impl PageCache {
    pub fn default_dir() -> Option<PathBuf> {
        if let Ok(base) = std::env::var("XDG_CACHE_HOME")
            && !base.trim().is_empty()
        {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
        let home = std::env::var("HOME").ok()?;
        if home.trim().is_empty() {
            return None;
        }
        Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
    }

    pub fn open(dir: PathBuf) -> Self {
        let index = fs::read_to_string(dir.join(INDEX_FILE))
            .ok()
            .and_then(|raw| serde_json::from_str::<CacheIndex>(&raw).ok())
            .filter(|index| index.version == CACHE_VERSION)
            .unwrap_or_default();
        Self { dir, index }
    }

    pub fn len(&self) -> usize {
        self.index.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.entries.is_empty()
    }

    pub fn cached_body(&self, url: &str) -> Option<String> {
        let entry = self.index.entries.get(url)?;
        fs::read_to_string(self.dir.join(&entry.file)).ok()
    }

    pub fn fetch(&mut self, client: &Client, url: &str) -> Result<String> {
        let cached = self
            .index
            .entries
            .get(url)
            .cloned()
            .zip(self.cached_body(url));

        let mut req = client.get(url);
        if let Some((entry, _)) = cached.as_ref() {
            if let Some(etag) = entry.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().context("request failed")?;
        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            let Some((_, body)) = cached else {
                return Err(anyhow!("received 304 without cache body for {url}"));
            };
            tracing::debug!(url, "page not modified");
            return Ok(body);
        }
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }

        let header = |name: HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        let etag = header(ETAG);
        let last_modified = header(LAST_MODIFIED);
        let body = resp.text().context("failed reading body")?;

        let entry = CacheEntry {
            file: page_file_name(url),
            etag,
            last_modified,
            fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
        };
        if let Err(err) = self.store(url, entry, &body) {
            tracing::warn!(url, error = %err, "could not cache page");
        }
        Ok(body)
    }

    fn store(&mut self, url: &str, entry: CacheEntry, body: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create cache dir {}", self.dir.display()))?;
        write_atomic(&self.dir.join(&entry.file), body).context("write cached page")?;
        self.index.version = CACHE_VERSION;
        self.index.entries.insert(url.to_string(), entry);
        let json = serde_json::to_string(&self.index).context("serialize page index")?;
        write_atomic(&self.dir.join(INDEX_FILE), &json).context("write page index")?;
        Ok(())
    }
}

fn write_atomic(path: &std::path::Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn page_file_name(url: &str) -> String {
    let stem = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    format!("{stem}.html")
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_file_names_are_flat() {
        assert_eq!(
            page_file_name("https://www.pro-football-reference.com/teams/nyg/2023/gamelog/"),
            "www_pro_football_reference_com_teams_nyg_2023_gamelog.html"
        );
    }

    #[test]
    fn stored_pages_survive_reopen() {
        let dir = std::env::temp_dir().join(format!("nfl_gamelog_cache_{}", std::process::id()));
        let url = "https://example.test/teams/nyg/2023/gamelog/";
        {
            let mut cache = PageCache::open(dir.clone());
            let entry = CacheEntry {
                file: page_file_name(url),
                etag: Some("\"abc\"".to_string()),
                last_modified: None,
                fetched_at: 1,
            };
            cache.store(url, entry, "<html></html>").unwrap();
        }
        let cache = PageCache::open(dir.clone());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cached_body(url).as_deref(), Some("<html></html>"));
        fs::remove_dir_all(&dir).ok();
    }
}
