/// Picture feed sources
///
/// A data source turns a URL into the list of picture records, or fails.
/// The controller bounds every fetch with its own timeout.
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::error::FetchError;
use crate::state::data::{parse_payload, PictureRecord};

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<PictureRecord>, FetchError>> + 'a>>;

pub trait DataSource {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// Serves the feed from files under a root directory.
/// A readable file counts as a 200 response.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(url.trim_start_matches('/'))
    }
}

impl DataSource for FileDataSource {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let path = self.path_for(url);
            tracing::debug!("reading picture data from {}", path.display());

            let body = tokio::fs::read_to_string(&path).await?;
            parse_payload(200, &body)
        })
    }
}

/// Canned response, for tests and demos
#[derive(Debug, Clone)]
pub enum StaticDataSource {
    Records(Vec<PictureRecord>),
    Response { status: u16, body: String },
    /// Fails as if the network were down
    Unreachable,
    /// Never answers
    Hang,
}

impl DataSource for StaticDataSource {
    fn fetch<'a>(&'a self, _url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            match self {
                StaticDataSource::Records(records) => Ok(records.clone()),
                StaticDataSource::Response { status, body } => parse_payload(*status, body),
                StaticDataSource::Unreachable => Err(FetchError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
                StaticDataSource::Hang => std::future::pending().await,
            }
        })
    }
}
