//! One-shot dataset loading.
//!
//! Loading is the only asynchronous step. The async functions do not depend on a particular
//! executor; the `_sync` variant exists for callers that already hold the document text.

use crate::error::{Error, Result};
use crate::model::GraphDataset;
use crate::session::{Session, SessionOptions};
use std::path::{Path, PathBuf};

/// Supplies the raw dataset document.
#[allow(async_fn_in_trait)]
pub trait DatasetSource {
    async fn fetch(&self) -> Result<String>;
}

/// A document already held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DatasetSource for StaticSource {
    async fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|err| Error::load(format!("{}: {err}", self.path.display())))
    }
}

/// Parses and validates a dataset document.
///
/// Malformed JSON is a [`Error::Load`]; an edge pointing outside its scope is
/// [`Error::DanglingEdge`]. Nothing partial is ever returned.
pub fn load_dataset_sync(text: &str) -> Result<GraphDataset> {
    let dataset = GraphDataset::from_json_str(text).map_err(|err| match err {
        Error::Json(err) => Error::load(err.to_string()),
        other => other,
    })?;
    dataset.validate()?;
    tracing::debug!(levels = dataset.levels.len(), "dataset loaded");
    Ok(dataset)
}

pub async fn load_dataset<S: DatasetSource>(source: &S) -> Result<GraphDataset> {
    let text = source.fetch().await?;
    load_dataset_sync(&text)
}

pub async fn load_session<S: DatasetSource>(source: &S, options: SessionOptions) -> Result<Session> {
    let dataset = load_dataset(source).await?;
    Ok(Session::new(dataset, options))
}

/// Application-level load status. `Failed` is terminal.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Box<Session>),
    Failed(Error),
}

impl LoadState {
    pub fn from_result(result: Result<Session>) -> Self {
        match result {
            Ok(session) => LoadState::Ready(Box::new(session)),
            Err(err) => {
                tracing::error!(error = %err, "dataset load failed");
                LoadState::Failed(err)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            LoadState::Ready(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            LoadState::Ready(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}
