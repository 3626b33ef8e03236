use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::protocol::{SavedSnippet, Snippet};

use crate::{
    error::SnippetError,
    transport::{Method, Transport},
};

const GIST_FILENAME: &str = "playground.rs";
const GIST_DESCRIPTION: &str = "Rust code shared from the playground";

/// Persistent store for shareable snippets.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Snippet, SnippetError>;
    async fn save(&self, code: &str) -> Result<SavedSnippet, SnippetError>;
}

pub struct MissingSnippetStore;

#[async_trait]
impl SnippetStore for MissingSnippetStore {
    async fn load(&self, _id: &str) -> Result<Snippet, SnippetError> {
        Err(SnippetError::Unavailable)
    }

    async fn save(&self, _code: &str) -> Result<SavedSnippet, SnippetError> {
        Err(SnippetError::Unavailable)
    }
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GistResponse {
    id: String,
    html_url: String,
    #[serde(default)]
    files: BTreeMap<String, GistFile>,
}

#[derive(Debug, Serialize)]
struct NewGistFile<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct NewGist<'a> {
    description: &'a str,
    public: bool,
    files: BTreeMap<&'a str, NewGistFile<'a>>,
}

/// Snippets stored as GitHub gists.
pub struct GistStore {
    transport: Arc<dyn Transport>,
}

impl GistStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, SnippetError> {
    serde_json::from_value(body).map_err(|err| SnippetError::Malformed(err.to_string()))
}

#[async_trait]
impl SnippetStore for GistStore {
    async fn load(&self, id: &str) -> Result<Snippet, SnippetError> {
        let body = self
            .transport
            .send(Method::Get, &format!("/gists/{id}"), None)
            .await?;
        let gist: GistResponse = decode(body)?;

        // Prefer the file we write ourselves; otherwise take the first one.
        let code = gist
            .files
            .get(GIST_FILENAME)
            .or_else(|| gist.files.values().next())
            .and_then(|file| file.content.clone())
            .ok_or_else(|| SnippetError::Empty(gist.id.clone()))?;

        Ok(Snippet {
            id: gist.id,
            url: gist.html_url,
            code,
        })
    }

    async fn save(&self, code: &str) -> Result<SavedSnippet, SnippetError> {
        let request = NewGist {
            description: GIST_DESCRIPTION,
            public: true,
            files: BTreeMap::from([(GIST_FILENAME, NewGistFile { content: code })]),
        };
        let payload =
            serde_json::to_value(&request).map_err(|err| SnippetError::Malformed(err.to_string()))?;
        let body = self
            .transport
            .send(Method::Post, "/gists", Some(payload))
            .await?;
        let gist: GistResponse = decode(body)?;

        Ok(SavedSnippet {
            id: gist.id,
            url: gist.html_url,
        })
    }
}

#[cfg(test)]
#[path = "tests/snippets_tests.rs"]
mod tests;
