// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-run download of the local ONNX models.
//!
//! Files come from the HuggingFace hub and are cached under
//! `{data_dir}/models/`. A file already on disk is never fetched again.

use std::path::{Path, PathBuf};

use mnemo_core::MnemoError;
use tracing::info;

/// Public HuggingFace hub.
pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";

/// Directory name of the sentence embedding model.
const EMBEDDING_MODEL_DIR: &str = "all-MiniLM-L6-v2";

/// `(local file, repository, path inside the repository)`.
type RemoteFile<'a> = (&'a str, &'a str, &'a str);

const EMBEDDING_FILES: [RemoteFile<'static>; 2] = [
    (
        "model.onnx",
        "onnx-community/all-MiniLM-L6-v2-ONNX",
        "onnx/model_quantized.onnx",
    ),
    (
        "tokenizer.json",
        "sentence-transformers/all-MiniLM-L6-v2",
        "tokenizer.json",
    ),
];

/// Manages model download and path resolution.
#[derive(Debug, Clone)]
pub struct ModelManager {
    data_dir: PathBuf,
    hub_url: String,
}

impl ModelManager {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            hub_url: DEFAULT_HUB_URL.to_string(),
        }
    }

    /// Points downloads at a hub mirror.
    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn models_dir(&self) -> PathBuf {
        self.data_dir.join("models")
    }

    /// Directory holding the sentence embedding model.
    pub fn embedding_model_dir(&self) -> PathBuf {
        self.models_dir().join(EMBEDDING_MODEL_DIR)
    }

    /// Directory holding the token-classification model from `repo`.
    ///
    /// `dslim/bert-base-NER` lives in `ner/dslim--bert-base-NER`.
    pub fn ner_model_dir(&self, repo: &str) -> PathBuf {
        self.models_dir().join("ner").join(repo.replace('/', "--"))
    }

    pub fn is_embedding_model_available(&self) -> bool {
        all_present(&self.embedding_model_dir(), EMBEDDING_FILES.iter().map(|f| f.0))
    }

    pub fn is_ner_model_available(&self, repo: &str) -> bool {
        all_present(
            &self.ner_model_dir(repo),
            ner_files(repo).iter().map(|f| f.0),
        )
    }

    /// Ensures the embedding model is on disk and returns its directory.
    pub async fn ensure_embedding_model(&self) -> Result<PathBuf, MnemoError> {
        let dir = self.embedding_model_dir();
        self.ensure_files(&dir, &EMBEDDING_FILES).await?;
        Ok(dir)
    }

    /// Ensures `model.onnx`, `tokenizer.json` and `config.json` of a
    /// token-classification repository are on disk and returns their directory.
    ///
    /// The repository must publish an ONNX export under `onnx/model.onnx`
    /// and a fast-tokenizer `tokenizer.json`.
    pub async fn ensure_ner_model(&self, repo: &str) -> Result<PathBuf, MnemoError> {
        let dir = self.ner_model_dir(repo);
        self.ensure_files(&dir, &ner_files(repo)).await?;
        Ok(dir)
    }

    async fn ensure_files(&self, dir: &Path, files: &[RemoteFile<'_>]) -> Result<(), MnemoError> {
        if all_present(dir, files.iter().map(|f| f.0)) {
            return Ok(());
        }

        info!(dir = %dir.display(), "model not found, downloading from HuggingFace");
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            MnemoError::Model(format!(
                "failed to create model directory {}: {e}",
                dir.display()
            ))
        })?;

        for (filename, repo, remote_path) in files {
            let dest = dir.join(filename);
            if dest.exists() {
                continue;
            }

            let url = format!("{}/{repo}/resolve/main/{remote_path}", self.hub_url);
            info!(file = %filename, %url, "downloading");
            match download_file(&url, &dest).await {
                Ok(size) => info!(file = %filename, size, "downloaded"),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&dest).await;
                    return Err(e);
                }
            }
        }

        info!(dir = %dir.display(), "model ready");
        Ok(())
    }
}

fn ner_files(repo: &str) -> [RemoteFile<'_>; 3] {
    [
        ("model.onnx", repo, "onnx/model.onnx"),
        ("tokenizer.json", repo, "tokenizer.json"),
        ("config.json", repo, "config.json"),
    ]
}

fn all_present<'a>(dir: &Path, mut names: impl Iterator<Item = &'a str>) -> bool {
    names.all(|name| dir.join(name).exists())
}

/// Download a file from a URL to a local path.
async fn download_file(url: &str, dest: &Path) -> Result<usize, MnemoError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| MnemoError::Model(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(MnemoError::Model(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MnemoError::Model(format!("failed to read response body from {url}: {e}")))?;

    let size = bytes.len();
    tokio::fs::write(dest, &bytes)
        .await
        .map_err(|e| MnemoError::Model(format!("failed to write {}: {e}", dest.display())))?;

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn embedding_model_dir_structure() {
        let mgr = ModelManager::new(PathBuf::from("/data"));
        assert_eq!(
            mgr.embedding_model_dir(),
            PathBuf::from("/data/models/all-MiniLM-L6-v2")
        );
    }

    #[test]
    fn ner_model_dir_flattens_repo_name() {
        let mgr = ModelManager::new(PathBuf::from("/data"));
        assert_eq!(
            mgr.ner_model_dir("dslim/bert-base-NER"),
            PathBuf::from("/data/models/ner/dslim--bert-base-NER")
        );
    }

    #[test]
    fn models_not_available_when_missing() {
        let mgr = ModelManager::new(PathBuf::from("/nonexistent/path"));
        assert!(!mgr.is_embedding_model_available());
        assert!(!mgr.is_ner_model_available("dslim/bert-base-NER"));
    }

    async fn mount_ner_files(server: &MockServer, repo: &str) {
        for file in ["onnx/model.onnx", "tokenizer.json", "config.json"] {
            Mock::given(method("GET"))
                .and(path(format!("/{repo}/resolve/main/{file}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(format!("<{file}>")))
                .expect(1)
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn ner_download_fetches_each_file_once() {
        let server = MockServer::start().await;
        mount_ner_files(&server, "acme/ner").await;
        let dir = tempfile::tempdir().unwrap();
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_hub_url(server.uri());

        let model_dir = mgr.ensure_ner_model("acme/ner").await.unwrap();
        assert!(mgr.is_ner_model_available("acme/ner"));
        let config = std::fs::read_to_string(model_dir.join("config.json")).unwrap();
        assert_eq!(config, "<config.json>");

        // Second call is served from disk.
        mgr.ensure_ner_model("acme/ner").await.unwrap();
    }

    #[tokio::test]
    async fn failed_download_leaves_no_partial_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let mgr = ModelManager::new(dir.path().to_path_buf()).with_hub_url(server.uri());

        let err = mgr.ensure_embedding_model().await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert!(!mgr.embedding_model_dir().join("model.onnx").exists());
    }
}
