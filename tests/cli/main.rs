use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    matchers::{method, path},
};

mod errors;
mod translate;

const BIN_NAME: &str = "locsync";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Keep config discovery inside the temp dir.
        fs::create_dir_all(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn write_json(&self, path: &str, value: Value) -> Result<()> {
        self.write_file(path, &serde_json::to_string_pretty(&value)?)
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    /// Command with no API key and no provider configured.
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd.env("RUST_LOG", "off"); // Keep stderr to errors only
        cmd
    }

    /// Command pointed at a mock provider.
    pub fn command(&self, server: &MockServer) -> Command {
        let mut cmd = self.bare_command();
        cmd.env("DEEPSEEK_API_KEY", "sk-test");
        cmd.env("DEEPSEEK_BASE_URL", server.uri());
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    /// Stdout with the project directory prefix removed.
    pub fn stdout(&self, output: &Output) -> String {
        let prefix = format!("{}/", self.project_dir.display());
        String::from_utf8_lossy(&output.stdout).replace(&prefix, "")
    }
}

/// Answers every request by prefixing each source string with a tag.
pub struct PrefixResponder(pub &'static str);

impl Respond for PrefixResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match request.body_json() {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let payload: Value = body["messages"][1]["content"]
            .as_str()
            .and_then(|content| serde_json::from_str(content).ok())
            .unwrap_or_else(|| json!({}));

        let translated: serde_json::Map<String, Value> = payload
            .as_object()
            .into_iter()
            .flatten()
            .map(|(id, text)| {
                let text = text.as_str().unwrap_or_default();
                (id.clone(), Value::String(format!("{}{}", self.0, text)))
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(completion(&Value::Object(translated).to_string()))
    }
}

pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 10, "total_tokens": 20}
    })
}

pub async fn mock_provider(responder: impl Respond + 'static) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(responder)
        .mount(&server)
        .await;
    server
}
