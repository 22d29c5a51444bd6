#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use serde_json::json;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) struct Server {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: Option<ChildStderr>,
    storage_dir: PathBuf,
    cleanup_storage: bool,
    next_id: i64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_storage_dir(temp_dir(test_name), true)
    }

    pub(crate) fn start_with_storage_dir(storage_dir: PathBuf, cleanup_storage: bool) -> Self {
        Self::spawn(storage_dir, cleanup_storage, false)
    }

    /// Like `start`, but keeps the server's stderr for `finish_stderr`.
    pub(crate) fn start_capturing_stderr(test_name: &str) -> Self {
        Self::spawn(temp_dir(test_name), true, true)
    }

    fn spawn(storage_dir: PathBuf, cleanup_storage: bool, capture_stderr: bool) -> Self {
        std::fs::create_dir_all(&storage_dir).expect("create storage dir");
        let stderr = if capture_stderr {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(env!("CARGO_BIN_EXE_survey_mcp"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .arg("--log")
            .arg("warn")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
            .expect("spawn survey_mcp");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));
        let stderr = child.stderr.take();

        Self {
            child,
            stdin,
            stdout,
            stderr,
            storage_dir,
            cleanup_storage,
            next_id: 100,
        }
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.storage_dir
    }

    /// Stops the server and returns everything it wrote to stderr.
    pub(crate) fn finish_stderr(&mut self) -> String {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let mut out = String::new();
        if let Some(mut stderr) = self.stderr.take() {
            stderr.read_to_string(&mut out).expect("read stderr");
        }
        out
    }

    pub(crate) fn send(&mut self, req: Value) {
        writeln!(self.stdin, "{req}").expect("write request");
        self.stdin.flush().expect("flush request");
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        writeln!(self.stdin, "{line}").expect("write raw line");
        self.stdin.flush().expect("flush raw line");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn request(&mut self, req: Value) -> Value {
        self.send(req);
        self.recv()
    }

    pub(crate) fn initialize_default(&mut self) {
        let _ = self.request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2024-11-05", "capabilities": {}, "clientInfo": { "name": "test", "version": "0" } }
        }));
        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized",
            "params": {}
        }));
    }

    pub(crate) fn start_initialized(test_name: &str) -> Self {
        let mut server = Self::start(test_name);
        server.initialize_default();
        server
    }

    /// Calls a tool and returns the decoded tool envelope.
    pub(crate) fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.next_id += 1;
        let resp = self.request(json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }));
        let payload = extract_tool_text(&resp);
        let success = payload
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let is_error = resp
            .get("result")
            .and_then(|v| v.get("isError"))
            .and_then(|v| v.as_bool())
            .expect("result.isError");
        assert_eq!(is_error, !success, "isError must mirror the envelope");
        payload
    }

    /// Calls a tool that must succeed and returns its `result`.
    pub(crate) fn call_ok(&mut self, name: &str, arguments: Value) -> Value {
        let payload = self.call_tool(name, arguments);
        assert_eq!(
            payload.get("success").and_then(|v| v.as_bool()),
            Some(true),
            "{name} failed: {payload}"
        );
        payload.get("result").cloned().expect("result")
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if self.cleanup_storage {
            let _ = std::fs::remove_dir_all(&self.storage_dir);
        }
    }
}

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("survey_mcp_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn extract_tool_text(resp: &Value) -> Value {
    let text = resp
        .get("result")
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("text"))
        .and_then(|v| v.as_str())
        .expect("result.content[0].text");
    serde_json::from_str(text).expect("tool text is a JSON envelope")
}

pub(crate) fn error_code(payload: &Value) -> Option<&str> {
    payload
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_str())
}

pub(crate) fn assert_json_rpc_error(resp: &Value, expected_code: i64) {
    let code = resp
        .get("error")
        .and_then(|v| v.get("code"))
        .and_then(|v| v.as_i64())
        .expect("error.code");
    assert_eq!(code, expected_code);
}
