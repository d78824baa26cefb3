//! 外部ブリッジプロセス経由のデバイス
//!
//! 設定されたコマンドを常駐起動し、stdin/stdout で1行1JSONの要求・応答をやり取りする。
//!
//! 要求: `{"op":"open","path":"..."}` / `{"op":"get_field","name":"Price"}` など
//! 応答: `{"ok":true,"value":"£2.50"}` / `{"ok":false,"error":"..."}`

use super::{CutMode, DeviceError, LabelDevice};
use crate::config::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request<'a> {
    Open { path: &'a Path },
    GetField { name: &'a str },
    SetField { name: &'a str, value: &'a str },
    Save,
    StartPrint { label: &'a str, cut_mode: u32 },
    PrintOut { copies: u32, cut_mode: u32 },
    EndPrint,
    Close,
}

#[derive(Debug, Deserialize)]
struct Response {
    ok: bool,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct BridgeDevice {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    current: Option<PathBuf>,
}

impl BridgeDevice {
    pub fn spawn(config: &BridgeConfig) -> Result<Self, DeviceError> {
        // Windowsではcmd /c経由
        #[cfg(windows)]
        let mut command = {
            let mut c = Command::new("cmd");
            c.arg("/c").arg(&config.command);
            c
        };

        #[cfg(not(windows))]
        let mut command = Command::new(&config.command);

        let mut child = command
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DeviceError::Bridge(format!("failed to start '{}': {}", config.command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DeviceError::Bridge("bridge stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DeviceError::Bridge("bridge stdout unavailable".into()))?;

        tracing::debug!("device bridge started: {}", config.command);

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            current: None,
        })
    }

    fn request(&mut self, request: &Request<'_>) -> Result<Response, DeviceError> {
        let mut line = serde_json::to_string(request)
            .map_err(|e| DeviceError::Bridge(format!("encode error: {}", e)))?;
        line.push('\n');

        self.stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.flush())
            .map_err(|e| DeviceError::Bridge(format!("write error: {}", e)))?;

        let mut reply = String::new();
        let read = self
            .stdout
            .read_line(&mut reply)
            .map_err(|e| DeviceError::Bridge(format!("read error: {}", e)))?;
        if read == 0 {
            return Err(DeviceError::Bridge("bridge closed the connection".into()));
        }

        serde_json::from_str(reply.trim())
            .map_err(|e| DeviceError::Bridge(format!("invalid reply '{}': {}", reply.trim(), e)))
    }

    fn current_path(&self) -> PathBuf {
        self.current.clone().unwrap_or_default()
    }
}

fn failure_message(response: &Response) -> String {
    response
        .error
        .clone()
        .unwrap_or_else(|| "unknown error".into())
}

impl LabelDevice for BridgeDevice {
    fn open(&mut self, path: &Path) -> Result<(), DeviceError> {
        self.current = None;
        let response = self.request(&Request::Open { path })?;
        if !response.ok {
            tracing::debug!("open {} failed: {}", path.display(), failure_message(&response));
            return Err(DeviceError::Open(path.to_path_buf()));
        }
        self.current = Some(path.to_path_buf());
        Ok(())
    }

    fn read_field(&mut self, name: &str) -> Result<Option<String>, DeviceError> {
        let response = self.request(&Request::GetField { name })?;
        if !response.ok {
            return Err(DeviceError::Bridge(failure_message(&response)));
        }
        Ok(response.value)
    }

    fn write_field(&mut self, name: &str, value: &str) -> Result<(), DeviceError> {
        let response = self.request(&Request::SetField { name, value })?;
        if !response.ok {
            return Err(DeviceError::FieldMissing {
                path: self.current_path(),
                field: name.to_string(),
            });
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), DeviceError> {
        let response = self.request(&Request::Save)?;
        if !response.ok {
            return Err(DeviceError::Save(self.current_path()));
        }
        Ok(())
    }

    fn start_print(&mut self, label: &str, mode: CutMode) -> Result<(), DeviceError> {
        let response = self.request(&Request::StartPrint {
            label,
            cut_mode: mode.code(),
        })?;
        if !response.ok {
            return Err(DeviceError::SessionRefused(failure_message(&response)));
        }
        Ok(())
    }

    fn print_out(&mut self, copies: u32, mode: CutMode) -> Result<(), DeviceError> {
        let response = self.request(&Request::PrintOut {
            copies,
            cut_mode: mode.code(),
        })?;
        if !response.ok {
            return Err(DeviceError::Print {
                path: self.current_path(),
                message: failure_message(&response),
            });
        }
        Ok(())
    }

    fn end_print(&mut self) -> Result<(), DeviceError> {
        let response = self.request(&Request::EndPrint)?;
        if !response.ok {
            return Err(DeviceError::Bridge(failure_message(&response)));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.current = None;
        if let Err(e) = self.request(&Request::Close) {
            tracing::debug!("close failed: {}", e);
        }
    }
}

impl Drop for BridgeDevice {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
