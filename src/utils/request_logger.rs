//! 生成请求日志记录器
//!
//! 将每一次生成后端调用记录到 JSONL 文件，便于排查模型输出问题。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

const LOG_FILE_NAME: &str = "generation_requests.jsonl";
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    pub model: String,
    /// 提示词预览
    pub prompt_preview: String,
    pub prompt_length: usize,
    /// 超时时间（秒）
    pub timeout: u64,
    /// pending / success / error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 追加句柄与当前条目数
#[derive(Default)]
struct LogFile {
    handle: Option<File>,
    entries: usize,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    file: Mutex<LogFile>,
}

impl RequestLogger {
    /// 创建新的日志记录器，未指定目录时写到可执行文件旁的 storage/
    pub fn new(log_dir: Option<PathBuf>) -> Self {
        let log_dir = log_dir.unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("storage")
        });

        if let Err(e) = fs::create_dir_all(&log_dir) {
            tracing::warn!("Failed to create request log dir {}: {}", log_dir.display(), e);
        }

        Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            max_entries: DEFAULT_MAX_ENTRIES,
            file: Mutex::new(LogFile::default()),
        }
    }

    /// 限制保留的条目数
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// API 密钥脱敏
    pub fn mask_api_key(api_key: &str) -> String {
        let chars: Vec<char> = api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }

    /// 按字符截断
    fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &s[..idx]),
            None => s.to_string(),
        }
    }

    /// 记录请求开始
    pub fn log_request(
        &self,
        request_id: &str,
        endpoint: &str,
        model: &str,
        prompt: &str,
        timeout: u64,
        api_key: &str,
    ) -> LogEntry {
        LogEntry {
            request_id: request_id.to_string(),
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            api_key_masked: Self::mask_api_key(api_key),
            model: model.to_string(),
            prompt_preview: Self::truncate(prompt, 200),
            prompt_length: prompt.len(),
            timeout,
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            response_preview: None,
            finish_reason: None,
            error_type: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        response: &str,
        finish_reason: Option<&str>,
    ) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response.len());
        entry.response_preview = Some(Self::truncate(response, 300));
        entry.finish_reason = finish_reason.map(str::to_string);
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        error_type: &str,
        error_message: &str,
        status_code: Option<u16>,
    ) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_type = Some(error_type.to_string());
        entry.error_message = Some(Self::truncate(error_message, 500));
        entry.status_code = status_code;
        self.write_entry(&entry);
    }

    /// 读取最近的 n 条日志
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let Ok(file) = File::open(&self.log_path) else {
            return Vec::new();
        };
        let entries: Vec<LogEntry> = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str(&line).ok())
            .collect();
        let skip = entries.len().saturating_sub(n);
        entries.into_iter().skip(skip).collect()
    }

    fn write_entry(&self, entry: &LogEntry) {
        let mut guard = self.file.lock();
        let log = &mut *guard;

        if log.handle.is_none() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                Ok(f) => {
                    // 只在打开文件时统计一次已有条目
                    log.entries = self.read_lines().len();
                    log.handle = Some(f);
                }
                Err(e) => {
                    tracing::warn!("Failed to open request log {}: {}", self.log_path.display(), e);
                    return;
                }
            }
        }

        let Ok(json) = serde_json::to_string(entry) else {
            return;
        };
        if let Some(file) = log.handle.as_mut() {
            if writeln!(file, "{}", json).and_then(|_| file.flush()).is_ok() {
                log.entries += 1;
            }
        }

        if log.entries > self.max_entries {
            self.truncate_to_max(log);
        }
    }

    fn read_lines(&self) -> Vec<String> {
        match File::open(&self.log_path) {
            Ok(file) => BufReader::new(file).lines().map_while(Result::ok).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 超出上限时只保留最新的 max_entries 条
    fn truncate_to_max(&self, log: &mut LogFile) {
        let lines = self.read_lines();
        let keep_lines = &lines[lines.len().saturating_sub(self.max_entries)..];
        if let Ok(mut file) = File::create(&self.log_path) {
            for line in keep_lines {
                let _ = writeln!(file, "{}", line);
            }
        }
        // 文件被重写，追加句柄需要重新打开
        log.handle = None;
        log.entries = keep_lines.len();
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(RequestLogger::mask_api_key("short"), "*****");
        assert_eq!(RequestLogger::mask_api_key("AIzaSyABCDEFGH1234"), "AIza...1234");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(RequestLogger::truncate("学生档案信息", 2), "学生...");
        assert_eq!(RequestLogger::truncate("abc", 5), "abc");
    }

    #[test]
    fn test_log_rotation_keeps_latest_entries() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RequestLogger::new(Some(dir.path().to_path_buf())).with_max_entries(2);

        for i in 0..3 {
            let entry = logger.log_request(
                &format!("req-{i}"),
                "http://localhost/v1beta/models/m:generateContent",
                "m",
                "prompt",
                30,
                "key",
            );
            logger.log_success(entry, Instant::now(), "{\"opportunities\":[]}", Some("STOP"));
        }

        assert!(logger.log_path().ends_with(LOG_FILE_NAME));
        let recent = logger.recent(10);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].request_id, "req-1");
        assert_eq!(recent[1].request_id, "req-2");
        assert_eq!(recent[1].status, "success");
    }

    #[test]
    fn test_existing_entries_count_toward_limit() {
        let dir = tempfile::tempdir().unwrap();
        let first = RequestLogger::new(Some(dir.path().to_path_buf()));
        for i in 0..3 {
            let entry = first.log_request(&format!("old-{i}"), "e", "m", "p", 30, "key");
            first.log_error(entry, Instant::now(), "timeout", "请求超时", None);
        }

        let second = RequestLogger::new(Some(dir.path().to_path_buf())).with_max_entries(3);
        let entry = second.log_request("new-0", "e", "m", "p", 30, "key");
        second.log_success(entry, Instant::now(), "{}", None);

        let ids: Vec<String> = second.recent(10).into_iter().map(|e| e.request_id).collect();
        assert_eq!(ids, vec!["old-1", "old-2", "new-0"]);
    }
}
