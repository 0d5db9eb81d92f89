// ===============================
// src/recorder.rs
// ===============================
//
// Jurnal JSONL per invocation:
// - Satu baris per run (append), berisi ringkasan request + hasil/error.
// - Otomatis membuat parent directory jika belum ada.
// - Gagal tulis hanya di-log; output JSON & exit code tidak berubah.
//
// ENV: set `RECORD_FILE=/path/to/runs.jsonl` agar aktif (lihat main.rs).
//
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::{error, info};

#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub ts: String,
    pub mode: &'static str,
    pub model: String,
    pub model_id: &'static str,
    pub days: usize,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn new(mode: &'static str, model: &str, model_id: &'static str, days: usize) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            mode,
            model: model.to_string(),
            model_id,
            days,
            ok: false,
            last_price: None,
            error: None,
        }
    }
}

async fn write_line(path: &str, line: &str) -> std::io::Result<()> {
    // Pastikan parent directory ada (kalau ada)
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}

pub async fn append(path: &str, rec: &RunRecord) {
    let line = match serde_json::to_string(rec) {
        Ok(s) => s,
        Err(e) => {
            error!(?e, "recorder: serialize error, skip record");
            return;
        }
    };
    match write_line(path, &line).await {
        Ok(()) => info!(%path, ok = rec.ok, "recorder: run recorded"),
        Err(e) => error!(?e, %path, "recorder: append failed"),
    }
}
