use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::pipeline::context::PipelineRun;

/// 历史记录文件名
pub const HISTORY_FILE: &str = "research_history.json";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 一次研究的历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub topic: String,
    pub result: String,
    pub timestamp: String,
}

impl ReportRecord {
    pub fn from_run(run: &PipelineRun, report: &str, generated_at: DateTime<Local>) -> Self {
        Self {
            id: run.id,
            topic: run.topic.to_string(),
            result: report.to_string(),
            timestamp: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// 渲染为可下载的Markdown文档
    pub fn to_markdown(&self) -> String {
        format!(
            "# Research Report\n\n**Topic:** {}\n\n**Generated:** {}\n\n---\n\n{}\n",
            self.topic, self.timestamp, self.result
        )
    }
}

pub trait Outlet {
    async fn save(&self, run: &PipelineRun) -> Result<PathBuf>;
}

/// 把报告写入输出目录，并追加历史记录
pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join(HISTORY_FILE)
    }

    /// 读取历史记录，文件不存在时返回空列表
    pub fn load_history(&self) -> Result<Vec<ReportRecord>> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history file: {}", path.display()))
    }

    /// 报告文件名带上运行id，同一秒内完成的多次运行不会互相覆盖
    fn report_path(&self, run: &PipelineRun, generated_at: DateTime<Local>) -> PathBuf {
        self.output_dir.join(format!(
            "research_{}_{}.md",
            generated_at.format(FILENAME_TIMESTAMP_FORMAT),
            run.id.simple()
        ))
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, run: &PipelineRun) -> Result<PathBuf> {
        println!("\n🖊️ 报告存储中...");
        let report = run
            .final_report()
            .context("research run has no final report to save")?;

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output_dir.display()
            )
        })?;

        // 先读历史记录，历史文件损坏时不留下孤立的报告文件
        let mut history = self.load_history()?;

        let now = Local::now();
        let record = ReportRecord::from_run(run, report, now);
        let report_path = self.report_path(run, now);

        fs::write(&report_path, record.to_markdown())?;
        println!("💾 已保存报告: {}", report_path.display());

        history.push(record);
        write_json(&self.history_path(), &history)?;
        info!(path = %report_path.display(), run_id = %run.id, "report saved");

        Ok(report_path)
    }
}

fn write_json(path: &Path, history: &[ReportRecord]) -> Result<()> {
    let content = serde_json::to_string_pretty(history)?;
    fs::write(path, content)?;
    Ok(())
}
