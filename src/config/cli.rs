use crate::core::Storage;
use crate::domain::model::ScanReport;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// 以本機目錄為根的檔案儲存
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.full_path(path))?)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full_path, data)?;
        Ok(())
    }
}

/// 報告與 bundle 的檔名：`<domain>_seo_report.md`、`<domain>_audit_bundle.json`
pub fn output_names(report: &ScanReport) -> (String, String) {
    let stem = report.bundle.target.as_str().replace(':', "_");
    (
        format!("{}_seo_report.md", stem),
        format!("{}_audit_bundle.json", stem),
    )
}

/// 寫出報告 markdown 與排序過的 bundle JSON，回傳兩個檔名
pub async fn save_report<S: Storage>(storage: &S, report: &ScanReport) -> Result<(String, String)> {
    let (report_name, bundle_name) = output_names(report);
    storage
        .write_file(&report_name, report.report.as_bytes())
        .await?;
    storage
        .write_file(&bundle_name, report.bundle.to_sorted_json()?.as_bytes())
        .await?;
    tracing::info!("💾 Saved {} and {}", report_name, bundle_name);
    Ok((report_name, bundle_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AuditBundle, CompetitorSet, Domain};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn report() -> ScanReport {
        ScanReport {
            bundle: AuditBundle {
                target: Domain::parse("localhost:8080").unwrap(),
                competitors: CompetitorSet::empty(),
                records: BTreeMap::new(),
            },
            report: "# Report".to_string(),
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());

        storage.write_file("nested/file.txt", b"hello").await.unwrap();
        let data = storage.read_file("nested/file.txt").await.unwrap();
        assert_eq!(data, b"hello");
    }

    #[tokio::test]
    async fn test_save_report_writes_both_files() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());

        let (report_name, bundle_name) = save_report(&storage, &report()).await.unwrap();

        assert_eq!(report_name, "localhost_8080_seo_report.md");
        assert_eq!(
            fs::read_to_string(dir.path().join(&report_name)).unwrap(),
            "# Report"
        );
        let bundle: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(&bundle_name)).unwrap())
                .unwrap();
        assert_eq!(bundle["target"], "localhost:8080");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let err = storage.read_file("nope.txt").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::ScanError::IoError(_)));
    }
}
