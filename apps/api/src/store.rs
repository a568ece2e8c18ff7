use tokio::sync::RwLock;

use crate::models::ResumeRecord;

/// In-memory screening state shared across requests, injected via `AppState`
/// instead of living in ambient globals.
///
/// The job description is a single slot: each upload overwrites the previous
/// value, and nothing survives a restart. The resume list accumulates every
/// successfully parsed record for the lifetime of the process and is never
/// deduplicated; each matching pass re-scores the full history against the
/// current job description, not just the latest batch.
// TODO: bound the resume collection or key records by candidate identity so a
// long-lived process stops re-scoring an ever-growing history.
#[derive(Default)]
pub struct ScreeningStore {
    job_description: RwLock<Option<String>>,
    resumes: RwLock<Vec<ResumeRecord>>,
}

impl ScreeningStore {
    /// Replaces the active job description. The previous value is discarded.
    pub async fn set_job_description(&self, text: String) {
        *self.job_description.write().await = Some(text);
    }

    pub async fn job_description(&self) -> Option<String> {
        self.job_description.read().await.clone()
    }

    pub async fn push_resume(&self, record: ResumeRecord) {
        self.resumes.write().await.push(record);
    }

    /// Snapshot of every resume accumulated so far, in arrival order.
    pub async fn resumes(&self) -> Vec<ResumeRecord> {
        self.resumes.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ResumeRecord {
        ResumeRecord {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_job_description_starts_empty() {
        let store = ScreeningStore::default();
        assert!(store.job_description().await.is_none());
    }

    #[tokio::test]
    async fn test_job_description_is_overwritten() {
        let store = ScreeningStore::default();
        store.set_job_description("Rust engineer".to_string()).await;
        store.set_job_description("Python engineer".to_string()).await;
        assert_eq!(
            store.job_description().await.as_deref(),
            Some("Python engineer")
        );
    }

    #[tokio::test]
    async fn test_resumes_accumulate_across_batches_in_order() {
        let store = ScreeningStore::default();
        store.push_resume(record("first")).await;
        store.push_resume(record("second")).await;
        // A later batch sees everything pushed before it.
        store.push_resume(record("third")).await;

        let names: Vec<String> = store
            .resumes()
            .await
            .into_iter()
            .map(|r| r.full_name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
