use crate::models::document::StoredResume;

/// Ordered in-memory resume collection, unique by filename.
#[derive(Debug, Default, Clone)]
pub struct ResumeStore {
    entries: Vec<StoredResume>,
}

impl ResumeStore {
    pub fn contains(&self, filename: &str) -> bool {
        self.entries.iter().any(|e| e.filename == filename)
    }

    /// Appends the resume unless its filename is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, resume: StoredResume) -> bool {
        if self.contains(&resume.filename) {
            return false;
        }
        self.entries.push(resume);
        true
    }

    pub fn remove(&mut self, filename: &str) -> Option<StoredResume> {
        let index = self.entries.iter().position(|e| e.filename == filename)?;
        Some(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[StoredResume] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
