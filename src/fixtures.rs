//! Read-only subject/chapter fixtures backed by two JSON files.
//!
//! Every lookup re-reads its file, so edits on disk show up on the next call.
//! There is no write path and no cache.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Chapter, Subject};

pub const SUBJECTS_FILE: &str = "subjects.json";
pub const CHAPTERS_FILE: &str = "chapters.json";

#[derive(Debug, Error)]
pub enum FixtureError {
  #[error("failed to read {path}: {source}")]
  Io { path: PathBuf, #[source] source: std::io::Error },
  #[error("failed to parse {path}: {source}")]
  Parse { path: PathBuf, #[source] source: serde_json::Error },
}

#[derive(Clone, Debug)]
pub struct FixtureStore {
  data_dir: PathBuf,
}

impl FixtureStore {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into() }
  }

  pub fn data_dir(&self) -> &Path {
    &self.data_dir
  }

  fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, FixtureError> {
    let path = self.data_dir.join(file);
    let raw = std::fs::read_to_string(&path).map_err(|source| FixtureError::Io { path: path.clone(), source })?;
    serde_json::from_str(&raw).map_err(|source| FixtureError::Parse { path, source })
  }

  #[instrument(level = "debug", skip(self))]
  pub fn list_subjects(&self) -> Result<Vec<Subject>, FixtureError> {
    let subjects: Vec<Subject> = self.read_json(SUBJECTS_FILE)?;
    debug!(target: "fixtures", count = subjects.len(), "Subjects loaded");
    Ok(subjects)
  }

  #[instrument(level = "debug", skip(self), fields(%id))]
  pub fn get_subject(&self, id: &str) -> Result<Option<Subject>, FixtureError> {
    Ok(self.list_subjects()?.into_iter().find(|s| s.id == id))
  }

  /// Chapters whose `subject_id` equals `subject_id`, in file order. May be empty.
  #[instrument(level = "debug", skip(self), fields(%subject_id))]
  pub fn list_chapters(&self, subject_id: &str) -> Result<Vec<Chapter>, FixtureError> {
    let all: Vec<Chapter> = self.read_json(CHAPTERS_FILE)?;
    let chapters: Vec<Chapter> = all.into_iter().filter(|c| c.subject_id == subject_id).collect();
    debug!(target: "fixtures", %subject_id, count = chapters.len(), "Chapters filtered");
    Ok(chapters)
  }

  /// Both ids must match; a chapter id that belongs to another subject is not found.
  #[instrument(level = "debug", skip(self), fields(%subject_id, %chapter_id))]
  pub fn get_chapter(&self, subject_id: &str, chapter_id: &str) -> Result<Option<Chapter>, FixtureError> {
    let all: Vec<Chapter> = self.read_json(CHAPTERS_FILE)?;
    Ok(all.into_iter().find(|c| c.id == chapter_id && c.subject_id == subject_id))
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use tempfile::TempDir;

  pub(crate) const SUBJECTS: &str = r#"[
    {"id":"physics","name":"Physics","icon":"⚛️","description":"Motion and forces","chapterCount":2},
    {"id":"chemistry","name":"Chemistry","icon":"🧪","description":"Matter","chapterCount":1}
  ]"#;

  // "intro" is reused across subjects on purpose.
  pub(crate) const CHAPTERS: &str = r#"[
    {"id":"kinematics","subjectId":"physics","name":"Kinematics","description":"Motion","difficulty":"Medium","topicCount":6},
    {"id":"intro","subjectId":"physics","name":"Physical World","description":"Scope","difficulty":"Easy","topicCount":3},
    {"id":"intro","subjectId":"chemistry","name":"Basic Concepts","description":"Mole concept","difficulty":"Easy","topicCount":4}
  ]"#;

  pub(crate) fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(SUBJECTS_FILE), SUBJECTS).unwrap();
    std::fs::write(dir.path().join(CHAPTERS_FILE), CHAPTERS).unwrap();
    dir
  }

  #[test]
  fn lists_and_finds_subjects() {
    let dir = fixture_dir();
    let store = FixtureStore::new(dir.path());
    assert_eq!(store.data_dir(), dir.path());
    assert_eq!(store.list_subjects().unwrap().len(), 2);
    assert_eq!(store.get_subject("physics").unwrap().unwrap().name, "Physics");
    assert!(store.get_subject("history").unwrap().is_none());
  }

  #[test]
  fn chapters_are_filtered_by_subject() {
    let dir = fixture_dir();
    let store = FixtureStore::new(dir.path());
    let chapters = store.list_chapters("physics").unwrap();
    assert_eq!(chapters.len(), 2);
    assert!(chapters.iter().all(|c| c.subject_id == "physics"));
    assert!(store.list_chapters("unknown-subject").unwrap().is_empty());
  }

  #[test]
  fn chapter_lookup_does_not_leak_across_subjects() {
    let dir = fixture_dir();
    let store = FixtureStore::new(dir.path());
    assert_eq!(store.get_chapter("chemistry", "intro").unwrap().unwrap().name, "Basic Concepts");
    assert_eq!(store.get_chapter("physics", "intro").unwrap().unwrap().name, "Physical World");
    assert!(store.get_chapter("chemistry", "kinematics").unwrap().is_none());
  }

  #[test]
  fn file_edits_are_visible_on_next_call() {
    let dir = fixture_dir();
    let store = FixtureStore::new(dir.path());
    assert_eq!(store.list_subjects().unwrap().len(), 2);
    std::fs::write(dir.path().join(SUBJECTS_FILE), r#"[{"id":"maths","name":"Mathematics"}]"#).unwrap();
    let subjects = store.list_subjects().unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].chapter_count, 0);
  }

  #[test]
  fn missing_and_corrupt_files_are_errors() {
    let empty = tempfile::tempdir().unwrap();
    let store = FixtureStore::new(empty.path());
    assert!(matches!(store.list_subjects(), Err(FixtureError::Io { .. })));

    std::fs::write(empty.path().join(CHAPTERS_FILE), "{not json").unwrap();
    assert!(matches!(store.list_chapters("physics"), Err(FixtureError::Parse { .. })));
  }

  #[test]
  fn shipped_fixtures_parse() {
    let store = FixtureStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
    let subjects = store.list_subjects().unwrap();
    assert!(!subjects.is_empty());
    for s in &subjects {
      let chapters = store.list_chapters(&s.id).unwrap();
      assert_eq!(chapters.len() as u32, s.chapter_count, "chapterCount mismatch for {}", s.id);
    }
  }
}
