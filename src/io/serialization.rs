// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Project persistence.
//!
//! The project list and the current-project pointer are stored as JSON
//! under the user's data directory. Single projects can also be exported
//! and re-imported as YAML or JSON files. Last write wins; there is no
//! conflict resolution.

use crate::models::project::{unix_millis, VideoProject};
use anyhow::Result;
use std::path::{Path, PathBuf};

const PROJECTS_FILE: &str = "projects.json";
const CURRENT_PROJECT_FILE: &str = "current_project";

/// On-disk store for the project list.
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    /// Store rooted at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("no data directory available"))?
            .join("buttercut");
        Self::open(dir)
    }

    /// Store rooted at an explicit directory (used by tests).
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Load the saved project list. A missing file is an empty list.
    pub fn load_projects(&self) -> Result<Vec<VideoProject>> {
        let path = self.dir.join(PROJECTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Insert or replace a project by id, refreshing its `updated_at`.
    pub fn save_project(&self, project: &VideoProject) -> Result<VideoProject> {
        let mut updated = project.clone();
        updated.updated_at = unix_millis();

        let mut projects = self.load_projects()?;
        match projects.iter_mut().find(|p| p.id == updated.id) {
            Some(existing) => *existing = updated.clone(),
            None => projects.push(updated.clone()),
        }
        self.write_projects(&projects)?;
        log::info!("Saved project {} ({})", updated.name, updated.id);
        Ok(updated)
    }

    /// Remove a project by id. Clears the current pointer when it pointed
    /// at the removed project. Absent ids are a no-op.
    pub fn delete_project(&self, project_id: &str) -> Result<()> {
        let mut projects = self.load_projects()?;
        projects.retain(|p| p.id != project_id);
        self.write_projects(&projects)?;

        if self.current_project_id()?.as_deref() == Some(project_id) {
            self.set_current_project(None)?;
        }
        Ok(())
    }

    /// The id of the most recently opened project, if any.
    pub fn current_project_id(&self) -> Result<Option<String>> {
        let path = self.dir.join(CURRENT_PROJECT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let id = std::fs::read_to_string(path)?;
        let id = id.trim().to_string();
        Ok(if id.is_empty() { None } else { Some(id) })
    }

    /// Update (or clear) the current-project pointer.
    pub fn set_current_project(&self, project_id: Option<&str>) -> Result<()> {
        let path = self.dir.join(CURRENT_PROJECT_FILE);
        match project_id {
            Some(id) => std::fs::write(path, id)?,
            None => {
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
            }
        }
        Ok(())
    }

    fn write_projects(&self, projects: &[VideoProject]) -> Result<()> {
        let json = serde_json::to_string_pretty(projects)?;
        std::fs::write(self.dir.join(PROJECTS_FILE), json)?;
        Ok(())
    }
}

/// Export a single project to YAML.
pub fn export_yaml(project: &VideoProject, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(project)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a single project to JSON.
pub fn export_json(project: &VideoProject, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(project)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a single project from YAML.
pub fn import_yaml(path: &Path) -> Result<VideoProject> {
    let yaml = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&yaml)?)
}

/// Import a single project from JSON.
pub fn import_json(path: &Path) -> Result<VideoProject> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> ProjectStore {
        let dir = std::env::temp_dir().join(format!("buttercut-test-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        ProjectStore::open(dir).unwrap()
    }

    #[test]
    fn test_empty_store_has_no_projects() {
        let store = temp_store("empty");
        assert!(store.load_projects().unwrap().is_empty());
        assert!(store.current_project_id().unwrap().is_none());
    }

    #[test]
    fn test_save_then_update_project() {
        let store = temp_store("upsert");
        let project = VideoProject::new("demo".into(), "file:///v.mp4".into(), 60.0);
        store.save_project(&project).unwrap();

        let mut renamed = project.clone();
        renamed.name = "renamed".into();
        store.save_project(&renamed).unwrap();

        let projects = store.load_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "renamed");
    }

    #[test]
    fn test_delete_clears_current_pointer() {
        let store = temp_store("delete");
        let project = VideoProject::new("demo".into(), "file:///v.mp4".into(), 60.0);
        store.save_project(&project).unwrap();
        store.set_current_project(Some(&project.id)).unwrap();
        assert_eq!(store.current_project_id().unwrap(), Some(project.id.clone()));

        store.delete_project(&project.id).unwrap();
        assert!(store.load_projects().unwrap().is_empty());
        assert!(store.current_project_id().unwrap().is_none());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("buttercut-test-yaml-{}.yaml", std::process::id()));
        let project = VideoProject::new("demo".into(), "file:///v.mp4".into(), 60.0);
        export_yaml(&project, &path).unwrap();
        let loaded = import_yaml(&path).unwrap();
        assert_eq!(loaded.id, project.id);
        assert_eq!(loaded.video_duration, 60.0);
        let _ = std::fs::remove_file(path);
    }
}
