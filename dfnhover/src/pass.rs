//! One processing pass over a definition directory.
//!
//! A pass owns its caches: parsed files keyed by path and the common
//! dictionary, filled on first use. Each format-version directory gets its
//! own pass, so nothing leaks between versions with same-named files.

use crate::common::CommonDictionary;
use crate::error::{DfnError, Result};
use crate::hover::{BlockHover, KeywordHover};
use crate::model::DfnFile;
use crate::vocab::Vocabulary;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Settings for a [`Pass`].
#[derive(Debug, Clone)]
pub struct PassConfig {
    pub dfn_dir: PathBuf,
    /// File name of the shared definitions file inside `dfn_dir`.
    pub common_file: String,
    /// Name prefix of developer-only options.
    pub dev_prefix: String,
}

impl Default for PassConfig {
    fn default() -> Self {
        PassConfig {
            dfn_dir: PathBuf::from("data/dfn"),
            common_file: "common.dfn".to_string(),
            dev_prefix: "dev_".to_string(),
        }
    }
}

/// Everything one pass produced.
#[derive(Debug, Default)]
pub struct PassReport {
    pub keywords: KeywordHover,
    pub blocks: BlockHover,
    pub vocab: Vocabulary,
    /// Files whose contributions were dropped, with the reason.
    pub failures: Vec<(PathBuf, DfnError)>,
}

/// Contributions of a single file, merged only once the whole file succeeded.
struct FileOutput {
    keywords: KeywordHover,
    blocks: BlockHover,
    vocab: Vocabulary,
}

pub struct Pass {
    config: PassConfig,
    files: HashMap<PathBuf, DfnFile>,
    common: OnceCell<CommonDictionary>,
}

impl Pass {
    pub fn new(config: PassConfig) -> Self {
        Pass {
            config,
            files: HashMap::new(),
            common: OnceCell::new(),
        }
    }

    /// Regular definition files in the directory, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let pattern = self.config.dfn_dir.join("*.dfn");
        let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .is_some_and(|name| name.to_string_lossy() != self.config.common_file)
            })
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// The common dictionary, loaded on first call. A missing common file
    /// yields an empty dictionary so that files without REPLACE still work.
    pub fn common(&self) -> Result<&CommonDictionary> {
        if let Some(common) = self.common.get() {
            return Ok(common);
        }
        let path = self.config.dfn_dir.join(&self.config.common_file);
        let common = if path.is_file() {
            CommonDictionary::load(&path)?
        } else {
            tracing::warn!(path = %path.display(), "common definitions not found");
            CommonDictionary::default()
        };
        Ok(self.common.get_or_init(|| common))
    }

    /// Parse a file, or return the cached parse.
    pub fn load(&mut self, path: &Path) -> Result<&DfnFile> {
        if !self.files.contains_key(path) {
            let file = DfnFile::load(path)?;
            self.files.insert(path.to_path_buf(), file);
        }
        Ok(&self.files[path])
    }

    fn process(&mut self, path: &Path) -> Result<FileOutput> {
        self.load(path)?;
        let file = &self.files[path];
        let prefix = &self.config.dev_prefix;
        let keywords = KeywordHover::collect(file, self.common()?, prefix)?;
        Ok(FileOutput {
            keywords,
            blocks: BlockHover::collect(file, prefix),
            vocab: Vocabulary::collect(file, prefix),
        })
    }

    /// Process every discovered file. A failing file is recorded in the
    /// report and contributes nothing; the remaining files still run.
    pub fn run(&mut self) -> Result<PassReport> {
        let paths = self.discover()?;
        tracing::info!(dir = %self.config.dfn_dir.display(), files = paths.len(), "starting pass");

        let mut report = PassReport::default();
        for path in paths {
            match self.process(&path) {
                Ok(output) => {
                    report.keywords.merge(output.keywords);
                    report.blocks.merge(output.blocks);
                    report.vocab.merge(output.vocab);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "file failed");
                    report.failures.push((path, err));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).unwrap();
    }

    fn pass(dir: &TempDir) -> Pass {
        Pass::new(PassConfig {
            dfn_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn discover_skips_common_and_sorts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "gwf-wel.dfn", "");
        write(dir.path(), "common.dfn", "");
        write(dir.path(), "gwf-chd.dfn", "");
        write(dir.path(), "notes.txt", "");
        let files = pass(&dir).discover().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["gwf-chd.dfn", "gwf-wel.dfn"]);
    }

    #[test]
    fn failing_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "gwf-good.dfn",
            "block options\nname save_flows\ntype keyword\ndescription save flows\n",
        );
        write(
            dir.path(),
            "gwf-bad.dfn",
            "block options\nname save_flows\ntype keyword\nmystery 1\n",
        );
        let report = pass(&dir).run().unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].0.ends_with("gwf-bad.dfn"));
        let files = report.keywords.get("save_flows", "options").unwrap();
        assert_eq!(files.len(), 1);
        assert!(report.blocks.get("options", "gwf-bad").is_none());
        assert!(report.blocks.get("options", "gwf-good").is_some());
    }

    #[test]
    fn load_caches_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gwf-dis.dfn");
        fs::write(&path, "block options\nname a\ntype keyword\n").unwrap();
        let mut pass = pass(&dir);
        assert_eq!(pass.load(&path).unwrap().sections.len(), 1);
        // a changed file on disk is not re-read within the same pass
        fs::write(&path, "block options\nname a\n\nblock options\nname b\n").unwrap();
        assert_eq!(pass.load(&path).unwrap().sections.len(), 1);
    }

    #[test]
    fn common_is_scoped_to_the_pass() {
        let v1 = TempDir::new().unwrap();
        let v2 = TempDir::new().unwrap();
        write(v1.path(), "common.dfn", "name tmpl\ndescription version one\n");
        write(v2.path(), "common.dfn", "name tmpl\ndescription version two\n");
        let desc = "block options\nname k\ntype string\ndescription REPLACE tmpl {}\n";
        write(v1.path(), "gwf-x.dfn", desc);
        write(v2.path(), "gwf-x.dfn", desc);

        let r1 = pass(&v1).run().unwrap();
        let r2 = pass(&v2).run().unwrap();
        assert!(r1.keywords.get("k", "options").unwrap().contains_key("version one"));
        assert!(r2.keywords.get("k", "options").unwrap().contains_key("version two"));
    }

    #[test]
    fn missing_common_only_fails_replace_users() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "gwf-a.dfn",
            "block options\nname k\ntype string\ndescription REPLACE tmpl {}\n",
        );
        write(
            dir.path(),
            "gwf-b.dfn",
            "block options\nname k\ntype string\ndescription plain\n",
        );
        let report = pass(&dir).run().unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].1, DfnError::MissingCommon(_)));
        assert!(report.keywords.get("k", "options").is_some());
    }

    #[test]
    fn prose_mentioning_replace_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "gwf-npf.dfn",
            "block options\nname k\ntype string\ndescription the NOREPLACE flag is off\n",
        );
        let report = pass(&dir).run().unwrap();
        assert!(report.failures.is_empty());
        assert!(report
            .keywords
            .get("k", "options")
            .unwrap()
            .contains_key("the NOREPLACE flag is off"));
    }
}
