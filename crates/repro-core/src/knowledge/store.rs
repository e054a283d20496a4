//! Topic tables: one entry per expertise area, declared in tie-break order.
//!
//! | Order | TopicId               | Covers                                           |
//! |-------|-----------------------|--------------------------------------------------|
//! | 1     | ComputationalEmpathy  | thinking about the unknown replicator            |
//! | 2     | Reproducibility       | replication packages, "run it again" test        |
//! | 3     | DataTransparency      | sharing, restricted and confidential data        |
//! | 4     | Stata                 | Stata versions and ado files                     |
//! | 5     | RLanguage             | renv, sessionInfo, groundhog                     |
//! | 6     | Python                | virtual environments, pinned requirements        |
//! | 7     | Docker                | containers                                       |
//! | 8     | Readme                | documentation standards                          |
//! | 9     | Repositories          | trusted archives and DOIs                        |
//! | 10    | Teaching              | teaching reproducibility                         |
//! | 11    | Errors                | common failures                                  |
//! | 12    | BestPractices         | general recommendations                          |

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of a knowledge topic. The set is closed; knowledge files can only refer to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicId {
    ComputationalEmpathy,
    Reproducibility,
    DataTransparency,
    Stata,
    RLanguage,
    Python,
    Docker,
    Readme,
    Repositories,
    Teaching,
    Errors,
    BestPractices,
}

impl TopicId {
    /// Stable snake_case identifier, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComputationalEmpathy => "computational_empathy",
            Self::Reproducibility => "reproducibility",
            Self::DataTransparency => "data_transparency",
            Self::Stata => "stata",
            Self::RLanguage => "r_language",
            Self::Python => "python",
            Self::Docker => "docker",
            Self::Readme => "readme",
            Self::Repositories => "repositories",
            Self::Teaching => "teaching",
            Self::Errors => "errors",
            Self::BestPractices => "best_practices",
        }
    }

    /// Human-readable label, used by `help` and the topics endpoint.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ComputationalEmpathy => "Computational empathy",
            Self::Reproducibility => "Reproducibility and replication packages",
            Self::DataTransparency => "Data transparency and confidential data",
            Self::Stata => "Stata environments",
            Self::RLanguage => "R environments",
            Self::Python => "Python environments",
            Self::Docker => "Containers and Docker",
            Self::Readme => "README and documentation standards",
            Self::Repositories => "Repository choices and data preservation",
            Self::Teaching => "Teaching reproducibility",
            Self::Errors => "Troubleshooting common failures",
            Self::BestPractices => "Best practices",
        }
    }

    pub fn all() -> [Self; 12] {
        [
            Self::ComputationalEmpathy,
            Self::Reproducibility,
            Self::DataTransparency,
            Self::Stata,
            Self::RLanguage,
            Self::Python,
            Self::Docker,
            Self::Readme,
            Self::Repositories,
            Self::Teaching,
            Self::Errors,
            Self::BestPractices,
        ]
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One expertise area: trigger keywords and interchangeable answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: TopicId,
    /// Lowercase substrings; a multi-word keyword weighs as many points as it has words.
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
}

impl KnowledgeEntry {
    pub fn new<K, R>(topic: TopicId, keywords: K, responses: R) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            topic,
            keywords: keywords.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered, validated collection of knowledge entries.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Validates and normalizes `entries`. Declaration order is kept and decides score ties.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self, EngineError> {
        let mut seen = Vec::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if seen.contains(&entry.topic) {
                return Err(EngineError::DuplicateTopic(entry.topic));
            }
            seen.push(entry.topic);

            entry.keywords = entry
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if entry.keywords.is_empty() {
                return Err(EngineError::EmptyKeywords(entry.topic));
            }
            entry.responses.retain(|r| !r.trim().is_empty());
            if entry.responses.is_empty() {
                return Err(EngineError::EmptyResponses(entry.topic));
            }
            normalized.push(entry);
        }
        Ok(Self { entries: normalized })
    }

    /// Parses an ordered JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Loads entries from a JSON file. A missing file falls back to [`KnowledgeBase::builtin`].
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let kb = Self::from_json_str(&json)?;
                tracing::info!(
                    target: "repro::knowledge",
                    path = %path.display(),
                    topics = kb.len(),
                    "Loaded knowledge base"
                );
                Ok(kb)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    target: "repro::knowledge",
                    path = %path.display(),
                    "Knowledge file not found, using built-in tables"
                );
                Ok(Self::builtin())
            }
            Err(source) => Err(EngineError::KnowledgeIo {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn get(&self, topic: TopicId) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.topic == topic)
    }

    /// Topics in declaration order.
    pub fn topics(&self) -> Vec<TopicId> {
        self.entries.iter().map(|e| e.topic).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default reproducibility tables.
    pub fn builtin() -> Self {
        // Checked by `builtin_passes_validation`.
        Self {
            entries: builtin_entries(),
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new(
            TopicId::ComputationalEmpathy,
            ["computational empathy", "empathy", "thinking about"],
            [
                "Computational empathy is a concept I developed to describe thinking about what an unknown person attempting to reproduce your results might face. It means considering different operating systems, software versions, skill levels, and access to resources.",
                "The key to computational empathy is documenting everything explicitly and testing your code as if you were a stranger to your own work. Ask yourself: would someone with a different setup be able to run this?",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Reproducibility,
            ["reproducible", "reproducibility", "replication", "replicate", "reproduce"],
            [
                "Making research reproducible starts with good habits: clear file organization, documented dependencies, and tested code. I recommend the 'run it again' test - delete your output and see if you can recreate everything from scratch.",
                "A good replication package has three key elements: all the data (or clear access instructions), all the code in runnable form, and clear documentation linking the code to the paper results.",
                "Think of reproducibility as a ladder - each rung makes your work more accessible. Start with making it work for you, then a colleague, then someone in your field, then anyone.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::DataTransparency,
            ["data", "transparency", "sharing", "access", "confidential", "restricted", "private"],
            [
                "Data transparency doesn't mean everything must be public. When data can't be shared, document the data structure, provide access instructions, and consider creating synthetic data that demonstrates your code works.",
                "Even with confidential data, we can be transparent about its provenance and characteristics. Document exactly what data you used, where it came from, and how others can access it if possible.",
                "Data availability statements should be precise: what data exists, where it can be found, and what restrictions apply. 'Data available upon request' is no longer sufficient - be specific about the process.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Stata,
            ["stata"],
            [
                "For Stata reproducibility: Always set the version explicitly with the 'version' command, document all ado files needed, and remember that not everyone has access to Stata/MP or the latest version.",
                "In Stata, use 'ssc install' or 'net install' with specific sources for packages. Consider using 'creturn list' to document your system configuration. And always specify the exact Stata version you're using.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::RLanguage,
            ["rstudio", "r programming", "r language"],
            [
                "For R reproducibility: Use renv for package management, document your R version and all package versions. Use sessionInfo() to capture your environment.",
                "In R, consider using the groundhog package for date-based package versions. Be careful with compiled packages that may be OS-specific. Always include both your R version and package versions.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Python,
            ["python"],
            [
                "For Python reproducibility: Use virtual environments or conda, create requirements.txt with specific versions using 'pip freeze'. Consider using poetry or pipenv for dependency management.",
                "With Python, be explicit about the Python version (3.8, 3.9, etc.). Different versions can have subtle differences that affect results. Always include a requirements.txt with exact versions.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Docker,
            ["docker", "container", "singularity"],
            [
                "Docker and containers provide complete environment reproducibility. They're especially useful for complex setups with multiple software dependencies. Start with a minimal base image and document the build process.",
                "Containers like Docker ensure your code runs the same everywhere. While there's a learning curve, they solve many reproducibility issues. Consider them for projects with complex dependencies.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Readme,
            ["readme", "documentation", "document", "instructions"],
            [
                "A good README should include: software requirements with versions, data availability statement, instructions to run the code, expected runtime, hardware requirements if substantial, and description of expected output.",
                "Think of your README as a letter to a stranger who needs to understand and run your work. Be explicit about prerequisites, provide step-by-step instructions, and explain what they should expect to see.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Repositories,
            ["repository", "zenodo", "archive", "openicpsr", "dataverse", "preserve", "github"],
            [
                "For long-term preservation, use trusted repositories. Zenodo is excellent and provides DOIs. OpenICPSR is the AEA's preferred repository. Harvard Dataverse is widely used in social sciences.",
                "GitHub is great for collaboration but isn't an archive - it's for development, not preservation. For published work, use repositories that guarantee long-term preservation and provide DOIs.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Teaching,
            ["teach", "student", "education", "learning", "course", "class"],
            [
                "Teaching reproducibility is crucial for the next generation. Start with simple exercises - have students reproduce a basic analysis, then gradually introduce complications.",
                "The 'have an undergrad run it' test is remarkably effective for finding issues in your replication package! Fresh eyes catch problems you've become blind to.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::Errors,
            ["error", "problem", "issue", "fail", "doesn't work", "broken"],
            [
                "When encountering errors, first check: Are all required packages/software installed? Are you using the correct versions? Are file paths correct? These solve 90% of reproducibility issues.",
                "Common reproducibility failures: hard-coded paths, missing dependencies, version mismatches, and platform-specific code. Document these potential issues in your README.",
            ],
        ),
        KnowledgeEntry::new(
            TopicId::BestPractices,
            ["best practice", "recommend", "suggestion", "advice", "tips", "should i"],
            [
                "My top recommendations: Start simple and build up. Test on a clean machine. Have someone else run your code. Document more than you think necessary. Use relative paths, not absolute ones.",
                "Best practices: Organize files logically, use descriptive names, set random seeds, avoid manual steps, test everything, and remember - perfect is the enemy of good. Any documentation beats none.",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_passes_validation() {
        let kb = KnowledgeBase::new(builtin_entries()).unwrap();
        assert_eq!(kb.topics(), TopicId::all().to_vec());
    }

    #[test]
    fn keywords_are_lowercased_and_blank_ones_dropped() {
        let kb = KnowledgeBase::new(vec![KnowledgeEntry::new(
            TopicId::Stata,
            ["  STATA ", "   "],
            ["answer"],
        )])
        .unwrap();
        assert_eq!(kb.entries()[0].keywords, vec!["stata".to_string()]);
    }

    #[test]
    fn entry_without_responses_is_rejected() {
        let err = KnowledgeBase::new(vec![KnowledgeEntry::new(
            TopicId::Python,
            ["python"],
            Vec::<String>::new(),
        )])
        .unwrap_err();
        assert!(matches!(err, EngineError::EmptyResponses(TopicId::Python)));
    }

    #[test]
    fn entry_without_keywords_is_rejected() {
        let err = KnowledgeBase::new(vec![KnowledgeEntry::new(
            TopicId::Docker,
            Vec::<String>::new(),
            ["containers"],
        )])
        .unwrap_err();
        assert!(matches!(err, EngineError::EmptyKeywords(TopicId::Docker)));
    }

    #[test]
    fn duplicate_topic_is_rejected() {
        let err = KnowledgeBase::new(vec![
            KnowledgeEntry::new(TopicId::Stata, ["stata"], ["a"]),
            KnowledgeEntry::new(TopicId::Stata, ["do-file"], ["b"]),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateTopic(TopicId::Stata)));
    }

    #[test]
    fn json_entries_keep_declaration_order() {
        let json = r#"[
            {"topic": "docker", "keywords": ["docker"], "responses": ["Use containers."]},
            {"topic": "stata", "keywords": ["stata"], "responses": ["Set the version."]}
        ]"#;
        let kb = KnowledgeBase::from_json_str(json).unwrap();
        assert_eq!(kb.topics(), vec![TopicId::Docker, TopicId::Stata]);
    }

    #[test]
    fn unknown_topic_in_json_is_rejected() {
        let json = r#"[{"topic": "fortran", "keywords": ["fortran"], "responses": ["x"]}]"#;
        assert!(matches!(
            KnowledgeBase::from_json_str(json),
            Err(EngineError::KnowledgeFormat(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let kb = KnowledgeBase::load_json_path(dir.path().join("absent.json")).unwrap();
        assert_eq!(kb.len(), TopicId::all().len());
    }

    #[test]
    fn file_is_loaded_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.json");
        std::fs::write(
            &path,
            r#"[{"topic": "teaching", "keywords": ["syllabus"], "responses": ["Start small."]}]"#,
        )
        .unwrap();
        let kb = KnowledgeBase::load_json_path(&path).unwrap();
        assert_eq!(kb.topics(), vec![TopicId::Teaching]);
        assert_eq!(kb.get(TopicId::Teaching).unwrap().keywords, vec!["syllabus"]);
    }
}
