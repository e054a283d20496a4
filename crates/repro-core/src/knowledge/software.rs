//! Software mention detection and per-package tips.

use crate::error::EngineError;
use rand::Rng;
use regex::Regex;

/// A detectable software package with its advice lines.
#[derive(Debug, Clone)]
pub struct SoftwareProfile {
    /// Lowercase key recorded in the conversation history (e.g. "stata").
    pub name: String,
    /// Display form used in tips (e.g. "Stata").
    pub display_name: String,
    pattern: Regex,
    /// Never empty; only [`SoftwareProfile::new`] can build a profile.
    tips: Vec<String>,
}

impl SoftwareProfile {
    /// `pattern` is compiled case-insensitively; callers supply the word boundaries.
    pub fn new<I>(
        name: impl Into<String>,
        display_name: impl Into<String>,
        pattern: &str,
        tips: I,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let name = name.into();
        let tips: Vec<String> = tips.into_iter().map(Into::into).collect();
        if name.trim().is_empty() {
            return Err(EngineError::InvalidSoftware(name, "empty name".into()));
        }
        if tips.is_empty() {
            return Err(EngineError::InvalidSoftware(name, "no tips".into()));
        }
        let pattern = Regex::new(&format!("(?i){}", pattern))?;
        Ok(Self {
            name: name.to_lowercase(),
            display_name: display_name.into(),
            pattern,
            tips,
        })
    }

    pub fn is_mentioned(&self, utterance: &str) -> bool {
        self.pattern.is_match(utterance)
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }

    /// One randomly chosen tip, rendered for inclusion in a reply.
    pub fn tip<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let tip = &self.tips[rng.gen_range(0..self.tips.len())];
        format!("For {} specifically: {}", self.display_name, tip)
    }
}

/// Ordered software profiles; detection order is declaration order.
#[derive(Debug, Clone)]
pub struct SoftwareCatalog {
    profiles: Vec<SoftwareProfile>,
}

impl SoftwareCatalog {
    pub fn new(profiles: Vec<SoftwareProfile>) -> Self {
        Self { profiles }
    }

    /// Names of all packages mentioned in `utterance`, in catalog order.
    pub fn detect(&self, utterance: &str) -> Vec<&SoftwareProfile> {
        self.profiles
            .iter()
            .filter(|p| p.is_mentioned(utterance))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&SoftwareProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn profiles(&self) -> &[SoftwareProfile] {
        &self.profiles
    }

    pub fn builtin() -> Result<Self, EngineError> {
        Ok(Self::new(vec![
            SoftwareProfile::new(
                "stata",
                "Stata",
                r"\bstata\b",
                [
                    "Set version explicitly with the 'version' command.",
                    "Document all ado files needed.",
                    "Consider using 'creturn list' to document your system.",
                    "Remember not everyone has access to Stata/MP or all packages.",
                ],
            )?,
            SoftwareProfile::new(
                "r",
                "R",
                r"\br\b(?:\s+(?:studio|script|markdown))?",
                [
                    "Use sessionInfo() to capture your environment.",
                    "Consider using groundhog for date-based package versions.",
                    "Be careful with compiled packages that may be OS-specific.",
                    "Use renv for package management.",
                ],
            )?,
            SoftwareProfile::new(
                "python",
                "Python",
                r"\bpython\b",
                [
                    "Use pip freeze > requirements.txt.",
                    "Consider poetry or pipenv for dependency management.",
                    "Be explicit about the Python version (3.8, 3.9, etc.).",
                ],
            )?,
            SoftwareProfile::new(
                "matlab",
                "MATLAB",
                r"\bmatlab\b",
                [
                    "Record the MATLAB release and every toolbox your code calls.",
                    "Run 'ver' and include its output in your README.",
                ],
            )?,
            SoftwareProfile::new(
                "julia",
                "Julia",
                r"\bjulia\b",
                [
                    "Commit both Project.toml and Manifest.toml.",
                    "Instantiate the environment from a clean depot before you publish.",
                ],
            )?,
            SoftwareProfile::new(
                "sas",
                "SAS",
                r"\bsas\b",
                [
                    "Note the SAS version and any licensed modules such as SAS/ETS.",
                    "Avoid hard-coded libname paths; set them once in a master program.",
                ],
            )?,
            SoftwareProfile::new(
                "docker",
                "Docker",
                r"\bdocker\b",
                [
                    "Start with a minimal base image.",
                    "Document the build process.",
                    "Consider image size and accessibility.",
                    "Singularity is often preferred in HPC environments.",
                ],
            )?,
            SoftwareProfile::new(
                "git",
                "Git",
                r"\bgit(?:hub)?\b",
                [
                    "Tag the exact commit used for the published results.",
                    "GitHub is good for code, not for data preservation; deposit the final package in an archive.",
                ],
            )?,
        ]))
    }
}
