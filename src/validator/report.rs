use super::ValidationFailure;

/// Accumulated state of one archive validation.
///
/// A fresh run is produced by every `validate` call and returned to the
/// caller; nothing is retained on the validator between calls, so results
/// cannot leak across runs or across concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    valid: bool,
    shapefiles: Vec<String>,
    details: Vec<String>,
    failures: Vec<ValidationFailure>,
    warnings: Vec<String>,
}

impl ValidationRun {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }

    pub(crate) fn push_failure(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    // Warnings are a reporting channel only; none of the mandatory checks
    // emit them today.
    #[allow(dead_code)]
    pub(crate) fn push_warning(&mut self, line: impl Into<String>) {
        self.warnings.push(line.into());
    }

    pub(crate) fn set_shapefiles(&mut self, shapefiles: Vec<String>) {
        self.shapefiles = shapefiles;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Discovered shapefile identities, in archive order, including the
    /// ones that failed.
    pub fn shapefiles(&self) -> &[String] {
        &self.shapefiles
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Structured failures, assertable by kind without string matching.
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Failure messages rendered to text.
    pub fn errors(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Renders the full diagnostic report. The report never states an
    /// overall pass/fail verdict; that wording belongs to the caller.
    pub fn report(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !self.details.is_empty() {
            lines.extend(self.details.iter().cloned());
            lines.push(String::new());
        }

        let errors = self.errors();
        if !errors.is_empty() {
            lines.push("ERRORS:".to_string());
            for error in &errors {
                lines.push(format!("  - {error}"));
            }
            lines.push(String::new());
        }

        if !self.warnings.is_empty() {
            lines.push("WARNINGS:".to_string());
            for warning in &self.warnings {
                lines.push(format!("  - {warning}"));
            }
            lines.push(String::new());
        }

        lines.push(summary_line(errors.len(), self.warnings.len()));
        lines.join("\n")
    }
}

fn summary_line(error_count: usize, warning_count: usize) -> String {
    match (error_count, warning_count) {
        (0, 0) => "All validation checks completed successfully.".to_string(),
        (errors, 0) => format!("Validation completed with {errors} error(s)."),
        (0, warnings) => {
            format!("Validation completed with {warnings} warning(s) but no errors.")
        }
        (errors, warnings) => {
            format!("Validation completed with {errors} error(s) and {warnings} warning(s).")
        }
    }
}
