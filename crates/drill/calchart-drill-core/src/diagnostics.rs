//! Problems found while compiling a show. None of them stop compilation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::StepCoordinate;
use crate::error::ContinuityError;
use crate::ids::{DotId, SheetId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IssueKind {
    /// A continuity failed; the dot holds its spot for the sheet instead.
    Continuity { error: ContinuityError },
    /// The dot has no spot on the sheet.
    DotNotInSheet,
    /// Continuities finished early; the rest of the sheet is a close.
    UnusedBeats { beats: u32 },
    /// The dot does not finish on its spot for the next sheet.
    EndsOffFormation {
        expected: StepCoordinate,
        actual: StepCoordinate,
    },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Continuity { .. } => Severity::Error,
            IssueKind::DotNotInSheet
            | IssueKind::UnusedBeats { .. }
            | IssueKind::EndsOffFormation { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Continuity { error } => write!(f, "{error}"),
            IssueKind::DotNotInSheet => f.write_str("dot is not on the sheet"),
            IssueKind::UnusedBeats { beats } => write!(f, "{beats} beats left unused"),
            IssueKind::EndsOffFormation { expected, actual } => write!(
                f,
                "ends at ({}, {}) instead of ({}, {})",
                actual.x(),
                actual.y(),
                expected.x(),
                expected.y()
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompileIssue {
    pub dot: DotId,
    pub sheet: SheetId,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for CompileIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dot {} on sheet {}: {}", self.dot, self.sheet, self.kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    issues: Vec<CompileIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue and forward it to the log.
    pub fn report(&mut self, dot: &DotId, sheet: SheetId, kind: IssueKind) {
        let issue = CompileIssue {
            dot: dot.clone(),
            sheet,
            severity: kind.severity(),
            kind,
        };
        log::warn!("{issue}");
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[CompileIssue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompileIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
    }

    pub fn for_dot<'a>(&'a self, dot: &'a DotId) -> impl Iterator<Item = &'a CompileIssue> {
        self.issues.iter().filter(move |i| &i.dot == dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_skip_warnings() {
        let a = DotId::from("A");
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(&a, SheetId(0), IssueKind::UnusedBeats { beats: 4 });
        diagnostics.report(
            &a,
            SheetId(1),
            IssueKind::Continuity {
                error: ContinuityError::EmptyOrder {
                    kind: "cm".to_string(),
                },
            },
        );
        diagnostics.report(&a, SheetId(2), IssueKind::DotNotInSheet);

        assert_eq!(diagnostics.len(), 3);
        let errors: Vec<_> = diagnostics.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].sheet, SheetId(1));
        assert_eq!(errors[0].severity, Severity::Error);
    }
}
