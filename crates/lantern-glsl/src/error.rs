use std::fmt;

use crate::stage::Stage;

/// What went wrong while splitting a combined shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A directive line named a stage this splitter does not know.
    UnknownStage(String),
    /// A directive line carried no stage keyword at all.
    MissingKeyword,
    /// The file ended without a block for this stage.
    MissingStage(Stage),
}

/// A parse error from the stage splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line of the offending directive. `0` for whole-file errors.
    pub line: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnknownStage(word) => {
                write!(f, "shader source line {}: unknown stage {:?}", self.line, word)
            }
            ParseErrorKind::MissingKeyword => {
                write!(f, "shader source line {}: directive without a stage keyword", self.line)
            }
            ParseErrorKind::MissingStage(stage) => {
                write!(f, "shader source has no {stage} stage")
            }
        }
    }
}

impl std::error::Error for ParseError {}
