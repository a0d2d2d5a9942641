use crate::error::{ParseError, ParseErrorKind};
use crate::stage::{Stage, DIRECTIVE};

/// Per-stage source text extracted from a combined file.
///
/// Every kept line is terminated with `\n`, so a block of `n` lines produces
/// exactly `n` lines here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn stage(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut String {
        match stage {
            Stage::Vertex => &mut self.vertex,
            Stage::Fragment => &mut self.fragment,
        }
    }
}

/// Returns the stage named by `line` if it is a directive line.
///
/// `Ok(None)` means "not a directive"; the line belongs to the active block.
fn directive(line: &str, line_no: usize) -> Result<Option<Stage>, ParseError> {
    let mut words = line.split_whitespace();
    if words.next() != Some(DIRECTIVE) {
        return Ok(None);
    }
    let Some(word) = words.next() else {
        return Err(ParseError::new(ParseErrorKind::MissingKeyword, line_no));
    };
    Stage::from_keyword(word)
        .map(Some)
        .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownStage(word.to_string()), line_no))
}

/// Splits a combined source into its vertex and fragment blocks.
///
/// A stage may appear in several blocks; they are concatenated in file order.
/// Both stages must be present.
pub fn parse_str(src: &str) -> Result<ShaderSource, ParseError> {
    let mut out = ShaderSource::default();
    let mut seen = [false; 2];
    let mut active: Option<Stage> = None;

    for (idx, line) in src.lines().enumerate() {
        if let Some(stage) = directive(line, idx + 1)? {
            seen[stage as usize] = true;
            active = Some(stage);
            continue;
        }
        // Preamble before the first directive is dropped.
        let Some(stage) = active else { continue };
        let buf = out.stage_mut(stage);
        buf.push_str(line);
        buf.push('\n');
    }

    for stage in Stage::ALL {
        if !seen[stage as usize] {
            return Err(ParseError::new(ParseErrorKind::MissingStage(stage), 0));
        }
    }

    Ok(out)
}
