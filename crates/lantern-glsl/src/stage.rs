use std::fmt;

/// Token that opens a stage block. Must be the first token on its line.
pub const DIRECTIVE: &str = "#shader";

/// One compiled phase of a program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// Both stages, in the order they are compiled.
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];

    /// Parses the keyword that follows [`DIRECTIVE`].
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "vertex" => Some(Stage::Vertex),
            "fragment" => Some(Stage::Fragment),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
