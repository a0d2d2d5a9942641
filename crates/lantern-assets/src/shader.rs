use std::path::Path;

use anyhow::{Context, Result};
use lantern_gl::{Gl, ShaderProgram};
use lantern_glsl::ShaderSource;

/// Reads a combined shader file and splits it into stages.
pub fn read_shader_source(path: impl AsRef<Path>) -> Result<ShaderSource> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;
    lantern_glsl::parse_str(&text).with_context(|| format!("in shader {}", path.display()))
}

/// Reads, splits, compiles and links a combined shader file.
///
/// The path becomes the program label used in diagnostics.
pub fn load_program(gl: &Gl, path: impl AsRef<Path>) -> Result<ShaderProgram> {
    let path = path.as_ref();
    let source = read_shader_source(path)?;
    let program = ShaderProgram::from_source(gl, path.display().to_string(), &source)
        .with_context(|| format!("failed to build shader program {}", path.display()))?;
    Ok(program)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::rc::Rc;

    use lantern_gl::context::RecordingApi;
    use lantern_glsl::Stage;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lantern-assets-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const BASIC: &str = "// preamble\n#shader vertex\nvoid main() {}\n#shader fragment\nvoid main() {}\n";

    #[test]
    fn reads_and_splits() {
        let path = temp_file("basic.glsl", BASIC);
        let source = read_shader_source(&path).unwrap();
        assert_eq!(source.vertex, "void main() {}\n");
        assert_eq!(source.fragment, "void main() {}\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_shader_source("/nonexistent/lantern/basic.glsl").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lantern/basic.glsl"));
    }

    #[test]
    fn program_is_labelled_with_its_path() {
        let path = temp_file("labelled.glsl", BASIC);
        let gl = Gl::new(RecordingApi::new());
        let program = load_program(&gl, &path).unwrap();
        assert_eq!(program.label(), path.display().to_string());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn compile_error_keeps_shader_error_as_source() {
        let path = temp_file("broken.glsl", BASIC);
        let api = Rc::new(RecordingApi::new().with_compile_error(Stage::Vertex, "0:1: error"));
        let gl = Gl::from_shared(api.clone());

        let err = load_program(&gl, &path).unwrap_err();
        let shader_err = err.downcast_ref::<lantern_gl::ShaderError>().unwrap();
        assert!(matches!(shader_err, lantern_gl::ShaderError::Compile { stage: Stage::Vertex, .. }));
        assert_eq!(api.live_objects(), 0);
        std::fs::remove_file(path).unwrap();
    }
}
