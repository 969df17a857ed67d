//! Embed a default YAML configuration into a C++ header as a string constant.

use crate::codegen::fs_utils::{read_file, save_lines};
use crate::codegen::utils::{escape_c_string, is_c_identifier};
use crate::error::{CodegenError, Result};
use std::path::Path;

/// Render the header lines embedding `yaml_text` as `const char* <var_name>`
///
/// The YAML must parse; its text is embedded line by line, not re-serialized,
/// so comments and ordering survive.
pub fn render_config_header(yaml_text: &str, var_name: &str, macro_name: &str) -> Result<Vec<String>> {
    if !is_c_identifier(var_name) {
        return Err(CodegenError::Config(format!(
            "'{}' is not a valid C variable name",
            var_name
        )));
    }
    if !is_c_identifier(macro_name) {
        return Err(CodegenError::Config(format!(
            "'{}' is not a valid macro name",
            macro_name
        )));
    }

    serde_yaml::from_str::<serde_yaml::Value>(yaml_text)?;

    let guard = format!("LABSTOR_CONFIG_{}_DEFAULT_H_", macro_name.to_uppercase());
    let mut lines = vec![
        format!("#ifndef {}", guard),
        format!("#define {}", guard),
        format!("const char* {} = ", var_name),
    ];

    let mut string_lines: Vec<String> = yaml_text
        .lines()
        .map(|line| format!("\"{}\\n\"", escape_c_string(line)))
        .collect();
    if string_lines.is_empty() {
        string_lines.push("\"\"".to_string());
    }
    if let Some(last) = string_lines.last_mut() {
        last.push(';');
    }
    lines.extend(string_lines);

    lines.push(format!("#endif  // {}", guard));
    Ok(lines)
}

/// Read `yaml_path` and write the embedding header to `output_path`
pub fn embed_config(
    yaml_path: &Path,
    var_name: &str,
    output_path: &Path,
    macro_name: &str,
) -> Result<()> {
    let yaml_text = read_file(yaml_path)?;
    let lines = render_config_header(&yaml_text, var_name, macro_name)?;
    save_lines(&lines, Some(output_path))?;
    tracing::info!(
        "Embedded {} into {} as {}",
        yaml_path.display(),
        output_path.display(),
        var_name
    );
    Ok(())
}
