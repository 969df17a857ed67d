//! Expand a C++ template header into a parameterized preprocessor macro.
//!
//! Container classes share one body that is written once as ordinary C++ and
//! turned into a multi-line `#define NAME(PARAMS...)\` here. Placeholder tokens
//! are wrapped in `TYPE_UNWRAP(...)` so that arguments containing commas
//! (template types) survive macro expansion.

use crate::codegen::fs_utils::{read_file, save_lines};
use crate::codegen::utils::is_c_identifier;
use crate::error::{CodegenError, Result};
use regex::Regex;
use std::path::Path;

pub const BEGIN_MARKER: &str = "// @template-begin";
pub const END_MARKER: &str = "// @template-end";

/// Parameters of one macro expansion
#[derive(Debug, Clone)]
pub struct MacroTemplate<'a> {
    pub macro_name: &'a str,
    pub placeholders: &'a [String],
    pub guard: &'a str,
}

impl MacroTemplate<'_> {
    fn validate(&self) -> Result<()> {
        if !is_c_identifier(self.macro_name) {
            return Err(CodegenError::Template(format!(
                "invalid macro name '{}'",
                self.macro_name
            )));
        }
        if !is_c_identifier(self.guard) {
            return Err(CodegenError::Template(format!("invalid guard '{}'", self.guard)));
        }
        if self.placeholders.is_empty() {
            return Err(CodegenError::Template(format!(
                "macro '{}' needs at least one placeholder",
                self.macro_name
            )));
        }
        if let Some(bad) = self.placeholders.iter().find(|p| !is_c_identifier(p)) {
            return Err(CodegenError::Template(format!("invalid placeholder '{}'", bad)));
        }
        Ok(())
    }
}

/// Slice out the templated region, or the whole text when there are no markers
fn template_body(text: &str) -> Result<Vec<&str>> {
    let lines: Vec<&str> = text.lines().collect();
    let begin = lines.iter().position(|l| l.trim() == BEGIN_MARKER);
    let end = lines.iter().position(|l| l.trim() == END_MARKER);
    match (begin, end) {
        (None, None) => Ok(lines),
        (Some(b), Some(e)) if b < e => Ok(lines[b + 1..e].to_vec()),
        _ => Err(CodegenError::Template(format!(
            "unbalanced '{}' / '{}' markers",
            BEGIN_MARKER, END_MARKER
        ))),
    }
}

struct Placeholder<'a> {
    token: &'a str,
    wrapped: Regex,
    bare: Regex,
}

fn substitute(line: &str, placeholders: &[Placeholder<'_>]) -> String {
    let mut line = line.to_string();
    for p in placeholders {
        // unwrap existing wrappers first so they are not wrapped twice
        line = p.wrapped.replace_all(&line, regex::NoExpand(p.token)).into_owned();
        let wrapped = format!("TYPE_UNWRAP({})", p.token);
        line = p.bare.replace_all(&line, regex::NoExpand(wrapped.as_str())).into_owned();
    }
    line
}

/// Turn a trailing `// text` comment into `/* text */`
///
/// A line comment inside a macro body would swallow the continuation and every
/// following line. String and character literals are skipped, and
/// `in_block` carries an open `/* ... */` comment over to the next line.
fn rewrite_line_comment(line: &str, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        if *in_block {
            out.push(c);
            if c == '*' && next == Some('/') {
                out.push('/');
                chars.next();
                *in_block = false;
            }
        } else if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '/' && next == Some('/') {
            let text = line[i + 2..].trim().replace("*/", "* /");
            if !text.is_empty() {
                out.push_str(&format!("/* {} */", text));
            }
            break;
        } else if c == '/' && next == Some('*') {
            out.push_str("/*");
            chars.next();
            *in_block = true;
        } else {
            if c == '"' || c == '\'' {
                quote = Some(c);
            }
            out.push(c);
        }
    }
    out
}

/// Render the macro header from template text
pub fn render_macro_header(text: &str, template: &MacroTemplate<'_>) -> Result<Vec<String>> {
    template.validate()?;

    let mut patterns = Vec::with_capacity(template.placeholders.len());
    for token in template.placeholders {
        let escaped = regex::escape(token);
        let wrapped = Regex::new(&format!(r"TYPE_UNWRAP\(\s*{}\s*\)", escaped))
            .map_err(|e| CodegenError::Template(e.to_string()))?;
        let bare = Regex::new(&format!(r"\b{}\b", escaped))
            .map_err(|e| CodegenError::Template(e.to_string()))?;
        patterns.push(Placeholder {
            token: token.as_str(),
            wrapped,
            bare,
        });
    }

    let mut lines = vec![
        format!("#ifndef {}", template.guard),
        format!("#define {}", template.guard),
        format!(
            "#define {}({})\\",
            template.macro_name,
            template.placeholders.join(",")
        ),
    ];
    let mut in_block = false;
    for line in template_body(text)? {
        let line = rewrite_line_comment(line, &mut in_block);
        lines.push(format!("{}\\", substitute(&line, &patterns).trim_end()));
    }
    lines.push(String::new());
    lines.push(format!("#endif  // {}", template.guard));
    Ok(lines)
}

/// Read `template_path`, expand it and write the macro header to `output_path`
pub fn expand_template(
    template_path: &Path,
    output_path: &Path,
    template: &MacroTemplate<'_>,
) -> Result<()> {
    let text = read_file(template_path)?;
    let lines = render_macro_header(&text, template)?;
    save_lines(&lines, Some(output_path))?;
    tracing::info!(
        "Expanded {} into {} ({})",
        template_path.display(),
        output_path.display(),
        template.macro_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<String> {
        vec!["CLASS_NAME".to_string(), "TYPED_HEADER".to_string()]
    }

    #[test]
    fn test_render_with_markers() {
        let text = "\
#include <x.h>
// @template-begin
public:
typedef TYPED_HEADER header_t;

explicit CLASS_NAME(int x) {}
// @template-end
";
        let placeholders = params();
        let template = MacroTemplate {
            macro_name: "SHM_CONTAINER_TEMPLATE",
            placeholders: &placeholders,
            guard: "LABSTOR_SHM_CONTAINER_MACRO_H_",
        };
        let lines = render_macro_header(text, &template).unwrap();
        assert_eq!(
            lines,
            vec![
                "#ifndef LABSTOR_SHM_CONTAINER_MACRO_H_",
                "#define LABSTOR_SHM_CONTAINER_MACRO_H_",
                "#define SHM_CONTAINER_TEMPLATE(CLASS_NAME,TYPED_HEADER)\\",
                "public:\\",
                "typedef TYPE_UNWRAP(TYPED_HEADER) header_t;\\",
                "\\",
                "explicit TYPE_UNWRAP(CLASS_NAME)(int x) {}\\",
                "",
                "#endif  // LABSTOR_SHM_CONTAINER_MACRO_H_",
            ]
        );
    }

    #[test]
    fn test_already_wrapped_and_word_bounded() {
        let placeholders = params();
        let template = MacroTemplate {
            macro_name: "T",
            placeholders: &placeholders,
            guard: "G_H_",
        };
        let lines = render_macro_header("TYPE_UNWRAP(CLASS_NAME) CLASS_NAMES", &template).unwrap();
        assert_eq!(lines[3], "TYPE_UNWRAP(CLASS_NAME) CLASS_NAMES\\");
    }

    #[test]
    fn test_line_comments_do_not_swallow_continuation() {
        let placeholders = params();
        let template = MacroTemplate {
            macro_name: "T",
            placeholders: &placeholders,
            guard: "G_H_",
        };
        let text = "\
int a; // note
int b;
// whole line */ tricky
const char *s = \"http://x\"; char c = '/';
/* open // kept
still */ int d; //
";
        let lines = render_macro_header(text, &template).unwrap();
        assert_eq!(
            lines[3..lines.len() - 2].to_vec(),
            vec![
                "int a; /* note */\\",
                "int b;\\",
                "/* whole line * / tricky */\\",
                "const char *s = \"http://x\"; char c = '/';\\",
                "/* open // kept\\",
                "still */ int d;\\",
            ]
        );
    }

    #[test]
    fn test_unbalanced_markers() {
        let placeholders = params();
        let template = MacroTemplate {
            macro_name: "T",
            placeholders: &placeholders,
            guard: "G_H_",
        };
        let err = render_macro_header("// @template-begin\nx\n", &template).unwrap_err();
        assert!(matches!(err, CodegenError::Template(_)));
    }

    #[test]
    fn test_invalid_parameters() {
        let empty: Vec<String> = Vec::new();
        let template = MacroTemplate {
            macro_name: "T",
            placeholders: &empty,
            guard: "G_H_",
        };
        assert!(render_macro_header("x", &template).is_err());

        let bad = vec!["NOT-OK".to_string()];
        let template = MacroTemplate {
            macro_name: "T",
            placeholders: &bad,
            guard: "G_H_",
        };
        assert!(render_macro_header("x", &template).is_err());
    }
}
