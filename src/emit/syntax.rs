//! Call-signature blocks shared by method and event pages.
use std::fmt::Write as _;

use crate::ir::Parameter;
use crate::render::TypeDescriber;

/// One argument line of a syntax block: text plus an optional `//` comment.
pub(super) struct Argument {
    pub text: String,
    pub comment: Option<String>,
}

impl Argument {
    pub fn bare(text: impl Into<String>) -> Self {
        Self { text: text.into(), comment: None }
    }
}

/// `name` + `// [optional ]type` per parameter.
pub(super) fn parameter_arguments(describer: &TypeDescriber<'_>, parameters: &[Parameter]) -> Vec<Argument> {
    parameters
        .iter()
        .map(|p| Argument {
            text: p.name.clone(),
            comment: Some(describer.describe_with_optional(&p.schema, None)),
        })
        .collect()
}

/// Indented argument lines; every argument but the last gets a trailing
/// comma and comments are aligned on the longest argument.
pub(super) fn argument_lines(args: &[Argument], out: &mut String) {
    let texts: Vec<String> = args
        .iter()
        .enumerate()
        .map(|(i, a)| if i + 1 < args.len() { format!("{},", a.text) } else { a.text.clone() })
        .collect();
    let pad = texts.iter().map(|t| t.chars().count()).max().unwrap_or(0);
    for (text, arg) in texts.iter().zip(args) {
        match &arg.comment {
            Some(comment) => {
                let _ = writeln!(out, "  {text:<pad$}  // {comment}");
            }
            None => {
                let _ = writeln!(out, "  {text}");
            }
        }
    }
}

/// `a, b, c`
pub(super) fn names(parameters: &[Parameter]) -> String {
    parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeSchema;

    #[test]
    fn comments_align_and_last_argument_has_no_comma() {
        let d = TypeDescriber::plain("alarms");
        let params = vec![
            Parameter::new("name", TypeSchema::primitive("string").optional()),
            Parameter::new("alarmInfo", TypeSchema::object([("when", TypeSchema::primitive("number"))])),
        ];
        let mut out = String::new();
        argument_lines(&parameter_arguments(&d, &params), &mut out);
        assert_eq!(out, "  name,      // optional string\n  alarmInfo  // object\n");
    }

    #[test]
    fn bare_arguments_have_no_comment() {
        let mut out = String::new();
        argument_lines(&[Argument::bare("function() {...}"), Argument::bare("filter")], &mut out);
        assert_eq!(out, "  function() {...},\n  filter\n");
    }
}
