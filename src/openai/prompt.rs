//! Prompt rendering. Pure functions; no model calls.

use crate::questionnaire::{Answer, Role, numbered};

const ANALYSIS_TEMPLATE: &str = include_str!("templates/analysis.md");
const MANAGER_TEMPLATE: &str = include_str!("templates/consultation_manager.md");
const EMPLOYEE_TEMPLATE: &str = include_str!("templates/consultation_employee.md");

/// Instruction for the satirical company roast.
pub fn build_analysis_prompt(company_name: &str) -> String {
    render(ANALYSIS_TEMPLATE, &[("company", company_name)])
}

/// Instruction for the personal consultation letter.
///
/// Blank answers are left out and the rest get ids 1..n in questionnaire
/// order, regardless of the order of `answers`.
pub fn build_consultation_prompt(
    company_name: &str,
    prior_analysis: &str,
    answers: &[Answer],
    role: Role,
) -> String {
    let questionnaire = serde_json::to_string_pretty(&numbered(answers))
        .unwrap_or_else(|_| "[]".to_string());
    render(
        consultation_template(role),
        &[
            ("company", company_name),
            ("analysis", prior_analysis),
            ("questionnaire", &questionnaire),
        ],
    )
}

fn consultation_template(role: Role) -> &'static str {
    match role {
        Role::Manager => MANAGER_TEMPLATE,
        Role::Employee => EMPLOYEE_TEMPLATE,
    }
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned,
/// so braces inside user input stay literal.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let replacement = tail.find('}').and_then(|end| {
            let name = &tail[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
