use crate::decisions::{DecisionItem, DecisionStatus};
use crate::error::DataIntegrityWarning;
use crate::model::Phase;
use itertools::Itertools;

/// Formats resolved plans, decision lists and diagnostics into human-readable text.
pub struct PlanFormatter;

impl PlanFormatter {
    /// Renders a phase list as an indented outline.
    ///
    /// Linked phases name their source project; steps show where they lead next.
    pub fn format_plan(phases: &[Phase]) -> String {
        let mut out = String::new();
        for (number, phase) in phases.iter().enumerate() {
            out.push_str(&format!("{}. {}", number + 1, phase.name));
            if phase.is_linked {
                let source = phase.source_project_name.as_deref().unwrap_or("another project");
                match phase.incorporated_revision {
                    Some(revision) => out.push_str(&format!(" [from {} r{}]", source, revision)),
                    None => out.push_str(&format!(" [from {}]", source)),
                }
            }
            out.push('\n');

            for operation in &phase.operations {
                out.push_str(&format!("   - {}\n", operation.name));
                for step in &operation.steps {
                    out.push_str(&format!("      * {}", step.step));
                    let links = [
                        step.next_step_id.as_deref().map(|id| format!("next: {}", id)),
                        step.alternate_step_id.as_deref().map(|id| format!("else: {}", id)),
                    ];
                    let links = links.into_iter().flatten().join(", ");
                    if !links.is_empty() {
                        out.push_str(&format!(" ({})", links));
                    }
                    out.push('\n');
                }
            }
        }
        out
    }

    /// One line per decision: status marker, location, question and the current answer.
    pub fn format_decisions(items: &[DecisionItem]) -> String {
        items
            .iter()
            .map(|item| {
                let marker = match item.status {
                    DecisionStatus::Pending => "[ ]",
                    DecisionStatus::Answered => "[x]",
                    DecisionStatus::RequiresAttention => "[!]",
                };
                let location = std::iter::once(item.phase_name.as_str())
                    .chain(item.operation_name.as_deref())
                    .filter(|part| !part.is_empty())
                    .join(" / ");
                let answer = item
                    .selected_value
                    .as_deref()
                    .map(|value| format!(" -> {}", value))
                    .unwrap_or_default();
                format!("{} {} ({}): {}{}", marker, item.id, location, item.question, answer)
            })
            .join("\n")
    }

    pub fn format_warnings(warnings: &[DataIntegrityWarning]) -> String {
        warnings
            .iter()
            .map(|warning| format!("warning: {}", warning))
            .join("\n")
    }
}
