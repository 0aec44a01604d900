//! Console output formatter for resolution results

use colored::Colorize;
use qbank_domain::{AnswerOrigin, MULTI_ANSWER_SEPARATOR, ResolutionResult};

/// Formats resolution results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a result as a short colored summary
    pub fn format(question: &str, result: &ResolutionResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Q:".bold(), question));

        match result.answer() {
            Some(answer) => {
                output.push_str(&format!("{}\n", "A:".bold()));
                for part in answer.split(MULTI_ANSWER_SEPARATOR) {
                    output.push_str(&format!("  {}\n", part.green()));
                }
            }
            None => {
                output.push_str(&format!(
                    "{} {}\n",
                    "A:".bold(),
                    result.origin().message().red()
                ));
            }
        }

        output.push_str(&format!(
            "{} {}\n",
            "Source:".dimmed(),
            Self::origin_label(result.origin())
        ));

        output
    }

    /// Format as the JSON response envelope
    pub fn format_json(result: &ResolutionResult) -> String {
        serde_json::to_string_pretty(&result.to_envelope()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Warning shown when no real provider is configured
    pub fn stand_in_notice(reason: &str) -> String {
        format!(
            "{} {}; provider answers are placeholders and will not be saved",
            "Note:".yellow().bold(),
            reason
        )
    }

    fn origin_label(origin: AnswerOrigin) -> String {
        let label = format!("{} ({})", origin.source_label(), origin.message());
        match origin {
            AnswerOrigin::Cache | AnswerOrigin::Store => label.cyan().to_string(),
            AnswerOrigin::Provider => label.yellow().to_string(),
            AnswerOrigin::None => label.red().to_string(),
        }
    }
}
