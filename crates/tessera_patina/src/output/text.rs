//! Plain terminal output grouped by file.

use crate::message::Message;

/// Format messages as text, one block per file in first-seen order.
///
/// Positions are printed 1-based as `line:column`.
pub fn format_text(messages: &[Message]) -> String {
    let mut output = String::new();
    let mut files: Vec<&str> = Vec::new();

    for message in messages {
        let file = message.location.file.as_str();
        if !files.contains(&file) {
            files.push(file);
        }
    }

    for (i, file) in files.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(file);
        output.push('\n');

        for message in messages.iter().filter(|m| m.location.file == *file) {
            let start = message.location.position.start;
            output.push_str(&format!(
                "  {}:{}  {:<7}  {}\n",
                start.row + 1,
                start.column + 1,
                message.severity.as_str(),
                message.excerpt
            ));
        }
    }

    let (errors, warnings, infos) = super::count_by_severity(messages);
    if !output.is_empty() {
        output.push('\n');
    }
    output.push_str(&format_summary(errors, warnings, infos, files.len()));

    output
}

/// Format a summary line
pub fn format_summary(
    error_count: usize,
    warning_count: usize,
    info_count: usize,
    file_count: usize,
) -> String {
    let mut parts = Vec::new();

    if error_count > 0 {
        parts.push(format!(
            "{} error{}",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    if warning_count > 0 {
        parts.push(format!(
            "{} warning{}",
            warning_count,
            if warning_count == 1 { "" } else { "s" }
        ));
    }

    if info_count > 0 {
        parts.push(format!(
            "{} info{}",
            info_count,
            if info_count == 1 { "" } else { "s" }
        ));
    }

    if parts.is_empty() {
        format!("No problems found in {} file(s)", file_count)
    } else {
        format!(
            "{} in {} file{}",
            parts.join(", "),
            file_count,
            if file_count == 1 { "" } else { "s" }
        )
    }
}
