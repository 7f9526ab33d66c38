/// Format `text` as the body lines of a Javadoc comment.
///
/// Every line is prefixed with `indent` spaces and `" * "`.
pub fn to_java_doc(text: &str, indent: usize) -> String {
    let padding = " ".repeat(indent);
    text.lines()
        .map(|line| format!("{} * {}", padding, line))
        .collect::<Vec<_>>()
        .join("\n")
}
