//! Code builder utility for generating properly indented text.

use super::Indent;

/// Fluent API for building source text with proper indentation.
///
/// Supports both consuming methods (returning `Self`) for chaining and
/// mutable methods (returning `&mut Self`) for loops driven by the model.
///
/// # Example
///
/// ```
/// use pojogen_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::java()
///     .line("public class Hello {")
///     .indent()
///     .line("private String name;")
///     .dedent()
///     .line("}")
///     .build();
///
/// assert_eq!(code, "public class Hello {\n    private String name;\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with 4-space indentation.
    pub fn java() -> Self {
        Self::new(Indent::JAVA)
    }

    /// Create a new CodeBuilder with 2-space indentation.
    pub fn xml() -> Self {
        Self::new(Indent::XML)
    }

    // =========================================================================
    // Mutable API - methods prefixed with `push_`
    // =========================================================================

    /// Add a line with current indentation (mutable).
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add every line of `text` with current indentation (mutable).
    pub fn push_lines(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            if line.is_empty() {
                self.push_blank();
            } else {
                self.push_line(line);
            }
        }
        self
    }

    /// Add a blank line (mutable).
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add raw text without indentation or newline (mutable).
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    /// Increase indentation level (mutable).
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level (mutable).
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a Javadoc comment around pre-formatted ` * ` body lines (mutable).
    ///
    /// The body is expected to carry its own indentation, as produced by
    /// `to_java_doc` with [`CodeBuilder::column`].
    pub fn push_javadoc(&mut self, body: &str) -> &mut Self {
        if body.is_empty() {
            return self;
        }
        self.push_line("/**");
        self.buffer.push_str(body);
        self.buffer.push('\n');
        self.push_line(" */")
    }

    /// Open a block: header line, then one level deeper (mutable).
    pub fn push_open(&mut self, header: &str) -> &mut Self {
        self.push_line(header).push_indent()
    }

    /// Close a block: one level back, then closing line (mutable).
    pub fn push_close(&mut self, close: &str) -> &mut Self {
        self.push_dedent().push_line(close)
    }

    // =========================================================================
    // Consuming API
    // =========================================================================

    /// Add a line with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    /// Increase indentation level.
    pub fn indent(mut self) -> Self {
        self.push_indent();
        self
    }

    /// Decrease indentation level.
    pub fn dedent(mut self) -> Self {
        self.push_dedent();
        self
    }

    /// Add a block with a closing line.
    ///
    /// # Example
    ///
    /// ```
    /// use pojogen_codegen::builder::CodeBuilder;
    ///
    /// let code = CodeBuilder::java()
    ///     .block_with_close("public Order() {", "}", |b: CodeBuilder| {
    ///         b.line("super();")
    ///     })
    ///     .build();
    /// assert_eq!(code, "public Order() {\n    super();\n}\n");
    /// ```
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Conditionally add content.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Get the current indentation level.
    pub fn current_indent(&self) -> usize {
        self.indent_level
    }

    /// Current indentation in columns.
    pub fn column(&self) -> usize {
        self.indent_level * self.indent.width()
    }

    /// Consume the builder and return the generated text.
    pub fn build(self) -> String {
        self.buffer
    }

    /// Get a reference to the current buffer content.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::java()
    }
}
