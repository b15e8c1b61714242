//! Code builder utility for generating Java source.

/// One indentation level, following the Android code style.
const INDENT: &str = "    ";

/// Fluent API for building Java source with four-space indentation.
///
/// # Example
///
/// ```
/// use bindery_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::java()
///     .block_with_close("public class BR {", "}", |b| {
///         b.line("public static final int _all = 0;")
///     })
///     .build();
///
/// assert_eq!(code, "public class BR {\n    public static final int _all = 0;\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent_level: usize,
    buffer: String,
}

impl CodeBuilder {
    /// Start an empty compilation unit.
    pub fn java() -> Self {
        Self::default()
    }

    /// Add a line of source with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Increase indentation level.
    pub fn indent(mut self) -> Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn dedent(mut self) -> Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a block with a closing line.
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Add a single-line Javadoc comment (`/** text */`).
    pub fn javadoc(self, text: &str) -> Self {
        self.line(&format!("/** {} */", text))
    }

    /// Add a `package` declaration followed by a blank line.
    ///
    /// Nothing is written for the default package.
    pub fn package(self, package: Option<&str>) -> Self {
        match package {
            Some(pkg) => self.line(&format!("package {};", pkg)).blank(),
            None => self,
        }
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

    /// Consume the builder and return the generated source.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        self.buffer.push_str(&INDENT.repeat(self.indent_level));
    }
}

/// Render `s` as a quoted Java string literal.
pub fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
