//! Line-oriented Java source writer.
//!
//! Tracks indentation and block nesting while a class is emitted. Output is
//! a list of lines without terminators; turning them into a file is the
//! caller's business.

/// Indentation unit of generated code.
const INDENT: &str = "    ";

/// Java access modifier.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Access {
    Public,
    Private,
}

impl Access {
    pub const fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Private => "private",
        }
    }
}

/// Java source writer.
#[derive(Debug, Default)]
pub struct JavaWriter {
    lines: Vec<String>,
    indent: usize,
    /// Counter for `#padding_N` element entries.
    padding: u32,
}

impl JavaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let mut line = INDENT.repeat(self.indent);
        line.push_str(text);
        self.lines.push(line);
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Write `header {` and indent.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.indent();
    }

    /// Dedent and write `}` followed by a blank line.
    pub fn close(&mut self) {
        self.dedent();
        self.line("}");
        self.blank();
    }

    /// Dedent and write a bare `}`.
    pub fn close_tight(&mut self) {
        self.dedent();
        self.line("}");
    }

    /// Open a method. `ret` is `None` for constructors.
    pub fn open_method(
        &mut self,
        access: Access,
        ret: Option<&str>,
        name: &str,
        params: &[(String, String)],
    ) {
        let params = params
            .iter()
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect::<Vec<_>>()
            .join(", ");
        let header = match ret {
            Some(ret) => format!("{} {ret} {name}({params})", access.as_str()),
            None => format!("{} {name}({params})", access.as_str()),
        };
        self.open(header);
    }

    /// Name of the next element padding entry.
    pub fn next_padding(&mut self) -> String {
        self.padding += 1;
        format!("#padding_{}", self.padding)
    }

    /// Take the lines written so far, without trailing blank lines.
    pub fn finish(mut self) -> Vec<String> {
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests;
