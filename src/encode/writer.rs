use crate::text::string::escape_string_into;

/// Output buffer with a cache of indentation prefixes.
pub(crate) struct Writer {
    buffer: String,
    indent_unit: String,
    indent_cache: Vec<String>,
}

impl Writer {
    pub fn new(indent: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_unit: " ".repeat(indent),
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn write_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn write_indent(&mut self, depth: usize) {
        if depth == 0 || self.indent_unit.is_empty() {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer.push_str(&self.indent_cache[depth]);
    }

    pub fn write_quoted_string(&mut self, s: &str) {
        self.buffer.push('"');
        escape_string_into(&mut self.buffer, s);
        self.buffer.push('"');
    }

    /// `"key": `
    pub fn write_key(&mut self, key: &str) {
        self.write_quoted_string(key);
        self.buffer.push_str(": ");
    }

    pub fn write_cast(&mut self, class_name: &str) {
        self.buffer.push('(');
        self.buffer.push_str(class_name);
        self.buffer.push(')');
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let next = match self.indent_cache.last() {
                Some(prev) => {
                    let mut s = String::with_capacity(prev.len() + self.indent_unit.len());
                    s.push_str(prev);
                    s.push_str(&self.indent_unit);
                    s
                }
                None => String::new(),
            };
            self.indent_cache.push(next);
        }
    }
}
