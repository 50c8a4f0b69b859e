use crate::constants::DEFAULT_INDENT;

/// Parse-time verbosity for non-fatal diagnostics. Each level includes the
/// lower ones; the level never changes the parse outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DebugLevel {
    #[default]
    Simple,
    Warning,
    Info,
}

impl DebugLevel {
    pub fn satisfies(self, min: DebugLevel) -> bool {
        self >= min
    }

    pub fn satisfies_warning(self) -> bool {
        self.satisfies(DebugLevel::Warning)
    }

    pub fn satisfies_info(self) -> bool {
        self.satisfies(DebugLevel::Info)
    }
}

/// Write-time policy for emitting `(ClassName)` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CastingLevel {
    #[default]
    Never,
    /// Only where the declared type is an interface.
    Necessary,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Charset {
    /// Encodes `text`; characters outside the charset become `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Charset::Utf8 => text.as_bytes().to_vec(),
            Charset::Latin1 => text
                .chars()
                .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
                .collect(),
            Charset::Ascii => text
                .chars()
                .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub debug_level: DebugLevel,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_level(mut self, debug_level: DebugLevel) -> Self {
        self.debug_level = debug_level;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub charset: Charset,
    pub indent: usize,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            charset: Charset::default(),
            indent: DEFAULT_INDENT,
        }
    }
}
