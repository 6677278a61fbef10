//! Status line definitions
//!
//! Every reply starts with `<3-digit code> <text>`.

/// Numeric status codes the client understands
pub mod codes {
    pub const DATABASES_FOLLOW: u16 = 110;
    pub const STRATEGIES_FOLLOW: u16 = 111;
    pub const INFO_FOLLOWS: u16 = 112;
    pub const DEFINITIONS_FOLLOW: u16 = 150;
    pub const DEFINITION: u16 = 151;
    pub const MATCHES_FOLLOW: u16 = 152;

    pub const GREETING: u16 = 220;
    pub const BYE: u16 = 221;
    pub const OK: u16 = 250;

    pub const INVALID_DATABASE: u16 = 550;
    pub const INVALID_STRATEGY: u16 = 551;
    pub const NO_MATCH: u16 = 552;
    pub const NO_DATABASES: u16 = 554;
    pub const NO_STRATEGIES: u16 = 555;
}

/// A parsed status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Three-digit status code
    pub code: u16,

    /// Everything after the code, leading space removed
    pub text: String,
}

impl StatusLine {
    /// Parse a status line.
    ///
    /// The line must start with three ASCII digits; anything after them is
    /// the message. Returns `None` for lines that are not status lines.
    pub fn parse(line: &str) -> Option<Self> {
        let bytes = line.as_bytes();
        if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
            return None;
        }
        let code = line[..3].parse().ok()?;
        let text = line[3..].strip_prefix(' ').unwrap_or(&line[3..]);
        Some(Self {
            code,
            text: text.to_string(),
        })
    }

    /// Whether this line carries the given code
    pub fn is(&self, code: u16) -> bool {
        self.code == code
    }

    /// Whether the code is in the 1xx (body follows) class
    pub fn is_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }
}
