//! Lexer for Shell Command Text
//!
//! The lexer converts raw command text into an ordered token sequence that
//! the parser consumes. Tokenizing never fails: a character that no rule
//! recognizes becomes a single-character `Unknown` token.
//!
//! Matching happens in two phases at every position:
//! - reserved words, accepted only on a word boundary
//! - an ordered rule table where the first matching rule wins
//!
//! Rules are ordered most-specific-first (`;;` before `;`, `>=` before `>`,
//! assignment before bare identifier). Whitespace and `#` comments produce
//! no token; a newline produces a `Semicolon` token.

use lazy_static::lazy_static;
use regex_lite::Regex;

/// Token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    String,
    Number,
    /// `$name`, `${name}`, `$1`, `$#`, `$?`, `$@`
    Variable,
    /// `$(( expr ))`
    Arithmetic,
    /// `name=value`
    Assignment,
    /// `==`, `!=`, `>=`, `<=`
    Operator,
    Pipe,
    Semicolon,
    DoubleSemicolon,
    /// `(`, `)`, `[`, `]`
    Bracket,
    FunctionStart,
    FunctionEnd,
    /// `>`, `>>`, `<`
    Redirection,
    Unknown,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::String => "string",
            Self::Number => "number",
            Self::Variable => "variable",
            Self::Arithmetic => "arithmetic",
            Self::Assignment => "assignment",
            Self::Operator => "operator",
            Self::Pipe => "pipe",
            Self::Semicolon => "semicolon",
            Self::DoubleSemicolon => "double-semicolon",
            Self::Bracket => "bracket",
            Self::FunctionStart => "function-start",
            Self::FunctionEnd => "function-end",
            Self::Redirection => "redirection",
            Self::Unknown => "unknown",
        }
    }
}

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Display value. Strings carry their content without quotes, variables
    /// carry `$name`, assignments carry the assigned value.
    pub value: String,
    /// Extracted name for variable references and assignments
    pub name: Option<String>,
    /// Quote character for string literals and quoted assignment values
    pub quote: Option<char>,
    /// Source text the token was read from
    pub raw: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            kind,
            raw: value.clone(),
            value,
            name: None,
            quote: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_quote(mut self, quote: Option<char>) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Check for a reserved word
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == word
    }

    /// Check for a specific bracket character
    pub fn is_bracket(&self, bracket: &str) -> bool {
        self.kind == TokenKind::Bracket && self.value == bracket
    }

    /// Single-quoted text is never expanded
    pub fn is_single_quoted(&self) -> bool {
        self.quote == Some('\'')
    }

    /// Tokens that can stand as a plain value (command word, loop value, case pattern)
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Variable
                | TokenKind::Arithmetic
                | TokenKind::Keyword
        )
    }
}

/// Reserved words, tried in order before the rule table
pub const KEYWORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "in", "do", "done", "while", "case", "esac",
    "function", "set", "exit", "echo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Skip,
    Newline,
    Emit(TokenKind),
    Variable,
    DoubleQuoted,
    SingleQuoted,
    Assignment,
    Number,
}

lazy_static! {
    static ref RULES: Vec<(Regex, Rule)> = {
        let table: &[(&str, Rule)] = &[
            (r"^[ \t\r]+", Rule::Skip),
            (r"^\\\n", Rule::Skip),
            (r"^\n", Rule::Newline),
            (r"^#[^\n]*", Rule::Skip),
            (r"^(?:==|!=|>=|<=)", Rule::Emit(TokenKind::Operator)),
            (r"^>>", Rule::Emit(TokenKind::Redirection)),
            (r"^[<>]", Rule::Emit(TokenKind::Redirection)),
            (r"^\|", Rule::Emit(TokenKind::Pipe)),
            (r"^;;", Rule::Emit(TokenKind::DoubleSemicolon)),
            (r"^;", Rule::Emit(TokenKind::Semicolon)),
            (r"^\$\(\((?:[^()]|\([^()]*\))*\)\)", Rule::Emit(TokenKind::Arithmetic)),
            (r"^\$\{([A-Za-z_][A-Za-z0-9_]*)\}", Rule::Variable),
            (r"^\$([A-Za-z_][A-Za-z0-9_]*|[0-9]+|[#?@])", Rule::Variable),
            (r#"^"((?:[^"\\]|\\.)*)""#, Rule::DoubleQuoted),
            (r"^'([^']*)'", Rule::SingleQuoted),
            (r"^\{", Rule::Emit(TokenKind::FunctionStart)),
            (r"^\}", Rule::Emit(TokenKind::FunctionEnd)),
            (r"^[()\[\]]", Rule::Emit(TokenKind::Bracket)),
            (
                r#"^([A-Za-z_][A-Za-z0-9_]*)=("(?:[^"\\]|\\.)*"|'[^']*'|\$\(\((?:[^()]|\([^()]*\))*\)\)|[^\s;|<>()\{\}]*)"#,
                Rule::Assignment,
            ),
            (r"^[0-9]+(?:\.[0-9]+)?", Rule::Number),
            (
                r"^(?:[A-Za-z0-9_\-./~:@%+*?^]|\$\{[A-Za-z_][A-Za-z0-9_]*\}|\$(?:[A-Za-z_][A-Za-z0-9_]*|[0-9]+|[#?@]))+",
                Rule::Emit(TokenKind::Identifier),
            ),
        ];
        table
            .iter()
            .map(|(pattern, rule)| (Regex::new(pattern).expect("invalid lexer rule"), *rule))
            .collect()
    };
}

/// Characters that continue an identifier
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '~' | ':' | '@' | '%' | '+' | '*' | '?' | '^')
}

/// Undo backslash escapes that only matter inside double quotes
fn unescape_double_quoted(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('"') | Some('\\') => {
                    if let Some(next) = chars.next() {
                        result.push(next);
                    }
                    continue;
                }
                _ => {}
            }
        }
        result.push(c);
    }
    result
}

/// Strip matching quotes from an assignment value
fn unquote_value(value: &str) -> (String, Option<char>) {
    let bytes = value.as_bytes();
    if value.len() >= 2 {
        let first = bytes[0];
        let last = bytes[value.len() - 1];
        if first == b'"' && last == b'"' {
            return (unescape_double_quoted(&value[1..value.len() - 1]), Some('"'));
        }
        if first == b'\'' && last == b'\'' {
            return (value[1..value.len() - 1].to_string(), Some('\''));
        }
    }
    (value.to_string(), None)
}

/// Lexer over a single input text
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.input.len() {
            if self.read_keyword() {
                continue;
            }
            if self.read_rule() {
                continue;
            }
            self.read_unknown();
        }
        tracing::debug!(count = self.tokens.len(), "tokenized input");
        tracing::trace!(tokens = ?self.tokens, "token stream");
        self.tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn read_keyword(&mut self) -> bool {
        let rest = self.rest();
        for keyword in KEYWORDS {
            if !rest.starts_with(keyword) {
                continue;
            }
            let boundary = rest[keyword.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_identifier_char(c) && c != '=');
            if boundary {
                self.tokens.push(Token::new(TokenKind::Keyword, *keyword));
                self.pos += keyword.len();
                return true;
            }
        }
        false
    }

    fn read_rule(&mut self) -> bool {
        let rest = self.rest();
        for (regex, rule) in RULES.iter() {
            let Some(caps) = regex.captures(rest) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let text = whole.as_str();
            if text.is_empty() {
                continue;
            }
            let token = match rule {
                Rule::Skip => None,
                Rule::Newline => Some(Token::new(TokenKind::Semicolon, ";").with_raw("\n")),
                Rule::Emit(kind) => Some(Token::new(*kind, text)),
                Rule::Number => {
                    // 12abc is an identifier, not a number followed by text
                    if rest[text.len()..].chars().next().map_or(false, is_identifier_char) {
                        continue;
                    }
                    Some(Token::new(TokenKind::Number, text))
                }
                Rule::Variable => {
                    // $name.txt is one word with an embedded reference
                    if rest[text.len()..].chars().next().map_or(false, is_identifier_char) {
                        continue;
                    }
                    let name = caps.get(1).map_or("", |m| m.as_str());
                    Some(
                        Token::new(TokenKind::Variable, format!("${}", name))
                            .with_name(name)
                            .with_raw(text),
                    )
                }
                Rule::DoubleQuoted => {
                    let content = caps.get(1).map_or("", |m| m.as_str());
                    Some(
                        Token::new(TokenKind::String, unescape_double_quoted(content))
                            .with_quote(Some('"'))
                            .with_raw(text),
                    )
                }
                Rule::SingleQuoted => {
                    let content = caps.get(1).map_or("", |m| m.as_str());
                    Some(
                        Token::new(TokenKind::String, content)
                            .with_quote(Some('\''))
                            .with_raw(text),
                    )
                }
                Rule::Assignment => {
                    let name = caps.get(1).map_or("", |m| m.as_str());
                    let (value, quote) = unquote_value(caps.get(2).map_or("", |m| m.as_str()));
                    Some(
                        Token::new(TokenKind::Assignment, value)
                            .with_name(name)
                            .with_quote(quote)
                            .with_raw(text),
                    )
                }
            };
            if let Some(token) = token {
                self.tokens.push(token);
            }
            self.pos += text.len();
            return true;
        }
        false
    }

    fn read_unknown(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.tokens.push(Token::new(TokenKind::Unknown, c.to_string()));
            self.pos += c.len_utf8();
        }
    }
}

/// Tokenize command text
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_assignment() {
        let tokens = tokenize("a=10");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Assignment);
        assert_eq!(tokens[0].name.as_deref(), Some("a"));
        assert_eq!(tokens[0].value, "10");
        assert_eq!(tokens[0].raw, "a=10");
    }

    #[test]
    fn test_quoted_assignment() {
        let tokens = tokenize("name='x y'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "x y");
        assert!(tokens[0].is_single_quoted());
    }

    #[test]
    fn test_arithmetic_assignment() {
        let tokens = tokenize("i=$((i+1))");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "$((i+1))");
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        let tokens = tokenize("if iffy done.txt fi");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Keyword, TokenKind::Identifier, TokenKind::Identifier, TokenKind::Keyword]
        );
        assert_eq!(tokens[1].value, "iffy");
        assert_eq!(tokens[2].value, "done.txt");
    }

    #[test]
    fn test_strings_drop_quotes() {
        let tokens = tokenize(r#"echo "hello world" 'single $x'"#);
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].value, "hello world");
        assert_eq!(tokens[1].raw, "\"hello world\"");
        assert_eq!(tokens[2].value, "single $x");
        assert!(tokens[2].is_single_quoted());
    }

    #[test]
    fn test_variable_name_extracted() {
        let tokens = tokenize("echo $foo ${bar} $1 $#");
        assert_eq!(tokens[1].kind, TokenKind::Variable);
        assert_eq!(tokens[1].value, "$foo");
        assert_eq!(tokens[1].name.as_deref(), Some("foo"));
        assert_eq!(tokens[2].name.as_deref(), Some("bar"));
        assert_eq!(tokens[3].name.as_deref(), Some("1"));
        assert_eq!(tokens[4].name.as_deref(), Some("#"));
    }

    #[test]
    fn test_embedded_reference_stays_one_word() {
        let tokens = tokenize("cat file_${a}.txt $b.log $c");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].value, "file_${a}.txt");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].value, "$b.log");
        assert_eq!(tokens[3].kind, TokenKind::Variable);
    }

    #[test]
    fn test_double_semicolon_before_semicolon() {
        let tokens = tokenize("a) echo a;; b;");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::DoubleSemicolon));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Semicolon));
    }

    #[test]
    fn test_operators_before_redirection() {
        let tokens = tokenize("a >= b > c >> d == e");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[3].kind, TokenKind::Redirection);
        assert_eq!(tokens[5].kind, TokenKind::Redirection);
        assert_eq!(tokens[5].value, ">>");
        assert_eq!(tokens[7].kind, TokenKind::Operator);
    }

    #[test]
    fn test_comments_and_whitespace_dropped() {
        let tokens = tokenize("echo hi   # trailing comment");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_newline_is_separator() {
        let tokens = tokenize("echo a\necho b");
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
        assert_eq!(tokens[2].raw, "\n");
    }

    #[test]
    fn test_unknown_characters() {
        let tokens = tokenize("a , b & é");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].value, ",");
        assert_eq!(tokens[3].kind, TokenKind::Unknown);
        assert_eq!(tokens[4].value, "é");
    }

    #[test]
    fn test_function_tokens() {
        let tokens = tokenize(r#"function greet(){ echo "hi, $1 !"}"#);
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Bracket,
                TokenKind::Bracket,
                TokenKind::FunctionStart,
                TokenKind::Keyword,
                TokenKind::String,
                TokenKind::FunctionEnd,
            ]
        );
    }

    #[test]
    fn test_numbers_and_identifiers() {
        let tokens = tokenize("10 -lt 3.5 12abc");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_test_brackets() {
        let tokens = tokenize("[ $a -eq 10 ]");
        assert!(tokens[0].is_bracket("["));
        assert!(tokens[4].is_bracket("]"));
    }
}
