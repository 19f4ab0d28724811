//! Recursive Descent Parser
//!
//! Consumes the lexer's token stream and produces a `Program`.
//!
//! Grammar (informal):
//!   program   ::= (statement (';' | NEWLINE)*)*
//!   statement ::= funcdef | if | for | while | case | expr | assign | command
//!   if        ::= 'if' cond ';'? 'then' block ('elif' ... | 'else' block)? 'fi'
//!   while     ::= 'while' cond ';'? 'do' block 'done'
//!   for       ::= 'for' VAR 'in' value* ';'? 'do' block 'done'
//!   case      ::= 'case' value 'in' ('('? pattern ('|' pattern)* ')' block ';;'?)* 'esac'
//!   cond      ::= command | '[' arg* ']'
//!   funcdef   ::= ('function' NAME | NAME) '(' ')' '{' body-text '}'
//!   command   ::= NAME arg* ('|' NAME arg*)*
//!
//! Blocks are bounded by `MAX_BLOCK_ITERATIONS`; a block that keeps going
//! past it is rejected rather than parsed. Compound statements may nest at
//! most `MAX_NESTING_DEPTH` deep.

use std::collections::HashSet;

use crate::ast::types::{
    AssignmentNode, CaseClause, CaseNode, CommandNode, ComparisonOp, ExpressionNode, ForNode,
    FunctionCallNode, FunctionDefinitionNode, IfNode, Program, Statement, WhileNode,
};
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::types::{
    ParseException, MAX_BLOCK_ITERATIONS, MAX_INPUT_SIZE, MAX_NESTING_DEPTH, MAX_TOKENS,
};

/// Keywords and separators that end a flat command
const COMMAND_TERMINATORS: &[&str] = &["then", "do", "done", "fi", "esac", "else", "elif"];

/// Recursive descent parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Compound statements currently open
    depth: usize,
    /// Names that parse as `FunctionCall` instead of `Command`
    functions: HashSet<String>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            tokens: Vec::new(),
            pos: 0,
            depth: 0,
            functions: HashSet::new(),
        }
    }

    /// Parser that already knows some function names (e.g. from the session)
    pub fn with_functions<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parser {
            tokens: Vec::new(),
            pos: 0,
            depth: 0,
            functions: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse command text
    pub fn parse(&mut self, input: &str) -> Result<Program, ParseException> {
        if input.len() > MAX_INPUT_SIZE {
            return Err(ParseException::new(
                format!("Input too large: {} bytes exceeds limit of {}", input.len(), MAX_INPUT_SIZE),
                0,
            ));
        }
        let tokens = Lexer::new(input).tokenize();
        self.parse_tokens(tokens)
    }

    /// Parse from pre-tokenized input
    pub fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<Program, ParseException> {
        if tokens.len() > MAX_TOKENS {
            return Err(ParseException::new(
                format!("Too many tokens: {} exceeds limit of {}", tokens.len(), MAX_TOKENS),
                0,
            ));
        }
        self.tokens = tokens;
        self.pos = 0;
        self.depth = 0;

        let program = self.parse_program()?;
        tracing::debug!(statements = program.body.len(), "parsed program");
        Ok(program)
    }

    // ===========================================================================
    // HELPER METHODS
    // ===========================================================================

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check_keyword(&self, word: &str) -> bool {
        self.peek(0).map_or(false, |t| t.is_keyword(word))
    }

    fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek(0).map_or(false, |t| t.kind == kind)
    }

    fn check_bracket(&self, bracket: &str) -> bool {
        self.peek(0).map_or(false, |t| t.is_bracket(bracket))
    }

    fn expect_keyword(&mut self, word: &str) -> Result<Token, ParseException> {
        if self.check_keyword(word) {
            return self.advance().ok_or_else(|| ParseException::expected(&format!("`{}'", word), self.pos));
        }
        Err(self.error_here(&format!("`{}'", word)))
    }

    fn expect_bracket(&mut self, bracket: &str) -> Result<Token, ParseException> {
        if self.check_bracket(bracket) {
            return self.advance().ok_or_else(|| ParseException::expected(&format!("`{}'", bracket), self.pos));
        }
        Err(self.error_here(&format!("`{}'", bracket)))
    }

    /// Error for the current position: unexpected token, or premature end
    fn error_here(&self, expected: &str) -> ParseException {
        match self.peek(0) {
            Some(token) => ParseException::with_token(
                format!("syntax error: expected {} but found `{}'", expected, token.value),
                self.pos,
                token.clone(),
            ),
            None => ParseException::expected(expected, self.pos),
        }
    }

    /// Open one more compound statement, failing past `MAX_NESTING_DEPTH`
    fn enter_nested(&mut self) -> Result<(), ParseException> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseException::new(
                format!("syntax error: maximum nesting depth ({}) exceeded", MAX_NESTING_DEPTH),
                self.pos,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn skip_separators(&mut self) {
        while self.check_kind(TokenKind::Semicolon) {
            self.pos += 1;
        }
    }

    fn is_terminator(token: &Token) -> bool {
        match token.kind {
            TokenKind::Semicolon | TokenKind::DoubleSemicolon => true,
            TokenKind::Keyword => COMMAND_TERMINATORS.contains(&token.value.as_str()),
            _ => false,
        }
    }

    /// Terminators that may not begin a statement
    fn is_stray(token: &Token) -> bool {
        token.kind == TokenKind::DoubleSemicolon
            || token.is_keyword("in")
            || (token.kind == TokenKind::Keyword && COMMAND_TERMINATORS.contains(&token.value.as_str()))
    }

    fn matches_end(token: &Token, word: &str) -> bool {
        if word == ";;" {
            token.kind == TokenKind::DoubleSemicolon
        } else {
            token.is_keyword(word)
        }
    }

    // ===========================================================================
    // PROGRAM & BLOCKS
    // ===========================================================================

    fn parse_program(&mut self) -> Result<Program, ParseException> {
        let mut body = Vec::new();
        loop {
            self.skip_separators();
            if self.peek(0).is_none() {
                break;
            }
            body.push(self.parse_statement()?);
        }
        Ok(Program::new(body))
    }

    /// Parse statements until one of `ends` (left unconsumed). The last entry
    /// of `ends` names the construct's closing word for error messages.
    fn parse_block(&mut self, ends: &[&str]) -> Result<Vec<Statement>, ParseException> {
        let closer = ends.last().copied().unwrap_or("end of block");
        let mut body = Vec::new();
        let mut iterations = 0;

        loop {
            let Some(token) = self.peek(0) else {
                return Err(ParseException::expected(&format!("`{}'", closer), self.pos));
            };
            if ends.iter().any(|end| Self::matches_end(token, end)) {
                break;
            }

            iterations += 1;
            if iterations > MAX_BLOCK_ITERATIONS {
                return Err(ParseException::new(
                    format!(
                        "syntax error: block exceeds {} items before `{}' (possible infinite loop)",
                        MAX_BLOCK_ITERATIONS, closer
                    ),
                    self.pos,
                ));
            }

            if token.kind == TokenKind::Semicolon {
                self.pos += 1;
                continue;
            }
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    // ===========================================================================
    // STATEMENTS
    // ===========================================================================

    pub fn parse_statement(&mut self) -> Result<Statement, ParseException> {
        let Some(token) = self.peek(0) else {
            return Err(ParseException::expected("a statement", self.pos));
        };
        if Self::is_stray(token) {
            return Err(ParseException::unexpected(self.pos, token));
        }

        let kind = token.kind;
        let leading = token.value.clone();

        if kind == TokenKind::Keyword {
            if leading == "function" {
                return self.parse_function_definition();
            }
            if matches!(leading.as_str(), "if" | "for" | "while" | "case") {
                self.enter_nested()?;
                let statement = match leading.as_str() {
                    "if" => self.parse_if(),
                    "for" => self.parse_for(),
                    "while" => self.parse_while(),
                    _ => self.parse_case(),
                };
                self.depth -= 1;
                return statement;
            }
        }

        // name() { ... }
        if kind == TokenKind::Identifier && self.peek(1).map_or(false, |t| t.is_bracket("(")) {
            return self.parse_function_definition();
        }

        if self.is_expression_start() {
            return self.parse_expression();
        }

        self.parse_simple_statement()
    }

    /// `value op value` where op is a comparison operator
    fn is_expression_start(&self) -> bool {
        let Some(left) = self.peek(0) else {
            return false;
        };
        if !matches!(
            left.kind,
            TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Variable
        ) {
            return false;
        }
        match self.peek(1) {
            Some(op) => {
                matches!(op.kind, TokenKind::Operator | TokenKind::Redirection)
                    && ComparisonOp::parse(&op.value).is_some()
            }
            None => false,
        }
    }

    fn parse_expression(&mut self) -> Result<Statement, ParseException> {
        let left = self.advance().ok_or_else(|| ParseException::expected("an operand", self.pos))?;
        let op_token = self.advance().ok_or_else(|| ParseException::expected("an operator", self.pos))?;
        let operator = ComparisonOp::parse(&op_token.value)
            .ok_or_else(|| ParseException::unexpected(self.pos - 1, &op_token))?;
        let right = match self.peek(0) {
            Some(t) if t.is_value() => self.advance().ok_or_else(|| ParseException::expected("an operand", self.pos))?,
            _ => return Err(self.error_here(&format!("an operand after `{}'", operator))),
        };
        Ok(Statement::Expression(ExpressionNode { left, operator, right }))
    }

    /// Command, or a lone assignment, or a call to a known function
    fn parse_simple_statement(&mut self) -> Result<Statement, ParseException> {
        let command = self.parse_command()?;

        if command.args.is_empty() && command.name.kind == TokenKind::Assignment {
            let id = command.name.name.clone().unwrap_or_default();
            return Ok(Statement::Assignment(AssignmentNode { id, value: command.name }));
        }

        if command.name.kind == TokenKind::Identifier
            && self.functions.contains(&command.name.value)
            && !command.has_pipe()
        {
            return Ok(Statement::FunctionCall(FunctionCallNode {
                name: command.name.value,
                args: command.args,
            }));
        }

        Ok(Statement::Command(command))
    }

    /// Flat token run up to a statement terminator
    fn parse_command(&mut self) -> Result<CommandNode, ParseException> {
        let mut tokens = Vec::new();
        while let Some(token) = self.peek(0) {
            if Self::is_terminator(token) {
                break;
            }
            tokens.push(token.clone());
            self.pos += 1;
        }

        let mut tokens = tokens.into_iter();
        match tokens.next() {
            Some(name) => Ok(CommandNode::new(name, tokens.collect())),
            None => Err(self.error_here("a command")),
        }
    }

    /// Condition of `if`/`while`: a command, or `[ args ]` rewritten to `test`
    fn parse_condition(&mut self) -> Result<CommandNode, ParseException> {
        if !self.check_bracket("[") {
            return self.parse_command();
        }

        let open = self.pos;
        self.pos += 1;
        let mut args = Vec::new();
        loop {
            match self.advance() {
                Some(token) if token.is_bracket("]") => break,
                Some(token) if token.kind == TokenKind::Semicolon => continue,
                Some(token) => args.push(token),
                None => {
                    return Err(ParseException::new(
                        "syntax error: expected `]' to close condition",
                        open,
                    ))
                }
            }
        }
        Ok(CommandNode::new(Token::new(TokenKind::Identifier, "test"), args))
    }

    // ===========================================================================
    // COMPOUND STATEMENTS
    // ===========================================================================

    fn parse_if(&mut self) -> Result<Statement, ParseException> {
        self.expect_keyword("if")?;
        let node = self.parse_if_clause()?;
        self.expect_keyword("fi")?;
        Ok(Statement::If(node))
    }

    /// Condition, `then` block and optional `elif`/`else`; the shared `fi` is
    /// left for the caller
    fn parse_if_clause(&mut self) -> Result<IfNode, ParseException> {
        let test = self.parse_condition()?;
        self.skip_separators();
        self.expect_keyword("then")?;
        let consequent = self.parse_block(&["else", "elif", "fi"])?;

        let alternate = if self.check_keyword("elif") {
            self.pos += 1;
            self.enter_nested()?;
            let nested = self.parse_if_clause();
            self.depth -= 1;
            Some(vec![Statement::If(nested?)])
        } else if self.check_keyword("else") {
            self.pos += 1;
            Some(self.parse_block(&["fi"])?)
        } else {
            None
        };

        Ok(IfNode { test, consequent, alternate })
    }

    fn parse_for(&mut self) -> Result<Statement, ParseException> {
        self.expect_keyword("for")?;

        let var = match self.peek(0) {
            Some(t) if t.kind == TokenKind::Variable => t.name.clone().unwrap_or_default(),
            Some(t) if t.kind == TokenKind::Identifier => t.value.trim_start_matches('$').to_string(),
            _ => return Err(self.error_here("a variable name after `for'")),
        };
        self.pos += 1;

        self.skip_separators();
        self.expect_keyword("in")?;

        let mut values = Vec::new();
        loop {
            match self.peek(0) {
                None => return Err(ParseException::expected("`do'", self.pos)),
                Some(t) if t.is_keyword("do") => break,
                Some(t) if t.kind == TokenKind::Semicolon => self.pos += 1,
                Some(t)
                    if matches!(
                        t.kind,
                        TokenKind::Identifier
                            | TokenKind::Number
                            | TokenKind::String
                            | TokenKind::Variable
                            | TokenKind::Arithmetic
                    ) =>
                {
                    values.push(t.clone());
                    self.pos += 1;
                }
                Some(t) => return Err(ParseException::unexpected(self.pos, t)),
            }
        }

        self.expect_keyword("do")?;
        let body = self.parse_block(&["done"])?;
        self.expect_keyword("done")?;

        Ok(Statement::For(ForNode { var, values, body }))
    }

    fn parse_while(&mut self) -> Result<Statement, ParseException> {
        self.expect_keyword("while")?;
        let test = self.parse_condition()?;
        self.skip_separators();
        self.expect_keyword("do")?;
        let body = self.parse_block(&["done"])?;
        self.expect_keyword("done")?;

        Ok(Statement::While(WhileNode { test, body }))
    }

    fn parse_case(&mut self) -> Result<Statement, ParseException> {
        self.expect_keyword("case")?;

        let discriminant = match self.peek(0) {
            Some(t) if t.is_value() && !t.is_keyword("in") => t.clone(),
            _ => return Err(self.error_here("a word after `case'")),
        };
        self.pos += 1;

        self.skip_separators();
        self.expect_keyword("in")?;

        let mut cases = Vec::new();
        loop {
            self.skip_separators();
            if self.check_keyword("esac") {
                self.pos += 1;
                break;
            }
            if self.peek(0).is_none() {
                return Err(ParseException::expected("`esac'", self.pos));
            }

            if self.check_bracket("(") {
                self.pos += 1;
            }

            let mut patterns = Vec::new();
            loop {
                match self.peek(0) {
                    Some(t) if t.is_value() && !t.is_keyword("esac") => {
                        patterns.push(t.clone());
                        self.pos += 1;
                    }
                    _ => return Err(self.error_here("a case pattern")),
                }
                if self.check_kind(TokenKind::Pipe) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.expect_bracket(")")?;

            let body = self.parse_block(&[";;", "esac"])?;
            if self.check_kind(TokenKind::DoubleSemicolon) {
                self.pos += 1;
            }
            cases.push(CaseClause { patterns, body });
        }

        Ok(Statement::Case(CaseNode { discriminant, cases }))
    }

    // ===========================================================================
    // FUNCTIONS
    // ===========================================================================

    fn parse_function_definition(&mut self) -> Result<Statement, ParseException> {
        if self.check_keyword("function") {
            self.pos += 1;
        }

        let name = match self.peek(0) {
            Some(t) if t.kind == TokenKind::Identifier => t.value.clone(),
            _ => return Err(self.error_here("a function name")),
        };
        self.pos += 1;

        if self.check_bracket("(") {
            self.pos += 1;
            self.expect_bracket(")")?;
        }
        self.skip_separators();

        if !self.check_kind(TokenKind::FunctionStart) {
            return Err(self.error_here("`{' to open function body"));
        }
        self.pos += 1;

        // Body is kept as text; nested braces stay in it
        let mut depth = 1;
        let mut parts: Vec<String> = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(ParseException::expected("`}' to close function body", self.pos));
            };
            match token.kind {
                TokenKind::FunctionStart => depth += 1,
                TokenKind::FunctionEnd => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            if token.kind == TokenKind::Semicolon {
                parts.push(";".to_string());
            } else {
                parts.push(token.raw);
            }
        }

        self.functions.insert(name.clone());
        Ok(Statement::FunctionDefinition(FunctionDefinitionNode {
            name,
            body: parts.join(" ").trim().to_string(),
        }))
    }
}

/// Parse command text into a program
pub fn parse(input: &str) -> Result<Program, ParseException> {
    Parser::new().parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Program {
        match parse(input) {
            Ok(program) => program,
            Err(e) => panic!("parse failed for {:?}: {}", input, e),
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_ok("").is_empty());
        assert!(parse_ok(" ; ;\n").is_empty());
    }

    #[test]
    fn test_parse_simple_command() {
        let program = parse_ok("echo hello world");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::Command(cmd) => {
                assert_eq!(cmd.name.value, "echo");
                assert_eq!(cmd.args.len(), 2);
            }
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_pipeline_stays_one_command() {
        let program = parse_ok("echo hello | grep h");
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::Command(cmd) => assert!(cmd.has_pipe()),
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_assignment() {
        let program = parse_ok("a=10; b=\"x y\"");
        assert_eq!(program.body.len(), 2);
        match &program.body[1] {
            Statement::Assignment(node) => {
                assert_eq!(node.id, "b");
                assert_eq!(node.value.value, "x y");
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_with_bracket_test() {
        let program = parse_ok("if [ $a -eq 10 ]; then echo yes; else echo no; fi");
        match &program.body[0] {
            Statement::If(node) => {
                assert_eq!(node.test.name.value, "test");
                assert_eq!(node.test.args.len(), 3);
                assert_eq!(node.consequent.len(), 1);
                assert_eq!(node.alternate.as_ref().map(|b| b.len()), Some(1));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_elif_nests() {
        let program = parse_ok("if false; then echo a; elif true; then echo b; else echo c; fi");
        let Statement::If(outer) = &program.body[0] else {
            panic!("expected if");
        };
        let alternate = outer.alternate.as_ref().expect("alternate");
        match &alternate[0] {
            Statement::If(inner) => {
                assert_eq!(inner.test.name.value, "true");
                assert!(inner.alternate.is_some());
            }
            other => panic!("expected nested if, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_missing_fi_fails() {
        let err = parse("if true; then echo a").unwrap_err();
        assert!(err.message.contains("fi"), "message: {}", err.message);
    }

    #[test]
    fn test_parse_if_missing_then_fails() {
        assert!(parse("if true; echo a; fi").is_err());
    }

    #[test]
    fn test_parse_unclosed_bracket_fails() {
        let err = parse("if [ 1 -eq 1; then echo a; fi").unwrap_err();
        assert!(err.message.contains("]"));
    }

    #[test]
    fn test_parse_for() {
        let program = parse_ok("for i in 1 2 3; do echo $i; done");
        match &program.body[0] {
            Statement::For(node) => {
                assert_eq!(node.var, "i");
                assert_eq!(node.values.len(), 3);
                assert_eq!(node.body.len(), 1);
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_for_dollar_variable() {
        let program = parse_ok("for $x in a b; do echo $x; done");
        let Statement::For(node) = &program.body[0] else {
            panic!("expected for");
        };
        assert_eq!(node.var, "x");
    }

    #[test]
    fn test_parse_for_missing_done_fails() {
        assert!(parse("for i in 1 2; do echo $i").is_err());
    }

    #[test]
    fn test_parse_while_multiline() {
        let program = parse_ok("i=0\nwhile [ $i -lt 3 ]\ndo\n  echo $i\n  i=$((i+1))\ndone");
        assert_eq!(program.body.len(), 2);
        match &program.body[1] {
            Statement::While(node) => assert_eq!(node.body.len(), 2),
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_case() {
        let program = parse_ok("case $x in a) echo A;; (b|c) echo BC;; *) echo other esac");
        match &program.body[0] {
            Statement::Case(node) => {
                assert_eq!(node.discriminant.value, "$x");
                assert_eq!(node.cases.len(), 3);
                assert_eq!(node.cases[1].patterns.len(), 2);
                assert_eq!(node.cases[2].patterns[0].value, "*");
            }
            other => panic!("expected case, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_case_missing_esac_fails() {
        assert!(parse("case a in a) echo A;;").is_err());
    }

    #[test]
    fn test_parse_function_definition_keeps_body_text() {
        let program = parse_ok(r#"function greet(){ echo "hi, $1 !"}; greet world"#);
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Statement::FunctionDefinition(def) => {
                assert_eq!(def.name, "greet");
                assert_eq!(def.body, r#"echo "hi, $1 !""#);
            }
            other => panic!("expected function definition, got {:?}", other),
        }
        match &program.body[1] {
            Statement::FunctionCall(call) => {
                assert_eq!(call.name, "greet");
                assert_eq!(call.args[0].value, "world");
            }
            other => panic!("expected function call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bare_function_with_nested_braces() {
        let program = parse_ok("f() { if true; then echo {x}; fi }");
        let Statement::FunctionDefinition(def) = &program.body[0] else {
            panic!("expected function definition");
        };
        assert_eq!(def.name, "f");
        assert_eq!(def.body, "if true ; then echo { x } ; fi");
    }

    #[test]
    fn test_parse_unclosed_function_fails() {
        assert!(parse("f() { echo a").is_err());
    }

    #[test]
    fn test_parse_known_function_call() {
        let mut parser = Parser::with_functions(["greet"]);
        let program = parser.parse("greet a b").unwrap();
        assert!(matches!(program.body[0], Statement::FunctionCall(_)));
    }

    #[test]
    fn test_parse_expression_statement() {
        let program = parse_ok("$a == 10; 3 >= 2; x > y");
        assert_eq!(program.body.len(), 3);
        match &program.body[0] {
            Statement::Expression(expr) => {
                assert_eq!(expr.left.value, "$a");
                assert_eq!(expr.operator, ComparisonOp::Eq);
                assert_eq!(expr.right.value, "10");
            }
            other => panic!("expected expression, got {:?}", other),
        }
        assert!(matches!(&program.body[2], Statement::Expression(e) if e.operator == ComparisonOp::Gt));
    }

    #[test]
    fn test_parse_command_with_comparison_args_is_not_expression() {
        let program = parse_ok("test a == b");
        assert!(matches!(program.body[0], Statement::Command(_)));
    }

    #[test]
    fn test_parse_stray_terminator_fails() {
        assert!(parse("fi").is_err());
        assert!(parse("echo a; done").is_err());
        assert!(parse(";;").is_err());
    }

    #[test]
    fn test_parse_block_iteration_cap() {
        let body = "echo x;".repeat(60);
        let err = parse(&format!("if true; then {} fi", body)).unwrap_err();
        assert!(err.message.contains("block exceeds"));
        assert!(parse(&format!("if true; then {} fi", "echo x;".repeat(10))).is_ok());
    }

    #[test]
    fn test_parse_nesting_depth_limit() {
        let nested = |n: usize| format!("{}echo x{}", "if true; then ".repeat(n), "; fi".repeat(n));
        assert!(parse(&nested(MAX_NESTING_DEPTH)).is_ok());

        let err = parse(&nested(300)).unwrap_err();
        assert!(err.message.contains("maximum nesting depth"), "message: {}", err.message);

        let loops = "while true; do ".repeat(MAX_NESTING_DEPTH + 1);
        assert!(parse(&format!("{}echo x{}", loops, "; done".repeat(MAX_NESTING_DEPTH + 1))).is_err());
    }

    #[test]
    fn test_parse_elif_chain_counts_as_nesting() {
        let chain = "elif false; then echo x; ".repeat(MAX_NESTING_DEPTH + 1);
        let err = parse(&format!("if false; then echo x; {}fi", chain)).unwrap_err();
        assert!(err.message.contains("maximum nesting depth"));
    }

    #[test]
    fn test_parser_is_reusable_after_nesting_error() {
        let mut parser = Parser::new();
        let deep = format!("{}echo x{}", "if true; then ".repeat(100), "; fi".repeat(100));
        assert!(parser.parse(&deep).is_err());
        assert!(parser.parse("if true; then echo ok; fi").is_ok());
    }

    #[test]
    fn test_parse_input_too_large() {
        let input = "a".repeat(MAX_INPUT_SIZE + 1);
        assert!(parse(&input).is_err());
    }
}
