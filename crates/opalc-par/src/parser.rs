//! The recursive-descent parser.

use opalc_lex::{Token, TokenKind};
use opalc_util::{DiagnosticBuilder, DiagnosticCode, FxHashSet, Handler, Span};
use thiserror::Error;

use crate::ast::{Ast, IfArm, Node, NodeId, NumberValue};

/// Fatal syntactic error. The driver turns this into a process abort.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found} ({span})")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        span: Span,
    },

    #[error("operator `{op}` has no left operand ({span})")]
    DanglingOperator { op: &'static str, span: Span },
}

/// Internal unwinding reasons. End-of-stream is caught at the top of
/// [`Parser::parse`]; fatal errors are returned to the caller.
enum Interrupt {
    EndOfStream,
    Fatal(ParseError),
}

impl From<ParseError> for Interrupt {
    fn from(e: ParseError) -> Self {
        Interrupt::Fatal(e)
    }
}

type PResult<T> = Result<T, Interrupt>;

/// Recursive-descent parser over a token vector.
pub struct Parser<'a> {
    /// Token stream, owned by the parser.
    tokens: Vec<Token>,

    /// Cursor index into `tokens`.
    index: usize,

    /// Unmatched `{` count; a code block ends when the depth returns to the
    /// value it had at the block's opening brace.
    scope_depth: usize,

    /// The arena under construction.
    ast: Ast,

    /// Every allocated node in allocation order. The infix-operator rule
    /// pops its left operand from the back of this list.
    flat: Vec<NodeId>,

    /// Struct names seen so far; lets a function header recognize a struct
    /// name as its return declaration.
    struct_names: FxHashSet<String>,

    /// Diagnostic sink for non-fatal parse messages.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            index: 0,
            scope_depth: 0,
            ast: Ast::new(),
            flat: Vec::new(),
            struct_names: FxHashSet::default(),
            handler,
        }
    }

    /// Parses the whole token stream into an [`Ast`].
    ///
    /// Running out of tokens mid-expression ends parsing and returns the
    /// roots accumulated so far; a malformed required shape is fatal.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        while self.index < self.tokens.len() {
            match self.expression() {
                Ok(Some(id)) => self.ast.push_root(id),
                Ok(None) => {}
                Err(Interrupt::EndOfStream) => break,
                Err(Interrupt::Fatal(e)) => return Err(e),
            }
        }
        Ok(self.ast)
    }

    // =========================================================================
    // CURSOR PRIMITIVES
    // =========================================================================

    fn current_tok(&self) -> PResult<Token> {
        self.tokens
            .get(self.index)
            .cloned()
            .ok_or(Interrupt::EndOfStream)
    }

    fn current_kind(&self) -> PResult<TokenKind> {
        self.tokens
            .get(self.index)
            .map(|t| t.kind)
            .ok_or(Interrupt::EndOfStream)
    }

    fn next_tok(&self, forward: usize) -> PResult<Token> {
        self.tokens
            .get(self.index + forward)
            .cloned()
            .ok_or(Interrupt::EndOfStream)
    }

    fn eat(&mut self) {
        self.index += 1;
    }

    /// Allocates a node and records it in the allocation-order list.
    fn alloc(&mut self, node: Node) -> NodeId {
        let id = self.ast.alloc(node);
        self.flat.push(id);
        id
    }

    fn unexpected(&self, expected: &'static str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: format!("{} `{}`", found.kind.name(), found.lexeme),
            span: found.span,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> PResult<Token> {
        let token = self.current_tok()?;
        if token.kind != kind {
            return Err(self.unexpected(expected, &token).into());
        }
        self.eat();
        Ok(token)
    }

    // =========================================================================
    // PRODUCTIONS
    // =========================================================================

    /// Central dispatch over the current token kind.
    ///
    /// Returns `Ok(None)` when the token has no production (reported as a
    /// non-fatal diagnostic and skipped).
    pub fn expression(&mut self) -> PResult<Option<NodeId>> {
        let token = self.current_tok()?;

        match token.kind {
            TokenKind::Identifier => self.identifier().map(Some),

            k if k.is_basic_type() => self.variable_decl().map(Some),

            TokenKind::Comment => {
                self.eat();
                self.expression()
            }

            TokenKind::KeywordReturn => {
                // A value follows only when the next token sits on the same
                // source line as the `return` keyword.
                let has_value = match self.next_tok(1) {
                    Ok(next) => next.span.line == token.span.line,
                    Err(_) => false,
                };
                self.eat();
                let value = if has_value { self.expression()? } else { None };
                Ok(Some(self.alloc(Node::Return { value })))
            }

            TokenKind::KeywordTrue | TokenKind::KeywordFalse => {
                self.eat();
                let name = if token.kind == TokenKind::KeywordTrue {
                    "1"
                } else {
                    "0"
                };
                Ok(Some(self.alloc(Node::Variable {
                    ty: "bool".to_string(),
                    name: name.to_string(),
                    init: None,
                    is_constant: true,
                })))
            }

            TokenKind::Equals
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::VerticalBar
            | TokenKind::Caret
            | TokenKind::Ampersand => self.binary_attach(&token),

            TokenKind::KeywordIf => self.parse_if().map(Some),

            TokenKind::KeywordExtern => {
                self.eat();
                self.expect(TokenKind::KeywordFn, "`fn` after `extern`")?;
                self.parse_function(true).map(Some)
            }

            TokenKind::KeywordFn => {
                self.eat();
                self.parse_function(false).map(Some)
            }

            TokenKind::KeywordStruct => self.parse_struct().map(Some),

            k if k.is_constant() => self.identifier().map(Some),

            _ => {
                DiagnosticBuilder::error(format!("undefined token type: {}", token.kind.name()))
                    .code(DiagnosticCode::E_PARSER_UNDEFINED_TOKEN)
                    .span(token.span)
                    .emit(self.handler);
                self.eat();
                Ok(None)
            }
        }
    }

    /// Post-fix infix attachment: the operator claims the most recently
    /// allocated node as its left operand.
    ///
    /// When that node is a `Return`, the binary wraps the return's value
    /// instead and is stored back, and the return re-enters the allocation
    /// list so later operators extend the same value.
    fn binary_attach(&mut self, op_token: &Token) -> PResult<Option<NodeId>> {
        let Some(left) = self.flat.pop() else {
            return Err(ParseError::DanglingOperator {
                op: op_token.kind.symbol(),
                span: op_token.span,
            }
            .into());
        };
        self.ast.pop_root_if(left);

        self.eat(); // operator
        let right = match self.expression()? {
            Some(id) => id,
            None => {
                let found = self.current_tok().unwrap_or_else(|_| op_token.clone());
                return Err(self.unexpected("expression after operator", &found).into());
            }
        };

        if let Node::Return { value: Some(v) } = self.ast.node(left) {
            let inner = *v;
            let bin = self.alloc(Node::Binary {
                op: op_token.kind,
                left: inner,
                right,
            });
            if let Node::Return { value } = self.ast.node_mut(left) {
                *value = Some(bin);
            }
            self.flat.push(left);
            Ok(Some(left))
        } else {
            Ok(Some(self.alloc(Node::Binary {
                op: op_token.kind,
                left,
                right,
            })))
        }
    }

    /// Identifier-or-literal: literals become `Number`/`StringLiteral`,
    /// `name(` becomes a call, `name =` a variable with initializer, and
    /// anything else a plain variable reference.
    fn identifier(&mut self) -> PResult<NodeId> {
        let current = self.current_tok()?;
        self.eat();

        if current.kind.is_constant() {
            return Ok(self.literal(&current));
        }

        match self.current_kind().ok() {
            Some(TokenKind::LParen) => {
                self.eat();
                let args = self.arguments_list(TokenKind::RParen)?;
                Ok(self.alloc(Node::Call {
                    callee: current.lexeme,
                    args,
                }))
            }
            Some(TokenKind::Equals) => {
                self.eat();
                let init = self.expression()?;
                Ok(self.alloc(Node::Variable {
                    ty: current.lexeme.clone(),
                    name: current.lexeme,
                    init,
                    is_constant: false,
                }))
            }
            _ => Ok(self.alloc(Node::Variable {
                ty: current.lexeme.clone(),
                name: current.lexeme,
                init: None,
                is_constant: false,
            })),
        }
    }

    /// Builds a literal node from an already-consumed token.
    fn literal(&mut self, token: &Token) -> NodeId {
        let node = match token.kind {
            TokenKind::Str => Node::StringLiteral {
                value: token.lexeme.clone(),
            },
            TokenKind::Float32 => Node::Number {
                value: NumberValue::F32(self.parse_number(token)),
            },
            TokenKind::Float64 => Node::Number {
                value: NumberValue::F64(self.parse_number(token)),
            },
            TokenKind::Integer32 => Node::Number {
                value: NumberValue::I32(self.parse_number(token)),
            },
            TokenKind::Integer64 => Node::Number {
                value: NumberValue::I64(self.parse_number(token)),
            },
            _ => unreachable!("literal() called on non-constant token"),
        };
        self.alloc(node)
    }

    /// Converts a numeric lexeme to a value, stripping the type suffix.
    ///
    /// Unsigned suffixes parse through the signed type of the same width;
    /// a literal that does not fit produces a diagnostic and a zero value.
    fn parse_number<T: std::str::FromStr + Default>(&mut self, token: &Token) -> T {
        let text = strip_number_suffix(&token.lexeme);
        match text.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                DiagnosticBuilder::error(format!("invalid numeric literal '{}'", token.lexeme))
                    .code(DiagnosticCode::E_PARSER_INVALID_NUMBER)
                    .span(token.span)
                    .emit(self.handler);
                T::default()
            }
        }
    }

    /// Variable declaration. Accepts both declaration shapes:
    /// `name : type` (formal parameters, struct fields) and
    /// `type name` (statements), the name being optional in the latter.
    /// Either shape may end with `= initializer`.
    fn variable_decl(&mut self) -> PResult<NodeId> {
        let first = self.current_tok()?;
        self.eat();

        let (ty, name) = if self.current_kind().ok() == Some(TokenKind::Colon) {
            self.eat();
            let ty_tok = self.current_tok()?;
            self.eat();
            (ty_tok.lexeme, first.lexeme)
        } else if self.current_kind().ok() == Some(TokenKind::Identifier) {
            let name_tok = self.current_tok()?;
            self.eat();
            (first.lexeme, name_tok.lexeme)
        } else {
            (first.lexeme, String::new())
        };

        let init = if self.current_kind().ok() == Some(TokenKind::Equals) {
            self.eat();
            self.expression()?
        } else {
            None
        };

        Ok(self.alloc(Node::Variable {
            ty,
            name,
            init,
            is_constant: false,
        }))
    }

    /// Comma-separated expressions; the caller has consumed the opening
    /// `(`, this consumes the closing terminator.
    fn arguments_list(&mut self, terminator: TokenKind) -> PResult<NodeId> {
        let mut args = Vec::new();

        while self.current_kind()? != terminator {
            if let Some(arg) = self.expression()? {
                args.push(arg);
            }

            let kind = self.current_kind()?;
            if kind == TokenKind::Comma {
                self.eat();
            } else if kind != terminator {
                let token = self.current_tok()?;
                return Err(self.unexpected("`,` or `)`", &token).into());
            }
        }
        self.eat(); // terminator

        Ok(self.alloc(Node::ArgumentList { args }))
    }

    /// Same structure as [`Parser::arguments_list`] but each element is a
    /// variable declaration; used for function formal parameters.
    fn arguments_definition_list(&mut self, terminator: TokenKind) -> PResult<NodeId> {
        let mut args = Vec::new();

        while self.current_kind()? != terminator {
            args.push(self.variable_decl()?);

            let kind = self.current_kind()?;
            if kind == TokenKind::Comma {
                self.eat();
            } else if kind != terminator {
                let token = self.current_tok()?;
                return Err(self.unexpected("`,` or `)`", &token).into());
            }
        }
        self.eat(); // terminator

        Ok(self.alloc(Node::ArgumentList { args }))
    }

    /// Braced expression sequence. The block ends when the scope depth
    /// returns to its entry value; a trailing `Return` is lifted off the
    /// body into the block's trailing return slot.
    fn code_block(&mut self) -> PResult<NodeId> {
        let entry_depth = self.scope_depth;
        self.expect(TokenKind::LCurly, "`{`")?;
        self.scope_depth += 1;

        let mut body = Vec::new();
        while self.scope_depth != entry_depth {
            if self.current_kind()? == TokenKind::RCurly {
                self.scope_depth -= 1;
                self.eat();
                continue;
            }

            if let Some(expr) = self.expression()? {
                self.absorb(&mut body, expr);
            }
        }

        let trailing_return = match body.last() {
            Some(&last) if self.ast.node(last).kind() == "Return" => body.pop(),
            _ => None,
        };

        Ok(self.alloc(Node::CodeBlock {
            body,
            trailing_return,
        }))
    }

    /// Appends an expression to a block body, accounting for the infix
    /// rule having consumed the previous entry: a binary whose left operand
    /// is the last body entry replaces it, and a node updated in place
    /// (return-value extension) is not pushed twice.
    fn absorb(&mut self, body: &mut Vec<NodeId>, expr: NodeId) {
        if let Some(&prev) = body.last() {
            if prev == expr {
                return;
            }
            if let Node::Binary { left, .. } = self.ast.node(expr) {
                if *left == prev {
                    body.pop();
                }
            }
        }
        body.push(expr);
    }

    /// `if` with a single condition/body arm; `else` is reserved.
    fn parse_if(&mut self) -> PResult<NodeId> {
        self.eat(); // if

        let condition = self.binary_condition()?;
        let body = self.code_block()?;

        Ok(self.alloc(Node::If {
            chain: vec![IfArm { condition, body }],
            else_body: None,
        }))
    }

    /// Condition of the shape `operand OP operand`, checked up front so a
    /// malformed condition fails before any node is built.
    fn binary_condition(&mut self) -> PResult<NodeId> {
        let first = self.current_tok()?;
        if first.kind != TokenKind::Identifier && !first.kind.is_constant() {
            return Err(self
                .unexpected("identifier or literal in condition", &first)
                .into());
        }
        let op_tok = self.next_tok(1)?;
        if !op_tok.kind.is_operator() {
            return Err(self.unexpected("operator in condition", &op_tok).into());
        }
        let second = self.next_tok(2)?;
        if second.kind != TokenKind::Identifier && !second.kind.is_constant() {
            return Err(self
                .unexpected("identifier or literal in condition", &second)
                .into());
        }

        let left = match self.expression()? {
            Some(id) => id,
            None => return Err(self.unexpected("condition operand", &first).into()),
        };
        let op = self.current_tok()?;
        self.eat();
        let right = match self.expression()? {
            Some(id) => id,
            None => return Err(self.unexpected("condition operand", &second).into()),
        };

        Ok(self.alloc(Node::Binary {
            op: op.kind,
            left,
            right,
        }))
    }

    /// Function definition or external declaration; `fn` is already
    /// consumed. A bare type name (basic type or known struct) after the
    /// parameter list is the return declaration, wrapped in a one-element
    /// argument list.
    fn parse_function(&mut self, is_external: bool) -> PResult<NodeId> {
        let name = self.expect(TokenKind::Identifier, "function name")?;

        self.expect(TokenKind::LParen, "`(`")?;
        let params = self.arguments_definition_list(TokenKind::RParen)?;

        let return_list = if self.at_type_name() {
            let decl = self.identifier()?;
            Some(self.alloc(Node::ArgumentList { args: vec![decl] }))
        } else {
            None
        };

        let signature = self.alloc(Node::FunctionSignature {
            name: name.lexeme,
            params,
            return_list,
            is_external,
        });

        if is_external {
            return Ok(self.alloc(Node::Function {
                signature,
                body: None,
            }));
        }

        let body = self.code_block()?;
        Ok(self.alloc(Node::Function {
            signature,
            body: Some(body),
        }))
    }

    /// True when the current token is a basic type keyword or an identifier
    /// naming a previously declared struct.
    fn at_type_name(&self) -> bool {
        match self.tokens.get(self.index) {
            Some(t) => {
                t.kind.is_basic_type()
                    || (t.kind == TokenKind::Identifier && self.struct_names.contains(&t.lexeme))
            }
            None => false,
        }
    }

    /// Struct declaration; the body parses as an ordinary code block and
    /// the name is registered so function headers can use it.
    fn parse_struct(&mut self) -> PResult<NodeId> {
        self.eat(); // struct
        let name = self.expect(TokenKind::Identifier, "struct name")?;
        let body = self.code_block()?;

        self.struct_names.insert(name.lexeme.clone());
        Ok(self.alloc(Node::Struct {
            name: name.lexeme,
            body,
        }))
    }
}

/// Strips a type suffix (`u8`..`u64`, `i8`..`i64`, `f32`, `f64`) from a
/// numeric lexeme, leaving the digits (and decimal point) to parse.
fn strip_number_suffix(lexeme: &str) -> &str {
    const SUFFIXES: &[&str] = &[
        "f32", "f64", "u16", "u32", "u64", "i16", "i32", "i64", "u8", "i8",
    ];
    for suffix in SUFFIXES {
        if let Some(stripped) = lexeme.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return stripped;
            }
        }
    }
    lexeme
}
