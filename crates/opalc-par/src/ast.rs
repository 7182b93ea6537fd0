//! AST node definitions and the arena that owns them.

use opalc_lex::TokenKind;

/// Stable handle to a node in the [`Ast`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A numeric literal value tagged with its concrete type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl NumberValue {
    /// Source spelling with a type suffix, so printed numbers re-lex to the
    /// same literal kind.
    pub fn source_form(&self) -> String {
        match self {
            NumberValue::I32(v) => format!("{}", v),
            NumberValue::I64(v) => format!("{}i64", v),
            NumberValue::F32(v) => format!("{}f32", v),
            NumberValue::F64(v) => format!("{}f64", v),
        }
    }
}

/// One `(condition, body)` entry of an `if` chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IfArm {
    pub condition: NodeId,
    pub body: NodeId,
}

/// AST node. Children are arena handles; nothing here owns another node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Numeric literal
    Number { value: NumberValue },

    /// String literal (content without quotes)
    StringLiteral { value: String },

    /// Variable declaration or use
    ///
    /// At use sites `ty` repeats the identifier; `is_constant` marks the
    /// synthesized `true`/`false` variables whose `name` holds "1"/"0".
    Variable {
        ty: String,
        name: String,
        init: Option<NodeId>,
        is_constant: bool,
    },

    /// Ordered expression sequence used for call arguments and formals
    ArgumentList { args: Vec<NodeId> },

    /// Infix operation
    Binary {
        op: TokenKind,
        left: NodeId,
        right: NodeId,
    },

    /// Function call
    Call { callee: String, args: NodeId },

    /// Return with an optional value
    Return { value: Option<NodeId> },

    /// Braced sequence of expressions; a trailing return is lifted out of
    /// the body into `trailing_return`
    CodeBlock {
        body: Vec<NodeId>,
        trailing_return: Option<NodeId>,
    },

    /// Function prototype: name, formals, optional one-element return list
    FunctionSignature {
        name: String,
        params: NodeId,
        return_list: Option<NodeId>,
        is_external: bool,
    },

    /// Function definition; `body` is absent exactly for external functions
    Function {
        signature: NodeId,
        body: Option<NodeId>,
    },

    /// `if` chain; only single-entry chains without else are emitted today
    If {
        chain: Vec<IfArm>,
        else_body: Option<NodeId>,
    },

    /// Struct declaration
    Struct { name: String, body: NodeId },
}

impl Node {
    /// Human-readable kind tag, used by dumps and the trailing-return check.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Number { .. } => "Number",
            Node::StringLiteral { .. } => "StringLiteral",
            Node::Variable { .. } => "Variable",
            Node::ArgumentList { .. } => "ArgumentList",
            Node::Binary { .. } => "Binary",
            Node::Call { .. } => "Call",
            Node::Return { .. } => "Return",
            Node::CodeBlock { .. } => "CodeBlock",
            Node::FunctionSignature { .. } => "FunctionSignature",
            Node::Function { .. } => "Function",
            Node::If { .. } => "If",
            Node::Struct { .. } => "Struct",
        }
    }
}

/// The arena: every node of one compilation, in allocation order, plus the
/// top-level roots in source order. Dropped as a unit when the compilation
/// ends.
#[derive(Default)]
pub struct Ast {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node and returns its handle.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Borrows the node behind a handle.
    ///
    /// # Panics
    ///
    /// Panics on a handle from a different arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutably borrows the node behind a handle.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Top-level expressions in source order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// Removes `id` from the roots if it is the most recent one; used when
    /// an infix operator claims the previous top-level expression as its
    /// left operand.
    pub fn pop_root_if(&mut self, id: NodeId) {
        if self.roots.last() == Some(&id) {
            self.roots.pop();
        }
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
