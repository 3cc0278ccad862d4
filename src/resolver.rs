//! Static resolver pass.
//!
//! One AST walk that does three things:
//! 1. Builds lexical scopes (a stack of `HashMap<String, bool>` tracking
//!    declared vs. defined names).
//! 2. Reports static errors (redeclaration, forward-read in an initializer,
//!    invalid `return`, misplaced `this`/`super`, self-inheritance).
//!    Errors are collected, not fatal to the pass; the caller blocks
//!    execution when any exist.
//! 3. Records, for each binding-relevant node (`Variable`, `Assign`, `This`,
//!    `Super`), how many scopes separate the use from its declaration.
//!    Nodes absent from the table are globals, looked up by name at runtime.
//!
//! The scope stack must mirror the interpreter's environment chain exactly:
//! every construct that creates a frame at runtime pushes a scope here, in
//! the same order (including the synthetic `"super"` and `"this"` scopes
//! around class methods).
//!
//! The bottom of the stack is a permanent pseudo-scope tracking top-level
//! declarations.  References that land there (or nowhere) are left out of
//! the binding table and resolved by name against the global frame at
//! runtime.  Tracking globals statically is what lets
//! `var a = 1; { var a = a + 1; }` bind the initializer's `a` to the outer
//! declaration while `var a = a;` with no outer binding anywhere stays a
//! static error.  The pseudo-scope persists across [`Resolver::resolve`]
//! calls so a REPL session remembers earlier lines' globals.

use std::collections::HashMap;

use log::{debug, info};

use crate::error::LoxError;
use crate::parser::{Expr, ExprId, FunctionDecl, Stmt};
use crate::token::Token;

/// Resolved binding distances, keyed by node id.
pub type Bindings = HashMap<ExprId, usize>;

/// What kind of function body are we inside?  Validates `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

/// What kind of class body are we inside?  Validates `this` / `super`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

pub struct Resolver {
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    locals: Bindings,
    errors: Vec<LoxError>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl Resolver {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: vec![HashMap::new()], // bottom: the global pseudo-scope
            locals: HashMap::new(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Walk all top-level statements, yielding the binding table and every
    /// collected static error.  Global declarations stay known to this
    /// resolver for subsequent calls (REPL lines).
    pub fn resolve(&mut self, statements: &[Stmt]) -> (Bindings, Vec<LoxError>) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }

        (
            std::mem::take(&mut self.locals),
            std::mem::take(&mut self.errors),
        )
    }

    // ─────────────────────── statement resolution ───────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                for s in statements {
                    self.resolve_stmt(s);
                }
                self.end_scope();
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define; this ordering is
                // what catches `var a = a;`.
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Function(decl) => {
                // The name is visible inside its own body (recursion).
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionType::Function);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionType::None {
                    self.error(keyword, "Can't return from top-level code.");
                }

                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword, "Can't return a value from an initializer.");
                    }
                    self.resolve_expr(expr);
                }
            }
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[std::rc::Rc<FunctionDecl>],
    ) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(name);
        self.define(name);

        if let Some(sc) = superclass {
            if let Expr::Variable { name: sc_name, .. } = sc {
                if sc_name.lexeme == name.lexeme {
                    self.error(sc_name, "A class can't inherit from itself.");
                }
            }

            self.current_class = ClassType::Subclass;
            self.resolve_expr(sc);

            // Synthetic scope binding "super" around every method.
            self.begin_scope();
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert("super".to_string(), true);
            }
        }

        // Synthetic scope binding "this" inside each method.
        self.begin_scope();
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert("this".to_string(), true);
        }

        for method in methods {
            let declaration = if method.name.lexeme == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, declaration);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    /// Enter a fresh scope for a function's parameters + body.
    fn resolve_function(&mut self, decl: &FunctionDecl, function_type: FunctionType) {
        let enclosing = self.current_function;
        self.current_function = function_type;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        for stmt in &decl.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────── expression resolution ──────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Variable { id, name } => {
                self.resolve_local(*id, name);
            }

            Expr::Assign { id, name, value } => {
                // Resolve the RHS first, then bind the target.
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object);
                self.resolve_expr(value);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Can't use 'this' outside of a class.");
                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.error(keyword, "Can't use 'super' outside of a class.");
                        return;
                    }
                    ClassType::Class => {
                        self.error(keyword, "Can't use 'super' in a class with no superclass.");
                        return;
                    }
                    ClassType::Subclass => {}
                }

                self.resolve_local(*id, keyword);
            }
        }
    }

    // ─────────────────────────── scope helpers ──────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let global = self.scopes.len() == 1;

        if let Some(scope) = self.scopes.last_mut() {
            if global {
                // The global frame allows redefinition, and the previous
                // binding stays readable while the new initializer runs.
                scope.entry(name.lexeme.clone()).or_insert(false);
                return;
            }

            if scope.contains_key(&name.lexeme) {
                self.errors.push(LoxError::resolve(
                    name,
                    "Already a variable with this name in this scope.",
                ));
                return;
            }

            scope.insert(name.lexeme.clone(), false);
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Record this occurrence as a local at the depth of the innermost scope
    /// holding a *ready* binding for the name.
    ///
    /// A declared-but-unready entry means the name's own initializer is
    /// being resolved; that scope is skipped and the search continues
    /// outward.  References landing in the bottom (global) pseudo-scope get
    /// no table entry and are looked up by name at runtime.  A name found
    /// nowhere is a static error when a skip happened (self-reference with
    /// nothing to shadow), otherwise a presumed global.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        let mut in_own_initializer = false;

        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            match scope.get(&name.lexeme) {
                Some(true) => {
                    if depth + 1 == self.scopes.len() {
                        debug!("Resolved '{}' against a global declaration", name.lexeme);
                    } else {
                        debug!("Resolved '{}' at depth {}", name.lexeme, depth);
                        self.locals.insert(id, depth);
                    }
                    return;
                }
                Some(false) => in_own_initializer = true,
                None => {}
            }
        }

        if in_own_initializer {
            self.error(name, "Can't read local variable in its own initializer.");
            return;
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }

    fn error<S: Into<String>>(&mut self, token: &Token, message: S) {
        self.errors.push(LoxError::resolve(token, message));
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
