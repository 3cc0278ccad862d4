//! Chained, mutable name→value frames.
//!
//! One `Environment` is one lexical scope at runtime.  Frames are shared
//! (`Rc<RefCell<..>>`) because closures alias the frame that was live at
//! their definition site; a frame lives as long as any closure or active
//! call still references it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::LoxError;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind (or rebind) `name` in *this* frame.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// By-name lookup walking outward.  Used only for globals (unresolved
    /// references); resolved locals go through [`Environment::get_at`].
    pub fn get(&self, name: &Token) -> Result<Value, LoxError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// By-name assignment walking outward; errors if the name is nowhere
    /// defined.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), LoxError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(LoxError::runtime(
                name,
                format!("Undefined variable '{}'.", name.lexeme),
            ))
        }
    }

    /// Read `name` from the frame exactly `distance` links up the chain.
    /// Never searches: distances come from a successful resolution pass.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        let frame = Self::ancestor(env, distance)?;
        let value = frame.borrow().values.get(name).cloned();
        value
    }

    /// Write `name` in the frame exactly `distance` links up the chain.
    /// Returns `false` if the chain is shorter than `distance` (a resolver
    /// bug, surfaced as a runtime error by the caller).
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        match Self::ancestor(env, distance) {
            Some(frame) => {
                frame.borrow_mut().values.insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut frame = Rc::clone(env);

        for _ in 0..distance {
            let next = frame.borrow().enclosing.clone()?;
            frame = next;
        }

        Some(frame)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn inner_frame_shadows_without_clobbering_outer() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().define("a", Value::Number(1.0));

        let inner = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&outer))));
        inner.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(inner.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
        assert_eq!(outer.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_at_walks_exactly_the_given_distance() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::Number(0.0));

        let mid = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&global))));
        mid.borrow_mut().define("x", Value::Number(1.0));

        let leaf = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&mid))));

        assert_eq!(Environment::get_at(&leaf, 1, "x"), Some(Value::Number(1.0)));
        assert_eq!(Environment::get_at(&leaf, 2, "x"), Some(Value::Number(0.0)));
        assert_eq!(Environment::get_at(&leaf, 0, "x"), None);
    }

    #[test]
    fn assign_walks_outward_and_errors_on_undefined() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("x", Value::Number(0.0));

        let leaf = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&global))));

        leaf.borrow_mut()
            .assign(&ident("x"), Value::Number(9.0))
            .unwrap();
        assert_eq!(global.borrow().get(&ident("x")).unwrap(), Value::Number(9.0));

        assert!(leaf.borrow_mut().assign(&ident("y"), Value::Nil).is_err());
    }
}
