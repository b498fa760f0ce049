//! Callable values passed as block/callback arguments.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A shared callable that can be handed to a guarded method as its block.
///
/// Blocks compare by identity: two clones of the same block are equal,
/// two separately constructed blocks never are.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Block {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Block(Arc::new(f))
    }

    /// Invokes the block with the given arguments.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(#<Proc>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_compare_by_identity() {
        let a = Block::new(|_| Value::Int(4));
        let b = Block::new(|_| Value::Int(4));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn call_forwards_arguments() {
        let add = Block::new(|args| match args {
            [Value::Int(x), Value::Int(y)] => Value::Int(x + y),
            _ => Value::Nil,
        });
        assert_eq!(add.call(&[Value::Int(2), Value::Int(2)]), Value::Int(4));
        assert_eq!(add.call(&[]), Value::Nil);
    }
}
