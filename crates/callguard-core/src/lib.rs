pub mod block;
pub mod error;
pub mod id;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use block::Block;
pub use error::CoreError;
pub use id::MethodRef;
pub use types::ValueType;
pub use value::Value;
