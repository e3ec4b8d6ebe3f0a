//! # jpq
//!
//! RFC 9535 JSONPath for in-memory JSON documents: compile a query string
//! into an immutable IR, apply the IR to a [`serde_json::Value`], and pull
//! located result nodes lazily.
//!
//! ## Features
//!
//! - **Full RFC 9535 grammar** — name, wildcard, index, slice, and filter
//!   selectors; child and descendant segments; the complete filter
//!   sub-language with the five built-in function extensions
//! - **Parse-time checking** — function arity, argument types, the
//!   singular-query restriction, and regex patterns are all validated
//!   during compilation; evaluation cannot fail
//! - **Lazy evaluation** — results are pulled one at a time, descendant
//!   walks included; stop pulling and the work stops
//! - **Zero-copy nodes** — every result aliases the input document and
//!   carries its normalized location
//! - **Insertion-ordered objects** — member iteration follows document
//!   order, making wildcard and descendant output deterministic
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//!
//! let document = json!({"books": [
//!     {"title": "Sayings of the Century", "price": 8.95},
//!     {"title": "Sword of Honour", "price": 12.99},
//! ]});
//!
//! let query = jpq::compile("$.books[?@.price < 10].title")?;
//! for node in query.evaluate(&document) {
//!     println!("{} = {}", node.location, node.value);
//! }
//! # Ok::<(), jpq::ParseError>(())
//! ```

pub mod ast;
pub mod eval;
pub mod grammar;
pub mod iter;
pub mod parser;
pub mod path;

pub use ast::Query;
pub use eval::evaluate;
pub use iter::Seq;
pub use parser::{compile, ParseError, Parser, TypeKind};
pub use path::{Location, Node};
