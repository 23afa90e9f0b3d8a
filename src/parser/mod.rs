// ============================================================================
// Parser Module
// Lexing, normalization and recursive-descent parsing of unit strings
// ============================================================================

mod expr;
mod token;

pub use expr::{AtomResolver, ProductOp, UnitExpr};
pub use token::{normalize, normalized, tokenize, Token};
