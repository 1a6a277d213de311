//! Sequential Expansion Protocol.
//!
//! Plans how far a pilot or stop-or-go sample has to grow once its errors
//! are known, then appends the extra items. Expansion only ever adds items.

pub mod expand;
pub mod stop_or_go;
pub mod variable;

pub use expand::{expand_audit_sample, expand_audit_sample_with_offset};
pub use stop_or_go::{calculate_stop_or_go_expansion, stop_or_go_factor};
pub use variable::calculate_variable_expansion;
