// Resume analysis: five independent model tasks merged into one result,
// plus an optional refinement pass.

pub mod analyzer;
pub mod handlers;
