// Cover letter: a draft followed by optional ATS, tone and impact passes.

pub mod generator;
pub mod handlers;
