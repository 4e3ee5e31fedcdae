// Analysis engine: category standings, punt detection, roster risk,
// pick suggestions, post-draft grading.

pub mod categories;
pub mod punt;
pub mod recap;
pub mod risk;
pub mod suggest;
