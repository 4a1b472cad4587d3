// Text measurement for the renderer: per-family width tables and greedy wrapping.
// No font files are read here; measurement is deterministic and allocation-light.

pub mod font_metrics;
pub mod wrap;
