pub(crate) mod fixtures;
mod pipeline;
