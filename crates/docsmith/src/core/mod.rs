//! Pipeline infrastructure: options, hint collection, response
//! materialization, converter registry, and the pipeline itself.

pub mod config;
pub mod hints;
pub mod materialize;
pub mod pipeline;
pub mod registry;
