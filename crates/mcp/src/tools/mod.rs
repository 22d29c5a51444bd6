#![forbid(unsafe_code)]

mod definitions;
mod dispatch;
mod render;
mod results;
mod submit;
mod surveys;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
