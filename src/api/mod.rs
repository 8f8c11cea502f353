//! Input model: methods and services handed over by the IDL front end, and
//! manifest loading for the CLI.

mod load;
mod types;

pub use load::{load_manifest, parse_manifest};
pub use types::{HttpVerb, Manifest, Method, ServiceDefinition};
