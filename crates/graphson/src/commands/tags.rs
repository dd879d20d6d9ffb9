//! Tags Command
//!
//! List the type tags registered for a GraphSON version.

use graphson_core::{GraphSONVersion, TypeRegistry};
use starbase::AppResult;

pub fn registered_tags(version: GraphSONVersion) -> Vec<String> {
    TypeRegistry::for_version(version)
        .tags()
        .map(str::to_string)
        .collect()
}

pub fn run_tags(version: GraphSONVersion) -> AppResult {
    let profile = version.profile();
    println!("GraphSON {} ({})", version, profile.mime_type);
    if !profile.envelopes {
        println!("  values are written untyped; tags apply only when reading with a hint");
    }
    for tag in registered_tags(version) {
        println!("  {}", tag);
    }
    Ok(None)
}
