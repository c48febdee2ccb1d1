use std::process::ExitCode;

use clap::Args;
use serde_json::json;

use taint_engine_query::generate_models_from_queries;

use crate::cli::{CliError, OutputFormat};
use crate::exit_codes;
use crate::fixtures;

#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Runs the query executor over the bundled demo target/query fixture set
/// and prints every produced model annotation.
pub fn run(args: QueryArgs) -> Result<ExitCode, CliError> {
    let host = fixtures::DemoHost::new();
    let queries = fixtures::demo_queries();

    let (registry, verification_errors) = generate_models_from_queries(&host, &queries)
        .map_err(|err| CliError::Runtime(err.to_string()))?;

    for error in &verification_errors {
        eprintln!("verification: {error}");
    }

    match args.format {
        OutputFormat::Text => {
            for target in registry.targets() {
                let Some(model) = registry.get(target) else { continue };
                for annotation in &model.annotations {
                    println!("{}: {annotation:?}", target.qualified_name());
                }
            }
        }
        OutputFormat::Json => {
            let rendered: Vec<_> = registry
                .targets()
                .map(|target| {
                    let count = registry.get(target).map(|model| model.annotations.len()).unwrap_or(0);
                    json!({ "target": target.qualified_name(), "annotation_count": count })
                })
                .collect();
            println!("{}", json!({ "models": rendered }));
        }
    }

    Ok(exit_codes::diagnostics_found(!verification_errors.is_empty()))
}
