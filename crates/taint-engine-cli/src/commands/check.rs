use std::process::ExitCode;

use clap::Args;
use serde_json::json;

use taint_engine_core::report::to_json;
use taint_engine_flow::generate_issues;

use crate::cli::{CliError, OutputFormat};
use crate::exit_codes;
use crate::fixtures;

#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

/// Runs the flow/rule engine over the bundled demo analysis unit and
/// prints the resulting issues.
pub fn run(args: CheckArgs) -> Result<ExitCode, CliError> {
    let candidates = fixtures::demo_candidates();
    let configuration = fixtures::demo_configuration();
    let define = fixtures::demo_define();

    let issues = generate_issues(&candidates, &configuration, &define);

    match args.format {
        OutputFormat::Text => {
            for issue in &issues {
                let Some(rule) = configuration.rule_by_code(issue.handle.code) else {
                    continue;
                };
                let location = issue.canonical_location();
                println!("{}:{}: [{}] {}", location.file, location.line, issue.handle.code, rule.render_message());
            }
        }
        OutputFormat::Json => {
            let rendered: Vec<_> = issues
                .iter()
                .filter_map(|issue| configuration.rule_by_code(issue.handle.code).map(|rule| to_json(issue, rule, 1)))
                .collect();
            println!("{}", json!({ "issues": rendered }));
        }
    }

    Ok(exit_codes::diagnostics_found(!issues.is_empty()))
}
