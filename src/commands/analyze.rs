use clap::Args;

use crate::commands::run::{self, Operation, RequestArgs};
use crate::logging;

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Company to roast.
    pub company: String,
    #[command(flatten)]
    pub request: RequestArgs,
}

pub async fn run(args: AnalyzeArgs) -> Result<(), String> {
    logging::init(args.request.verbosity());
    let company = args.company.trim();
    if company.is_empty() {
        return Err("Company name must not be empty.".to_string());
    }

    let operation = Operation::Analysis {
        company: company.to_string(),
    };
    run::execute(&args.request, operation).await
}
