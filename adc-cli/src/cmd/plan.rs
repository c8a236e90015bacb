use std::path::Path;

use adc_exec::plan_batch;
use serde_json::json;

use crate::cmd::config::{build_host, load_batch};
use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::{OperationArgs, OutputArgs};

pub async fn plan_cmd(path: &Path, operation: &OperationArgs, output: &OutputArgs) -> i32 {
    let host = match load_batch(path).and_then(|items| build_host(items, operation, false)) {
        Ok(h) => h,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let planned = match plan_batch(&host).await {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let mut failed = false;
    let rendered: Vec<serde_json::Value> = planned
        .iter()
        .map(|p| match &p.request {
            Ok(req) => json!({ "index": p.index, "request": req }),
            Err(e) => {
                failed = true;
                json!({ "index": p.index, "error": e.to_string() })
            }
        })
        .collect();

    print_result(output.format, output.quiet, &rendered);
    if failed {
        exit_codes::VALIDATION_FAILED
    } else {
        exit_codes::SUCCESS
    }
}
