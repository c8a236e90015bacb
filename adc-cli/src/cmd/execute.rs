use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use adc_core::OutputItem;
use adc_exec::{
    CompositeEventSink, Executor, Host, ReqwestTransport, StderrEventSink, TracingEventSink,
};
use tracing::debug;

use crate::cmd::config::{build_host, build_transport_config, load_batch};
use crate::exit_codes;
use crate::output::{print_error, print_result};
use crate::{ApplianceArgs, OperationArgs, OutputArgs};

pub async fn execute_cmd(
    path: &Path,
    continue_on_fail: bool,
    out_dir: Option<&Path>,
    events: bool,
    operation: &OperationArgs,
    appliance: &ApplianceArgs,
    output: &OutputArgs,
) -> i32 {
    let loaded = load_batch(path).and_then(|items| build_host(items, operation, continue_on_fail));
    let host = match loaded {
        Ok(h) => h,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    debug!(path = %path.display(), items = host.items().len(), "loaded batch");

    let config = match build_transport_config(appliance) {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let transport = match ReqwestTransport::new(config) {
        Ok(t) => t,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut event_sink = CompositeEventSink::default().with(Arc::new(TracingEventSink));
    if events {
        event_sink = event_sink.with(Arc::new(StderrEventSink));
    }
    let executor = Executor::new(Arc::new(transport), Arc::new(event_sink));

    let outcome = match executor.execute(&host).await {
        Ok(o) => o,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUN_FAILED;
        }
    };

    if let Some(dir) = out_dir {
        if let Err(e) = write_attachments(dir, &outcome.items) {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    }

    print_result(output.format, output.quiet, &outcome.items);
    exit_codes::SUCCESS
}

/// Writes every binary attachment under `dir`, named after its file name (without
/// directories). A name already written by an earlier item gets an `item-<index>-` prefix.
fn write_attachments(dir: &Path, items: &[OutputItem]) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
    let mut written = HashSet::new();
    for item in items {
        let Some(slots) = &item.binary else {
            continue;
        };
        for (slot, data) in slots {
            let name = data
                .file_name
                .as_deref()
                .and_then(|n| Path::new(n).file_name())
                .map(|n| n.to_string_lossy().into_owned());
            let name = match name {
                Some(n) if !written.contains(&n) => n,
                Some(n) => format!("item-{}-{n}", item.paired_item),
                None => format!("item-{}-{slot}", item.paired_item),
            };
            if !written.insert(name.clone()) {
                return Err(format!("more than one attachment would be written to {name}"));
            }
            let target = dir.join(&name);
            std::fs::write(&target, &data.data)
                .map_err(|e| format!("failed to write {}: {e}", target.display()))?;
        }
    }
    Ok(())
}
