use std::time::Duration;

use adc_core::OutputItem;

use crate::credentials::AdcCredentials;

#[derive(Debug)]
pub struct TransportConfig {
    pub credentials: AdcCredentials,
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl TransportConfig {
    pub fn new(credentials: AdcCredentials) -> Self {
        Self {
            credentials,
            timeout: Duration::from_secs(30),
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Output of a batch that ran to completion.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub items: Vec<OutputItem>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn record_success(&mut self, item: OutputItem) {
        self.succeeded += 1;
        self.items.push(item);
    }

    pub fn record_failure(&mut self, item: OutputItem) {
        self.failed += 1;
        self.items.push(item);
    }
}
