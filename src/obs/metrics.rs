// self
use crate::{
	config::HostMode,
	obs::{Operation, OperationOutcome},
};

/// Counter incremented once per operation attempt and once per outcome.
pub const OPERATION_COUNTER: &str = "keez_client_operation_total";

/// Increments [`OPERATION_COUNTER`] labeled by operation, host, and outcome.
///
/// Does nothing unless the `metrics` feature is enabled and a recorder is installed.
pub fn record_operation_outcome(operation: Operation, mode: HostMode, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			OPERATION_COUNTER,
			"operation" => operation.as_str(),
			"host" => mode.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, mode, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_harmless() {
		for outcome in [OperationOutcome::Attempt, OperationOutcome::Failure] {
			record_operation_outcome(Operation::CreateInvoice, HostMode::Production, outcome);
		}
	}
}
