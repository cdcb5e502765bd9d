// self
use crate::{_prelude::*, config::HostMode, obs::Operation};

/// Future returned by [`OperationSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`OperationSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span covering one facade operation or token grant.
///
/// With the `tracing` feature the span is `keez_client.operation` with the `operation` and
/// `host` fields set up front and `status` filled in when the call fails with an HTTP status.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `operation` against the `mode` host.
	pub fn new(operation: Operation, mode: HostMode) -> Self {
		#[cfg(feature = "tracing")]
		{
			Self {
				span: tracing::info_span!(
					"keez_client.operation",
					operation = operation.as_str(),
					host = mode.as_str(),
					status = tracing::field::Empty,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, mode);

			Self {}
		}
	}

	/// Records the upstream status of a failed call.
	pub fn record_status(&self, status: Option<u16>) {
		#[cfg(feature = "tracing")]
		{
			if let Some(status) = status {
				self.span.record("status", status);
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Runs `fut` inside the span; no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			tracing::Instrument::instrument(fut, self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
