//! Logging and optional observability helpers for facade operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `keez_client.operation` with the `operation`
//!   field, and to use [`TracingLogger`].
//! - Enable `metrics` to increment the `keez_client_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod logger;
mod metrics;
mod tracing;

pub use logger::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials token grant.
	RefreshToken,
	/// List invoices.
	GetAllInvoices,
	/// Fetch one invoice.
	GetInvoice,
	/// Create an invoice.
	CreateInvoice,
	/// Replace an invoice.
	UpdateInvoice,
	/// Delete an invoice.
	DeleteInvoice,
	/// Validate an invoice.
	ValidateInvoice,
	/// Cancel an invoice.
	CancelInvoice,
	/// Submit an invoice to eFactura.
	SubmitInvoiceToEfactura,
	/// Email an invoice.
	SendInvoice,
	/// Download an invoice PDF.
	DownloadInvoicePdf,
	/// List items.
	GetAllItems,
	/// Fetch one item.
	GetItem,
	/// Create an item.
	CreateItem,
	/// Replace an item.
	UpdateItem,
	/// Partially update an item.
	PatchItem,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::RefreshToken => "refresh_token",
			Operation::GetAllInvoices => "get_all_invoices",
			Operation::GetInvoice => "get_invoice",
			Operation::CreateInvoice => "create_invoice",
			Operation::UpdateInvoice => "update_invoice",
			Operation::DeleteInvoice => "delete_invoice",
			Operation::ValidateInvoice => "validate_invoice",
			Operation::CancelInvoice => "cancel_invoice",
			Operation::SubmitInvoiceToEfactura => "submit_invoice_to_efactura",
			Operation::SendInvoice => "send_invoice",
			Operation::DownloadInvoicePdf => "download_invoice_pdf",
			Operation::GetAllItems => "get_all_items",
			Operation::GetItem => "get_item",
			Operation::CreateItem => "create_item",
			Operation::UpdateItem => "update_item",
			Operation::PatchItem => "patch_item",
		}
	}

	/// Returns the phrase used in error messages ("Failed to {description}").
	pub const fn description(self) -> &'static str {
		match self {
			Operation::RefreshToken => "refresh token",
			Operation::GetAllInvoices => "get all invoices",
			Operation::GetInvoice => "get invoice",
			Operation::CreateInvoice => "create invoice",
			Operation::UpdateInvoice => "update invoice",
			Operation::DeleteInvoice => "delete invoice",
			Operation::ValidateInvoice => "validate invoice",
			Operation::CancelInvoice => "cancel invoice",
			Operation::SubmitInvoiceToEfactura => "submit invoice to eFactura",
			Operation::SendInvoice => "send invoice",
			Operation::DownloadInvoicePdf => "download invoice PDF",
			Operation::GetAllItems => "get all items",
			Operation::GetItem => "get item",
			Operation::CreateItem => "create item",
			Operation::UpdateItem => "update item",
			Operation::PatchItem => "patch item",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a facade operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
