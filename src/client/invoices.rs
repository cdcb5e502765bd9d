//! Invoice operations on the facade.

// self
use crate::{
	_prelude::*,
	client::KeezClient,
	endpoint::invoices,
	http::HttpTransport,
	model::{Invoice, InvoiceFilter, InvoiceRequest, InvoiceSummary, Page, Recipient},
	obs::Operation,
};

impl<T> KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns the scoped invoice handle.
	pub fn invoices(&self) -> Invoices<'_, T> {
		Invoices { client: self }
	}

	/// Lists invoices matching `filter`.
	pub async fn get_all_invoices(&self, filter: &InvoiceFilter) -> Result<Page<InvoiceSummary>> {
		const KIND: Operation = Operation::GetAllInvoices;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::get_all(&self.transport, &ctx, filter).await)
		})
		.await
	}

	/// Fetches one invoice with its line items.
	pub async fn get_invoice(&self, invoice_id: &str) -> Result<Invoice> {
		const KIND: Operation = Operation::GetInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::get(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}

	/// Creates an invoice and returns its external id.
	pub async fn create_invoice(&self, invoice: &InvoiceRequest) -> Result<String> {
		const KIND: Operation = Operation::CreateInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::create(&self.transport, &ctx, invoice).await)
		})
		.await
	}

	/// Replaces an existing invoice.
	pub async fn update_invoice(&self, invoice_id: &str, invoice: &InvoiceRequest) -> Result<()> {
		const KIND: Operation = Operation::UpdateInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::update(&self.transport, &ctx, invoice_id, invoice).await)
		})
		.await
	}

	/// Deletes a draft invoice.
	pub async fn delete_invoice(&self, invoice_id: &str) -> Result<()> {
		const KIND: Operation = Operation::DeleteInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::delete(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}

	/// Validates a draft invoice; resolves to `"VALIDATED"`.
	pub async fn validate_invoice(&self, invoice_id: &str) -> Result<String> {
		const KIND: Operation = Operation::ValidateInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::validate(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}

	/// Cancels a validated invoice.
	pub async fn cancel_invoice(&self, invoice_id: &str) -> Result<()> {
		const KIND: Operation = Operation::CancelInvoice;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::cancel(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}

	/// Submits an invoice to eFactura.
	///
	/// Resolves to the upload index when the API returns one, otherwise to the external id,
	/// otherwise to `"SUBMITTED"`.
	pub async fn submit_invoice_to_efactura(&self, invoice_id: &str) -> Result<String> {
		const KIND: Operation = Operation::SubmitInvoiceToEfactura;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::submit_efactura(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}

	/// Emails an invoice; resolves to `"SENT"`.
	///
	/// `recipient` accepts a bare address or an [`EmailRecipients`](crate::model::EmailRecipients)
	/// with copies.
	pub async fn send_invoice(
		&self,
		recipient: impl Into<Recipient>,
		invoice_id: &str,
	) -> Result<String> {
		const KIND: Operation = Operation::SendInvoice;

		let recipient = recipient.into();

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(
				KIND,
				invoices::send_email(&self.transport, &ctx, recipient, invoice_id).await,
			)
		})
		.await
	}

	/// Downloads the invoice PDF.
	pub async fn download_invoice_pdf(&self, invoice_id: &str) -> Result<Vec<u8>> {
		const KIND: Operation = Operation::DownloadInvoicePdf;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, invoices::download_pdf(&self.transport, &ctx, invoice_id).await)
		})
		.await
	}
}

/// Invoice operations scoped to one client, returned by [`KeezClient::invoices`].
pub struct Invoices<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c KeezClient<T>,
}
impl<T> Invoices<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// See [`KeezClient::get_all_invoices`].
	pub async fn get_all(self, filter: &InvoiceFilter) -> Result<Page<InvoiceSummary>> {
		self.client.get_all_invoices(filter).await
	}

	/// See [`KeezClient::get_invoice`].
	pub async fn get(self, invoice_id: &str) -> Result<Invoice> {
		self.client.get_invoice(invoice_id).await
	}

	/// See [`KeezClient::create_invoice`].
	pub async fn create(self, invoice: &InvoiceRequest) -> Result<String> {
		self.client.create_invoice(invoice).await
	}

	/// See [`KeezClient::update_invoice`].
	pub async fn update(self, invoice_id: &str, invoice: &InvoiceRequest) -> Result<()> {
		self.client.update_invoice(invoice_id, invoice).await
	}

	/// See [`KeezClient::delete_invoice`].
	pub async fn delete(self, invoice_id: &str) -> Result<()> {
		self.client.delete_invoice(invoice_id).await
	}

	/// See [`KeezClient::validate_invoice`].
	pub async fn validate(self, invoice_id: &str) -> Result<String> {
		self.client.validate_invoice(invoice_id).await
	}

	/// See [`KeezClient::cancel_invoice`].
	pub async fn cancel(self, invoice_id: &str) -> Result<()> {
		self.client.cancel_invoice(invoice_id).await
	}

	/// See [`KeezClient::submit_invoice_to_efactura`].
	pub async fn submit_efactura(self, invoice_id: &str) -> Result<String> {
		self.client.submit_invoice_to_efactura(invoice_id).await
	}

	/// See [`KeezClient::send_invoice`].
	pub async fn send_email(
		self,
		recipient: impl Into<Recipient>,
		invoice_id: &str,
	) -> Result<String> {
		self.client.send_invoice(recipient, invoice_id).await
	}

	/// See [`KeezClient::download_invoice_pdf`].
	pub async fn download_pdf(self, invoice_id: &str) -> Result<Vec<u8>> {
		self.client.download_invoice_pdf(invoice_id).await
	}
}
impl<T> Clone for Invoices<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Invoices<'_, T> where T: ?Sized + HttpTransport {}
impl<T> Debug for Invoices<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Invoices").field("client", self.client).finish()
	}
}
