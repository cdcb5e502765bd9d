//! Invoice endpoints.

// crates.io
use oauth2::http::{HeaderValue, Method, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	endpoint::{self, EndpointContext},
	error::TransportError,
	http::{HttpTransport, retry::RetryingTransport},
	model::{
		CreatedResource, EfacturaSubmission, ExternalIdBody, Invoice, InvoiceDelivery,
		InvoiceFilter, InvoiceRequest, InvoiceSummary, Page, Recipient,
	},
};

/// Literal returned by [`validate`].
pub const VALIDATED: &str = "VALIDATED";
/// Literal returned by [`send_email`].
pub const SENT: &str = "SENT";

/// `GET {cid}/invoices` with optional filters.
pub async fn get_all<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	filter: &InvoiceFilter,
) -> Result<Page<InvoiceSummary>, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let url = endpoint::with_query(ctx.client_url(&["invoices"])?, &filter.query_pairs());
	let request = ctx.request(Method::GET, url)?;

	transport.execute(&request).await?.json()
}

/// `GET {cid}/invoices/{id}`.
pub async fn get<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<Invoice, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx.request(Method::GET, ctx.client_url(&["invoices", invoice_id])?)?;

	transport.execute(&request).await?.json()
}

/// `POST {cid}/invoices`; returns the new invoice's external id.
pub async fn create<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice: &InvoiceRequest,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx.request(Method::POST, ctx.client_url(&["invoices"])?)?.json(invoice)?;
	let created: CreatedResource = transport.execute(&request).await?.json()?;

	Ok(created.external_id)
}

/// `PUT {cid}/invoices/{id}`.
pub async fn update<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
	invoice: &InvoiceRequest,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request =
		ctx.request(Method::PUT, ctx.client_url(&["invoices", invoice_id])?)?.json(invoice)?;

	transport.execute(&request).await?;

	Ok(())
}

/// `DELETE {cid}/invoices` with the external id in the body.
pub async fn delete<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx
		.request(Method::DELETE, ctx.client_url(&["invoices"])?)?
		.json(&ExternalIdBody::new(invoice_id))?;

	transport.execute(&request).await?;

	Ok(())
}

/// `POST {cid}/invoices/valid`; returns [`VALIDATED`].
pub async fn validate<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	post_action(transport, ctx, "valid", invoice_id).await?;

	Ok(VALIDATED.to_owned())
}

/// `POST {cid}/invoices/canceled`.
pub async fn cancel<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	post_action(transport, ctx, "canceled", invoice_id).await?;

	Ok(())
}

/// `POST {cid}/invoices/efactura/submitted`; returns the upload index, else the external id,
/// else `SUBMITTED`.
pub async fn submit_efactura<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx
		.request(Method::POST, ctx.client_url(&["invoices", "efactura", "submitted"])?)?
		.json(&ExternalIdBody::new(invoice_id))?;
	let submission: Option<EfacturaSubmission> = transport.execute(&request).await?.json()?;

	Ok(submission.unwrap_or_default().reference())
}

/// `POST invoices/delivery`; returns [`SENT`].
pub async fn send_email<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	recipient: Recipient,
	invoice_id: &str,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx
		.request(Method::POST, ctx.public_url(&["invoices", "delivery"])?)?
		.json(&InvoiceDelivery::email(invoice_id, recipient))?;

	transport.execute(&request).await?;

	Ok(SENT.to_owned())
}

/// `GET invoices/{id}/pdf` with the download timeout; returns the raw document.
pub async fn download_pdf<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	invoice_id: &str,
) -> Result<Vec<u8>, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let mut request = ctx.request(Method::GET, ctx.public_url(&["invoices", invoice_id, "pdf"])?)?;

	request.timeout = ctx.download_timeout;
	request.headers.insert(ACCEPT, HeaderValue::from_static("application/pdf"));

	Ok(transport.execute(&request).await?.body)
}

async fn post_action<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	action: &str,
	invoice_id: &str,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx
		.request(Method::POST, ctx.client_url(&["invoices", action])?)?
		.json(&ExternalIdBody::new(invoice_id))?;

	transport.execute(&request).await?;

	Ok(())
}
