//! Catalog item endpoints.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	endpoint::{self, EndpointContext},
	error::TransportError,
	http::{HttpTransport, retry::RetryingTransport},
	model::{CreatedResource, Item, ItemFilter, ItemPatch, ItemRequest, Page},
};

/// `GET {cid}/items` with optional filters.
pub async fn get_all<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	filter: &ItemFilter,
) -> Result<Page<Item>, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let url = endpoint::with_query(ctx.client_url(&["items"])?, &filter.query_pairs());
	let request = ctx.request(Method::GET, url)?;

	transport.execute(&request).await?.json()
}

/// `GET {cid}/items/{id}`.
pub async fn get<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	item_id: &str,
) -> Result<Item, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx.request(Method::GET, ctx.client_url(&["items", item_id])?)?;

	transport.execute(&request).await?.json()
}

/// `POST {cid}/items`; returns the new item's external id.
pub async fn create<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	item: &ItemRequest,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request =
		ctx.request(Method::POST, ctx.client_url(&["items"])?)?.json(&item.for_create())?;
	let created: CreatedResource = transport.execute(&request).await?.json()?;

	Ok(created.external_id)
}

/// `PUT {cid}/items/{id}`.
pub async fn update<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	item_id: &str,
	item: &ItemRequest,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx.request(Method::PUT, ctx.client_url(&["items", item_id])?)?.json(item)?;

	transport.execute(&request).await?;

	Ok(())
}

/// `PATCH {cid}/items/{id}` with only the fields present in `patch`.
pub async fn patch<T>(
	transport: &RetryingTransport<T>,
	ctx: &EndpointContext<'_>,
	item_id: &str,
	patch: &ItemPatch,
) -> Result<(), TransportError>
where
	T: ?Sized + HttpTransport,
{
	let request = ctx.request(Method::PATCH, ctx.client_url(&["items", item_id])?)?.json(patch)?;

	transport.execute(&request).await?;

	Ok(())
}
