//! Catalog item operations on the facade.

// self
use crate::{
	_prelude::*,
	client::KeezClient,
	endpoint::items,
	http::HttpTransport,
	model::{Item, ItemFilter, ItemPatch, ItemRequest, Page},
	obs::Operation,
};

impl<T> KeezClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns the scoped item handle.
	pub fn items(&self) -> Items<'_, T> {
		Items { client: self }
	}

	/// Lists catalog items matching `filter`.
	pub async fn get_all_items(&self, filter: &ItemFilter) -> Result<Page<Item>> {
		const KIND: Operation = Operation::GetAllItems;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, items::get_all(&self.transport, &ctx, filter).await)
		})
		.await
	}

	/// Fetches one catalog item.
	pub async fn get_item(&self, item_id: &str) -> Result<Item> {
		const KIND: Operation = Operation::GetItem;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, items::get(&self.transport, &ctx, item_id).await)
		})
		.await
	}

	/// Creates a catalog item and returns its external id.
	///
	/// An unset active flag is sent as `true`.
	pub async fn create_item(&self, item: &ItemRequest) -> Result<String> {
		const KIND: Operation = Operation::CreateItem;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, items::create(&self.transport, &ctx, item).await)
		})
		.await
	}

	/// Replaces a catalog item.
	pub async fn update_item(&self, item_id: &str, item: &ItemRequest) -> Result<()> {
		const KIND: Operation = Operation::UpdateItem;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, items::update(&self.transport, &ctx, item_id, item).await)
		})
		.await
	}

	/// Applies a partial update; only fields set on `patch` are sent.
	pub async fn patch_item(&self, item_id: &str, patch: &ItemPatch) -> Result<()> {
		const KIND: Operation = Operation::PatchItem;

		self.instrument(KIND, async {
			let token = self.authorize().await?;
			let ctx = self.endpoint_context(&token);

			self.classify(KIND, items::patch(&self.transport, &ctx, item_id, patch).await)
		})
		.await
	}
}

/// Catalog item operations scoped to one client, returned by [`KeezClient::items`].
pub struct Items<'c, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'c KeezClient<T>,
}
impl<T> Items<'_, T>
where
	T: ?Sized + HttpTransport,
{
	/// See [`KeezClient::get_all_items`].
	pub async fn get_all(self, filter: &ItemFilter) -> Result<Page<Item>> {
		self.client.get_all_items(filter).await
	}

	/// See [`KeezClient::get_item`].
	pub async fn get(self, item_id: &str) -> Result<Item> {
		self.client.get_item(item_id).await
	}

	/// See [`KeezClient::create_item`].
	pub async fn create(self, item: &ItemRequest) -> Result<String> {
		self.client.create_item(item).await
	}

	/// See [`KeezClient::update_item`].
	pub async fn update(self, item_id: &str, item: &ItemRequest) -> Result<()> {
		self.client.update_item(item_id, item).await
	}

	/// See [`KeezClient::patch_item`].
	pub async fn patch(self, item_id: &str, patch: &ItemPatch) -> Result<()> {
		self.client.patch_item(item_id, patch).await
	}
}
impl<T> Clone for Items<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Items<'_, T> where T: ?Sized + HttpTransport {}
impl<T> Debug for Items<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Items").field("client", self.client).finish()
	}
}
