//! Catalog item DTOs.

// self
use crate::{
	_prelude::*,
	model::{MeasureUnit, QueryPairs, common::null_as_default},
};

/// Optional filters for listing items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
	/// Number of records to skip.
	pub offset: Option<u32>,
	/// Maximum number of records to return.
	pub count: Option<u32>,
	/// Item name.
	pub item_name: Option<String>,
	/// Item code.
	pub item_code: Option<String>,
	/// Active flag.
	pub is_active: Option<bool>,
}
impl ItemFilter {
	/// Sets the page offset.
	pub fn offset(mut self, offset: u32) -> Self {
		self.offset = Some(offset);

		self
	}

	/// Sets the page size.
	pub fn count(mut self, count: u32) -> Self {
		self.count = Some(count);

		self
	}

	/// Filters by name.
	pub fn item_name(mut self, name: impl Into<String>) -> Self {
		self.item_name = Some(name.into());

		self
	}

	/// Filters by code.
	pub fn item_code(mut self, code: impl Into<String>) -> Self {
		self.item_code = Some(code.into());

		self
	}

	/// Filters by active flag.
	pub fn is_active(mut self, active: bool) -> Self {
		self.is_active = Some(active);

		self
	}

	/// Returns the query-string pairs for this filter.
	pub fn query_pairs(&self) -> QueryPairs {
		let mut pairs = QueryPairs::default();

		pairs.push("offset", self.offset);
		pairs.push("count", self.count);
		pairs.push_str("itemName", self.item_name.as_deref());
		pairs.push_str("itemCode", self.item_code.as_deref());
		pairs.push("isActive", self.is_active);

		pairs
	}
}

/// Catalog item as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Item {
	/// External identifier.
	#[serde(deserialize_with = "null_as_default")]
	pub external_id: String,
	/// Name.
	#[serde(deserialize_with = "null_as_default")]
	pub item_name: String,
	/// Code.
	#[serde(deserialize_with = "null_as_default")]
	pub item_code: String,
	/// Description.
	#[serde(deserialize_with = "null_as_default")]
	pub item_description: String,
	/// Unit of measure code.
	#[serde(deserialize_with = "null_as_default")]
	pub measure_unit_id: u8,
	/// Unit of measure display name.
	#[serde(deserialize_with = "null_as_default")]
	pub measure_unit_name: String,
	/// Unit price.
	#[serde(deserialize_with = "null_as_default")]
	pub unit_price: f64,
	/// VAT percentage.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_percent: f64,
	/// VAT category code.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_category_code: String,
	/// VAT exemption reason.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_exemption_reason: String,
	/// Active flag.
	#[serde(deserialize_with = "null_as_default")]
	pub is_active: bool,
	/// Creation timestamp as reported by the API.
	#[serde(deserialize_with = "null_as_default")]
	pub created_at: i64,
	/// Last update timestamp as reported by the API.
	#[serde(deserialize_with = "null_as_default")]
	pub updated_at: i64,
}

/// Body of the create and update item endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
	/// Name.
	pub item_name: String,
	/// Code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_code: Option<String>,
	/// Description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_description: Option<String>,
	/// Unit of measure.
	pub measure_unit_id: MeasureUnit,
	/// Unit price.
	pub unit_price: f64,
	/// VAT percentage.
	pub vat_percent: f64,
	/// VAT category code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_category_code: Option<String>,
	/// VAT exemption reason.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_exemption_reason: Option<String>,
	/// Active flag; creation sends `true` when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
}
impl ItemRequest {
	/// Creates a request with the mandatory fields.
	pub fn new(
		item_name: impl Into<String>,
		measure_unit: MeasureUnit,
		unit_price: f64,
		vat_percent: f64,
	) -> Self {
		Self {
			item_name: item_name.into(),
			item_code: None,
			item_description: None,
			measure_unit_id: measure_unit,
			unit_price,
			vat_percent,
			vat_category_code: None,
			vat_exemption_reason: None,
			is_active: None,
		}
	}

	/// Sets the item code.
	pub fn item_code(mut self, code: impl Into<String>) -> Self {
		self.item_code = Some(code.into());

		self
	}

	/// Sets the description.
	pub fn item_description(mut self, description: impl Into<String>) -> Self {
		self.item_description = Some(description.into());

		self
	}

	/// Sets the VAT category code.
	pub fn vat_category_code(mut self, code: impl Into<String>) -> Self {
		self.vat_category_code = Some(code.into());

		self
	}

	/// Sets the VAT exemption reason.
	pub fn vat_exemption_reason(mut self, reason: impl Into<String>) -> Self {
		self.vat_exemption_reason = Some(reason.into());

		self
	}

	/// Sets the active flag.
	pub fn is_active(mut self, active: bool) -> Self {
		self.is_active = Some(active);

		self
	}

	/// Returns the body sent on creation, where an unset active flag means `true`.
	pub fn for_create(&self) -> Self {
		let mut body = self.clone();

		body.is_active.get_or_insert(true);

		body
	}
}

/// Typed partial update for an item; only present fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
	/// Name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_name: Option<String>,
	/// Code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_code: Option<String>,
	/// Description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_description: Option<String>,
	/// Unit of measure.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub measure_unit_id: Option<MeasureUnit>,
	/// Unit price.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit_price: Option<f64>,
	/// VAT percentage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_percent: Option<f64>,
	/// VAT category code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_category_code: Option<String>,
	/// VAT exemption reason.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_exemption_reason: Option<String>,
	/// Active flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
}
impl ItemPatch {
	/// Sets the name.
	pub fn item_name(mut self, name: impl Into<String>) -> Self {
		self.item_name = Some(name.into());

		self
	}

	/// Sets the code.
	pub fn item_code(mut self, code: impl Into<String>) -> Self {
		self.item_code = Some(code.into());

		self
	}

	/// Sets the description.
	pub fn item_description(mut self, description: impl Into<String>) -> Self {
		self.item_description = Some(description.into());

		self
	}

	/// Sets the unit of measure.
	pub fn measure_unit(mut self, unit: MeasureUnit) -> Self {
		self.measure_unit_id = Some(unit);

		self
	}

	/// Sets the unit price.
	pub fn unit_price(mut self, price: f64) -> Self {
		self.unit_price = Some(price);

		self
	}

	/// Sets the VAT percentage.
	pub fn vat_percent(mut self, percent: f64) -> Self {
		self.vat_percent = Some(percent);

		self
	}

	/// Sets the VAT category code.
	pub fn vat_category_code(mut self, code: impl Into<String>) -> Self {
		self.vat_category_code = Some(code.into());

		self
	}

	/// Sets the VAT exemption reason.
	pub fn vat_exemption_reason(mut self, reason: impl Into<String>) -> Self {
		self.vat_exemption_reason = Some(reason.into());

		self
	}

	/// Sets the active flag.
	pub fn is_active(mut self, active: bool) -> Self {
		self.is_active = Some(active);

		self
	}

	/// Returns `true` when no field is set.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}
