//! Invoice DTOs: list filters, summaries, full documents, requests, and delivery bodies.

// self
use crate::{
	_prelude::*,
	model::{MeasureUnit, PaymentType, QueryPairs, common::null_as_default},
};

/// Optional filters for listing invoices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
	/// Number of records to skip.
	pub offset: Option<u32>,
	/// Maximum number of records to return.
	pub count: Option<u32>,
	/// Invoice status (for example `VALID` or `DRAFT`).
	pub status: Option<String>,
	/// Earliest document date, `YYYYMMDD`.
	pub from_date: Option<u32>,
	/// Latest document date, `YYYYMMDD`.
	pub to_date: Option<u32>,
	/// Invoice series.
	pub series: Option<String>,
	/// Partner name.
	pub partner_name: Option<String>,
}
impl InvoiceFilter {
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

	/// Filters by status.
	pub fn status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());

		self
	}

	/// Restricts the document date range, both ends `YYYYMMDD`.
	pub fn date_range(mut self, from: u32, to: u32) -> Self {
		self.from_date = Some(from);
		self.to_date = Some(to);

		self
	}

	/// Filters by series.
	pub fn series(mut self, series: impl Into<String>) -> Self {
		self.series = Some(series.into());

		self
	}

	/// Filters by partner name.
	pub fn partner_name(mut self, name: impl Into<String>) -> Self {
		self.partner_name = Some(name.into());

		self
	}

	/// Returns the query-string pairs for this filter.
	pub fn query_pairs(&self) -> QueryPairs {
		let mut pairs = QueryPairs::default();

		pairs.push("offset", self.offset);
		pairs.push("count", self.count);
		pairs.push_str("status", self.status.as_deref());
		pairs.push("fromDate", self.from_date);
		pairs.push("toDate", self.to_date);
		pairs.push_str("series", self.series.as_deref());
		pairs.push_str("partnerName", self.partner_name.as_deref());

		pairs
	}
}

/// Invoice header as returned by the list endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceSummary {
	/// External identifier.
	#[serde(deserialize_with = "null_as_default")]
	pub external_id: String,
	/// Invoice series.
	#[serde(deserialize_with = "null_as_default")]
	pub series: String,
	/// Sequence number within the series.
	#[serde(deserialize_with = "null_as_default")]
	pub number: u64,
	/// Document date, `YYYYMMDD`.
	#[serde(deserialize_with = "null_as_default")]
	pub document_date: u32,
	/// Due date, `YYYYMMDD`.
	#[serde(deserialize_with = "null_as_default")]
	pub due_date: u32,
	/// Lifecycle status.
	#[serde(deserialize_with = "null_as_default")]
	pub status: String,
	/// Issuing company name.
	#[serde(deserialize_with = "null_as_default")]
	pub client_name: String,
	/// Counterparty name.
	#[serde(deserialize_with = "null_as_default")]
	pub partner_name: String,
	/// ISO currency code.
	#[serde(deserialize_with = "null_as_default")]
	pub currency_code: String,
	/// Accounting currency code.
	#[serde(deserialize_with = "null_as_default")]
	pub reference_currency_code: String,
	/// Net amount.
	#[serde(deserialize_with = "null_as_default")]
	pub net_amount: f64,
	/// VAT amount.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_amount: f64,
	/// Gross amount.
	#[serde(deserialize_with = "null_as_default")]
	pub gross_amount: f64,
}

/// Invoice counterparty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partner {
	/// `true` for companies, `false` for individuals.
	#[serde(deserialize_with = "null_as_default")]
	pub is_legal_person: bool,
	/// Display name.
	#[serde(deserialize_with = "null_as_default")]
	pub partner_name: String,
	/// Tax or personal identification number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub identification_number: Option<String>,
	/// ISO country code.
	#[serde(deserialize_with = "null_as_default")]
	pub country_code: String,
	/// Country name.
	#[serde(deserialize_with = "null_as_default")]
	pub country_name: String,
	/// County code.
	#[serde(deserialize_with = "null_as_default")]
	pub county_code: String,
	/// County name.
	#[serde(deserialize_with = "null_as_default")]
	pub county_name: String,
	/// City name.
	#[serde(deserialize_with = "null_as_default")]
	pub city_name: String,
	/// Street address.
	#[serde(deserialize_with = "null_as_default")]
	pub address_details: String,
}

/// How a line discount is expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
	/// `discountPercent` applies.
	Percent,
	/// Absolute discount values apply.
	Value,
}

/// One line of an [`InvoiceRequest`], sent as an `invoiceDetails` entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
	/// Catalog item external id.
	pub item_external_id: String,
	/// Unit of measure code.
	pub measure_unit_id: MeasureUnit,
	/// Quantity.
	pub quantity: f64,
	/// Unit price in the invoice currency.
	pub unit_price: f64,
	/// Unit price in the reference currency.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit_price_currency: Option<f64>,
	/// VAT percentage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_percent: Option<f64>,
	/// Net amount before discounts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub original_net_amount: Option<f64>,
	/// VAT amount before discounts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub original_vat_amount: Option<f64>,
	/// Net amount.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub net_amount: Option<f64>,
	/// VAT amount.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub vat_amount: Option<f64>,
	/// Gross amount.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gross_amount: Option<f64>,
	/// Excise amount.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub excise_amount: Option<f64>,
	/// How the discount is expressed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_type: Option<DiscountType>,
	/// Discount percentage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_percent: Option<f64>,
	/// `true` when the discount applies to the net value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_value_on_net: Option<bool>,
	/// Net discount value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_net_value: Option<f64>,
	/// Gross discount value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_gross_value: Option<f64>,
	/// VAT discount value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub discount_vat_value: Option<f64>,
	/// Free-text line description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl InvoiceLineItem {
	/// Creates a line with the four mandatory fields.
	pub fn new(
		item_external_id: impl Into<String>,
		measure_unit: MeasureUnit,
		quantity: f64,
		unit_price: f64,
	) -> Self {
		Self {
			item_external_id: item_external_id.into(),
			measure_unit_id: measure_unit,
			quantity,
			unit_price,
			unit_price_currency: None,
			vat_percent: None,
			original_net_amount: None,
			original_vat_amount: None,
			net_amount: None,
			vat_amount: None,
			gross_amount: None,
			excise_amount: None,
			discount_type: None,
			discount_percent: None,
			discount_value_on_net: None,
			discount_net_value: None,
			discount_gross_value: None,
			discount_vat_value: None,
			description: None,
		}
	}

	/// Sets the VAT percentage.
	pub fn vat_percent(mut self, percent: f64) -> Self {
		self.vat_percent = Some(percent);

		self
	}

	/// Applies a percentage discount.
	pub fn discount_percent(mut self, percent: f64) -> Self {
		self.discount_type = Some(DiscountType::Percent);
		self.discount_percent = Some(percent);

		self
	}

	/// Sets the free-text line description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}
}

/// Body of the create and update invoice endpoints.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
	/// Invoice series.
	pub series: String,
	/// Document date, `YYYYMMDD`.
	pub document_date: u32,
	/// Due date, `YYYYMMDD`.
	pub due_date: u32,
	/// ISO currency code.
	pub currency_code: String,
	/// Payment method.
	#[serde(rename = "paymentTypeId")]
	pub payment_type: PaymentType,
	/// Counterparty.
	pub partner: Partner,
	/// Invoice lines.
	#[serde(rename = "invoiceDetails")]
	pub items: Vec<InvoiceLineItem>,
	/// VAT on collection regime; `false` unless set.
	pub vat_on_collection: bool,
	/// Exchange rate for foreign-currency invoices.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub exchange_rate: Option<f64>,
	/// Free-text notes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}
impl InvoiceRequest {
	/// Creates a request without lines.
	pub fn new(
		series: impl Into<String>,
		document_date: u32,
		due_date: u32,
		currency_code: impl Into<String>,
		payment_type: PaymentType,
		partner: Partner,
	) -> Self {
		Self {
			series: series.into(),
			document_date,
			due_date,
			currency_code: currency_code.into(),
			payment_type,
			partner,
			items: Vec::new(),
			vat_on_collection: false,
			exchange_rate: None,
			notes: None,
		}
	}

	/// Appends a line.
	pub fn item(mut self, item: InvoiceLineItem) -> Self {
		self.items.push(item);

		self
	}

	/// Toggles the VAT on collection regime.
	pub fn vat_on_collection(mut self, enabled: bool) -> Self {
		self.vat_on_collection = enabled;

		self
	}

	/// Sets the exchange rate.
	pub fn exchange_rate(mut self, rate: f64) -> Self {
		self.exchange_rate = Some(rate);

		self
	}

	/// Sets the notes.
	pub fn notes(mut self, notes: impl Into<String>) -> Self {
		self.notes = Some(notes.into());

		self
	}
}

/// Full invoice document returned by the get endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Invoice {
	/// Invoice series.
	#[serde(deserialize_with = "null_as_default")]
	pub series: String,
	/// Sequence number within the series.
	#[serde(deserialize_with = "null_as_default")]
	pub number: u64,
	/// Lifecycle status.
	#[serde(deserialize_with = "null_as_default")]
	pub status: String,
	/// Document date, `YYYYMMDD`.
	#[serde(deserialize_with = "null_as_default")]
	pub document_date: u32,
	/// Due date, `YYYYMMDD`.
	#[serde(deserialize_with = "null_as_default")]
	pub due_date: u32,
	/// ISO currency code.
	#[serde(deserialize_with = "null_as_default")]
	pub currency_code: String,
	/// Accounting currency code.
	#[serde(deserialize_with = "null_as_default")]
	pub reference_currency_code: String,
	/// Exchange rate to the reference currency.
	#[serde(deserialize_with = "null_as_default")]
	pub exchange_rate: f64,
	/// Payment type code.
	#[serde(deserialize_with = "null_as_default")]
	pub payment_type_id: u8,
	/// VAT on collection regime.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_on_collection: bool,
	/// Counterparty.
	#[serde(deserialize_with = "null_as_default")]
	pub partner: Partner,
	/// Invoice lines (`invoiceDetails` on the wire).
	#[serde(rename = "invoiceDetails")]
	#[serde(deserialize_with = "null_as_default")]
	pub items: Vec<InvoiceItem>,
	/// Net amount before discounts.
	#[serde(deserialize_with = "null_as_default")]
	pub original_net_amount: f64,
	/// VAT amount before discounts.
	#[serde(deserialize_with = "null_as_default")]
	pub original_vat_amount: f64,
	/// Net amount.
	#[serde(deserialize_with = "null_as_default")]
	pub net_amount: f64,
	/// VAT amount.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_amount: f64,
	/// Gross amount.
	#[serde(deserialize_with = "null_as_default")]
	pub gross_amount: f64,
	/// Excise amount.
	#[serde(deserialize_with = "null_as_default")]
	pub excise_amount: f64,
	/// Net discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_net_value: f64,
	/// Gross discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_gross_value: f64,
	/// VAT discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_vat_value: f64,
	/// `true` when the discount applies to the net value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_value_on_net: bool,
}

/// One line of an [`Invoice`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceItem {
	/// Catalog item external id.
	#[serde(deserialize_with = "null_as_default")]
	pub item_external_id: String,
	/// Catalog item code.
	#[serde(deserialize_with = "null_as_default")]
	pub item_code: String,
	/// Catalog item name.
	#[serde(deserialize_with = "null_as_default")]
	pub item_name: String,
	/// Catalog item description.
	#[serde(deserialize_with = "null_as_default")]
	pub item_description: String,
	/// Unit of measure code.
	#[serde(deserialize_with = "null_as_default")]
	pub measure_unit_id: u8,
	/// UN/ECE unit of measure code.
	#[serde(deserialize_with = "null_as_default")]
	pub un_measure_unit: String,
	/// Quantity.
	#[serde(deserialize_with = "null_as_default")]
	pub quantity: f64,
	/// Unit price in the invoice currency.
	#[serde(deserialize_with = "null_as_default")]
	pub unit_price: f64,
	/// VAT percentage.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_percent: f64,
	/// UN/ECE VAT category code.
	#[serde(deserialize_with = "null_as_default")]
	pub un_vat_category: String,
	/// UN/ECE VAT exemption reason code.
	#[serde(deserialize_with = "null_as_default")]
	pub un_vat_exemption_reason: String,
	/// Net amount before discounts.
	#[serde(deserialize_with = "null_as_default")]
	pub original_net_amount: f64,
	/// VAT amount before discounts.
	#[serde(deserialize_with = "null_as_default")]
	pub original_vat_amount: f64,
	/// Net amount.
	#[serde(deserialize_with = "null_as_default")]
	pub net_amount: f64,
	/// VAT amount.
	#[serde(deserialize_with = "null_as_default")]
	pub vat_amount: f64,
	/// Gross amount.
	#[serde(deserialize_with = "null_as_default")]
	pub gross_amount: f64,
	/// Excise amount.
	#[serde(deserialize_with = "null_as_default")]
	pub excise_amount: f64,
	/// Net discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_net_value: f64,
	/// Gross discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_gross_value: f64,
	/// VAT discount value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_vat_value: f64,
	/// `true` when the discount applies to the net value.
	#[serde(deserialize_with = "null_as_default")]
	pub discount_value_on_net: bool,
}

/// Who receives an emailed invoice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recipient {
	/// A single `to` address.
	Simple(String),
	/// `to` plus optional copies.
	Extended(EmailRecipients),
}
impl Recipient {
	/// Normalizes both shapes into the wire recipients object.
	pub fn into_recipients(self) -> EmailRecipients {
		match self {
			Recipient::Simple(to) => EmailRecipients::new(to),
			Recipient::Extended(recipients) => recipients,
		}
	}
}
impl From<&str> for Recipient {
	fn from(value: &str) -> Self {
		Self::Simple(value.to_owned())
	}
}
impl From<String> for Recipient {
	fn from(value: String) -> Self {
		Self::Simple(value)
	}
}
impl From<EmailRecipients> for Recipient {
	fn from(value: EmailRecipients) -> Self {
		Self::Extended(value)
	}
}

/// Addresses an invoice email is delivered to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailRecipients {
	/// Primary recipient.
	pub to: String,
	/// Carbon copies.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub cc: Vec<String>,
	/// Blind carbon copies.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub bcc: Vec<String>,
}
impl EmailRecipients {
	/// Creates recipients with only a `to` address.
	pub fn new(to: impl Into<String>) -> Self {
		Self { to: to.into(), cc: Vec::new(), bcc: Vec::new() }
	}

	/// Adds a carbon copy.
	pub fn cc(mut self, address: impl Into<String>) -> Self {
		self.cc.push(address.into());

		self
	}

	/// Adds a blind carbon copy.
	pub fn bcc(mut self, address: impl Into<String>) -> Self {
		self.bcc.push(address.into());

		self
	}
}

/// Body of the invoice delivery endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDelivery {
	/// Invoice being delivered.
	pub invoice_external_id: String,
	/// Delivery instructions; the client always sends one email entry.
	pub info: Vec<DeliveryInfo>,
}
impl InvoiceDelivery {
	/// Builds an email-attachment delivery for `invoice_external_id`.
	pub fn email(invoice_external_id: impl Into<String>, recipient: Recipient) -> Self {
		Self {
			invoice_external_id: invoice_external_id.into(),
			info: vec![DeliveryInfo {
				delivery_method: "Email",
				representation_type: "Attachment",
				recipients: recipient.into_recipients(),
			}],
		}
	}
}

/// One delivery instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
	/// Channel, always `Email`.
	pub delivery_method: &'static str,
	/// Payload form, always `Attachment`.
	pub representation_type: &'static str,
	/// Addresses.
	pub recipients: EmailRecipients,
}

/// Response of the eFactura submission endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EfacturaSubmission {
	/// Upload index assigned by ANAF.
	pub upload_index: Option<String>,
	/// Invoice external id.
	pub external_id: Option<String>,
}
impl EfacturaSubmission {
	/// Literal returned when the response carries no identifier.
	pub const FALLBACK: &'static str = "SUBMITTED";

	/// Returns the upload index, else the external id, else [`Self::FALLBACK`].
	///
	/// Empty strings count as absent.
	pub fn reference(self) -> String {
		self.upload_index
			.filter(|value| !value.is_empty())
			.or(self.external_id.filter(|value| !value.is_empty()))
			.unwrap_or_else(|| Self::FALLBACK.to_owned())
	}
}
