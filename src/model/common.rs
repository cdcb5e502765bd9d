//! Shared enums, pagination envelopes, and query-string helpers.

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

macro_rules! def_code {
	(
		$name:ident, $doc:literal, $kind:literal,
		{ $($variant:ident = $code:literal => $label:literal,)+ }
	) => {
		#[doc = $doc]
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "u8", into = "u8")]
		#[repr(u8)]
		pub enum $name {
			$(
				#[doc = $label]
				$variant = $code,
			)+
		}
		impl $name {
			/// Returns the numeric code sent on the wire.
			pub const fn code(self) -> u8 {
				self as u8
			}
		}
		impl From<$name> for u8 {
			fn from(value: $name) -> Self {
				value.code()
			}
		}
		impl TryFrom<u8> for $name {
			type Error = UnknownCode;

			fn try_from(value: u8) -> Result<Self, Self::Error> {
				match value {
					$($code => Ok(Self::$variant),)+
					_ => Err(UnknownCode { kind: $kind, code: value }),
				}
			}
		}
	};
}

/// Error returned when a numeric code does not map to a known variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown {kind} code {code}.")]
pub struct UnknownCode {
	/// Enum the code was decoded for.
	pub kind: &'static str,
	/// Offending code.
	pub code: u8,
}

def_code! {
	PaymentType, "How an invoice is paid, encoded as `paymentTypeId`.", "payment type", {
		Cash = 1 => "Fiscal receipt paid in cash.",
		Card = 2 => "Fiscal receipt paid by card.",
		BankTransfer = 3 => "Invoice paid by bank transfer.",
		CashReceipt = 4 => "Cash payment with a receipt.",
		CashOnDelivery = 5 => "Cash on delivery.",
		CardOnline = 6 => "Online card payment.",
		CardPlatforms = 7 => "Payment through distribution platforms.",
		HolidayVoucherCard = 8 => "Holiday voucher (card).",
		HolidayVoucherTicket = 9 => "Holiday voucher (ticket).",
	}
}

def_code! {
	MeasureUnit, "Unit of measure for invoice lines and catalog items (`measureUnitId`).", "measure unit", {
		Piece = 1 => "Piece.",
		Kilogram = 2 => "Kilogram.",
		Gram = 3 => "Gram.",
		Liter = 4 => "Liter.",
		Meter = 5 => "Meter.",
		SquareMeter = 6 => "Square meter.",
		CubicMeter = 7 => "Cubic meter.",
		Hour = 8 => "Hour.",
		Day = 9 => "Day.",
		Month = 10 => "Month.",
		Year = 11 => "Year.",
		Set = 12 => "Set.",
		Pack = 13 => "Pack.",
		Box = 14 => "Box.",
		Service = 15 => "Service.",
	}
}

/// Paginated list envelope returned by list endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
	/// Index of the first record in this page.
	#[serde(default, deserialize_with = "null_as_default")]
	pub first: u64,
	/// Index of the last record in this page.
	#[serde(default, deserialize_with = "null_as_default")]
	pub last: u64,
	/// Total number of matching records.
	#[serde(default, deserialize_with = "null_as_default")]
	pub records_count: u64,
	/// Records in this page.
	#[serde(default, deserialize_with = "null_as_default")]
	pub data: Vec<T>,
}

/// Body shared by the action endpoints that only need an external id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdBody {
	/// External identifier of the target resource.
	pub external_id: String,
}
impl ExternalIdBody {
	/// Wraps an external identifier.
	pub fn new(external_id: impl Into<String>) -> Self {
		Self { external_id: external_id.into() }
	}
}

/// Response of create endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResource {
	/// External identifier assigned by the API.
	#[serde(default, deserialize_with = "null_as_default")]
	pub external_id: String,
}

/// Reads an explicit JSON `null` as the default value.
///
/// Paired with `#[serde(default)]`, absent and `null` fields decode the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Ordered `key=value` pairs appended to list requests.
///
/// Absent filters contribute nothing, so an empty filter produces a URL without a query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryPairs(Vec<(&'static str, String)>);
impl QueryPairs {
	/// Appends `key` when `value` is present.
	pub fn push<V>(&mut self, key: &'static str, value: Option<V>)
	where
		V: ToString,
	{
		if let Some(value) = value {
			self.0.push((key, value.to_string()));
		}
	}

	/// Appends `key` when `value` is present and not empty.
	pub fn push_str(&mut self, key: &'static str, value: Option<&str>) {
		self.push(key, value.filter(|value| !value.is_empty()));
	}

	/// Returns `true` when no pair was recorded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates the recorded pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (*key, value.as_str()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn codes_serialize_as_numbers() {
		assert_eq!(
			serde_json::to_string(&PaymentType::BankTransfer).expect("Payment type should serialize."),
			"3"
		);
		assert_eq!(
			serde_json::from_str::<MeasureUnit>("15").expect("Measure unit should deserialize."),
			MeasureUnit::Service
		);
		assert_eq!(
			PaymentType::try_from(10).expect_err("Code 10 is not a payment type."),
			UnknownCode { kind: "payment type", code: 10 },
		);
		assert!(serde_json::from_str::<MeasureUnit>("0").is_err());
	}

	#[test]
	fn page_tolerates_missing_fields() {
		let page: Page<u32> =
			serde_json::from_str("{\"recordsCount\":2,\"data\":[1,2]}").expect("Page should decode.");

		assert_eq!(page.first, 0);
		assert_eq!(page.records_count, 2);
		assert_eq!(page.data, [1, 2]);
	}

	#[test]
	fn query_pairs_skip_absent_and_empty_values() {
		let mut pairs = QueryPairs::default();

		pairs.push("offset", Some(0));
		pairs.push::<u32>("count", None);
		pairs.push_str("series", Some(""));
		pairs.push_str("status", Some("VALID"));

		assert_eq!(pairs.iter().collect::<Vec<_>>(), [("offset", "0"), ("status", "VALID")]);
	}
}
