//! Thin accessor layer over `json::JsonValue` that reports which key went wrong.

use glam::Vec3;
use json::JsonValue;

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Key {0:?} does not exist")]
	KeyDoesNotExist(String),
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a list")]
	ValueIsNotList(String),
	#[error("Value at {0:?} is not a string")]
	ValueIsNotString(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Error while parsing int at {0:?}\n  - number out of scope")]
	ParseIntError(String),
	#[error("Error while parsing vec3 at {key:?}\n  - {msg}")]
	ParseVec3Error { key: String, msg: String },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}
}

#[derive(Clone, Copy)]
pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	fn get(&self, key: &str) -> JsonResult<&'a JsonValue> {
		match self.0.get(key) {
			Some(value) => Ok(value),
			None => Err(JsonError::KeyDoesNotExist(key.to_owned())),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a JsonValue)> {
		self.0.iter()
	}

	pub fn get_object(&self, key: &str) -> JsonResult<JsonObject<'a>> {
		as_object(key, self.get(key)?)
	}

	/// `Ok(None)` if the key is absent, an error if it holds something else than an object.
	pub fn get_optional_object(&self, key: &str) -> JsonResult<Option<JsonObject<'a>>> {
		match self.0.get(key) {
			Some(value) => as_object(key, value).map(Some),
			None => Ok(None),
		}
	}

	pub fn get_list(&self, key: &str) -> JsonResult<&'a [JsonValue]> {
		as_list(key, self.get(key)?)
	}

	/// `Ok(&[])` if the key is absent.
	pub fn get_optional_list(&self, key: &str) -> JsonResult<&'a [JsonValue]> {
		match self.0.get(key) {
			Some(value) => as_list(key, value),
			None => Ok(&[]),
		}
	}

	pub fn get_str(&self, key: &str) -> JsonResult<&'a str> {
		match self.get(key)?.as_str() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotString(key.to_owned())),
		}
	}

	fn get_number(&self, key: &str) -> JsonResult<json::number::Number> {
		match self.get(key)?.as_number() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotNumber(key.to_owned())),
		}
	}

	pub fn get_u32(&self, key: &str) -> JsonResult<u32> {
		self.get_number(key)?
			.try_into()
			.map_err(|_| JsonError::ParseIntError(key.to_owned()))
	}

	pub fn get_vec3(&self, key: &str) -> JsonResult<Vec3> {
		let list = self.get_list(key)?;
		if list.len() != 3 {
			return Err(JsonError::ParseVec3Error {
				key: key.to_owned(),
				msg: format!("expected list of length 3, but has length {}", list.len()),
			});
		}

		let floats = as_f32s(key, list).map_err(|_| JsonError::ParseVec3Error {
			key: key.to_owned(),
			msg: "expected float, but did not get a number".to_owned(),
		})?;
		Ok(Vec3::from_slice(&floats))
	}
}

pub fn as_object<'a>(key: &str, val: &'a JsonValue) -> JsonResult<JsonObject<'a>> {
	match val {
		JsonValue::Object(obj) => Ok(JsonObject(obj)),
		_ => Err(JsonError::ValueIsNotObject(key.to_owned())),
	}
}

pub fn as_list<'a>(key: &str, val: &'a JsonValue) -> JsonResult<&'a [JsonValue]> {
	match val {
		JsonValue::Array(arr) => Ok(arr),
		_ => Err(JsonError::ValueIsNotList(key.to_owned())),
	}
}

/// Every element must be a number.
pub fn as_f32s(key: &str, vals: &[JsonValue]) -> JsonResult<Vec<f32>> {
	vals.iter()
		.enumerate()
		.map(|(i, val)| {
			val.as_f32()
				.ok_or_else(|| JsonError::ValueIsNotNumber(format!("{key}[{i}]")))
		})
		.collect()
}
