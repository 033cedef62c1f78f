// Copyright 2023-2026 The hyperdb-client authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

use crate::grpc;

/// A typed SQL query parameter, bound positionally in statement order.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParameter {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer value.
    Int(i64),
    /// Double-precision float value.
    Float(f64),
    /// Text value.
    String(String),
    /// Binary value.
    Bytes(Vec<u8>),
}

impl QueryParameter {
    pub(crate) fn to_wire(&self) -> grpc::TypedValue {
        let value = match self {
            QueryParameter::Null => None,
            QueryParameter::Bool(v) => Some(grpc::typed_value::Value::BoolValue(*v)),
            QueryParameter::Int(v) => Some(grpc::typed_value::Value::Int64Value(*v)),
            QueryParameter::Float(v) => Some(grpc::typed_value::Value::DoubleValue(*v)),
            QueryParameter::String(v) => {
                Some(grpc::typed_value::Value::StringValue(v.clone()))
            }
            QueryParameter::Bytes(v) => {
                Some(grpc::typed_value::Value::BytesValue(v.clone()))
            }
        };
        grpc::TypedValue {
            name: String::new(),
            value,
        }
    }

    pub(crate) fn style_of(parameters: &[QueryParameter]) -> grpc::ParamStyle {
        if parameters.is_empty() {
            grpc::ParamStyle::None
        } else {
            grpc::ParamStyle::Positional
        }
    }
}

impl From<bool> for QueryParameter {
    fn from(v: bool) -> Self {
        QueryParameter::Bool(v)
    }
}

impl From<i64> for QueryParameter {
    fn from(v: i64) -> Self {
        QueryParameter::Int(v)
    }
}

impl From<f64> for QueryParameter {
    fn from(v: f64) -> Self {
        QueryParameter::Float(v)
    }
}

impl From<&str> for QueryParameter {
    fn from(v: &str) -> Self {
        QueryParameter::String(v.to_string())
    }
}

impl From<String> for QueryParameter {
    fn from(v: String) -> Self {
        QueryParameter::String(v)
    }
}

impl From<Vec<u8>> for QueryParameter {
    fn from(v: Vec<u8>) -> Self {
        QueryParameter::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_follows_presence_of_parameters() {
        assert_eq!(QueryParameter::style_of(&[]), grpc::ParamStyle::None);
        assert_eq!(
            QueryParameter::style_of(&[QueryParameter::Int(1)]),
            grpc::ParamStyle::Positional
        );
    }

    #[test]
    fn null_maps_to_an_empty_value() {
        assert_eq!(QueryParameter::Null.to_wire().value, None);
    }

    #[test]
    fn scalars_map_to_their_wire_variants() {
        assert_eq!(
            QueryParameter::from("txt").to_wire().value,
            Some(grpc::typed_value::Value::StringValue("txt".to_string()))
        );
        assert_eq!(
            QueryParameter::from(42i64).to_wire().value,
            Some(grpc::typed_value::Value::Int64Value(42))
        );
    }
}
